use async_trait::async_trait;
use axum::Router;

use estante_db::{Database, Migration};

/// Context handed to modules during initialization and route construction.
pub struct AppCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a Database,
}

/// Lifecycle trait every estante module implements.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; routes are mounted under `/{name}`.
    fn name(&self) -> &'static str;

    /// Initialize the module. Called during startup, before migrations run.
    async fn init(&self, _ctx: &AppCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Axum router for this module's routes, with any state already baked in.
    fn routes(&self, _ctx: &AppCtx<'_>) -> Router {
        Router::new()
    }

    /// OpenAPI fragment for this module, merged into the published spec.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Migrations contributed by this module, applied in the order returned.
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Start background work. Called after migrations are complete.
    async fn start(&self, _ctx: &AppCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and release resources. Called during shutdown.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
