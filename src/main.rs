mod modules;

use anyhow::Context;

use estante_db::Database;
use estante_kernel::{settings::Settings, AppCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load estante settings")?;
    estante_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.path,
        "estante bootstrap starting"
    );

    let db = Database::connect(&settings.database.path)
        .await
        .with_context(|| format!("failed to open database '{}'", settings.database.path))?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let ctx = AppCtx {
        settings: &settings,
        db: &db,
    };

    registry.init_modules(&ctx).await?;
    db.run_migrations(&registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    registry.start_modules(&ctx).await?;

    tracing::info!("estante bootstrap complete");

    estante_http::start_server(&registry, &ctx).await?;

    registry.stop_modules().await?;
    db.close().await;

    Ok(())
}
