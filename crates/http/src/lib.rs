//! HTTP server facade for estante with Axum, error handling, and OpenAPI
//! documentation.

use anyhow::Context;
use axum::{http::HeaderValue, routing::get, Router};

use estante_kernel::{AppCtx, ModuleRegistry};

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry.
///
/// Returns once the server shuts down (ctrl-c) or fails.
pub async fn start_server(registry: &ModuleRegistry, ctx: &AppCtx<'_>) -> anyhow::Result<()> {
    let server = &ctx.settings.server;

    let app = build_router(registry, ctx).context("failed to build HTTP router")?;

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", server.host, server.port))
        .await
        .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        server.host,
        server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted.
pub fn build_router(registry: &ModuleRegistry, ctx: &AppCtx<'_>) -> anyhow::Result<Router> {
    let server = &ctx.settings.server;

    let cors_origin: HeaderValue = server
        .cors_origin
        .parse()
        .with_context(|| format!("invalid CORS origin '{}'", server.cors_origin))?;

    let mut router_builder = RouterBuilder::new()
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            "mounting module routes under /{}",
            module.name()
        );
        router_builder = router_builder.mount_module(module.name(), module.routes(ctx));
    }

    router_builder = router_builder
        .with_openapi(registry)
        .with_tracing()
        .with_cors(cors_origin)
        .with_request_id()
        .with_timeout(server.request_timeout_ms);

    Ok(router_builder.build())
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(error) => tracing::error!(%error, "failed to listen for shutdown signal"),
    }
}
