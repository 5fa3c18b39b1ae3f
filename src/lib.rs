//! Shelfwise application library
//!
//! Wires the book catalog feature modules into the kernel registry and the
//! HTTP server.

pub mod context;
pub mod modules;

pub use context::AppContext;

use std::future::Future;

use anyhow::Context;
use tokio::net::TcpListener;

use shelfwise_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Build a registry holding every application module
pub fn build_registry(ctx: &AppContext) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, ctx)?;
    Ok(registry)
}

/// Run the application until a shutdown signal arrives
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let ctx = AppContext::from_settings(settings)?;
    let registry = build_registry(&ctx)?;
    let listener = shelfwise_http::bind(&ctx.settings).await?;

    serve_registry(
        &registry,
        &ctx.settings,
        listener,
        shelfwise_http::shutdown_signal(),
    )
    .await
}

/// Start every module, serve until `shutdown` resolves, then stop the
/// modules in reverse order even when serving failed.
pub async fn serve_registry<F>(
    registry: &ModuleRegistry,
    settings: &Settings,
    listener: TcpListener,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let init_ctx = InitCtx { settings };
    registry.init_modules(&init_ctx).await?;
    registry.start_modules(&init_ctx).await?;

    let app = shelfwise_http::build_router(registry, settings);
    let served = shelfwise_http::serve(listener, app, shutdown).await;

    registry
        .stop_modules()
        .await
        .context("failed to stop modules cleanly")?;

    served
}
