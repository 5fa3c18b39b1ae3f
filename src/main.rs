use anyhow::Context;
use shelfwise_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Shelfwise settings")?;
    shelfwise_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        base_path = %settings.server.base_path,
        "shelfwise-app bootstrap starting"
    );

    shelfwise_app::run(settings).await
}
