use anyhow::Context;
use clap::{Parser, Subcommand};

use shelfwise_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "shelfwise", version, about = "Shelfwise API command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Load the layered configuration and print the effective settings
    CheckConfig,
    /// Print every documented module route
    Routes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load Shelfwise settings")?;

    match cli.command {
        Command::Serve => {
            shelfwise_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "shelfwise serve");
            shelfwise_app::run(settings).await
        }
        Command::CheckConfig => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
        Command::Routes => {
            let base_path = settings.server.base_path.clone();
            let ctx = shelfwise_app::AppContext::from_settings(settings)?;
            let registry = shelfwise_app::build_registry(&ctx)?;
            for line in shelfwise_http::router::describe_routes(&registry, &base_path) {
                println!("{line}");
            }
            Ok(())
        }
    }
}
