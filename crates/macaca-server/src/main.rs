//! Macaca
//!
//! Web service that classifies uploaded macaque photos with a pretrained
//! ResNet and returns the three most likely species.

use clap::Parser;
use macaca_classifiers::InferenceAdapter;
use macaca_core::AnalyzeResponse;
use macaca_server::cli::{Cli, Commands};
use macaca_server::config::ServerConfig;
use macaca_server::server::run_server;
use macaca_server::startup::{fetch_phase, initialize};
use macaca_server::state::AppState;
use macaca_server::telemetry::{init_logging, init_metrics};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = ServerConfig::load(&cli.config, &cli)?;
    info!("Artifact: {} <- {}", config.artifact_path().display(), config.model_url);

    match cli.command {
        None => {
            initialize(&config).await?;
            info!("Model ready; listener not started (run `macaca serve` to accept requests)");
        }

        Some(Commands::Fetch) => {
            fetch_phase(&config).await?;
        }

        Some(Commands::Serve { listen, port }) => {
            if let Some(listen) = listen {
                config.listen = listen;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let predictor = initialize(&config).await?;
            let state = AppState::new(predictor).with_metrics(init_metrics()?);

            println!();
            println!("  Macaca image classifier");
            println!("  Open http://{}:{} in your browser", config.listen, config.port);
            println!();

            run_server(state, &config).await?;
        }

        Some(Commands::Predict { image }) => {
            let predictor = initialize(&config).await?;
            let bytes = tokio::fs::read(&image).await?;

            let top = InferenceAdapter::new(predictor).analyze(bytes.into()).await?;
            let response = AnalyzeResponse::try_from(&top)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
