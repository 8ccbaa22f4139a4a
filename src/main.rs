//! Wiretap - Chat API fixture generator
//!
//! Drives a chat backend's REST and websocket API through scripted scenarios
//! and records every response and event as fixture JSON files for an SDK
//! test suite's mock server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wiretap::cli::{Cli, Commands};
use wiretap::scenarios::{self, RunConfig, RunSummary, Scenario};
use wiretap::services::TokenService;
use wiretap::{config, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wiretap=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            out,
            channel_id,
        } => {
            let run_config = RunConfig {
                api: config.api.clone(),
                fixtures_dir: out.unwrap_or_else(|| config.output.fixtures_dir.clone()),
                channel_id,
            };

            let selected: Vec<Scenario> = match scenario {
                Some(name) => vec![name.parse()?],
                None => Scenario::all().to_vec(),
            };

            let mut summaries: Vec<RunSummary> = Vec::new();
            for scenario in selected {
                summaries.push(scenarios::run(scenario, &run_config).await?);
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for summary in &summaries {
                    println!(
                        "{}: {} fixtures -> {}",
                        summary.scenario,
                        summary.fixtures.len(),
                        summary.dir.display()
                    );
                }
            }
        }
        Commands::List => {
            if cli.json {
                let list: Vec<_> = Scenario::all()
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "name": s.name(),
                            "description": s.description(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                for scenario in Scenario::all() {
                    println!("{:<12} {}", scenario.name(), scenario.description());
                }
            }
        }
        Commands::Token { user } => {
            config.api.require_credentials()?;
            let token = TokenService::new(&config.api.api_secret).user_token(&user)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "user": user,
                        "token": token,
                    }))?
                );
            } else {
                println!("{}", token);
            }
        }
    }

    Ok(())
}
