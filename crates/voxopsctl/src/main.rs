//! VoxOps CLI - run and inspect voice commands from a terminal

use anyhow::{Context, Result};
use clap::Parser;
use voxops_common::speech::CommandSpeaker;
use voxops_common::{Config, Executor, Pipeline};
use voxopsctl::cli::{sentence, Cli, Commands};
use voxopsctl::output;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Ask { text, json, speak } => {
            let pipeline = Pipeline::from_config(&config);
            let report = pipeline.process(&sentence(&text)).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", output::format_report(&report));
            }

            if speak || config.speech.enabled {
                let speaker = CommandSpeaker::new(config.speech.program.clone(), config.speech.args.clone());
                if let Err(e) = speaker.say(&report.spoken_text).await {
                    eprintln!("Could not speak ({}): {}", config.speech.program, e);
                }
            }

            if report.outcome.is_failure() {
                std::process::exit(1);
            }
        }

        Commands::Classify { text, json } => {
            let pipeline = Pipeline::from_config(&config);
            let resolution = pipeline.resolve(&sentence(&text));

            if json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                let line = pipeline.executor().command_line(&resolution.spec);
                print!("{}", output::format_resolution(&resolution, line.as_deref()));
            }
        }

        Commands::Health { json } => {
            let executor = Executor::with_processes(config.executor.clone());
            let report = executor.health_check().await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", output::format_health(&report));
            }

            if !report.all_available() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
