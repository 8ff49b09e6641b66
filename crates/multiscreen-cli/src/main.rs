use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use multiscreen_core::{AppConfig, Direction, Size};

mod commands;
mod scenario;

#[derive(Parser)]
#[command(name = "multiscreen")]
#[command(author, version, about = "Run and inspect animated screen-switch scenarios")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.config/multiscreen/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scenario file against a headless view and print the timeline
    Run {
        /// Scenario TOML file
        scenario: PathBuf,
        /// Multiplier applied to every duration (0 runs instantly)
        #[arg(short = 't', long, default_value_t = 1.0)]
        time_scale: f64,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show movement vectors and style plans for one switch
    Plan {
        /// Enter command
        #[arg(short = 'e', long, default_value = "fade")]
        enter: Direction,
        /// Exit command
        #[arg(short = 'x', long, default_value = "fade")]
        exit: Direction,
        /// Outer size of the current screen, WIDTHxHEIGHT
        #[arg(long, default_value = "1280x720")]
        current: Size,
        /// Outer size of the target screen, WIDTHxHEIGHT
        #[arg(long, default_value = "1280x720")]
        target: Size,
        /// Viewport size, WIDTHxHEIGHT
        #[arg(long, default_value = "1280x720")]
        viewport: Size,
        /// Extra vertical travel in pixels
        #[arg(long)]
        vertical_distance: Option<u64>,
        /// Extra horizontal travel in pixels
        #[arg(long)]
        horizontal_distance: Option<u64>,
    },
    /// List every animation command
    Directions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            time_scale,
            json,
        } => commands::run::run(&config, &scenario, time_scale, json).await,
        Commands::Plan {
            enter,
            exit,
            current,
            target,
            viewport,
            vertical_distance,
            horizontal_distance,
        } => commands::plan::run(
            &config,
            commands::plan::PlanArgs {
                enter,
                exit,
                current,
                target,
                viewport,
                vertical_distance,
                horizontal_distance,
            },
        ),
        Commands::Directions => commands::directions::run(),
    }
}
