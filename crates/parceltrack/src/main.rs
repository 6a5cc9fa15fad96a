//! Parceltrack - parcel tracking for delivery agents

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use parceltrack_config::Config;

mod commands;

use commands::{
    demo_command, init_command, routes_command, simulate_command, status_command, tools_command,
};

/// Parceltrack - parcel tracking for delivery agents
#[derive(Parser)]
#[command(name = "parceltrack")]
#[command(about = "◆ Parcel tracking store and delivery agent toolkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config
    Init,
    /// Show configuration status
    Status,
    /// Walk through tracking, intercity booking and support
    Demo,
    /// Run concurrent couriers through the status ingest
    Simulate {
        /// Number of couriers
        #[arg(short, long, default_value_t = 4)]
        couriers: usize,
        /// Number of parcels
        #[arg(short, long, default_value_t = 20)]
        parcels: usize,
    },
    /// Look up intercity routes
    Routes {
        /// Origin city
        #[arg(short, long)]
        from: String,
        /// Destination city
        #[arg(short, long)]
        to: String,
    },
    /// List agent tools
    Tools {
        /// Print full JSON definitions
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands, loaded: parceltrack_config::Result<Config>) -> Result<()> {
    let config = loaded.context("Failed to load config");

    match command {
        Commands::Init => init_command().await,
        Commands::Status => status_command(&config?),
        Commands::Demo => demo_command(&config?).await,
        Commands::Simulate { couriers, parcels } => {
            simulate_command(&config?, couriers, parcels).await
        }
        Commands::Routes { from, to } => routes_command(&config?, &from, &to),
        Commands::Tools { json } => tools_command(&config?, json),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = Config::load().await;
    let level = loaded
        .as_ref()
        .map(|c| c.log_level().to_string())
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(cli.verbose, &level);

    if let Err(e) = run(cli.command, loaded).await {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
