use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use igcinfo::log_format::TargetFirstFormat;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "igcinfo")]
#[command(about = "IGC track registry: fetch, parse and serve flight tracks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the IGC track API over HTTP
    Run {
        /// Interface to bind to
        #[arg(long, env = "IGCINFO_INTERFACE", default_value = "0.0.0.0")]
        interface: String,

        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Timeout for fetching a track URL, in seconds
        #[arg(long, default_value_t = 30)]
        fetch_timeout_secs: u64,

        /// Largest IGC file accepted, in bytes
        #[arg(long, default_value_t = 10 * 1024 * 1024)]
        max_track_bytes: usize,
    },
    /// Parse a local IGC file and print the track summary as JSON
    Inspect {
        /// Path to the IGC file
        path: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let ansi = std::io::stderr().is_terminal();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(TargetFirstFormat::new(ansi))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            interface,
            port,
            fetch_timeout_secs,
            max_track_bytes,
        } => {
            commands::handle_run(
                interface,
                port,
                Duration::from_secs(fetch_timeout_secs),
                max_track_bytes,
            )
            .await
        }
        Commands::Inspect { path } => commands::handle_inspect(&path),
    }
}
