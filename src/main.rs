//! signal-sim - scripted screen-sharing signaling scenarios
//!
//! Replays presenter and participant negotiations against a simulated
//! counterpart and prints the messages exchanged.

use clap::Parser;
use std::path::PathBuf;

use signaling::commands::Commands;
use signaling::common::{logging, Config};
use signaling::{cli, Result};

#[derive(Parser)]
#[command(name = "signal-sim", about = "Screen-sharing signaling scenario simulator")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every wire message
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.debug);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli::dispatch(cli.command, config).await
}
