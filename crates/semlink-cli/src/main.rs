//! semlink - command-line client and responder for tag-indexed semantic
//! discovery.
//!
//! `query` and `identify` send a discovery request and print the
//! correlated replies; `serve` runs the responder side for a device file.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("SEMLINK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Query(args) => commands::run_query(args, cli.port, cli.json).await,
        Commands::Identify(args) => commands::run_identify(args, cli.port, cli.json).await,
        Commands::Serve(args) => commands::run_serve(args, cli.port, cli.json).await,
        Commands::Objects(args) => commands::run_objects(args, cli.json).await,
    }
}
