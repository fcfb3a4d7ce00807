//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// semlink - tag-indexed semantic discovery over UDP
#[derive(Parser, Debug)]
#[command(name = "semlink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// UDP discovery port
    #[arg(long, global = true, default_value = "3993", env = "SEMLINK_PORT")]
    pub port: u16,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find objects by semantic tags
    Query(QueryArgs),

    /// Find devices by instance range
    Identify(IdentifyArgs),

    /// Run the discovery responder for a device file
    Serve(ServeArgs),

    /// List the objects and tags in a device file
    Objects(ObjectsArgs),
}

// ==================== Query ====================

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Tag predicate as name=value; repeat for a conjunction
    #[arg(short = 't', long = "tag", required = true)]
    pub tags: Vec<String>,

    /// Target address (IP or IP:port); default is local broadcast
    #[arg(long)]
    pub target: Option<String>,

    /// How long to collect replies (seconds)
    #[arg(short, long, default_value = "5")]
    pub duration: u64,
}

// ==================== Identify ====================

#[derive(Args, Debug)]
pub struct IdentifyArgs {
    /// Lowest device instance to report (inclusive)
    #[arg(long)]
    pub low: Option<u32>,

    /// Highest device instance to report (inclusive)
    #[arg(long)]
    pub high: Option<u32>,

    /// Target address (IP or IP:port); default is local broadcast
    #[arg(long)]
    pub target: Option<String>,

    /// How long to collect replies (seconds)
    #[arg(short, long, default_value = "5")]
    pub duration: u64,
}

// ==================== Serve ====================

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Device file (default: platform config dir)
    #[arg(short, long, env = "SEMLINK_DEVICE_FILE")]
    pub config: Option<PathBuf>,
}

// ==================== Objects ====================

#[derive(Args, Debug)]
pub struct ObjectsArgs {
    /// Device file (default: platform config dir)
    #[arg(short, long, env = "SEMLINK_DEVICE_FILE")]
    pub config: Option<PathBuf>,
}
