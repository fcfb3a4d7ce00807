//! Serve command: run the discovery responder.

use std::path::PathBuf;
use std::sync::Arc;

use colored::*;

use semlink_core::{default_device_file_path, load_device_file, CoreError, ResponderNode};

use crate::cli::ServeArgs;
use crate::error::Result;

/// Run the serve command
pub async fn run_serve(args: ServeArgs, port: u16, json: bool) -> Result<()> {
    let path = device_file_path(args)?;

    tracing::debug!(path = %path.display(), "loading device file");
    let file = load_device_file(&path).await.map_err(CoreError::from)?;
    let device = Arc::new(file.into_device()?);

    if device.identity().is_none() {
        eprintln!(
            "{}",
            "Warning: no device identity configured; all discovery queries will be ignored"
                .yellow()
        );
    }

    let node = ResponderNode::bind(port, device).await?;

    if !json {
        println!(
            "Serving discovery from {} on port {} (press Ctrl+C to stop)",
            path.display(),
            port
        );
    }

    tokio::select! {
        result = node.run() => Ok(result?),
        _ = tokio::signal::ctrl_c() => {
            if !json {
                println!("\nShutting down");
            }
            Ok(())
        }
    }
}

fn device_file_path(args: ServeArgs) -> Result<PathBuf> {
    match args.config {
        Some(path) => Ok(path),
        None => Ok(default_device_file_path().map_err(CoreError::from)?),
    }
}
