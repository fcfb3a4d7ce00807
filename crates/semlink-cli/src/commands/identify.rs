//! Identity discovery command implementation.

use std::time::Duration;

use semlink_core::net::resolve_target;
use semlink_core::protocol::IdentityQuery;
use semlink_core::DiscoveryClient;

use crate::cli::IdentifyArgs;
use crate::error::{CliError, Result};
use crate::output::get_formatter;

use super::collect_replies;

/// Run the identify command
pub async fn run_identify(args: IdentifyArgs, port: u16, json: bool) -> Result<()> {
    let formatter = get_formatter(json);

    let query = IdentityQuery {
        low: args.low,
        high: args.high,
    };
    let target = resolve_target(args.target.as_deref(), port)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    let mut client = DiscoveryClient::open().await?;
    client.send_identity_query(query, target).await?;

    if !json {
        println!("Identifying devices at {} for {} seconds...", target, args.duration);
    }

    let replies = collect_replies(&mut client, Duration::from_secs(args.duration), json).await?;

    println!("{}", formatter.format_identity_replies(&replies));

    if replies.is_empty() {
        return Err(CliError::NoReplies);
    }

    Ok(())
}
