//! Command implementations.

pub mod identify;
pub mod objects;
pub mod query;
pub mod serve;

pub use identify::run_identify;
pub use objects::run_objects;
pub use query::run_query;
pub use serve::run_serve;

use std::time::Duration;

use indicatif::ProgressBar;
use semlink_core::{CorrelatedReply, DiscoveryClient};

use crate::error::Result;

/// Collect replies for `window`, with a spinner in human mode.
pub(crate) async fn collect_replies(
    client: &mut DiscoveryClient,
    window: Duration,
    json: bool,
) -> Result<Vec<CorrelatedReply>> {
    if json {
        return Ok(client.collect(window, |_| {}).await?);
    }

    let bar = ProgressBar::new_spinner();
    bar.set_message("Collecting replies...");
    bar.enable_steady_tick(Duration::from_millis(120));

    let mut count = 0usize;
    let replies = client
        .collect(window, |_| {
            count += 1;
            bar.set_message(format!("Collecting replies... {} received", count));
        })
        .await?;

    bar.finish_and_clear();
    Ok(replies)
}
