//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use semlink_core::{CorrelatedReply, LocalObject};

/// Output formatter trait
pub trait OutputFormatter {
    /// Format correlated discovery replies (semantic query results)
    fn format_discovery_replies(&self, replies: &[CorrelatedReply]) -> String;

    /// Format correlated identity replies
    fn format_identity_replies(&self, replies: &[CorrelatedReply]) -> String;

    /// Format the objects of a device file
    fn format_objects(&self, objects: &[LocalObject]) -> String;

    /// Format a generic message
    fn format_message(&self, message: &str) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
