//! JSON output for scripting.

use semlink_core::{CorrelatedReply, LocalObject};

use super::OutputFormatter;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn replies_json(replies: &[CorrelatedReply]) -> String {
        let output = serde_json::json!({
            "replies": replies,
            "count": replies.len(),
        });
        serde_json::to_string_pretty(&output).unwrap_or_default()
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_discovery_replies(&self, replies: &[CorrelatedReply]) -> String {
        Self::replies_json(replies)
    }

    fn format_identity_replies(&self, replies: &[CorrelatedReply]) -> String {
        Self::replies_json(replies)
    }

    fn format_objects(&self, objects: &[LocalObject]) -> String {
        let output = serde_json::json!({
            "objects": objects,
            "count": objects.len(),
        });
        serde_json::to_string_pretty(&output).unwrap_or_default()
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({ "message": message }).to_string()
    }
}
