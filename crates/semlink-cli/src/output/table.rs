//! Table-formatted output for CLI.

use chrono::Local;
use comfy_table::{Cell, ContentArrangement, Table};

use semlink_core::{CorrelatedReply, LocalObject, ReplyBody};

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn received_at(reply: &CorrelatedReply) -> String {
        reply
            .received_at
            .with_timezone(&Local)
            .format("%H:%M:%S%.3f")
            .to_string()
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_discovery_replies(&self, replies: &[CorrelatedReply]) -> String {
        if replies.is_empty() {
            return "No replies received.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Source", "Device", "Object", "Name", "Received"]);

        for reply in replies {
            if let ReplyBody::Discovery(body) = &reply.body {
                table.add_row(vec![
                    Cell::new(reply.source.to_string()),
                    Cell::new(body.device_identifier.to_string()),
                    Cell::new(body.object_identifier.to_string()),
                    Cell::new(&body.object_name),
                    Cell::new(Self::received_at(reply)),
                ]);
            }
        }

        format!("{}\n\nFound {} object(s)", table, replies.len())
    }

    fn format_identity_replies(&self, replies: &[CorrelatedReply]) -> String {
        if replies.is_empty() {
            return "No replies received.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Source", "Instance", "Name", "Vendor ID", "Received"]);

        for reply in replies {
            if let ReplyBody::Identity(body) = &reply.body {
                table.add_row(vec![
                    Cell::new(reply.source.to_string()),
                    Cell::new(body.device_instance.to_string()),
                    Cell::new(&body.device_name),
                    Cell::new(body.vendor_id.to_string()),
                    Cell::new(Self::received_at(reply)),
                ]);
            }
        }

        format!("{}\n\nFound {} device(s)", table, replies.len())
    }

    fn format_objects(&self, objects: &[LocalObject]) -> String {
        if objects.is_empty() {
            return "No objects configured.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Object", "Name", "Tags"]);

        for object in objects {
            let tags = object
                .tags
                .iter()
                .map(|tag| tag.to_string())
                .collect::<Vec<_>>()
                .join(", ");

            table.add_row(vec![
                Cell::new(object.id.to_string()),
                Cell::new(&object.name),
                Cell::new(tags),
            ]);
        }

        format!("{}\n\n{} object(s)", table, objects.len())
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}
