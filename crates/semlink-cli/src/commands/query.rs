//! Semantic query command implementation.

use std::time::Duration;

use semlink_core::net::resolve_target;
use semlink_core::{DiscoveryClient, Tag};

use crate::cli::QueryArgs;
use crate::error::{CliError, Result};
use crate::output::get_formatter;

use super::collect_replies;

/// Run the query command
pub async fn run_query(args: QueryArgs, port: u16, json: bool) -> Result<()> {
    let formatter = get_formatter(json);

    let tags = args
        .tags
        .iter()
        .map(|spec| parse_tag_spec(spec))
        .collect::<Result<Vec<_>>>()?;

    let target = resolve_target(args.target.as_deref(), port)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    tracing::debug!(%target, "sending semantic query");
    let mut client = DiscoveryClient::open().await?;
    client.send_semantic_query(tags, target).await?;

    if !json {
        println!("Querying {} for {} seconds...", target, args.duration);
    }

    let replies = collect_replies(&mut client, Duration::from_secs(args.duration), json).await?;

    println!("{}", formatter.format_discovery_replies(&replies));

    if replies.is_empty() {
        return Err(CliError::NoReplies);
    }

    Ok(())
}

/// Parse a `name=value` tag argument.
fn parse_tag_spec(spec: &str) -> Result<Tag> {
    let (name, value) = spec.split_once('=').ok_or_else(|| {
        CliError::InvalidArgument(format!("tag '{}' must be name=value", spec))
    })?;

    if name.is_empty() || value.is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "tag '{}' has an empty name or value",
            spec
        )));
    }

    Ok(Tag::new(name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_spec() {
        let tag = parse_tag_spec("a=temperature_sensor").unwrap();
        assert_eq!(tag, Tag::new("a", "temperature_sensor"));
    }

    #[test]
    fn test_parse_tag_spec_keeps_extra_equals_in_value() {
        let tag = parse_tag_spec("expr=x=y").unwrap();
        assert_eq!(tag.name, "expr");
        assert_eq!(tag.value, "x=y");
    }

    #[test]
    fn test_parse_tag_spec_rejects_bad_shapes() {
        assert!(parse_tag_spec("no-separator").is_err());
        assert!(parse_tag_spec("=value").is_err());
        assert!(parse_tag_spec("name=").is_err());
    }
}
