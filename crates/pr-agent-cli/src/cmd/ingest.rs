use crate::output::print_json;
use anyhow::Context;
use pr_agent_core::{
    config::Config,
    events::{EventStore, JsonFileRepository},
};
use std::io::Read;
use std::path::Path;

/// Append one webhook payload to the event log. Reads from `file`, or stdin
/// when no file is given.
pub fn run(root: &Path, config: &Config, file: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let raw = match file {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read event from stdin")?;
            buf
        }
    };
    let value: serde_json::Value =
        serde_json::from_str(&raw).context("event payload is not valid JSON")?;

    let log = config.events_path(root);
    let store = EventStore::new(JsonFileRepository::new(&log));
    let event = store.ingest(value)?;

    if json {
        print_json(&event)?;
    } else {
        println!(
            "recorded {} event in {}",
            event.event_kind.as_deref().unwrap_or("untyped"),
            log.display()
        );
    }
    Ok(())
}
