use super::{parse_args, PrAgentTool};
use pr_agent_core::events::{EventRepository, EventStore, JsonFileRepository};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct Args {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

pub struct GetRecentActionsEventsTool<R = JsonFileRepository> {
    events: Arc<EventStore<R>>,
}

impl<R> GetRecentActionsEventsTool<R> {
    pub fn new(events: Arc<EventStore<R>>) -> Self {
        Self { events }
    }
}

impl<R: EventRepository + Send + Sync> PrAgentTool for GetRecentActionsEventsTool<R> {
    fn name(&self) -> &str {
        "get_recent_actions_events"
    }

    fn description(&self) -> &str {
        "Get recent GitHub Actions events received via webhook, oldest first"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Maximum number of events to return",
                    "default": DEFAULT_LIMIT
                }
            }
        })
    }

    fn call(&self, args: Value) -> Result<Value, String> {
        let args: Args = parse_args(args)?;
        serde_json::to_value(self.events.recent(args.limit)).map_err(|e| e.to_string())
    }
}
