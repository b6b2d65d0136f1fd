use pr_agent_core::{
    config::Config,
    diff::{DiffAnalyzer, GitCli},
    events::{EventStore, JsonFileRepository},
    notify::Notifier,
    templates::TemplateCatalog,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub mod analyze_file_changes;
pub mod get_pr_templates;
pub mod get_recent_actions_events;
pub mod get_workflow_status;
pub mod send_slack_notification;
pub mod suggest_template;

pub trait PrAgentTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> Value;
    fn call(&self, args: Value) -> Result<Value, String>;
}

/// Deserialize a tool's typed arguments. A missing or `null` argument object
/// is treated as `{}` so tools whose arguments are all optional can be called
/// bare.
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, String> {
    let args = match args {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| format!("invalid arguments: {e}"))
}

// ---------------------------------------------------------------------------
// ToolResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolContent {
    pub r#type: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![ToolContent {
                r#type: "text",
                text,
            }],
            is_error,
        }
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// ToolRegistry
// ---------------------------------------------------------------------------

pub struct ToolRegistry {
    tools: Vec<Box<dyn PrAgentTool>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Box<dyn PrAgentTool>>) -> Self {
        Self { tools }
    }

    /// Build every tool, each closed over the component it drives.
    pub fn from_config(root: &Path, config: &Config) -> Self {
        let catalog = Arc::new(TemplateCatalog::with_defaults(config.templates_path(root)));
        let events = Arc::new(EventStore::new(JsonFileRepository::new(
            config.events_path(root),
        )));

        Self::new(vec![
            Box::new(analyze_file_changes::AnalyzeFileChangesTool::new(
                DiffAnalyzer::new(GitCli::new(root)),
                config.diff.clone(),
            )),
            Box::new(get_pr_templates::GetPrTemplatesTool::new(Arc::clone(
                &catalog,
            ))),
            Box::new(suggest_template::SuggestTemplateTool::new(catalog)),
            Box::new(get_recent_actions_events::GetRecentActionsEventsTool::new(
                Arc::clone(&events),
            )),
            Box::new(get_workflow_status::GetWorkflowStatusTool::new(events)),
            Box::new(send_slack_notification::SendSlackNotificationTool::new(
                Notifier::from_config(&config.notify),
            )),
        ])
    }

    pub fn tools(&self) -> &[Box<dyn PrAgentTool>] {
        &self.tools
    }

    /// `tools/list` entries: name, description, and JSON schema.
    pub fn descriptors(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "inputSchema": t.schema()
                })
            })
            .collect()
    }

    /// Run one tool call. Never fails: unknown names and handler errors come
    /// back as text payloads with `is_error` set.
    pub fn call(&self, name: &str, args: Value) -> ToolResult {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            return ToolResult::text(format!("Unknown tool: {name}"), true);
        };

        debug!(tool = name, "calling tool");
        match tool.call(args) {
            Ok(v) => ToolResult::text(
                serde_json::to_string_pretty(&v)
                    .unwrap_or_else(|e| format!("serialization error: {e}")),
                false,
            ),
            Err(message) => {
                debug!(tool = name, error = %message, "tool returned an error");
                let payload = serde_json::json!({ "error": message });
                ToolResult::text(payload.to_string(), true)
            }
        }
    }
}
