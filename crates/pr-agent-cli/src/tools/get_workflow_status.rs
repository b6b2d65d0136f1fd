use super::{parse_args, PrAgentTool};
use pr_agent_core::events::{EventRepository, EventStore, JsonFileRepository, WorkflowStatus};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct Args {
    #[serde(default)]
    workflow_name: Option<String>,
}

pub struct GetWorkflowStatusTool<R = JsonFileRepository> {
    events: Arc<EventStore<R>>,
}

impl<R> GetWorkflowStatusTool<R> {
    pub fn new(events: Arc<EventStore<R>>) -> Self {
        Self { events }
    }
}

impl<R: EventRepository + Send + Sync> PrAgentTool for GetWorkflowStatusTool<R> {
    fn name(&self) -> &str {
        "get_workflow_status"
    }

    fn description(&self) -> &str {
        "Get the latest status of each GitHub Actions workflow, optionally for one workflow"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "workflow_name": {
                    "type": "string",
                    "description": "Only report this workflow"
                }
            }
        })
    }

    fn call(&self, args: Value) -> Result<Value, String> {
        let args: Args = parse_args(args)?;
        let name = args.workflow_name.as_deref().filter(|n| !n.is_empty());
        let statuses: Vec<WorkflowStatus> =
            self.events.workflow_status(name).into_values().collect();
        serde_json::to_value(statuses).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LOG: &str = r#"[
        {"event": "workflow_run", "workflow_run": {"name": "ci", "status": "completed", "conclusion": "success", "run_number": 8, "updated_at": "2024-01-02T00:00:00Z", "html_url": "https://example.com/ci/8"}},
        {"event": "workflow_run", "workflow_run": {"name": "ci", "status": "in_progress", "conclusion": null, "run_number": 7, "updated_at": "2024-01-01T00:00:00Z", "html_url": "https://example.com/ci/7"}},
        {"event": "workflow_run", "workflow_run": {"name": "audit", "status": "completed", "conclusion": "failure", "run_number": 3, "updated_at": "2024-01-01T12:00:00Z", "html_url": "https://example.com/audit/3"}},
        {"event": "push"}
    ]"#;

    fn tool(dir: &TempDir) -> GetWorkflowStatusTool {
        let path = dir.path().join("github_events.json");
        std::fs::write(&path, LOG).unwrap();
        GetWorkflowStatusTool::new(Arc::new(EventStore::new(JsonFileRepository::new(path))))
    }

    #[test]
    fn reports_latest_per_workflow_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        let v = tool(&dir).call(Value::Null).unwrap();
        let list = v.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["name"], "audit");
        assert_eq!(list[1]["name"], "ci");
        assert_eq!(list[1]["status"], "completed");
        assert_eq!(list[1]["conclusion"], "success");
        assert_eq!(list[1]["run_number"], 8);
        assert_eq!(list[1]["html_url"], "https://example.com/ci/8");
    }

    #[test]
    fn filters_by_workflow_name() {
        let dir = TempDir::new().unwrap();
        let v = tool(&dir)
            .call(serde_json::json!({"workflow_name": "audit"}))
            .unwrap();
        assert_eq!(v.as_array().unwrap().len(), 1);
        assert_eq!(v[0]["conclusion"], "failure");
    }

    #[test]
    fn unknown_workflow_is_empty_not_error() {
        let dir = TempDir::new().unwrap();
        let v = tool(&dir)
            .call(serde_json::json!({"workflow_name": "release"}))
            .unwrap();
        assert_eq!(v, serde_json::json!([]));
    }
}
