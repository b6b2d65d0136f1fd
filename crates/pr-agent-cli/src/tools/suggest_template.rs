use super::{parse_args, PrAgentTool};
use pr_agent_core::templates::TemplateCatalog;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct Args {
    changes_summary: String,
    change_type: String,
}

pub struct SuggestTemplateTool {
    catalog: Arc<TemplateCatalog>,
}

impl SuggestTemplateTool {
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self { catalog }
    }
}

impl PrAgentTool for SuggestTemplateTool {
    fn name(&self) -> &str {
        "suggest_template"
    }

    fn description(&self) -> &str {
        "Suggest the most appropriate PR template for an analyzed change"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "changes_summary": {
                    "type": "string",
                    "description": "Your analysis of what the changes do"
                },
                "change_type": {
                    "type": "string",
                    "description": "The type of change: bug, feature, docs, refactor, test, performance, security"
                }
            },
            "required": ["changes_summary", "change_type"]
        })
    }

    fn call(&self, args: Value) -> Result<Value, String> {
        let args: Args = parse_args(args)?;
        let suggestion = self
            .catalog
            .suggest(&args.changes_summary, &args.change_type)
            .map_err(|e| e.to_string())?;
        serde_json::to_value(&suggestion).map_err(|e| e.to_string())
    }
}
