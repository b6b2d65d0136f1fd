use super::PrAgentTool;
use pr_agent_core::templates::TemplateCatalog;
use serde_json::Value;
use std::sync::Arc;

pub struct GetPrTemplatesTool {
    catalog: Arc<TemplateCatalog>,
}

impl GetPrTemplatesTool {
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self { catalog }
    }
}

impl PrAgentTool for GetPrTemplatesTool {
    fn name(&self) -> &str {
        "get_pr_templates"
    }

    fn description(&self) -> &str {
        "List available PR templates with their content"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    fn call(&self, _args: Value) -> Result<Value, String> {
        let listing = self.catalog.list().map_err(|e| e.to_string())?;
        serde_json::to_value(&listing).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_templates_as_array() {
        let dir = TempDir::new().unwrap();
        let catalog = TemplateCatalog::with_defaults(dir.path().join("templates"));
        catalog.scaffold().unwrap();

        let v = GetPrTemplatesTool::new(Arc::new(catalog))
            .call(Value::Null)
            .unwrap();
        let list = v.as_array().unwrap();
        assert_eq!(list.len(), 7);
        assert_eq!(list[0]["filename"], "bug.md");
        assert_eq!(list[0]["type"], "Bug Fix");
        assert!(list[0]["content"].as_str().unwrap().contains("Bug"));
    }

    #[test]
    fn missing_directory_yields_note() {
        let dir = TempDir::new().unwrap();
        let catalog = TemplateCatalog::with_defaults(dir.path().join("absent"));
        let v = GetPrTemplatesTool::new(Arc::new(catalog))
            .call(Value::Null)
            .unwrap();
        assert!(v["note"].as_str().unwrap().contains("absent"));
    }
}
