use super::{parse_args, PrAgentTool};
use pr_agent_core::{
    config::DiffConfig,
    diff::{AnalyzeOptions, DiffAnalyzer, DiffSource, GitCli},
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Args {
    #[serde(default)]
    base_branch: Option<String>,
    #[serde(default)]
    include_diff: Option<bool>,
    #[serde(default)]
    max_diff_lines: Option<usize>,
}

pub struct AnalyzeFileChangesTool<S = GitCli> {
    analyzer: DiffAnalyzer<S>,
    defaults: DiffConfig,
}

impl<S> AnalyzeFileChangesTool<S> {
    pub fn new(analyzer: DiffAnalyzer<S>, defaults: DiffConfig) -> Self {
        Self { analyzer, defaults }
    }
}

impl<S: DiffSource + Send + Sync> PrAgentTool for AnalyzeFileChangesTool<S> {
    fn name(&self) -> &str {
        "analyze_file_changes"
    }

    fn description(&self) -> &str {
        "Get the diff, statistics, commits, and changed files of the current branch relative to a base branch"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "base_branch": {
                    "type": "string",
                    "description": "Base branch to compare against",
                    "default": self.defaults.default_base_branch
                },
                "include_diff": {
                    "type": "boolean",
                    "description": "Include the full diff content",
                    "default": true
                },
                "max_diff_lines": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Maximum number of diff lines to include before truncating",
                    "default": self.defaults.default_max_diff_lines
                }
            }
        })
    }

    fn call(&self, args: Value) -> Result<Value, String> {
        let args: Args = parse_args(args)?;
        let opts = AnalyzeOptions {
            base_branch: args
                .base_branch
                .unwrap_or_else(|| self.defaults.default_base_branch.clone()),
            include_diff: args.include_diff.unwrap_or(true),
            max_diff_lines: args
                .max_diff_lines
                .unwrap_or(self.defaults.default_max_diff_lines),
        };

        let report = self.analyzer.analyze(&opts).map_err(|e| e.to_string())?;
        serde_json::to_value(&report).map_err(|e| e.to_string())
    }
}
