use super::{parse_args, PrAgentTool};
use pr_agent_core::notify::Notifier;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Args {
    message: String,
}

pub struct SendSlackNotificationTool {
    notifier: Notifier,
}

impl SendSlackNotificationTool {
    pub fn new(notifier: Notifier) -> Self {
        Self { notifier }
    }
}

impl PrAgentTool for SendSlackNotificationTool {
    fn name(&self) -> &str {
        "send_slack_notification"
    }

    fn description(&self) -> &str {
        "Send a message to the team Slack channel via the configured incoming webhook. Use Slack mrkdwn formatting."
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Message text in Slack mrkdwn format"
                }
            },
            "required": ["message"]
        })
    }

    fn call(&self, args: Value) -> Result<Value, String> {
        let args: Args = parse_args(args)?;
        let outcome = self.notifier.notify(&args.message);
        serde_json::to_value(&outcome).map_err(|e| e.to_string())
    }
}
