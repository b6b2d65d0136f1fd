use crate::config::{NotifyConfig, ENV_WEBHOOK_URL};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of one delivery attempt. Failures are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
    pub delivered: bool,
    pub detail: String,
}

impl NotificationOutcome {
    fn delivered(detail: impl Into<String>) -> Self {
        Self {
            delivered: true,
            detail: detail.into(),
        }
    }

    fn failed(detail: impl Into<String>) -> Self {
        Self {
            delivered: false,
            detail: detail.into(),
        }
    }
}

/// Posts messages to a chat incoming-webhook (Slack-compatible JSON body).
pub struct Notifier {
    webhook_url: Option<String>,
    timeout: Duration,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>, timeout: Duration) -> Self {
        Self {
            webhook_url,
            timeout,
        }
    }

    pub fn from_config(cfg: &NotifyConfig) -> Self {
        Self::new(
            cfg.webhook_url.clone(),
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    pub fn notify(&self, message: &str) -> NotificationOutcome {
        let Some(url) = self.webhook_url.as_deref() else {
            return NotificationOutcome::failed(format!(
                "{ENV_WEBHOOK_URL} is not set: configure a webhook URL to send notifications"
            ));
        };

        let client = match reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
        {
            Ok(c) => c,
            Err(e) => return NotificationOutcome::failed(format!("failed to build HTTP client: {e}")),
        };

        debug!(len = message.len(), "sending chat notification");
        let body = serde_json::json!({ "text": message, "mrkdwn": true });
        match client.post(url).json(&body).send() {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => {
                NotificationOutcome::delivered("Notification sent successfully")
            }
            Ok(resp) => {
                let status = resp.status();
                let text = resp.text().unwrap_or_default();
                warn!(%status, "webhook rejected notification");
                NotificationOutcome::failed(format!(
                    "Failed to send notification: HTTP {}{}",
                    status.as_u16(),
                    if text.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", text.trim())
                    }
                ))
            }
            Err(e) => {
                warn!(error = %e, "webhook request failed");
                NotificationOutcome::failed(format!("Error sending notification: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn notifier(url: String) -> Notifier {
        Notifier::new(Some(url), Duration::from_secs(5))
    }

    #[test]
    fn unconfigured_reports_missing_setting() {
        let outcome = Notifier::new(None, Duration::from_secs(1)).notify("hello");
        assert!(!outcome.delivered);
        assert!(outcome.detail.contains("SLACK_WEBHOOK_URL"));
    }

    #[test]
    fn posts_message_as_json_and_accepts_200() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/services/hook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(
                serde_json::json!({"text": ":white_check_mark: deployed", "mrkdwn": true}),
            ))
            .with_status(200)
            .with_body("ok")
            .create();

        let outcome =
            notifier(format!("{}/services/hook", server.url())).notify(":white_check_mark: deployed");
        mock.assert();
        assert!(outcome.delivered, "{}", outcome.detail);
    }

    #[test]
    fn non_200_is_a_reported_failure() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/")
            .with_status(404)
            .with_body("no_service")
            .create();

        let outcome = notifier(format!("{}/", server.url())).notify("hi");
        assert!(!outcome.delivered);
        assert!(outcome.detail.contains("HTTP 404"));
        assert!(outcome.detail.contains("no_service"));
    }

    #[test]
    fn other_2xx_is_not_success() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("POST", "/").with_status(204).create();

        let outcome = notifier(format!("{}/", server.url())).notify("hi");
        assert!(!outcome.delivered);
        assert!(outcome.detail.contains("HTTP 204"));
    }

    #[test]
    fn transport_failure_is_a_reported_failure() {
        // Port 9 (discard) on localhost is closed in test environments.
        let outcome = notifier("http://127.0.0.1:9/hook".to_string()).notify("hi");
        assert!(!outcome.delivered);
        assert!(outcome.detail.starts_with("Error sending notification"));
    }

    #[test]
    fn from_config_uses_webhook_and_timeout() {
        let cfg = NotifyConfig {
            webhook_url: Some("https://hooks.example.com/x".into()),
            timeout_secs: 3,
        };
        let n = Notifier::from_config(&cfg);
        assert!(n.is_configured());
        assert_eq!(n.timeout, Duration::from_secs(3));
    }
}
