#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn pr_agent(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pr-agent").unwrap();
    cmd.current_dir(dir.path())
        .env("PR_AGENT_ROOT", dir.path())
        .env_remove("SLACK_WEBHOOK_URL")
        .env_remove("PR_AGENT_EVENTS_FILE")
        .env_remove("PR_AGENT_TEMPLATES_DIR");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

fn ingest(dir: &TempDir, event: Value) {
    pr_agent(dir)
        .arg("ingest")
        .write_stdin(event.to_string())
        .assert()
        .success();
}

fn run_event(name: &str, conclusion: &str, updated_at: &str) -> Value {
    serde_json::json!({
        "event": "workflow_run",
        "workflow_run": {
            "name": name,
            "status": "completed",
            "conclusion": conclusion,
            "updated_at": updated_at,
            "html_url": format!("https://github.com/o/r/actions/runs/{updated_at}")
        }
    })
}

// ---------------------------------------------------------------------------
// pr-agent init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_templates() {
    let dir = TempDir::new().unwrap();
    pr_agent(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .pr-agent/config.yaml"));

    assert!(dir.path().join(".pr-agent/config.yaml").exists());
    for name in ["bug.md", "feature.md", "docs.md", "refactor.md", "test.md"] {
        assert!(dir.path().join("templates").join(name).exists(), "{name}");
    }
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    pr_agent(&dir).arg("init").assert().success();

    let bug = dir.path().join("templates/bug.md");
    std::fs::write(&bug, "# Our own bug template\n").unwrap();

    pr_agent(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .pr-agent/config.yaml"));
    assert_eq!(
        std::fs::read_to_string(&bug).unwrap(),
        "# Our own bug template\n"
    );
}

// ---------------------------------------------------------------------------
// pr-agent tools / call
// ---------------------------------------------------------------------------

#[test]
fn tools_lists_every_tool() {
    let dir = TempDir::new().unwrap();
    let list = stdout_json(pr_agent(&dir).args(["tools", "--json"]));
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 6);
    assert!(names.contains(&"analyze_file_changes"));
    assert!(names.contains(&"send_slack_notification"));
}

#[test]
fn tools_table_keeps_descriptions_on_one_short_line() {
    let dir = TempDir::new().unwrap();
    let out = pr_agent(&dir)
        .arg("tools")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("NAME"));
    assert_eq!(text.lines().count(), 2 + 6);
    assert!(text.lines().all(|l| l.chars().count() <= 30 + 72));
}

#[test]
fn option_like_base_branch_is_refused() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("written");
    let args = serde_json::json!({ "base_branch": format!("--output={}", target.display()) });

    pr_agent(&dir)
        .args(["call", "analyze_file_changes", "--args", &args.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("must not start with '-'"));
    assert!(!target.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn recent_events_on_a_fresh_root_is_empty() {
    let dir = TempDir::new().unwrap();
    let events = stdout_json(pr_agent(&dir).args(["call", "get_recent_actions_events"]));
    assert_eq!(events, serde_json::json!([]));
}

#[test]
fn unknown_tool_prints_message_and_succeeds() {
    let dir = TempDir::new().unwrap();
    pr_agent(&dir)
        .args(["call", "nope"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown tool: nope"));
}

#[test]
fn call_rejects_malformed_args() {
    let dir = TempDir::new().unwrap();
    pr_agent(&dir)
        .args(["call", "get_recent_actions_events", "--args", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--args must be a JSON object"));
}

#[test]
fn templates_missing_directory_reports_a_note() {
    let dir = TempDir::new().unwrap();
    let listing = stdout_json(pr_agent(&dir).args(["call", "get_pr_templates"]));
    assert!(listing.is_object(), "{listing}");
}

#[test]
fn suggest_template_after_init() {
    let dir = TempDir::new().unwrap();
    pr_agent(&dir).arg("init").assert().success();

    let suggestion = stdout_json(pr_agent(&dir).args([
        "call",
        "suggest_template",
        "--args",
        r#"{"changes_summary": "fix crash on login", "change_type": "Bug"}"#,
    ]));
    assert_eq!(suggestion["recommended_template"]["filename"], "bug.md");
    assert!(suggestion["template_content"]
        .as_str()
        .is_some_and(|s| !s.is_empty()));
}

#[test]
fn slack_without_webhook_reports_configuration_hint() {
    let dir = TempDir::new().unwrap();
    pr_agent(&dir)
        .args(["call", "send_slack_notification", "--args", r#"{"message": "hi"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("SLACK_WEBHOOK_URL"));
}

// ---------------------------------------------------------------------------
// pr-agent ingest
// ---------------------------------------------------------------------------

#[test]
fn ingest_then_workflow_status_keeps_latest_run() {
    let dir = TempDir::new().unwrap();
    ingest(&dir, run_event("ci", "failure", "2024-01-01T00:00:00Z"));
    ingest(&dir, run_event("ci", "success", "2024-01-02T00:00:00Z"));
    ingest(&dir, run_event("deploy", "success", "2024-01-01T12:00:00Z"));

    let events = stdout_json(pr_agent(&dir).args(["call", "get_recent_actions_events"]));
    assert_eq!(events.as_array().unwrap().len(), 3);
    assert!(events[0]["received_at"].is_string());

    let status = stdout_json(pr_agent(&dir).args([
        "call",
        "get_workflow_status",
        "--args",
        r#"{"workflow_name": "ci"}"#,
    ]));
    let status = status.as_array().unwrap();
    assert_eq!(status.len(), 1);
    assert_eq!(status[0]["name"], "ci");
    assert_eq!(status[0]["conclusion"], "success");
}

#[test]
fn ingest_from_file_respects_events_env_override() {
    let dir = TempDir::new().unwrap();
    let payload = dir.path().join("payload.json");
    std::fs::write(&payload, run_event("ci", "success", "2024-01-01T00:00:00Z").to_string())
        .unwrap();

    pr_agent(&dir)
        .env("PR_AGENT_EVENTS_FILE", "ci-events.json")
        .args(["ingest", "--file"])
        .arg(&payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("recorded workflow_run event"));

    assert!(dir.path().join("ci-events.json").exists());
    assert!(!dir.path().join("github_events.json").exists());
}

#[test]
fn ingest_leaves_a_half_written_log_untouched() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("github_events.json");
    std::fs::write(&log, r#"[{"n":1},{"n":2},{"ev"#).unwrap();

    pr_agent(&dir)
        .arg("ingest")
        .write_stdin(run_event("ci", "success", "2024-01-01T00:00:00Z").to_string())
        .assert()
        .failure();
    assert_eq!(
        std::fs::read_to_string(&log).unwrap(),
        r#"[{"n":1},{"n":2},{"ev"#
    );
}

#[test]
fn ingest_rejects_non_object_payload() {
    let dir = TempDir::new().unwrap();
    pr_agent(&dir)
        .arg("ingest")
        .write_stdin("[1, 2, 3]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a JSON object"));
}

// ---------------------------------------------------------------------------
// pr-agent config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_warns_about_missing_webhook() {
    let dir = TempDir::new().unwrap();
    pr_agent(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning]"))
        .stdout(predicate::str::contains("SLACK_WEBHOOK_URL"));
}

#[test]
fn config_validate_fails_on_bad_webhook_scheme() {
    let dir = TempDir::new().unwrap();
    pr_agent(&dir)
        .env("SLACK_WEBHOOK_URL", "ftp://hooks.example.com/x")
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"));
}

#[test]
fn config_show_applies_env_overrides() {
    let dir = TempDir::new().unwrap();
    let config = stdout_json(
        pr_agent(&dir)
            .env("PR_AGENT_TEMPLATES_DIR", "docs/pr-templates")
            .args(["config", "show", "--json"]),
    );
    assert_eq!(config["templates_dir"], "docs/pr-templates");
    assert_eq!(config["diff"]["default_base_branch"], "main");
}

// ---------------------------------------------------------------------------
// pr-agent serve
// ---------------------------------------------------------------------------

#[test]
fn serve_speaks_line_delimited_json_rpc() {
    let dir = TempDir::new().unwrap();
    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"nope","arguments":{}}}"#,
        "this is not json",
    ]
    .join("\n")
        + "\n";

    let out = pr_agent(&dir)
        .arg("serve")
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let responses: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 4, "notification must not be answered");

    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "pr-agent");
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 6);
    assert_eq!(responses[2]["result"]["isError"], true);
    assert_eq!(
        responses[2]["result"]["content"][0]["text"],
        "Unknown tool: nope"
    );
    assert_eq!(responses[3]["error"]["code"], -32700);
}
