use serde::Serialize;

/// A named prompt the agent host can render for its user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub text: &'static str,
}

pub const PROMPTS: &[PromptTemplate] = &[
    PromptTemplate {
        name: "analyze_ci_results",
        description: "Summarize recent CI/CD results and highlight failures",
        text: "\
Analyze the recent CI/CD results for this repository.

1. Call get_recent_actions_events to see the latest webhook events.
2. Call get_workflow_status to get the current state of each workflow.

Then report:
- Overall health (passing / failing / in progress)
- Each failing workflow with a link to its run
- Anything that looks flaky or stuck
- Recommended next steps",
    },
    PromptTemplate {
        name: "create_deployment_summary",
        description: "Write a team-facing summary of a deployment",
        text: "\
Create a concise deployment summary for the team.

Use get_workflow_status for deployment state and analyze_file_changes for what
shipped. Include: what changed, deployment status, links to the runs, and any
issues the team should know about. Keep it short enough to read in a chat channel.",
    },
    PromptTemplate {
        name: "generate_pr_status_report",
        description: "Combine code changes and CI status into one PR report",
        text: "\
Generate a status report for the current pull request.

1. analyze_file_changes: summarize what the change does and which files it touches.
2. get_workflow_status: list the CI results for this branch.
3. suggest_template: pick the PR template that fits and note any sections still empty.

Finish with a clear verdict: ready to merge, needs fixes, or waiting on CI.",
    },
    PromptTemplate {
        name: "troubleshoot_workflow_failure",
        description: "Walk through diagnosing a failing workflow",
        text: "\
Help troubleshoot a failing GitHub Actions workflow.

Use get_workflow_status to find workflows whose conclusion is failure, and
get_recent_actions_events for the surrounding events. For each failure, list
likely causes, which logs to open first (link the run), and concrete fixes to try.",
    },
    PromptTemplate {
        name: "format_ci_failure_alert",
        description: "Format a CI failure alert for Slack",
        text: "\
Write a Slack message announcing a CI failure, then send it with send_slack_notification.

Use Slack mrkdwn (*bold*, <url|link text>), not GitHub markdown. Template:

:rotating_light: *CI Failure Alert* :rotating_light:

A CI workflow has failed:
*Workflow*: <workflow name>
*Branch*: <branch>
*Status*: Failed
*View Details*: <<run url>|View Logs>

Please check the logs and address any issues.",
    },
    PromptTemplate {
        name: "format_ci_success_summary",
        description: "Format a deployment success message for Slack",
        text: "\
Write a Slack message celebrating a successful deployment, then send it with
send_slack_notification.

Use Slack mrkdwn (*bold*, <url|link text>), not GitHub markdown. Template:

:white_check_mark: *Deployment Successful* :white_check_mark:

Deployment completed for <repository>.

*Changes:*
- <key change 1>
- <key change 2>

*Links:*
<<pr url>|View Changes>",
    },
];

pub fn find(name: &str) -> Option<&'static PromptTemplate> {
    PROMPTS.iter().find(|p| p.name == name)
}
