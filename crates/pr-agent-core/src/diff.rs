//! Change-set analysis against a base branch.
//!
//! The version-control tool is reached through [`DiffSource`]; [`GitCli`] is
//! the production implementation and shells out to `git` in the project root.

use crate::error::{PrAgentError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Placeholder returned in place of the diff when it was not requested.
pub const DIFF_NOT_INCLUDED: &str =
    "Diff not included (set include_diff=true to see full diff)";

// ---------------------------------------------------------------------------
// DiffSource
// ---------------------------------------------------------------------------

/// Text-returning queries against a working tree, keyed by a base branch.
pub trait DiffSource {
    /// `--name-status` listing of paths changed since the merge base.
    fn name_status(&self, base: &str) -> Result<String>;
    /// Human-readable `--stat` summary.
    fn stat(&self, base: &str) -> Result<String>;
    /// Full unified diff.
    fn diff(&self, base: &str) -> Result<String>;
    /// One line per commit on the current branch that is not on `base`.
    fn commit_log(&self, base: &str) -> Result<String>;
}

/// Runs the `git` executable inside a repository.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo: PathBuf,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let git = which::which("git").map_err(|_| PrAgentError::GitNotFound)?;
        debug!(repo = %self.repo.display(), ?args, "running git");

        let output = Command::new(git)
            .args(args)
            .current_dir(&self.repo)
            .output()?;

        if !output.status.success() {
            return Err(PrAgentError::GitFailed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl DiffSource for GitCli {
    fn name_status(&self, base: &str) -> Result<String> {
        self.run(&["diff", "--name-status", &three_dot(base)?])
    }

    fn stat(&self, base: &str) -> Result<String> {
        self.run(&["diff", "--stat", &three_dot(base)?])
    }

    fn diff(&self, base: &str) -> Result<String> {
        self.run(&["diff", &three_dot(base)?])
    }

    fn commit_log(&self, base: &str) -> Result<String> {
        self.run(&["log", "--oneline", &format!("{}..HEAD", revision(base)?)])
    }
}

/// A base branch is passed to git as a bare argument, so anything git could
/// read as an option (`--output=...`) is refused.
fn revision(base: &str) -> Result<&str> {
    if base.starts_with('-') {
        return Err(PrAgentError::InvalidRevision(base.to_string()));
    }
    Ok(base)
}

fn three_dot(base: &str) -> Result<String> {
    Ok(format!("{}...HEAD", revision(base)?))
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    pub base_branch: String,
    pub files_changed: Vec<FileChange>,
    #[serde(rename = "statistics")]
    pub stat_summary: String,
    #[serde(rename = "commits")]
    pub commit_log: String,
    #[serde(rename = "diff")]
    pub diff_text: String,
    pub truncated: bool,
    /// Line count of the full diff; `None` when the diff was not requested.
    pub total_diff_lines: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    pub text: String,
    pub truncated: bool,
    pub total_lines: usize,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeOptions {
    pub base_branch: String,
    pub include_diff: bool,
    pub max_diff_lines: usize,
}

pub struct DiffAnalyzer<S> {
    source: S,
}

impl<S: DiffSource> DiffAnalyzer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn analyze(&self, opts: &AnalyzeOptions) -> Result<DiffReport> {
        let base = opts.base_branch.as_str();
        let files_changed = parse_name_status(&self.source.name_status(base)?);
        let stat_summary = self.source.stat(base)?;

        let (diff_text, truncated, total_diff_lines) = if opts.include_diff {
            let t = truncate_lines(&self.source.diff(base)?, opts.max_diff_lines);
            (t.text, t.truncated, Some(t.total_lines))
        } else {
            (DIFF_NOT_INCLUDED.to_string(), false, None)
        };

        let commit_log = self.source.commit_log(base)?;
        debug!(
            base,
            files = files_changed.len(),
            ?total_diff_lines,
            truncated,
            "analyzed changes"
        );

        Ok(DiffReport {
            base_branch: opts.base_branch.clone(),
            files_changed,
            stat_summary,
            commit_log,
            diff_text,
            truncated,
            total_diff_lines,
        })
    }
}

/// Keep at most `max_lines` lines of `text`. When lines are dropped, a single
/// marker line is appended after the kept lines. Kept lines are byte-exact,
/// line endings included.
pub fn truncate_lines(text: &str, max_lines: usize) -> Truncated {
    let total_lines = text.lines().count();
    if total_lines <= max_lines {
        return Truncated {
            text: text.to_string(),
            truncated: false,
            total_lines,
        };
    }

    let mut kept: String = text.split_inclusive('\n').take(max_lines).collect();
    kept.push_str(&format!(
        "... Output truncated. Showing {max_lines} of {total_lines} lines. Increase max_diff_lines to see more ..."
    ));
    Truncated {
        text: kept,
        truncated: true,
        total_lines,
    }
}

/// Parse `git diff --name-status` output. Renames and copies carry a
/// similarity score and two paths (`R087\told\tnew`).
pub fn parse_name_status(output: &str) -> Vec<FileChange> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let mut code = fields.next()?.trim().chars();
            let first = fields.next()?.to_string();
            let second = fields.next().map(str::to_string);

            let status = code.next()?;
            let score = code.as_str().parse().ok();

            let (path, previous_path) = match second {
                Some(new_path) => (new_path, Some(first)),
                None => (first, None),
            };
            Some(FileChange {
                status: status.to_string(),
                score,
                path,
                previous_path,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
