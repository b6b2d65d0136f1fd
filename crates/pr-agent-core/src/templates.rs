//! PR description templates.
//!
//! A [`TemplateCatalog`] owns a directory of markdown documents, the fixed set
//! of filenames it recognizes, and a label table that maps change types
//! ("bug", "enhancement", ...) to one of those files. Documents are re-read on
//! every call so edits on disk show up without a restart.

use crate::error::{PrAgentError, Result};
use crate::io;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

/// Recognized template files and their display types, in listing order.
pub const DEFAULT_BINDINGS: &[(&str, &str)] = &[
    ("bug.md", "Bug Fix"),
    ("feature.md", "Feature"),
    ("docs.md", "Documentation"),
    ("refactor.md", "Refactor"),
    ("test.md", "Test"),
    ("performance.md", "Performance"),
    ("security.md", "Security"),
];

/// Change-type labels (lowercase) and the template file each selects.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("bug", "bug.md"),
    ("fix", "bug.md"),
    ("feature", "feature.md"),
    ("enhancement", "feature.md"),
    ("docs", "docs.md"),
    ("documentation", "docs.md"),
    ("refactor", "refactor.md"),
    ("cleanup", "refactor.md"),
    ("test", "test.md"),
    ("testing", "test.md"),
    ("performance", "performance.md"),
    ("optimization", "performance.md"),
    ("security", "security.md"),
];

pub const DEFAULT_FALLBACK: &str = "feature.md";

const USAGE_HINT: &str =
    "Fill out this template using the analyzed changes, then use it as the PR description.";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateEntry {
    pub filename: String,
    #[serde(rename = "type")]
    pub display_type: String,
    pub content: String,
}

/// Result of [`TemplateCatalog::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TemplateListing {
    Found(Vec<TemplateEntry>),
    /// The template directory does not exist.
    Missing { note: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub recommended_template: TemplateEntry,
    pub reasoning: String,
    pub template_content: String,
    pub usage_hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    filename: String,
    display_type: String,
}

// ---------------------------------------------------------------------------
// TemplateCatalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    dir: PathBuf,
    bindings: Vec<Binding>,
    aliases: Vec<(String, String)>,
    fallback: String,
}

impl TemplateCatalog {
    /// Build a catalog from explicit tables. Alias labels are matched
    /// case-insensitively; `fallback` is the filename used for unknown labels.
    pub fn new(
        dir: impl Into<PathBuf>,
        bindings: &[(&str, &str)],
        aliases: &[(&str, &str)],
        fallback: &str,
    ) -> Self {
        Self {
            dir: dir.into(),
            bindings: bindings
                .iter()
                .map(|(filename, display_type)| Binding {
                    filename: filename.to_string(),
                    display_type: display_type.to_string(),
                })
                .collect(),
            aliases: aliases
                .iter()
                .map(|(label, file)| (label.to_lowercase(), file.to_string()))
                .collect(),
            fallback: fallback.to_string(),
        }
    }

    pub fn with_defaults(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, DEFAULT_BINDINGS, DEFAULT_ALIASES, DEFAULT_FALLBACK)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read every recognized template present in the directory.
    pub fn list(&self) -> Result<TemplateListing> {
        if !self.dir.is_dir() {
            return Ok(TemplateListing::Missing {
                note: format!("Template directory not found: {}", self.dir.display()),
            });
        }

        let mut entries = Vec::with_capacity(self.bindings.len());
        for binding in &self.bindings {
            let path = self.dir.join(&binding.filename);
            if !path.is_file() {
                warn!(path = %path.display(), "recognized template missing, skipping");
                continue;
            }
            entries.push(self.read(binding)?);
        }
        Ok(TemplateListing::Found(entries))
    }

    /// Map a change-type label to a template filename. Unknown labels select
    /// the fallback.
    pub fn resolve(&self, change_type: &str) -> &str {
        let label = change_type.trim().to_lowercase();
        self.aliases
            .iter()
            .find(|(alias, _)| *alias == label)
            .map(|(_, file)| file.as_str())
            .unwrap_or(self.fallback.as_str())
    }

    /// Pick the template for `change_type` and load its current content.
    pub fn suggest(&self, changes_summary: &str, change_type: &str) -> Result<Suggestion> {
        let filename = self.resolve(change_type);
        let binding = self
            .bindings
            .iter()
            .find(|b| b.filename == filename)
            .ok_or_else(|| PrAgentError::TemplateNotFound(filename.to_string()))?;

        let entry = self.read(binding)?;
        Ok(Suggestion {
            reasoning: format!(
                "Based on your analysis: '{changes_summary}', this appears to be a {change_type} change."
            ),
            template_content: entry.content.clone(),
            recommended_template: entry,
            usage_hint: USAGE_HINT.to_string(),
        })
    }

    /// Write default content for every recognized template that does not
    /// exist yet. Returns the filenames that were created.
    pub fn scaffold(&self) -> Result<Vec<String>> {
        io::ensure_dir(&self.dir)?;
        let mut created = Vec::new();
        for binding in &self.bindings {
            let body = default_content(&binding.filename, &binding.display_type);
            if io::write_if_missing(&self.dir.join(&binding.filename), body.as_bytes())? {
                created.push(binding.filename.clone());
            }
        }
        Ok(created)
    }

    fn read(&self, binding: &Binding) -> Result<TemplateEntry> {
        let path = self.dir.join(&binding.filename);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PrAgentError::TemplateNotFound(path.display().to_string())
            } else {
                PrAgentError::Io(e)
            }
        })?;
        Ok(TemplateEntry {
            filename: binding.filename.clone(),
            display_type: binding.display_type.clone(),
            content,
        })
    }
}

// ---------------------------------------------------------------------------
// Default template bodies
// ---------------------------------------------------------------------------

fn default_content(filename: &str, display_type: &str) -> String {
    let specific = match filename {
        "bug.md" => {
            "## Bug Description\n\n\n## Root Cause\n\n\n## Fix\n\n\n## How Was This Verified?\n\n- [ ] Regression test added\n"
        }
        "feature.md" => {
            "## Summary\n\n\n## Motivation\n\n\n## Changes\n\n-\n\n## Testing\n\n- [ ] Unit tests\n- [ ] Manual verification\n"
        }
        "docs.md" => "## What Changed\n\n\n## Pages Affected\n\n-\n",
        "refactor.md" => {
            "## Refactoring Goal\n\n\n## Changes\n\n-\n\n## Behavior\n\n- [ ] No functional changes\n- [ ] Existing tests pass\n"
        }
        "test.md" => "## Coverage Added\n\n\n## What Is Tested\n\n-\n",
        "performance.md" => {
            "## Bottleneck\n\n\n## Change\n\n\n## Measurements\n\n| Metric | Before | After |\n|--------|--------|-------|\n"
        }
        "security.md" => {
            "## Vulnerability\n\n\n## Impact\n\n\n## Mitigation\n\n\n## Disclosure\n\n- [ ] Reported privately first\n"
        }
        _ => "## Summary\n\n\n## Changes\n\n-\n",
    };
    format!("# {display_type}\n\n{specific}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
