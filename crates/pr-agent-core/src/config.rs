use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
pub const ENV_EVENTS_FILE: &str = "PR_AGENT_EVENTS_FILE";
pub const ENV_TEMPLATES_DIR: &str = "PR_AGENT_TEMPLATES_DIR";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// DiffConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffConfig {
    #[serde(default = "default_base_branch")]
    pub default_base_branch: String,
    #[serde(default = "default_max_diff_lines")]
    pub default_max_diff_lines: usize,
}

fn default_base_branch() -> String {
    "main".to_string()
}

fn default_max_diff_lines() -> usize {
    500
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            default_base_branch: default_base_branch(),
            default_max_diff_lines: default_max_diff_lines(),
        }
    }
}

// ---------------------------------------------------------------------------
// NotifyConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Project configuration, read from `.pr-agent/config.yaml`.
///
/// Every field has a default, so a missing file or a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    #[serde(default = "default_events_file")]
    pub events_file: PathBuf,
    #[serde(default)]
    pub diff: DiffConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from(paths::DEFAULT_TEMPLATES_DIR)
}

fn default_events_file() -> PathBuf {
    PathBuf::from(paths::DEFAULT_EVENTS_FILE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            events_file: default_events_file(),
            diff: DiffConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl Config {
    /// Load the config file under `root`, falling back to defaults when it
    /// does not exist. A file that exists but fails to parse is an error.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load the config file and apply overrides from the process environment.
    pub fn load_with_env(root: &Path) -> Result<Self> {
        let mut cfg = Self::load(root)?;
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Apply environment overrides. `lookup` is injected so tests do not have
    /// to mutate the real process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_WEBHOOK_URL) {
            self.notify.webhook_url = Some(url);
        }
        if let Some(file) = non_empty(ENV_EVENTS_FILE) {
            self.events_file = PathBuf::from(file);
        }
        if let Some(dir) = non_empty(ENV_TEMPLATES_DIR) {
            self.templates_dir = PathBuf::from(dir);
        }
    }

    pub fn templates_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.templates_dir)
    }

    pub fn events_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.events_file)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.diff.default_base_branch.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "diff.default_base_branch is empty".to_string(),
            });
        }

        if self.diff.default_max_diff_lines == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "diff.default_max_diff_lines is 0: diffs will always be truncated"
                    .to_string(),
            });
        }

        match &self.notify.webhook_url {
            None => warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "no webhook URL configured: set notify.webhook_url or {ENV_WEBHOOK_URL}"
                ),
            }),
            Some(url) if !(url.starts_with("https://") || url.starts_with("http://")) => {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("notify.webhook_url is not an http(s) URL: {url}"),
                });
            }
            Some(_) => {}
        }

        if self.notify.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "notify.timeout_secs must be greater than 0".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
