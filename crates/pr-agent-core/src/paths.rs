use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const AGENT_DIR: &str = ".pr-agent";
pub const CONFIG_FILE: &str = ".pr-agent/config.yaml";

pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
pub const DEFAULT_EVENTS_FILE: &str = "github_events.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn agent_dir(root: &Path) -> PathBuf {
    root.join(AGENT_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve a configured path against the project root. Absolute paths are
/// returned unchanged.
pub fn resolve(root: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}
