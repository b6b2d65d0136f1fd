use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrAgentError {
    #[error("git executable not found on PATH")]
    GitNotFound,

    #[error("Git error: `git {command}` failed: {stderr}")]
    GitFailed { command: String, stderr: String },

    #[error("invalid base branch `{0}`: a revision must not start with '-'")]
    InvalidRevision(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PrAgentError>;
