use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipeforgeError {
    #[error("template not found: {key}")]
    TemplateNotFound { key: String },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid project name '{0}': must contain at least one of [a-z0-9-_]")]
    InvalidProjectName(String),

    #[error("unknown stack '{0}'; supported stacks: node, python, go")]
    UnknownStack(String),

    #[error("unknown pipeline mode '{0}'; expected 'simple' or 'production'")]
    UnknownMode(String),

    #[error("branch name for {0} must not be empty")]
    EmptyBranch(&'static str),

    #[error("target path planned twice: {0}")]
    DuplicateTarget(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PipeforgeError>;
