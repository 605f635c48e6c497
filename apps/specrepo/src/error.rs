//! Errors that end a lint run, with their process exit codes.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("Unable to find a spec repo or directory named `{0}`")]
    UnknownTarget(String),

    #[error("No spec repos found at: {}", .0.display())]
    NoRepos(PathBuf),

    #[error("Spec repo `{repo}` is incompatible: {reason}")]
    Incompatible { repo: String, reason: String },

    #[error("{failed} items failed validation.")]
    ValidationFailed { failed: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LintError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LintError::UnknownTarget(_) | LintError::NoRepos(_) => 2,
            LintError::Incompatible { .. } | LintError::ValidationFailed { .. } => 1,
            LintError::Io(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, LintError>;
