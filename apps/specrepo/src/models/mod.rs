//! Shared data models for validation outcomes and lint summaries.

pub mod version_info;

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
/// Severity of a single validation message. `Error` sorts before `Warning`,
/// which is also the order groups are rendered in.
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub const ALL: [Severity; 2] = [Severity::Error, Severity::Warning];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Overall outcome of validating one file.
pub enum Outcome {
    Passed,
    HasWarnings,
    HasErrors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single message produced while validating a file.
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

impl Message {
    pub fn error(text: impl Into<String>) -> Self {
        Message {
            severity: Severity::Error,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Message {
            severity: Severity::Warning,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of validating one spec file.
///
/// The outcome is derived from the messages on construction, so a result
/// with an error message is always `HasErrors` and an empty one is `Passed`.
pub struct ValidationResult {
    pub entity_name: String,
    pub entity_version: String,
    outcome: Outcome,
    messages: Vec<Message>,
}

impl ValidationResult {
    pub fn new(
        entity_name: impl Into<String>,
        entity_version: impl Into<String>,
        messages: Vec<Message>,
    ) -> Self {
        let outcome = if messages.iter().any(|m| m.severity == Severity::Error) {
            Outcome::HasErrors
        } else if messages.is_empty() {
            Outcome::Passed
        } else {
            Outcome::HasWarnings
        };
        ValidationResult {
            entity_name: entity_name.into(),
            entity_version: entity_version.into(),
            outcome,
            messages,
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Counts for one linted directory.
pub struct LintRunSummary {
    pub files: usize,
    pub failed: usize,
    pub passed: bool,
}

impl LintRunSummary {
    pub fn new(files: usize, failed: usize) -> Self {
        LintRunSummary {
            files,
            failed,
            passed: failed == 0,
        }
    }
}
