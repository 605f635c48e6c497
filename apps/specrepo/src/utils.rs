//! Console prefixes for stderr diagnostics.

use owo_colors::OwoColorize;

/// Writes prefixed diagnostics to stderr, colored when enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    pub color: bool,
}

impl Console {
    pub fn new(color: bool) -> Self {
        Console { color }
    }

    pub fn error_prefix(&self) -> String {
        if self.color {
            "error:".red().bold().to_string()
        } else {
            "error:".to_string()
        }
    }

    pub fn warn_prefix(&self) -> String {
        if self.color {
            "warning:".yellow().bold().to_string()
        } else {
            "warning:".to_string()
        }
    }

    pub fn note_prefix(&self) -> String {
        if self.color {
            "note:".cyan().bold().to_string()
        } else {
            "note:".to_string()
        }
    }

    pub fn info_prefix(&self) -> String {
        if self.color {
            "info:".blue().bold().to_string()
        } else {
            "info:".to_string()
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        eprintln!("{} {}", self.error_prefix(), msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        eprintln!("{} {}", self.warn_prefix(), msg.as_ref());
    }

    pub fn note(&self, msg: impl AsRef<str>) {
        eprintln!("{} {}", self.note_prefix(), msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        eprintln!("{} {}", self.info_prefix(), msg.as_ref());
    }
}
