//! Per-file validation.
//!
//! `Validator` is the seam the lint runner calls for every spec file. The
//! built-in `JsonSpecValidator` checks `.podspec.json` files against a small
//! fixed rule set; malformed input becomes an error message, and only I/O
//! failures surface as `Err`.

use crate::models::{Message, ValidationResult};
use regex::Regex;
use serde_json::{Map, Value as Json};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

/// Suffix shared by every spec file the tool discovers.
pub const SPEC_SUFFIX: &str = ".podspec.json";

/// Version recorded when a spec does not declare one.
pub const UNKNOWN_VERSION: &str = "unknown";

const DEPRECATED_ATTRIBUTES: [&str; 3] = ["documentation", "preferred_dependency", "xcconfig"];

/// Failure to look at a file at all, as opposed to the file being invalid.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    #[error("Unable to read the spec file: {0}")]
    Io(#[from] io::Error),
}

/// Validates one spec file.
///
/// `root` is the directory being linted; it is used to name entities that
/// carry no name of their own.
pub trait Validator: Send + Sync {
    fn validate(&self, root: &Path, path: &Path) -> Result<ValidationResult, ValidateError>;
}

/// Validator for JSON spec files.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSpecValidator;

impl Validator for JsonSpecValidator {
    fn validate(&self, root: &Path, path: &Path) -> Result<ValidationResult, ValidateError> {
        let data = fs::read_to_string(path)?;
        Ok(validate_source(root, path, &data))
    }
}

/// Validate already-loaded spec contents.
pub fn validate_source(root: &Path, path: &Path, data: &str) -> ValidationResult {
    let fallback_name = relative_name(root, path);
    let spec: Map<String, Json> = match serde_json::from_str::<Json>(data) {
        Ok(Json::Object(obj)) => obj,
        Ok(_) => {
            return ValidationResult::new(
                fallback_name,
                UNKNOWN_VERSION,
                vec![Message::error(
                    "Unable to parse the spec file: top-level value is not an object",
                )],
            )
        }
        Err(e) => {
            return ValidationResult::new(
                fallback_name,
                UNKNOWN_VERSION,
                vec![Message::error(format!("Unable to parse the spec file: {}", e))],
            )
        }
    };

    let name = spec.get("name").and_then(Json::as_str);
    let version = spec.get("version").and_then(Json::as_str);
    let mut messages = Vec::new();

    match name {
        None => messages.push(Message::error("Missing required attribute `name`.")),
        Some(n) => {
            if let Some(stem) = file_stem(path) {
                if stem != n {
                    messages.push(Message::error(
                        "The name of the spec should match the name of the file.",
                    ));
                }
            }
        }
    }
    match version {
        None => messages.push(Message::error("Missing required attribute `version`.")),
        Some(v) if !version_regex().is_match(v) => messages.push(Message::error(format!(
            "The version `{}` is not a valid version.",
            v
        ))),
        Some(_) => {}
    }
    if !spec.contains_key("summary") {
        messages.push(Message::warning("Missing recommended attribute `summary`."));
    }
    if !spec.contains_key("source") {
        messages.push(Message::error("Missing required attribute `source`."));
    }
    for attr in DEPRECATED_ATTRIBUTES {
        if spec.contains_key(attr) {
            messages.push(Message::warning(format!(
                "The `{}` attribute is deprecated.",
                attr
            )));
        }
    }

    ValidationResult::new(
        name.map(str::to_string).unwrap_or(fallback_name),
        version.unwrap_or(UNKNOWN_VERSION),
        messages,
    )
}

/// Path of `path` relative to `root`, falling back to the path itself.
pub fn relative_name(root: &Path, path: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

fn file_stem(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()?.strip_suffix(SPEC_SUFFIX)
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d+(\.\d+)*([-+][0-9A-Za-z.-]+)?$").expect("version pattern compiles")
    })
}
