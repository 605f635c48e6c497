//! specrepo core library.
//!
//! This crate exposes programmatic APIs for linting spec repositories: every
//! spec file in a repo is validated, the results are grouped by severity and
//! message, and a deterministic report with a pass/fail verdict is produced.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `validator`: Per-file validation seam and the built-in JSON validator.
//! - `aggregate`: Grouping and deduplication of validation results.
//! - `output`: Human/JSON printers.
//! - `lint`: Target resolution and the per-repo lint runner.
//! - `sources`: Registered repos and spec file discovery.
//! - `freshness`: Repo/tool version compatibility check.
//! - `models`: Data models for validation results and summaries.
pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod freshness;
pub mod lint;
pub mod models;
pub mod output;
pub mod sources;
pub mod utils;
pub mod validator;
