//! Repository compatibility check run before a repo is linted.
//!
//! A repo may declare which tool versions can read it in
//! `specrepo-version.yml`. Problems are either warnings, which are reported
//! and linting continues, or fatal, which abort the run.

use crate::models::version_info::RepoVersionInfo;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const VERSION_FILE: &str = "specrepo-version.yml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreshnessIssue {
    Warning(String),
    Fatal(String),
}

pub trait FreshnessCheck: Send + Sync {
    fn check(&self, dir: &Path) -> Result<(), FreshnessIssue>;
}

/// Compares the repo's declared version bounds with the running tool version.
#[derive(Debug, Clone)]
pub struct VersionFileCheck {
    pub tool_version: String,
}

impl Default for VersionFileCheck {
    fn default() -> Self {
        VersionFileCheck {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl FreshnessCheck for VersionFileCheck {
    fn check(&self, dir: &Path) -> Result<(), FreshnessIssue> {
        let path = dir.join(VERSION_FILE);
        if !path.is_file() {
            return Ok(());
        }
        let data = fs::read_to_string(&path).map_err(|e| {
            FreshnessIssue::Warning(format!("unable to read {}: {}", path.display(), e))
        })?;
        let info: RepoVersionInfo = serde_yaml::from_str(&data).map_err(|e| {
            FreshnessIssue::Warning(format!("unable to parse {}: {}", path.display(), e))
        })?;
        let current = self.tool_version.as_str();
        if let Some(min) = info.min.as_deref() {
            if compare_versions(min, current) == Ordering::Greater {
                return Err(FreshnessIssue::Fatal(format!(
                    "the repo requires specrepo {} or newer; update specrepo or checkout the appropriate tag in the repo",
                    min
                )));
            }
        }
        if let Some(max) = info.max.as_deref() {
            if compare_versions(max, current) == Ordering::Less {
                return Err(FreshnessIssue::Fatal(format!(
                    "the repo supports specrepo up to {}; checkout the appropriate tag in the repo",
                    max
                )));
            }
        }
        if let Some(last) = info.last.as_deref() {
            if compare_versions(last, current) == Ordering::Greater {
                return Err(FreshnessIssue::Warning(format!(
                    "specrepo {} is available (running {})",
                    last, current
                )));
            }
        }
        Ok(())
    }
}

/// Always passes; used when the check is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFreshnessCheck;

impl FreshnessCheck for NoFreshnessCheck {
    fn check(&self, _dir: &Path) -> Result<(), FreshnessIssue> {
        Ok(())
    }
}

/// Run `check` on a helper thread, waiting at most `timeout`.
///
/// A check that does not answer in time is reported as a warning; the helper
/// thread is left to finish on its own.
pub fn check_with_timeout(
    check: Arc<dyn FreshnessCheck>,
    dir: &Path,
    timeout: Duration,
) -> Result<(), FreshnessIssue> {
    let (tx, rx) = mpsc::channel();
    let owned: PathBuf = dir.to_path_buf();
    thread::spawn(move || {
        let _ = tx.send(check.check(&owned));
    });
    match rx.recv_timeout(timeout) {
        Ok(res) => res,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(FreshnessIssue::Warning(format!(
            "freshness check for {} timed out after {}ms",
            dir.display(),
            timeout.as_millis()
        ))),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(FreshnessIssue::Warning(format!(
            "freshness check for {} stopped without an answer",
            dir.display()
        ))),
    }
}

/// Compare dotted numeric versions; missing or non-numeric parts count as 0.
/// Pre-release suffixes (`-beta`) are ignored.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    fn parts(v: &str) -> Vec<u64> {
        let core = v.trim().split(['-', '+']).next().unwrap_or("");
        core.split('.')
            .map(|p| p.parse::<u64>().unwrap_or(0))
            .collect()
    }
    let (pa, pb) = (parts(a), parts(b));
    let len = pa.len().max(pb.len());
    for i in 0..len {
        let x = pa.get(i).copied().unwrap_or(0);
        let y = pb.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}
