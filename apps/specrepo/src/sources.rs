//! Spec repositories on disk and the spec files inside them.
//!
//! Every directory directly under the repositories root is a registered repo,
//! named after the directory.

use crate::validator::SPEC_SUFFIX;
use glob::{glob, Pattern};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A registered spec repository.
pub struct Repo {
    pub name: String,
    pub path: PathBuf,
}

impl Repo {
    /// Repo for an arbitrary directory, named after its last component.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Repo {
            name,
            path: path.to_path_buf(),
        }
    }
}

/// List registered repos under `root`, sorted by name. Hidden entries are skipped.
pub fn list_repos(root: &Path) -> io::Result<Vec<Repo>> {
    let mut repos = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        repos.push(Repo {
            name,
            path: entry.path(),
        });
    }
    repos.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(repos)
}

/// Look up a registered repo by name.
pub fn find_repo(root: &Path, name: &str) -> Option<Repo> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return None;
    }
    let path = root.join(name);
    if path.is_dir() {
        Some(Repo {
            name: name.to_string(),
            path,
        })
    } else {
        None
    }
}

/// Spec files found under a directory.
#[derive(Debug, Default)]
pub struct SpecScan {
    /// Spec files in sorted path order.
    pub files: Vec<PathBuf>,
    /// Entries that could not be read while walking.
    pub unreadable: Vec<String>,
}

/// Recursively collect spec files under `dir`. A spec file path is returned
/// as is; any other file yields nothing.
pub fn spec_files(dir: &Path) -> io::Result<SpecScan> {
    if dir.is_file() {
        let is_spec = dir
            .file_name()
            .map(|n| n.to_string_lossy().ends_with(SPEC_SUFFIX))
            .unwrap_or(false);
        let files = if is_spec {
            vec![dir.to_path_buf()]
        } else {
            Vec::new()
        };
        return Ok(SpecScan {
            files,
            unreadable: Vec::new(),
        });
    }
    let base = Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{}/**/*{}", base, SPEC_SUFFIX);
    let entries =
        glob(&pattern).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    let mut scan = SpecScan::default();
    for entry in entries {
        match entry {
            Ok(p) if p.is_file() => scan.files.push(p),
            Ok(_) => {}
            Err(e) => scan.unreadable.push(e.to_string()),
        }
    }
    scan.files.sort();
    Ok(scan)
}
