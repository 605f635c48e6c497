//! Configuration discovery and effective settings resolution.
//!
//! specrepo reads `specrepo.toml|yaml|yml` from the working directory (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `repos_root`: `$SPECREPO_REPOS`, else `~/.specrepo/repos`
//! - `output`: `human`
//! - `color`: `auto`
//! - `only_errors`: false
//! - `jobs`: rayon default
//! - `freshness_timeout_ms`: 5000
//!
//! Overrides precedence: CLI > config file > defaults.

use is_terminal::IsTerminal;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILES: [&str; 3] = ["specrepo.toml", "specrepo.yaml", "specrepo.yml"];
pub const REPOS_ENV: &str = "SPECREPO_REPOS";
pub const DEFAULT_FRESHNESS_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `specrepo.toml|yaml`.
pub struct SpecrepoConfig {
    pub repos_root: Option<String>,
    pub output: Option<String>,
    pub color: Option<String>, // auto|always|never
    pub only_errors: Option<bool>,
    pub jobs: Option<usize>,
    pub freshness_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repos_root: PathBuf,
    pub output: String,
    pub color: bool,
    pub only_errors: bool,
    pub jobs: Option<usize>,
    pub freshness_timeout: Duration,
    /// Set when a config file was found but ignored because it is malformed.
    pub config_error: Option<String>,
}

/// Walk upward from `start` to the first directory holding a config file.
pub fn detect_config_root(start: &Path) -> Option<PathBuf> {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).is_file()) {
            return Some(cur.to_path_buf());
        }
        cur = cur.parent()?;
    }
}

/// Load `SpecrepoConfig` from `specrepo.toml` or `specrepo.yaml|yml`.
///
/// `Ok(None)` when no config file exists; `Err` names the file that exists
/// but could not be read or parsed.
pub fn load_config(root: &Path) -> Result<Option<SpecrepoConfig>, String> {
    let toml_path = root.join("specrepo.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path)
            .map_err(|e| format!("unable to read {}: {}", toml_path.display(), e))?;
        let cfg: SpecrepoConfig = toml::from_str(&s)
            .map_err(|e| format!("unable to parse {}: {}", toml_path.display(), e))?;
        return Ok(Some(cfg));
    }
    for yml in ["specrepo.yaml", "specrepo.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p)
                .map_err(|e| format!("unable to read {}: {}", p.display(), e))?;
            let cfg: SpecrepoConfig = serde_yaml::from_str(&s)
                .map_err(|e| format!("unable to parse {}: {}", p.display(), e))?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

/// Default repositories root when neither CLI nor config name one.
pub fn default_repos_root() -> PathBuf {
    if let Some(env) = std::env::var_os(REPOS_ENV) {
        if !env.is_empty() {
            return PathBuf::from(env);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".specrepo")
        .join("repos")
}

fn resolve_color(mode: &str) -> bool {
    match mode {
        "always" => true,
        "never" => false,
        _ => std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// A relative `repos_root` from the config file is taken relative to the
/// directory holding that file.
pub fn resolve_effective(
    start: &Path,
    cli_repos_root: Option<&str>,
    cli_output: Option<&str>,
    cli_color: Option<&str>,
    cli_only_errors: Option<bool>,
    cli_jobs: Option<usize>,
) -> Effective {
    let cfg_root = detect_config_root(start);
    let (cfg, config_error) = match cfg_root.as_deref().map(load_config) {
        Some(Ok(Some(cfg))) => (cfg, None),
        Some(Err(e)) => (SpecrepoConfig::default(), Some(e)),
        _ => (SpecrepoConfig::default(), None),
    };

    let repos_root = match (cli_repos_root, cfg.repos_root.as_deref()) {
        (Some(cli), _) => PathBuf::from(cli),
        (None, Some(from_cfg)) => {
            let p = PathBuf::from(from_cfg);
            match cfg_root.as_ref() {
                Some(base) if p.is_relative() => base.join(p),
                _ => p,
            }
        }
        (None, None) => default_repos_root(),
    };

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let color_mode = cli_color
        .map(|s| s.to_string())
        .or(cfg.color)
        .unwrap_or_else(|| "auto".to_string());
    let color = output != "json" && resolve_color(&color_mode);

    let only_errors = cli_only_errors.or(cfg.only_errors).unwrap_or(false);
    let jobs = cli_jobs.or(cfg.jobs).filter(|n| *n > 0);
    let freshness_timeout = Duration::from_millis(
        cfg.freshness_timeout_ms
            .unwrap_or(DEFAULT_FRESHNESS_TIMEOUT_MS),
    );

    Effective {
        repos_root,
        output,
        color,
        only_errors,
        jobs,
        freshness_timeout,
        config_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("specrepo.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
repos_root = "repos"
output = "json"
only_errors = true
jobs = 2
freshness_timeout_ms = 250
    "#
        )
        .unwrap();
        let nested = root.join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let eff = resolve_effective(&nested, None, None, None, None, None);
        assert_eq!(eff.repos_root, root.join("repos"));
        assert_eq!(eff.output, "json");
        assert!(!eff.color);
        assert!(eff.only_errors);
        assert_eq!(eff.jobs, Some(2));
        assert_eq!(eff.freshness_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("specrepo.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
repos_root: /srv/specs
color: never
            "#
        )
        .unwrap();

        let eff = resolve_effective(root, None, None, None, None, None);
        assert_eq!(eff.repos_root, PathBuf::from("/srv/specs"));
        assert_eq!(eff.output, "human");
        assert!(!eff.color);
        assert!(!eff.only_errors);
        assert_eq!(eff.jobs, None);
        assert_eq!(
            eff.freshness_timeout,
            Duration::from_millis(DEFAULT_FRESHNESS_TIMEOUT_MS)
        );
    }

    #[test]
    fn test_cli_takes_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("specrepo.toml"),
            "repos_root = \"repos\"\nonly_errors = true\ncolor = \"always\"\n",
        )
        .unwrap();

        let eff = resolve_effective(
            root,
            Some("/tmp/other"),
            None,
            Some("never"),
            Some(false),
            Some(0),
        );
        assert_eq!(eff.repos_root, PathBuf::from("/tmp/other"));
        assert!(!eff.only_errors);
        assert!(!eff.color);
        assert_eq!(eff.jobs, None);
        assert!(eff.config_error.is_none());
    }

    #[test]
    fn test_malformed_config_is_reported_and_defaults_used() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("specrepo.toml"), "only_errors = [unclosed\n").unwrap();

        assert!(load_config(root).is_err());
        let eff = resolve_effective(root, Some("/tmp/r"), None, Some("never"), None, None);
        assert!(!eff.only_errors);
        let msg = eff.config_error.expect("config error recorded");
        assert!(msg.contains("specrepo.toml"));
    }
}
