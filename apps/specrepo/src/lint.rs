//! Lint runner: resolves which repos to lint, validates every spec file in
//! each, and folds the results into one report per repo.
//!
//! All repos are processed even after one fails so every report is printed;
//! the run fails at the end when any repo had failing specs.

use crate::aggregate::{fold, GroupedReport};
use crate::config::Effective;
use crate::error::{LintError, Result};
use crate::freshness::{check_with_timeout, FreshnessCheck, FreshnessIssue, VersionFileCheck};
use crate::models::{LintRunSummary, Message, ValidationResult};
use crate::output;
use crate::sources::{self, Repo};
use crate::utils::Console;
use crate::validator::{relative_name, JsonSpecValidator, Validator, UNKNOWN_VERSION};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Resolve the repos named by the optional CLI argument.
///
/// An argument naming an existing path is linted as is; otherwise it must
/// name a registered repo. Without an argument every registered repo is
/// linted.
pub fn resolve_targets(arg: Option<&str>, repos_root: &Path) -> Result<Vec<Repo>> {
    match arg {
        Some(a) if Path::new(a).exists() => Ok(vec![Repo::from_path(Path::new(a))]),
        Some(a) => sources::find_repo(repos_root, a)
            .map(|r| vec![r])
            .ok_or_else(|| LintError::UnknownTarget(a.to_string())),
        None => {
            if !repos_root.is_dir() {
                return Err(LintError::NoRepos(repos_root.to_path_buf()));
            }
            Ok(sources::list_repos(repos_root)?)
        }
    }
}

/// Outcome of linting one repo.
#[derive(Debug)]
pub struct DirectoryLint {
    pub repo: Repo,
    pub report: GroupedReport,
    pub summary: LintRunSummary,
}

/// Totals across a whole run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunTotals {
    pub repos: usize,
    pub files: usize,
    pub failed: usize,
}

/// Drives validation for one invocation.
pub struct Linter {
    validator: Arc<dyn Validator>,
    freshness: Arc<dyn FreshnessCheck>,
    freshness_timeout: Duration,
    only_errors: bool,
    jobs: Option<usize>,
    output: String,
    console: Console,
}

impl Linter {
    pub fn new(eff: &Effective) -> Self {
        Linter {
            validator: Arc::new(JsonSpecValidator),
            freshness: Arc::new(VersionFileCheck::default()),
            freshness_timeout: eff.freshness_timeout,
            only_errors: eff.only_errors,
            jobs: eff.jobs,
            output: eff.output.clone(),
            console: Console::new(eff.color),
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_freshness(mut self, freshness: Arc<dyn FreshnessCheck>) -> Self {
        self.freshness = freshness;
        self
    }

    /// Validate `files`, returning results in the same order as `files`.
    ///
    /// Files that cannot be read become a result with a single error message.
    pub fn validate_files(&self, root: &Path, files: &[PathBuf]) -> Vec<ValidationResult> {
        let run = || -> Vec<ValidationResult> {
            files
                .par_iter()
                .map(|path| match self.validator.validate(root, path) {
                    Ok(res) => res,
                    Err(e) => {
                        self.console.warn(format!("{}: {}", path.display(), e));
                        ValidationResult::new(
                            relative_name(root, path),
                            UNKNOWN_VERSION,
                            vec![Message::error(e.to_string())],
                        )
                    }
                })
                .collect()
        };
        match self.jobs {
            Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    self.console
                        .warn(format!("unable to start {} workers ({}); using default pool", n, e));
                    run()
                }
            },
            None => run(),
        }
    }

    /// Lint one repo: freshness check, spec discovery, validation, folding.
    pub fn lint_directory(&self, repo: &Repo) -> Result<DirectoryLint> {
        match check_with_timeout(self.freshness.clone(), &repo.path, self.freshness_timeout) {
            Ok(()) => {}
            Err(FreshnessIssue::Warning(msg)) => self.console.warn(format!("{}: {}", repo.name, msg)),
            Err(FreshnessIssue::Fatal(reason)) => {
                return Err(LintError::Incompatible {
                    repo: repo.name.clone(),
                    reason,
                })
            }
        }

        let scan = match sources::spec_files(&repo.path) {
            Ok(scan) => scan,
            Err(e) => {
                self.console
                    .warn(format!("{}: unable to scan for spec files: {}", repo.name, e));
                sources::SpecScan::default()
            }
        };
        for entry in &scan.unreadable {
            self.console.warn(format!("{}: skipped {}", repo.name, entry));
        }

        let root = if repo.path.is_file() {
            repo.path.parent().unwrap_or(repo.path.as_path())
        } else {
            repo.path.as_path()
        };
        let results = self.validate_files(root, &scan.files);
        let (report, summary) = fold(&results, self.only_errors);
        Ok(DirectoryLint {
            repo: repo.clone(),
            report,
            summary,
        })
    }

    /// Lint every resolved repo, handing each result to `on_dir` as soon as
    /// it is ready.
    ///
    /// Fails with `ValidationFailed` carrying the failure count summed over
    /// all repos.
    pub fn run_with<F>(&self, arg: Option<&str>, repos_root: &Path, mut on_dir: F) -> Result<RunTotals>
    where
        F: FnMut(&DirectoryLint),
    {
        let repos = resolve_targets(arg, repos_root)?;
        if repos.is_empty() {
            self.console
                .note(format!("no spec repos under {}", repos_root.display()));
        }
        let mut totals = RunTotals::default();
        for repo in &repos {
            let dir = self.lint_directory(repo)?;
            totals.repos += 1;
            totals.files += dir.summary.files;
            totals.failed += dir.summary.failed;
            on_dir(&dir);
        }
        if totals.failed > 0 {
            return Err(LintError::ValidationFailed {
                failed: totals.failed,
            });
        }
        Ok(totals)
    }

    /// Lint and print every resolved repo.
    pub fn run(&self, arg: Option<&str>, repos_root: &Path) -> Result<RunTotals> {
        let human = self.output != "json";
        let color = self.console.color;
        self.run_with(arg, repos_root, |dir| {
            if human {
                println!();
                println!("{}", output::lint_header(&dir.repo.name, color));
            }
            output::print_lint(&dir.repo.name, &dir.report, &dir.summary, &self.output, color);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freshness::NoFreshnessCheck;
    use crate::validator::ValidateError;
    use std::fs;
    use std::io;
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn effective(root: &Path, only_errors: bool) -> Effective {
        Effective {
            repos_root: root.to_path_buf(),
            output: "human".into(),
            color: false,
            only_errors,
            jobs: Some(2),
            freshness_timeout: Duration::from_secs(5),
            config_error: None,
        }
    }

    fn write_spec(dir: &Path, name: &str, body: &str) {
        let d = dir.join(name).join("1.0.0");
        fs::create_dir_all(&d).unwrap();
        fs::write(d.join(format!("{}.podspec.json", name)), body).unwrap();
    }

    /// Builds the A (valid), B (error), C (warning) repo.
    fn scenario_repo(root: &Path, repo: &str) -> PathBuf {
        let dir = root.join(repo);
        write_spec(
            &dir,
            "A",
            r#"{"name":"A","version":"1.0.0","summary":"a","source":{}}"#,
        );
        write_spec(&dir, "B", r#"{"version":"1.0.0","summary":"b","source":{}}"#);
        write_spec(&dir, "C", r#"{"name":"C","version":"1.0.0","source":{}}"#);
        dir
    }

    fn render_all(linter: &Linter, arg: Option<&str>, root: &Path) -> (Result<RunTotals>, String) {
        let mut text = String::new();
        let res = linter.run_with(arg, root, |d| {
            text.push_str(&output::render(&d.report, &d.summary, false));
        });
        (res, text)
    }

    #[test]
    fn default_run_reports_errors_and_warnings() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        scenario_repo(root, "master");
        let linter = Linter::new(&effective(root, false));
        let (res, text) = render_all(&linter, Some("master"), root);
        match res {
            Err(LintError::ValidationFailed { failed }) => assert_eq!(failed, 1),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(text.contains("[error] Missing required attribute `name`.\n    - B/1.0.0/B.podspec.json (1.0.0)"));
        assert!(text.contains("[warning] Missing recommended attribute `summary`.\n    - C (1.0.0)"));
        assert!(text.contains("Analyzed 3 podspecs files."));
        assert!(text.ends_with("1 items failed validation.\n"));
        assert_eq!(
            LintError::ValidationFailed { failed: 1 }.to_string(),
            "1 items failed validation."
        );
    }

    #[test]
    fn only_errors_run_hides_warning_only_specs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        scenario_repo(root, "master");
        let linter = Linter::new(&effective(root, true));
        let (res, text) = render_all(&linter, Some("master"), root);
        assert!(matches!(res, Err(LintError::ValidationFailed { failed: 1 })));
        assert!(text.contains("B/1.0.0/B.podspec.json"));
        assert!(!text.contains("[warning]"));
        assert!(!text.contains("- C ("));
    }

    #[test]
    fn valid_only_directory_passes() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let repo = root.join("clean");
        write_spec(
            &repo,
            "A",
            r#"{"name":"A","version":"1.0.0","summary":"a","source":{}}"#,
        );
        let linter = Linter::new(&effective(root, false));
        let path = repo.to_string_lossy().to_string();
        let (res, text) = render_all(&linter, Some(&path), root);
        assert_eq!(
            res.unwrap(),
            RunTotals {
                repos: 1,
                files: 1,
                failed: 0
            }
        );
        assert_eq!(
            text,
            "Analyzed 1 podspecs files.\n\nAll the specs passed validation.\n"
        );
    }

    #[test]
    fn empty_repo_passes_with_zero_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("empty")).unwrap();
        let linter = Linter::new(&effective(root, false));
        let (res, text) = render_all(&linter, None, root);
        assert_eq!(res.unwrap().files, 0);
        assert!(text.starts_with("Analyzed 0 podspecs files."));
    }

    #[test]
    fn unknown_target_is_input_error() {
        let dir = tempdir().unwrap();
        let linter = Linter::new(&effective(dir.path(), false));
        let err = linter
            .run_with(Some("nope-not-here"), dir.path(), |_| {})
            .unwrap_err();
        assert!(matches!(err, LintError::UnknownTarget(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_repos_root_is_input_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nowhere");
        assert!(matches!(
            resolve_targets(None, &missing),
            Err(LintError::NoRepos(_))
        ));
    }

    #[test]
    fn all_repos_are_linted_and_failures_summed() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        scenario_repo(root, "alpha");
        scenario_repo(root, "beta");
        let linter = Linter::new(&effective(root, false));
        let mut seen = Vec::new();
        let res = linter.run_with(None, root, |d| seen.push(d.repo.name.clone()));
        assert_eq!(seen, vec!["alpha", "beta"]);
        assert!(matches!(res, Err(LintError::ValidationFailed { failed: 2 })));
    }

    struct FakeValidator {
        calls: Mutex<Vec<PathBuf>>,
    }

    impl Validator for FakeValidator {
        fn validate(
            &self,
            root: &Path,
            path: &Path,
        ) -> std::result::Result<ValidationResult, ValidateError> {
            self.calls.lock().unwrap().push(path.to_path_buf());
            let name = relative_name(root, path);
            if name.contains("Unreadable") {
                return Err(ValidateError::Io(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "denied",
                )));
            }
            Ok(ValidationResult::new(name, "1.0", vec![]))
        }
    }

    #[test]
    fn io_failures_are_recorded_as_errors() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let repo = root.join("r");
        write_spec(&repo, "Fine", "{}");
        write_spec(&repo, "Unreadable", "{}");
        let fake = Arc::new(FakeValidator {
            calls: Mutex::new(Vec::new()),
        });
        let linter = Linter::new(&effective(root, false))
            .with_validator(fake.clone())
            .with_freshness(Arc::new(NoFreshnessCheck));
        let lint = linter.lint_directory(&Repo::from_path(&repo)).unwrap();
        assert_eq!(fake.calls.lock().unwrap().len(), 2);
        assert_eq!(lint.summary, LintRunSummary::new(2, 1));
        let text = output::render(&lint.report, &lint.summary, false);
        assert!(text.contains("[error] Unable to read the spec file: denied"));
        assert!(text.contains("- Unreadable/1.0.0/Unreadable.podspec.json (unknown)"));
    }

    struct Incompatible;

    impl FreshnessCheck for Incompatible {
        fn check(&self, _dir: &Path) -> std::result::Result<(), FreshnessIssue> {
            Err(FreshnessIssue::Fatal("too old".into()))
        }
    }

    struct Stale;

    impl FreshnessCheck for Stale {
        fn check(&self, _dir: &Path) -> std::result::Result<(), FreshnessIssue> {
            Err(FreshnessIssue::Warning("stale".into()))
        }
    }

    #[test]
    fn fatal_freshness_aborts_warning_does_not() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let repo = scenario_repo(root, "master");
        let fatal = Linter::new(&effective(root, false)).with_freshness(Arc::new(Incompatible));
        assert!(matches!(
            fatal.lint_directory(&Repo::from_path(&repo)),
            Err(LintError::Incompatible { .. })
        ));
        let stale = Linter::new(&effective(root, false)).with_freshness(Arc::new(Stale));
        let lint = stale.lint_directory(&Repo::from_path(&repo)).unwrap();
        assert_eq!(lint.summary.files, 3);
    }

    #[test]
    fn non_spec_file_target_analyzes_nothing() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let readme = root.join("README.md");
        fs::write(&readme, "# not a spec").unwrap();
        let linter = Linter::new(&effective(root, false));
        let arg = readme.to_string_lossy().to_string();
        let (res, text) = render_all(&linter, Some(&arg), root);
        assert_eq!(
            res.unwrap(),
            RunTotals {
                repos: 1,
                files: 0,
                failed: 0
            }
        );
        assert_eq!(
            text,
            "Analyzed 0 podspecs files.\n\nAll the specs passed validation.\n"
        );
    }

    #[test]
    fn existing_path_wins_over_registered_repo() {
        let dir = tempdir().unwrap();
        let repos_root = dir.path().join("repos");
        scenario_repo(&repos_root, "master");
        let elsewhere = dir.path().join("checkout").join("master");
        write_spec(
            &elsewhere,
            "A",
            r#"{"name":"A","version":"1.0.0","summary":"a","source":{}}"#,
        );
        let linter = Linter::new(&effective(&repos_root, false));
        let arg = elsewhere.to_string_lossy().to_string();
        let mut linted = Vec::new();
        let res = linter.run_with(Some(&arg), &repos_root, |d| {
            linted.push((d.repo.path.clone(), d.summary));
        });
        assert_eq!(res.unwrap().failed, 0);
        assert_eq!(linted, vec![(elsewhere.clone(), LintRunSummary::new(1, 0))]);
    }

    #[test]
    fn json_output_for_every_repo() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        scenario_repo(root, "alpha");
        let clean = root.join("beta");
        write_spec(
            &clean,
            "A",
            r#"{"name":"A","version":"1.0.0","summary":"a","source":{}}"#,
        );
        let mut eff = effective(root, false);
        eff.output = "json".into();
        let linter = Linter::new(&eff);
        let mut docs = Vec::new();
        let res = linter.run_with(None, root, |d| {
            docs.push(output::compose_lint_json(&d.repo.name, &d.report, &d.summary));
        });
        assert!(matches!(res, Err(LintError::ValidationFailed { failed: 1 })));
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["repo"], "alpha");
        assert_eq!(docs[0]["summary"]["files"], 3);
        assert_eq!(docs[0]["summary"]["failed"], 1);
        assert_eq!(docs[0]["groups"][0]["severity"], "error");
        assert_eq!(
            docs[0]["groups"][0]["entities"][0]["name"],
            "B/1.0.0/B.podspec.json"
        );
        assert_eq!(docs[0]["groups"][1]["severity"], "warning");
        assert_eq!(docs[0]["groups"][1]["entities"][0]["name"], "C");
        assert_eq!(docs[1]["repo"], "beta");
        assert_eq!(docs[1]["summary"]["passed"], true);
        assert_eq!(docs[1]["groups"].as_array().map(Vec::len), Some(0));
    }
}
