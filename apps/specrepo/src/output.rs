//! Output rendering for lint and list commands.
//!
//! Supports `human` (default) and `json` outputs. Both are read-only views of
//! a `GroupedReport`: severities in fixed order (error, then warning),
//! messages sorted by text, entity names sorted, versions in the order the
//! aggregator recorded them.

use crate::aggregate::{GroupedReport, VersionsByName};
use crate::models::{LintRunSummary, Severity};
use crate::sources::Repo;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::fmt::Write as _;

/// Separator between versions of one entity.
pub const VERSION_SEPARATOR: &str = ", ";

pub const SUCCESS_MESSAGE: &str = "All the specs passed validation.";

/// Verdict line for a failed directory.
pub fn failure_message(failed: usize) -> String {
    format!("{} items failed validation.", failed)
}

fn sorted_messages(report: &GroupedReport, severity: Severity) -> Vec<(&String, &VersionsByName)> {
    let mut messages: Vec<_> = report
        .messages(severity)
        .map(|m| m.iter().collect())
        .unwrap_or_default();
    messages.sort_by(|a, b| a.0.cmp(b.0));
    messages
}

fn sorted_names(names: &VersionsByName) -> Vec<(&String, &Vec<String>)> {
    let mut names: Vec<_> = names.iter().collect();
    names.sort_by(|a, b| a.0.cmp(b.0));
    names
}

/// Render the human report for one directory.
pub fn render(report: &GroupedReport, summary: &LintRunSummary, color: bool) -> String {
    let mut out = String::new();
    for severity in Severity::ALL {
        let label = format!("[{}]", severity);
        let label = match (color, severity) {
            (false, _) => label,
            (true, Severity::Error) => label.red().bold().to_string(),
            (true, Severity::Warning) => label.yellow().bold().to_string(),
        };
        for (message, names) in sorted_messages(report, severity) {
            let _ = writeln!(out, "{} {}", label, message);
            for (name, versions) in sorted_names(names) {
                let _ = writeln!(out, "    - {} ({})", name, versions.join(VERSION_SEPARATOR));
            }
            out.push('\n');
        }
    }
    let _ = writeln!(out, "Analyzed {} podspecs files.", summary.files);
    out.push('\n');
    let verdict = if summary.passed {
        if color {
            SUCCESS_MESSAGE.green().to_string()
        } else {
            SUCCESS_MESSAGE.to_string()
        }
    } else if color {
        failure_message(summary.failed).red().to_string()
    } else {
        failure_message(summary.failed)
    };
    let _ = writeln!(out, "{}", verdict);
    out
}

/// Compose the lint JSON object (pure) for one directory.
pub fn compose_lint_json(repo: &str, report: &GroupedReport, summary: &LintRunSummary) -> JsonVal {
    let mut groups = Vec::new();
    for severity in Severity::ALL {
        for (message, names) in sorted_messages(report, severity) {
            let entities: Vec<_> = sorted_names(names)
                .into_iter()
                .map(|(name, versions)| json!({"name": name, "versions": versions}))
                .collect();
            groups.push(json!({
                "severity": severity,
                "message": message,
                "entities": entities,
            }));
        }
    }
    json!({
        "repo": repo,
        "groups": groups,
        "summary": summary,
    })
}

/// Print one directory's lint result in the requested format.
pub fn print_lint(
    repo: &str,
    report: &GroupedReport,
    summary: &LintRunSummary,
    output: &str,
    color: bool,
) {
    match output {
        "json" => println!("{}", compose_lint_json(repo, report, summary)),
        _ => {
            println!();
            print!("{}", render(report, summary, color));
        }
    }
}

/// Header printed before a directory is linted in human mode.
pub fn lint_header(repo: &str, color: bool) -> String {
    let line = format!("Linting spec repo `{}`", repo);
    if color {
        line.yellow().to_string()
    } else {
        line
    }
}

/// Print the registered repositories.
pub fn print_repos(repos: &[Repo], output: &str, color: bool) {
    match output {
        "json" => {
            let items: Vec<_> = repos
                .iter()
                .map(|r| json!({"name": r.name, "path": r.path.to_string_lossy()}))
                .collect();
            println!("{}", json!({"repos": items, "total": repos.len()}));
        }
        _ => {
            for r in repos {
                if color {
                    println!("{}", r.name.bold());
                } else {
                    println!("{}", r.name);
                }
                println!("- Path: {}", r.path.to_string_lossy());
                println!();
            }
            let suffix = if repos.len() == 1 { "repo" } else { "repos" };
            println!("{} {}", repos.len(), suffix);
        }
    }
}
