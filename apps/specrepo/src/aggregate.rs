//! Folding per-file validation results into a grouped, deduplicated report.
//!
//! The report maps severity → message → entity name → versions. Each
//! `(severity, message, name, version)` tuple is stored once no matter how
//! many results produced it. Ordering of messages and names is left to the
//! printers; versions keep the order in which they were first seen.

use crate::models::{LintRunSummary, Outcome, Severity, ValidationResult};
use std::collections::HashMap;

/// Entity name → versions, in first-seen order.
pub type VersionsByName = HashMap<String, Vec<String>>;

/// Grouped messages for one linted directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GroupedReport {
    groups: HashMap<Severity, HashMap<String, VersionsByName>>,
}

impl GroupedReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence; a tuple already present is left as is.
    pub fn insert(&mut self, severity: Severity, message: &str, name: &str, version: &str) {
        let versions = self
            .groups
            .entry(severity)
            .or_default()
            .entry(message.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default();
        if !versions.iter().any(|v| v == version) {
            versions.push(version.to_string());
        }
    }

    /// Messages recorded under `severity`, keyed by message text.
    pub fn messages(&self, severity: Severity) -> Option<&HashMap<String, VersionsByName>> {
        self.groups.get(&severity)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(|m| m.is_empty())
    }

    /// Number of distinct `(severity, message, name, version)` tuples.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.groups
            .values()
            .flat_map(|m| m.values())
            .flat_map(|n| n.values())
            .map(Vec::len)
            .sum()
    }
}

/// Fold `results` into a grouped report and a summary.
///
/// Passed results contribute nothing. With `only_errors`, warning messages
/// are dropped before grouping, so a warnings-only result disappears from
/// the report. Failure accounting is unaffected by filtering: `failed`
/// counts every result whose outcome is `HasErrors`.
///
/// Results are visited in `(name, version)` order so that version lists come
/// out the same regardless of the order results were produced in.
pub fn fold(results: &[ValidationResult], only_errors: bool) -> (GroupedReport, LintRunSummary) {
    let mut ordered: Vec<&ValidationResult> = results.iter().collect();
    ordered.sort_by(|a, b| {
        a.entity_name
            .cmp(&b.entity_name)
            .then_with(|| a.entity_version.cmp(&b.entity_version))
    });

    let mut report = GroupedReport::new();
    for res in ordered {
        if res.outcome() == Outcome::Passed {
            continue;
        }
        for msg in res.messages() {
            if only_errors && msg.severity == Severity::Warning {
                continue;
            }
            report.insert(msg.severity, &msg.text, &res.entity_name, &res.entity_version);
        }
    }

    let failed = results
        .iter()
        .filter(|r| r.outcome() == Outcome::HasErrors)
        .count();
    (report, LintRunSummary::new(results.len(), failed))
}
