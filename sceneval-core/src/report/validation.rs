use crate::config::DetailLevel;
use crate::report::issue::{Issue, IssueKind, Severity};
use serde::Serialize;
use std::fmt::Write as _;

/// Outcome of validating one scene.
///
/// Reports carry no timestamps, so validating the same inputs twice yields equal reports. The
/// generation time is added only when a report is exported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// `true` when no issue has [`Severity::Error`].
    pub pass: bool,
    /// Id of the validated scene, when it has one.
    pub scene_id: Option<String>,
    /// Issues in check order.
    pub issues: Vec<Issue>,
    /// Reviewer suggestions.
    pub suggestions: Vec<String>,
    /// Verbosity used by [`ValidationReport::summary`].
    #[serde(skip)]
    pub detail_level: DetailLevel,
}

impl ValidationReport {
    /// Build a report; `pass` is derived from the issue severities.
    pub fn new(scene_id: Option<String>, issues: Vec<Issue>, suggestions: Vec<String>) -> Self {
        let pass = !issues.iter().any(Issue::is_error);
        Self {
            pass,
            scene_id,
            issues,
            suggestions,
            detail_level: DetailLevel::default(),
        }
    }

    /// Set the summary verbosity.
    pub fn with_detail_level(mut self, detail_level: DetailLevel) -> Self {
        self.detail_level = detail_level;
        self
    }

    /// Alias for [`ValidationReport::pass`].
    pub fn is_valid(&self) -> bool {
        self.pass
    }

    /// Error-severity issues.
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    /// Warning-severity issues.
    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Issues of one kind.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    /// Plain-text summary at the report's detail level.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let status = if self.pass { "VALID" } else { "INVALID" };
        let _ = writeln!(s, "Validation Status: {status}");
        if let Some(id) = &self.scene_id {
            let _ = writeln!(s, "Scene: {id}");
        }
        let errors: Vec<&Issue> = self.errors().collect();
        let warnings: Vec<&Issue> = self.warnings().collect();
        let _ = writeln!(
            s,
            "Errors: {}, Warnings: {}",
            errors.len(),
            warnings.len()
        );
        if self.detail_level == DetailLevel::Low {
            return s;
        }

        let with_hints = self.detail_level == DetailLevel::High;
        write_issue_section(&mut s, "Issues", &errors, with_hints);
        write_issue_section(&mut s, "Warnings", &warnings, with_hints);

        if with_hints && !self.suggestions.is_empty() {
            s.push_str("\nSuggestions:\n");
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                let _ = writeln!(s, "{}. {suggestion}", i + 1);
            }
        }
        s
    }
}

fn write_issue_section(s: &mut String, title: &str, issues: &[&Issue], with_hints: bool) {
    if issues.is_empty() {
        return;
    }
    let _ = writeln!(s, "\n{title}:");
    for (i, issue) in issues.iter().enumerate() {
        let _ = writeln!(
            s,
            "{}. {} {}: {}",
            i + 1,
            issue.kind,
            issue.path,
            issue.message
        );
        if with_hints && let Some(hint) = &issue.suggestion {
            let _ = writeln!(s, "   hint: {hint}");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/report/validation.rs"]
mod tests;
