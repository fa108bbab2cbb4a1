use crate::config::DetailLevel;
use crate::foundation::error::{SceneError, SceneResult};
use crate::report::issue::Issue;
use crate::report::validation::ValidationReport;
use crate::scene::model::Scene;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Export document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Machine-readable JSON.
    Json,
    /// Self-contained HTML page.
    #[default]
    Html,
}

impl ReportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
        }
    }

    /// MIME type used when handing the document to a store.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Html => "text/html; charset=utf-8",
        }
    }

    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> SceneResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(e) if e.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(e) if e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm") => {
                Ok(Self::Html)
            }
            _ => Err(SceneError::export(format!(
                "unsupported report format for '{}': use .json or .html",
                path.display()
            ))),
        }
    }
}

/// A report prepared for rendering, stamped with its generation time.
#[derive(Debug, Clone)]
pub struct ReportDocument<'a> {
    report: &'a ValidationReport,
    scene: Option<&'a Scene>,
    generated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    scene_id: Option<&'a str>,
    generated_at: String,
    issues: Vec<&'a Issue>,
    warnings: Vec<&'a Issue>,
    suggestions: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    scene_data: Option<&'a Scene>,
}

impl<'a> ReportDocument<'a> {
    /// Wrap a report, stamped with the current time.
    pub fn new(report: &'a ValidationReport) -> Self {
        Self {
            report,
            scene: None,
            generated_at: Utc::now(),
        }
    }

    /// Embed the validated scene (rendered only at [`DetailLevel::High`]).
    pub fn with_scene(mut self, scene: &'a Scene) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Override the generation time.
    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = at;
        self
    }

    /// The wrapped report.
    pub fn report(&self) -> &ValidationReport {
        self.report
    }

    fn timestamp(&self) -> String {
        self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn scene_data(&self) -> Option<&'a Scene> {
        self.scene
            .filter(|_| self.report.detail_level == DetailLevel::High)
    }

    /// Render in `format`.
    pub fn render(&self, format: ReportFormat) -> SceneResult<String> {
        match format {
            ReportFormat::Json => self.render_json(),
            ReportFormat::Html => self.render_html(),
        }
    }

    /// Render as pretty-printed JSON.
    pub fn render_json(&self) -> SceneResult<String> {
        let doc = JsonReport {
            valid: self.report.pass,
            scene_id: self.report.scene_id.as_deref(),
            generated_at: self.timestamp(),
            issues: self.report.errors().collect(),
            warnings: self.report.warnings().collect(),
            suggestions: &self.report.suggestions,
            scene_data: self.scene_data(),
        };
        serde_json::to_string_pretty(&doc)
            .map_err(|e| SceneError::serde(format!("render JSON report: {e}")))
    }

    /// Render as a self-contained HTML page. All document content is escaped.
    pub fn render_html(&self) -> SceneResult<String> {
        const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Scene Validation Report</title>
<style>
  body { font-family: system-ui, Arial, sans-serif; line-height: 1.6; margin: 20px; }
  .report-header { display: flex; justify-content: space-between; }
  .status { padding: 10px; border-radius: 5px; font-weight: bold; }
  .valid { background-color: #dff0d8; color: #3c763d; }
  .invalid { background-color: #f2dede; color: #a94442; }
  .section { margin: 20px 0; }
  .issue { background-color: #f2dede; padding: 10px; margin: 5px 0; border-left: 4px solid #a94442; }
  .warning { background-color: #fcf8e3; padding: 10px; margin: 5px 0; border-left: 4px solid #8a6d3b; }
  .suggestion { background-color: #d9edf7; padding: 10px; margin: 5px 0; border-left: 4px solid #31708f; }
  .hint { color: #555; font-size: 0.9em; }
  code, pre { font-family: ui-monospace, Menlo, Consolas, monospace; }
  pre { background-color: #f5f5f5; padding: 10px; overflow: auto; }
</style>
</head>
<body>
<h1>Scene Validation Report</h1>
<div class="report-header">
  <div class="status __STATUS_CLASS__">Status: __STATUS__</div>
  <div class="timestamp">Generated: __GENERATED__</div>
</div>
__BODY__</body>
</html>
"#;
        let r = self.report;
        let mut body = String::new();
        if let Some(id) = &r.scene_id {
            let _ = writeln!(body, "<p>Scene: <code>{}</code></p>", escape_html(id));
        }
        let errors: Vec<&Issue> = r.errors().collect();
        let warnings: Vec<&Issue> = r.warnings().collect();
        let _ = writeln!(
            body,
            "<p>Errors: {}, Warnings: {}</p>",
            errors.len(),
            warnings.len()
        );

        if r.detail_level >= DetailLevel::Medium {
            let hints = r.detail_level == DetailLevel::High;
            write_html_issues(&mut body, "Issues", "issue", &errors, hints);
            write_html_issues(&mut body, "Warnings", "warning", &warnings, hints);
        }
        if r.detail_level == DetailLevel::High && !r.suggestions.is_empty() {
            body.push_str("<div class=\"section\">\n<h2>Suggestions</h2>\n");
            for s in &r.suggestions {
                let _ = writeln!(body, "<div class=\"suggestion\">{}</div>", escape_html(s));
            }
            body.push_str("</div>\n");
        }
        if let Some(scene) = self.scene_data() {
            let json = serde_json::to_string_pretty(scene)
                .map_err(|e| SceneError::serde(format!("render scene data: {e}")))?;
            let _ = writeln!(
                body,
                "<div class=\"section\">\n<h2>Scene Data</h2>\n<pre>{}</pre>\n</div>",
                escape_html(&json)
            );
        }

        let (class, status) = if r.pass {
            ("valid", "VALID")
        } else {
            ("invalid", "INVALID")
        };
        Ok(TEMPLATE
            .replace("__STATUS_CLASS__", class)
            .replace("__STATUS__", status)
            .replace("__GENERATED__", &self.timestamp())
            .replace("__BODY__", &body))
    }
}

fn write_html_issues(out: &mut String, title: &str, class: &str, issues: &[&Issue], hints: bool) {
    if issues.is_empty() {
        return;
    }
    let _ = writeln!(out, "<div class=\"section\">\n<h2>{title}</h2>");
    for issue in issues {
        let _ = write!(
            out,
            "<div class=\"{class}\"><code>{}</code> <code>{}</code> {}",
            issue.kind,
            escape_html(&issue.path.to_string()),
            escape_html(&issue.message)
        );
        if hints && let Some(hint) = &issue.suggestion {
            let _ = write!(out, "<div class=\"hint\">{}</div>", escape_html(hint));
        }
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Write `doc` to `path`, picking the format from the file extension.
///
/// Parent directories are created as needed. Returns the written path.
pub fn export_to_path(doc: &ReportDocument<'_>, path: impl AsRef<Path>) -> SceneResult<PathBuf> {
    let path = path.as_ref();
    let format = ReportFormat::from_path(path)?;
    let rendered = doc.render(format)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            SceneError::export(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    std::fs::write(path, rendered)
        .map_err(|e| SceneError::export(format!("write report '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), ?format, "validation report exported");
    Ok(path.to_path_buf())
}

#[cfg(test)]
#[path = "../../tests/unit/report/export.rs"]
mod tests;
