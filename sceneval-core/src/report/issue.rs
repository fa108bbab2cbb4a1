use crate::foundation::path::FieldPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an issue fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory; reported but does not fail the scene.
    #[default]
    Warning,
    /// Fails the scene.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Category of a content issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A required top-level member is absent or null.
    MissingField,
    /// An element type is outside the allowed set.
    DisallowedElementType,
    /// More elements than `max_elements_per_scene`.
    TooManyElements,
    /// Scene shorter than `min_scene_duration`.
    DurationTooShort,
    /// Scene duration is not a finite positive number.
    InvalidDuration,
    /// Timing window outside `0 <= start <= end <= duration`.
    InvalidTimingWindow,
    /// A recurring element drifted from a prior scene.
    ContinuityMismatch,
    /// Scene name is blank.
    EmptyName,
    /// Element has no id.
    MissingElementId,
    /// Two elements share an id.
    DuplicateElementId,
    /// Transition length is negative, non-finite or longer than the scene.
    InvalidTransition,
    /// Metadata timestamp is not RFC 3339.
    InvalidTimestamp,
    /// The optional reviewer could not be consulted.
    ReviewUnavailable,
}

impl IssueKind {
    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::DisallowedElementType => "disallowed_element_type",
            Self::TooManyElements => "too_many_elements",
            Self::DurationTooShort => "duration_too_short",
            Self::InvalidDuration => "invalid_duration",
            Self::InvalidTimingWindow => "invalid_timing_window",
            Self::ContinuityMismatch => "continuity_mismatch",
            Self::EmptyName => "empty_name",
            Self::MissingElementId => "missing_element_id",
            Self::DuplicateElementId => "duplicate_element_id",
            Self::InvalidTransition => "invalid_transition",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::ReviewUnavailable => "review_unavailable",
        }
    }

    /// Severity used unless the configuration overrides it.
    pub fn default_severity(self) -> Severity {
        match self {
            Self::ContinuityMismatch
            | Self::EmptyName
            | Self::MissingElementId
            | Self::InvalidTimestamp
            | Self::ReviewUnavailable => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One content violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// Category.
    pub kind: IssueKind,
    /// Whether this fails the scene.
    pub severity: Severity,
    /// Location in the scene document.
    pub path: FieldPath,
    /// Human-readable description.
    pub message: String,
    /// Id of the element concerned, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    /// Fix hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Issue {
    /// Build an issue with the kind's default severity.
    pub fn new(kind: IssueKind, path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            path,
            message: message.into(),
            element_id: None,
            suggestion: None,
        }
    }

    /// Override the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attach the concerned element id.
    pub fn for_element(mut self, id: Option<&str>) -> Self {
        self.element_id = id.map(str::to_string);
        self
    }

    /// Attach a fix hint.
    pub fn suggest(mut self, hint: impl Into<String>) -> Self {
        self.suggestion = Some(hint.into());
        self
    }

    /// Return `true` for error-severity issues.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}: {}", self.severity, self.kind, self.path, self.message)
    }
}
