//! sceneval validates media-pipeline scene documents.
//!
//! A scene is a JSON document describing one unit of media content: characters, props,
//! environment, effects, audio, timing and camera. Validation is a pure, single pass over an
//! immutable rule configuration that collects every issue instead of stopping at the first.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: `JSON -> Scene`. Values of the wrong shape fail with [`SchemaErrors`], one entry
//!    per offending path. No partial report is produced.
//! 2. **Validate**: `Scene + ValidatorConfig -> ValidationReport`. Rule violations become
//!    [`Issue`]s; `pass` is `true` when no issue is an error.
//! 3. **Export** (optional): render a [`ReportDocument`] as JSON or HTML and hand it to a
//!    [`ReportStore`].
//!
//! Continuity across scenes is checked only against prior scenes the caller supplies
//! ([`ContinuityContext`], or [`Validator::validate_batch`]). An optional [`SceneReviewer`] may add
//! advisory suggestions; its absence or failure never changes the rule outcome.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod batch;
mod config;
mod foundation;
mod report;
mod review;
mod scene;
mod schema;
mod validate;

pub use batch::cache::{InputFingerprint, ReportCache};
pub use config::{
    AdvancedConfig, AssistantConfig, ContinuityTracking, DetailLevel, ReportingConfig,
    ValidationRules, ValidatorConfig,
};
pub use foundation::error::{SceneError, SceneResult};
pub use foundation::path::{FieldPath, PathElem};
pub use report::export::{ReportDocument, ReportFormat, export_to_path};
pub use report::issue::{Issue, IssueKind, Severity};
pub use report::store::{
    DirStore, PublishOutcome, ReportKeys, ReportStore, StoreError, publish, publish_as, report_key,
};
pub use report::validation::ValidationReport;
pub use review::{ReviewError, ReviewRequest, SceneReviewer, build_prompt, parse_suggestions};
pub use scene::model::{
    Camera, CameraMovement, Element, ElementKind, Metadata, Scene, TransitionSpec, Transitions,
    Vec3,
};
pub use schema::{SchemaError, SchemaErrors};
pub use validate::Validator;
pub use validate::continuity::ContinuityContext;
pub use validate::validator::validate;
