//! Rule configuration.
//!
//! The JSON document has one section per concern. Every section and field is optional and falls
//! back to the defaults below, so a configuration file only needs to list what it overrides.

use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::path::FieldPath;
use crate::report::export::ReportFormat;
use crate::report::issue::Severity;
use crate::scene::model::ElementKind;
use crate::schema::{SchemaError, SchemaErrors};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Complete validator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Deterministic rule set.
    pub validation_rules: ValidationRules,
    /// Cross-scene consistency checks.
    pub continuity_tracking: ContinuityTracking,
    /// Report rendering and persistence.
    pub reporting: ReportingConfig,
    /// Batch execution and caching.
    pub advanced: AdvancedConfig,
    /// Optional reviewer capability.
    #[serde(alias = "gemini_api")]
    pub assistant: AssistantConfig,
}

/// The constraints a scene must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Top-level members that must be present and non-null.
    pub required_fields: Vec<String>,
    /// Element types that may appear in a scene.
    pub allowed_element_types: Vec<String>,
    /// Upper bound (inclusive) on the element count.
    pub max_elements_per_scene: usize,
    /// Lower bound (inclusive) on the scene duration in seconds.
    pub min_scene_duration: f64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            required_fields: ["id", "name", "duration", "elements"]
                .map(String::from)
                .to_vec(),
            allowed_element_types: ["character", "prop", "environment", "effect"]
                .map(String::from)
                .to_vec(),
            max_elements_per_scene: 50,
            min_scene_duration: 1.0,
        }
    }
}

impl ValidationRules {
    /// Return `true` when `kind` is in the allowed set.
    pub fn allows(&self, kind: &ElementKind) -> bool {
        self.allowed_element_types
            .iter()
            .any(|t| t == kind.as_str())
    }
}

/// Which recurring elements are compared across scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuityTracking {
    /// Master switch.
    pub enabled: bool,
    /// Compare `character` elements.
    pub track_characters: bool,
    /// Compare `prop` elements.
    pub track_props: bool,
    /// Compare `environment` elements.
    pub track_environments: bool,
    /// Compare every other element type.
    pub track_other: bool,
    /// Compare against prior scenes supplied by the caller.
    pub track_across_scenes: bool,
    /// Severity of continuity mismatches.
    pub severity: Severity,
}

impl Default for ContinuityTracking {
    fn default() -> Self {
        Self {
            enabled: true,
            track_characters: true,
            track_props: true,
            track_environments: true,
            track_other: false,
            track_across_scenes: true,
            severity: Severity::Warning,
        }
    }
}

impl ContinuityTracking {
    /// Return `true` when elements of `kind` take part in continuity checks.
    pub fn tracks(&self, kind: &ElementKind) -> bool {
        match kind {
            ElementKind::Character => self.track_characters,
            ElementKind::Prop => self.track_props,
            ElementKind::Environment => self.track_environments,
            _ => self.track_other,
        }
    }
}

/// How much a rendered report shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    /// Status and counts only.
    Low,
    /// Status, counts and every issue.
    Medium,
    /// Everything, including suggestions and scene data.
    #[default]
    High,
}

/// Report rendering and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Summary and export verbosity.
    pub detail_level: DetailLevel,
    /// Attach fix hints and reviewer suggestions.
    pub include_suggestions: bool,
    /// Default export format.
    pub format: ReportFormat,
    /// Hand exported reports to a [`crate::ReportStore`].
    pub save_to_cloud: bool,
    /// Key prefix inside the store.
    pub cloud_storage_path: Option<String>,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            detail_level: DetailLevel::High,
            include_suggestions: true,
            format: ReportFormat::Html,
            save_to_cloud: false,
            cloud_storage_path: None,
        }
    }
}

/// Batch execution and caching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedConfig {
    /// Memoise reports by input fingerprint.
    pub cache_validation_results: bool,
    /// Cache entry lifetime in hours.
    pub cache_ttl_hours: f64,
    /// Validate batches on a worker pool.
    pub parallel_processing: bool,
    /// Worker pool size.
    pub max_workers: usize,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            cache_validation_results: false,
            cache_ttl_hours: 24.0,
            parallel_processing: false,
            max_workers: 4,
        }
    }
}

/// Optional reviewer settings, passed through to the [`crate::SceneReviewer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Call the reviewer when one is installed.
    #[serde(alias = "use_gemini")]
    pub enabled: bool,
    /// Model identifier forwarded to the reviewer.
    pub model_name: String,
    /// Sampling temperature forwarded to the reviewer.
    pub temperature: f64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model_name: "gemini-pro".to_string(),
            temperature: 0.2,
        }
    }
}

impl ValidatorConfig {
    /// Parse a configuration from a JSON reader and check its ranges.
    ///
    /// Wrongly typed members are reported at their `$.section.field` path.
    pub fn from_reader<R: std::io::Read>(r: R) -> SceneResult<Self> {
        let value: Value = serde_json::from_reader(r).map_err(|e| {
            SchemaErrors::from(SchemaError::at(
                FieldPath::root(),
                format!("parse validator config JSON: {e}"),
            ))
        })?;
        let cfg = Self::from_value(value)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Decode a configuration from a parsed JSON value. Null members count as absent.
    pub fn from_value(value: Value) -> Result<Self, SchemaErrors> {
        let Value::Object(map) = value else {
            return Err(SchemaError::at(
                FieldPath::root(),
                "validator config must be a JSON object",
            )
            .into());
        };
        let map: Map<String, Value> = map
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k, without_nulls(v)))
            .collect();

        let mut errors = Vec::new();
        for (section, body) in &map {
            let Err(section_err) = decode_single(section, body.clone()) else {
                continue;
            };
            let path = FieldPath::root().field(section.as_str());
            let before = errors.len();
            if let Value::Object(fields) = body {
                for (key, v) in fields {
                    let member = Value::Object(Map::from_iter([(key.clone(), v.clone())]));
                    if let Err(e) = decode_single(section, member) {
                        errors.push(SchemaError::at(path.clone().field(key.as_str()), e.to_string()));
                    }
                }
            }
            if errors.len() == before {
                errors.push(SchemaError::at(path, section_err.to_string()));
            }
        }
        SchemaErrors::check(errors)?;

        serde_json::from_value(Value::Object(map)).map_err(|e| {
            SchemaErrors::from(SchemaError::at(FieldPath::root(), e.to_string()))
        })
    }

    /// Parse a configuration from a JSON string and check its ranges.
    pub fn from_json_str(s: &str) -> SceneResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a configuration from a JSON file on disk and check its ranges.
    pub fn from_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SceneError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        let cfg = Self::from_reader(BufReader::new(f))?;
        tracing::info!(path = %path.display(), "loaded validator config");
        Ok(cfg)
    }

    /// Check numeric ranges that the JSON shape cannot express.
    pub fn validate(&self) -> SceneResult<()> {
        let min = self.validation_rules.min_scene_duration;
        if !min.is_finite() || min < 0.0 {
            return Err(SceneError::config(
                "validation_rules.min_scene_duration must be finite and >= 0",
            ));
        }
        if self
            .validation_rules
            .required_fields
            .iter()
            .any(|f| f.trim().is_empty())
        {
            return Err(SceneError::config(
                "validation_rules.required_fields must not contain empty names",
            ));
        }
        if self.advanced.max_workers == 0 {
            return Err(SceneError::config("advanced.max_workers must be >= 1"));
        }
        let ttl = self.advanced.cache_ttl_hours;
        if !ttl.is_finite() || ttl < 0.0 {
            return Err(SceneError::config(
                "advanced.cache_ttl_hours must be finite and >= 0",
            ));
        }
        let t = self.assistant.temperature;
        if !t.is_finite() || !(0.0..=2.0).contains(&t) {
            return Err(SceneError::config(
                "assistant.temperature must be within [0, 2]",
            ));
        }
        if self.reporting.save_to_cloud
            && self
                .reporting
                .cloud_storage_path
                .as_deref()
                .is_some_and(|p| p.split('/').any(|part| part == ".."))
        {
            return Err(SceneError::config(
                "reporting.cloud_storage_path must not contain '..'",
            ));
        }
        Ok(())
    }
}

/// Decode a configuration holding only `section`.
fn decode_single(section: &str, body: Value) -> Result<ValidatorConfig, serde_json::Error> {
    serde_json::from_value(Value::Object(Map::from_iter([(section.to_string(), body)])))
}

fn without_nulls(v: Value) -> Value {
    match v {
        Value::Object(fields) => {
            Value::Object(fields.into_iter().filter(|(_, v)| !v.is_null()).collect())
        }
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/mod.rs"]
mod tests;
