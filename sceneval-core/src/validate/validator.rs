use crate::batch::cache::ReportCache;
use crate::config::{ValidationRules, ValidatorConfig};
use crate::foundation::error::SceneResult;
use crate::foundation::path::FieldPath;
use crate::report::issue::{Issue, IssueKind};
use crate::report::validation::ValidationReport;
use crate::review::{ReviewRequest, SceneReviewer, parse_suggestions};
use crate::scene::model::Scene;
use crate::validate::continuity::{ContinuityContext, check_continuity};
use crate::validate::rules::check_rules;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Check `scene` against `rules` and return every violation.
///
/// This is the deterministic core: no continuity context, no reviewer, no cache.
pub fn validate(scene: &Scene, rules: &ValidationRules) -> ValidationReport {
    let mut issues = Vec::new();
    check_rules(scene, rules, &mut issues);
    ValidationReport::new(scene.id.clone(), issues, Vec::new())
}

/// Configured validator.
///
/// Holds an immutable [`ValidatorConfig`], an optional reviewer and, when
/// `advanced.cache_validation_results` is set, a report cache. Validation never mutates its inputs;
/// the same scene, context and configuration always produce the same report.
#[derive(Clone)]
pub struct Validator {
    config: Arc<ValidatorConfig>,
    reviewer: Option<Arc<dyn SceneReviewer>>,
    cache: Option<Arc<ReportCache>>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("config", &self.config)
            .field("reviewer", &self.reviewer.is_some())
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

impl Validator {
    /// Create a validator after checking the configuration ranges.
    pub fn new(config: ValidatorConfig) -> SceneResult<Self> {
        config.validate()?;
        let cache = config.advanced.cache_validation_results.then(|| {
            let ttl = Duration::try_from_secs_f64(config.advanced.cache_ttl_hours * 3600.0)
                .unwrap_or(Duration::MAX);
            Arc::new(ReportCache::new(ttl))
        });
        Ok(Self {
            config: Arc::new(config),
            reviewer: None,
            cache,
        })
    }

    /// Load the configuration from a JSON file and create a validator.
    pub fn from_config_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        Self::new(ValidatorConfig::from_path(path)?)
    }

    /// Install a reviewer; it is consulted only when `assistant.enabled` is set.
    pub fn with_reviewer(mut self, reviewer: Arc<dyn SceneReviewer>) -> Self {
        self.reviewer = Some(reviewer);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Report cache, when caching is enabled.
    pub fn cache(&self) -> Option<&ReportCache> {
        self.cache.as_deref()
    }

    /// Validate one scene without prior-scene context.
    pub fn validate(&self, scene: &Scene) -> ValidationReport {
        self.validate_in_context(scene, &ContinuityContext::empty())
    }

    /// Validate one scene, comparing recurring elements against `ctx`.
    #[tracing::instrument(skip_all, fields(scene = %scene.label(), prior = ctx.prior_scenes().len()))]
    pub fn validate_in_context(
        &self,
        scene: &Scene,
        ctx: &ContinuityContext<'_>,
    ) -> ValidationReport {
        let key = self
            .cache
            .as_ref()
            .and_then(|_| ReportCache::fingerprint(scene, ctx, &self.config));
        if let (Some(cache), Some(key)) = (&self.cache, key)
            && let Some(hit) = cache.get(key)
        {
            tracing::debug!("validation cache hit");
            return hit;
        }

        let report = self.run(scene, ctx);

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.insert(key, report.clone());
        }
        report
    }

    /// Decode a JSON value and validate it.
    pub fn validate_value(&self, value: Value) -> SceneResult<ValidationReport> {
        let scene = Scene::from_value(value)?;
        Ok(self.validate(&scene))
    }

    /// Read a scene file and validate it.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> SceneResult<ValidationReport> {
        let scene = Scene::from_path(path)?;
        Ok(self.validate(&scene))
    }

    fn run(&self, scene: &Scene, ctx: &ContinuityContext<'_>) -> ValidationReport {
        let cfg = &*self.config;
        let mut issues = Vec::new();
        check_rules(scene, &cfg.validation_rules, &mut issues);
        check_continuity(scene, ctx, &cfg.continuity_tracking, &mut issues);

        let suggestions = self.consult_reviewer(scene, &mut issues);

        if !cfg.reporting.include_suggestions {
            for issue in &mut issues {
                issue.suggestion = None;
            }
        }
        for issue in &issues {
            tracing::debug!(kind = %issue.kind, severity = %issue.severity, path = %issue.path, "{}", issue.message);
        }

        let report = ValidationReport::new(scene.id.clone(), issues, suggestions)
            .with_detail_level(cfg.reporting.detail_level);
        tracing::info!(
            pass = report.pass,
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "scene validated"
        );
        report
    }

    fn consult_reviewer(&self, scene: &Scene, issues: &mut Vec<Issue>) -> Vec<String> {
        let cfg = &self.config.assistant;
        if !cfg.enabled {
            return Vec::new();
        }
        let Some(reviewer) = &self.reviewer else {
            tracing::warn!("assistant enabled but no reviewer installed");
            issues.push(Issue::new(
                IssueKind::ReviewUnavailable,
                FieldPath::root(),
                "assisted review is enabled but no reviewer is installed",
            ));
            return Vec::new();
        };
        match reviewer.review(&ReviewRequest::new(scene, cfg)) {
            Ok(text) => {
                if self.config.reporting.include_suggestions {
                    parse_suggestions(&text)
                } else {
                    Vec::new()
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "assisted review failed");
                issues.push(Issue::new(
                    IssueKind::ReviewUnavailable,
                    FieldPath::root(),
                    format!("could not perform assisted review: {e}"),
                ));
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/validate/validator.rs"]
mod tests;
