//! Optional advisory reviewer.
//!
//! A reviewer (typically a generative-text service) reads a scene and answers with free-form
//! advice. The deterministic rules never depend on it: a missing or failing reviewer only removes
//! suggestions from the report and adds a [`crate::IssueKind::ReviewUnavailable`] warning.

use crate::config::AssistantConfig;
use crate::scene::model::Scene;

/// Failure reported by a [`SceneReviewer`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    /// The service is not configured or not reachable.
    #[error("reviewer unavailable: {0}")]
    Unavailable(String),
    /// The call was made and failed.
    #[error("review failed: {0}")]
    Failed(String),
}

/// Input handed to a [`SceneReviewer`].
#[derive(Debug, Clone)]
pub struct ReviewRequest<'a> {
    /// Scene under review.
    pub scene: &'a Scene,
    /// Ready-made prompt describing the task.
    pub prompt: String,
    /// Model identifier from [`AssistantConfig::model_name`].
    pub model_name: &'a str,
    /// Sampling temperature from [`AssistantConfig::temperature`].
    pub temperature: f64,
}

/// Pluggable advisory capability.
pub trait SceneReviewer: Send + Sync {
    /// Return free-form advice; bullet and numbered lines become suggestions.
    fn review(&self, request: &ReviewRequest<'_>) -> Result<String, ReviewError>;
}

impl<'a> ReviewRequest<'a> {
    /// Build a request for `scene` with the configured model settings.
    pub fn new(scene: &'a Scene, cfg: &'a AssistantConfig) -> Self {
        Self {
            scene,
            prompt: build_prompt(scene),
            model_name: &cfg.model_name,
            temperature: cfg.temperature,
        }
    }
}

/// Prompt asking for actionable production advice on `scene`.
pub fn build_prompt(scene: &Scene) -> String {
    let scene_json = serde_json::to_string_pretty(scene).unwrap_or_else(|e| {
        tracing::warn!(scene = %scene.label(), error = %e, "scene not serializable; prompt carries no scene data");
        "<unserializable scene>".to_string()
    });
    format!(
        "You are an expert media production consultant specializing in scene structure and \
         continuity.\n\
         Analyze the scene below and suggest improvements, focusing on:\n\
         1. Structural issues that could impact production\n\
         2. Potential continuity problems\n\
         3. Efficiency improvements\n\
         4. Best practices for this type of scene\n\
         Answer with a bulleted list of specific, actionable suggestions.\n\n\
         Scene data:\n```json\n{scene_json}\n```\n"
    )
}

/// Extract suggestions from bullet (`-`, `*`, `•`) and numbered (`1.`, `2)`) lines.
pub fn parse_suggestions(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        let rest = if let Some(r) = line
            .strip_prefix('-')
            .or_else(|| line.strip_prefix('*'))
            .or_else(|| line.strip_prefix('•'))
        {
            Some(r)
        } else {
            strip_number_marker(line)
        };
        if let Some(s) = rest.map(str::trim)
            && !s.is_empty()
            && !s.chars().all(|c| matches!(c, '-' | '*' | '_'))
        {
            out.push(s.to_string());
        }
    }
    out
}

fn strip_number_marker(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))
}

#[cfg(test)]
#[path = "../../tests/unit/review/mod.rs"]
mod tests;
