use super::*;
use crate::config::DetailLevel;
use crate::foundation::error::SceneError;
use crate::review::ReviewError;
use crate::scene::model::Element;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

fn forest() -> Scene {
    Scene {
        id: Some("scene-001".to_string()),
        name: Some("Forest Clearing".to_string()),
        duration: Some(15.5),
        elements: Some(vec![
            Element::new("character").with_id("character-001"),
            Element::new("prop").with_id("prop-001"),
            Element::new("environment").with_id("environment-001"),
            Element::new("effect")
                .with_id("effect-001")
                .with_window(8.0, 15.5),
        ]),
        ..Scene::default()
    }
}

struct Scripted {
    answer: Result<String, ReviewError>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(answer: Result<&str, ReviewError>) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.map(str::to_string),
            calls: AtomicUsize::new(0),
        })
    }
}

impl SceneReviewer for Scripted {
    fn review(&self, request: &ReviewRequest<'_>) -> Result<String, ReviewError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(request.prompt.contains("Scene data"));
        self.answer.clone()
    }
}

fn assisted() -> ValidatorConfig {
    let mut cfg = ValidatorConfig::default();
    cfg.assistant.enabled = true;
    cfg
}

#[test]
fn pure_validate_passes_clean_scene() {
    let report = validate(&forest(), &ValidationRules::default());
    assert!(report.pass);
    assert!(report.issues.is_empty());
    assert_eq!(report.scene_id.as_deref(), Some("scene-001"));
}

#[test]
fn validator_matches_pure_core_without_extras() {
    let v = Validator::new(ValidatorConfig::default()).unwrap();
    let scene = forest();
    assert_eq!(
        v.validate(&scene).issues,
        validate(&scene, &ValidationRules::default()).issues
    );
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = ValidatorConfig::default();
    cfg.advanced.max_workers = 0;
    assert!(Validator::new(cfg).is_err());
}

#[test]
fn validation_is_idempotent() {
    let v = Validator::new(ValidatorConfig::default()).unwrap();
    let mut scene = forest();
    scene.duration = Some(0.5);
    assert_eq!(v.validate(&scene), v.validate(&scene));
}

#[test]
fn reviewer_is_ignored_when_assistant_disabled() {
    let reviewer = Scripted::new(Ok("- add ambient audio"));
    let v = Validator::new(ValidatorConfig::default())
        .unwrap()
        .with_reviewer(reviewer.clone());
    let report = v.validate(&forest());
    assert!(report.suggestions.is_empty());
    assert_eq!(reviewer.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn reviewer_answer_becomes_suggestions() {
    let reviewer = Scripted::new(Ok(
        "Here is my advice:\n- add ambient audio\n2. stagger the effect start\n",
    ));
    let v = Validator::new(assisted()).unwrap().with_reviewer(reviewer);
    let report = v.validate(&forest());
    assert!(report.pass);
    assert!(report.issues.is_empty());
    assert_eq!(
        report.suggestions,
        vec!["add ambient audio", "stagger the effect start"]
    );
}

#[test]
fn missing_or_failing_reviewer_only_warns() {
    let v = Validator::new(assisted()).unwrap();
    let report = v.validate(&forest());
    assert!(report.pass);
    assert_eq!(report.issues_of(IssueKind::ReviewUnavailable).count(), 1);

    let v = v.with_reviewer(Scripted::new(Err(ReviewError::Unavailable(
        "no API key".to_string(),
    ))));
    let report = v.validate(&forest());
    assert!(report.pass);
    assert!(report.suggestions.is_empty());
    let warning = report.issues_of(IssueKind::ReviewUnavailable).next().unwrap();
    assert!(warning.message.contains("no API key"));
}

#[test]
fn reviewer_never_changes_rule_outcome() {
    let mut scene = forest();
    scene.duration = Some(0.5);
    let plain = Validator::new(ValidatorConfig::default()).unwrap().validate(&scene);
    let assisted = Validator::new(assisted())
        .unwrap()
        .with_reviewer(Scripted::new(Ok("- lengthen the scene")))
        .validate(&scene);
    assert_eq!(plain.pass, assisted.pass);
    assert_eq!(plain.issues, assisted.issues);
}

#[test]
fn suggestions_are_stripped_when_disabled() {
    let mut cfg = assisted();
    cfg.reporting.include_suggestions = false;
    let v = Validator::new(cfg)
        .unwrap()
        .with_reviewer(Scripted::new(Ok("- add ambient audio")));
    let mut scene = forest();
    scene.id = None;
    let report = v.validate(&scene);
    assert!(report.suggestions.is_empty());
    assert!(!report.issues.is_empty());
    assert!(report.issues.iter().all(|i| i.suggestion.is_none()));
}

#[test]
fn detail_level_is_carried_to_the_report() {
    let mut cfg = ValidatorConfig::default();
    cfg.reporting.detail_level = DetailLevel::Low;
    let report = Validator::new(cfg).unwrap().validate(&forest());
    assert_eq!(report.detail_level, DetailLevel::Low);
}

#[test]
fn cache_serves_repeated_inputs() {
    let mut cfg = assisted();
    cfg.advanced.cache_validation_results = true;
    let reviewer = Scripted::new(Ok("- add ambient audio"));
    let v = Validator::new(cfg).unwrap().with_reviewer(reviewer.clone());

    let first = v.validate(&forest());
    let second = v.validate(&forest());
    assert_eq!(first, second);
    assert_eq!(reviewer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(v.cache().map(|c| c.len()), Some(1));

    let mut changed = forest();
    changed.duration = Some(20.0);
    v.validate(&changed);
    assert_eq!(reviewer.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn context_enables_continuity_checks() {
    let v = Validator::new(ValidatorConfig::default()).unwrap();
    let prior = vec![forest()];
    let mut scene = forest();
    scene.id = Some("scene-002".to_string());
    if let Some(elements) = scene.elements.as_mut() {
        elements[1].kind = "character".into();
    }
    let report = v.validate_in_context(&scene, &ContinuityContext::new(&prior));
    assert!(report.pass);
    let m: Vec<_> = report.issues_of(IssueKind::ContinuityMismatch).collect();
    assert_eq!(m.len(), 1);
    assert_eq!(m[0].element_id.as_deref(), Some("prop-001"));
}

#[test]
fn malformed_value_is_a_schema_error() {
    let v = Validator::new(ValidatorConfig::default()).unwrap();
    let err = v
        .validate_value(json!({"id": "s", "duration": "long", "elements": []}))
        .unwrap_err();
    match err {
        SceneError::Schema(errs) => assert!(errs.contains_path("$.duration")),
        other => panic!("unexpected error: {other}"),
    }
}
