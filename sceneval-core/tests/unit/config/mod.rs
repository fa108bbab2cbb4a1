use super::*;

#[test]
fn defaults_match_documented_rule_set() {
    let cfg = ValidatorConfig::default();
    assert_eq!(
        cfg.validation_rules.required_fields,
        vec!["id", "name", "duration", "elements"]
    );
    assert_eq!(cfg.validation_rules.max_elements_per_scene, 50);
    assert_eq!(cfg.validation_rules.min_scene_duration, 1.0);
    assert!(cfg.continuity_tracking.enabled);
    assert_eq!(cfg.continuity_tracking.severity, Severity::Warning);
    assert_eq!(cfg.reporting.detail_level, DetailLevel::High);
    assert_eq!(cfg.reporting.format, ReportFormat::Html);
    assert_eq!(cfg.advanced.max_workers, 4);
    assert!(!cfg.assistant.enabled);
    cfg.validate().unwrap();
}

#[test]
fn partial_document_keeps_defaults_for_missing_fields() {
    let cfg = ValidatorConfig::from_json_str(
        r#"{ "validation_rules": { "min_scene_duration": 20.0 },
             "reporting": { "detail_level": "low", "format": "json" } }"#,
    )
    .unwrap();
    assert_eq!(cfg.validation_rules.min_scene_duration, 20.0);
    assert_eq!(cfg.validation_rules.max_elements_per_scene, 50);
    assert_eq!(cfg.reporting.detail_level, DetailLevel::Low);
    assert_eq!(cfg.reporting.format, ReportFormat::Json);
    assert!(cfg.reporting.include_suggestions);
}

#[test]
fn gemini_section_is_accepted_as_assistant_alias() {
    let cfg = ValidatorConfig::from_json_str(
        r#"{ "gemini_api": { "use_gemini": true, "model_name": "gemini-pro", "temperature": 0.4 } }"#,
    )
    .unwrap();
    assert!(cfg.assistant.enabled);
    assert_eq!(cfg.assistant.temperature, 0.4);
}

#[test]
fn wrong_shape_is_a_schema_error() {
    let err = ValidatorConfig::from_json_str(
        r#"{ "validation_rules": { "max_elements_per_scene": "many" } }"#,
    )
    .unwrap_err();
    let schema = err.schema_errors().unwrap();
    assert!(schema.contains_path("$.validation_rules.max_elements_per_scene"));
    assert_eq!(schema.errors.len(), 1);
}

#[test]
fn every_wrong_member_is_reported_with_its_path() {
    let err = ValidatorConfig::from_json_str(
        r#"{
            "validation_rules": { "max_elements_per_scene": "ten", "min_scene_duration": 2.0 },
            "reporting": { "detail_level": "extreme", "format": "json" },
            "gemini_api": { "use_gemini": "yes" },
            "advanced": 5
        }"#,
    )
    .unwrap_err();
    let schema = err.schema_errors().unwrap();
    let mut paths: Vec<String> = schema.errors.iter().map(|e| e.path.to_string()).collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            "$.advanced",
            "$.gemini_api.use_gemini",
            "$.reporting.detail_level",
            "$.validation_rules.max_elements_per_scene",
        ]
    );
}

#[test]
fn null_members_fall_back_to_defaults() {
    let cfg = ValidatorConfig::from_json_str(
        r#"{ "advanced": { "max_workers": null }, "reporting": null }"#,
    )
    .unwrap();
    assert_eq!(cfg.advanced.max_workers, 4);
    assert_eq!(cfg.reporting, ReportingConfig::default());
}

#[test]
fn out_of_range_values_are_config_errors() {
    for doc in [
        r#"{ "advanced": { "max_workers": 0 } }"#,
        r#"{ "advanced": { "cache_ttl_hours": -1 } }"#,
        r#"{ "validation_rules": { "min_scene_duration": -0.5 } }"#,
        r#"{ "validation_rules": { "required_fields": ["id", " "] } }"#,
        r#"{ "assistant": { "temperature": 3.0 } }"#,
        r#"{ "reporting": { "save_to_cloud": true, "cloud_storage_path": "a/../b" } }"#,
    ] {
        let err = ValidatorConfig::from_json_str(doc).unwrap_err();
        assert!(
            matches!(err, SceneError::Config(_)),
            "expected config error for {doc}, got {err}"
        );
    }
}

#[test]
fn continuity_tracking_selects_kinds() {
    let mut c = ContinuityTracking::default();
    assert!(c.tracks(&ElementKind::Character));
    assert!(!c.tracks(&ElementKind::Audio));
    c.track_props = false;
    c.track_other = true;
    assert!(!c.tracks(&ElementKind::Prop));
    assert!(c.tracks(&ElementKind::Other("hologram".to_string())));
}

#[test]
fn allowed_types_compare_by_wire_name() {
    let rules = ValidationRules::default();
    assert!(rules.allows(&ElementKind::Effect));
    assert!(!rules.allows(&ElementKind::Audio));
}
