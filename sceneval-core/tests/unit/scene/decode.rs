use super::*;
use crate::scene::model::ElementKind;
use serde_json::json;

#[test]
fn decodes_minimal_scene() {
    let scene = Scene::from_value(json!({
        "id": "scene-001",
        "name": "Opening",
        "duration": 12,
        "elements": [{"id": "c1", "type": "character"}]
    }))
    .unwrap();
    assert_eq!(scene.duration, Some(12.0));
    assert_eq!(scene.elements().len(), 1);
    assert_eq!(scene.elements()[0].kind, ElementKind::Character);
}

#[test]
fn non_object_document_is_rejected_at_root() {
    let err = Scene::from_value(json!([1, 2, 3])).unwrap_err();
    assert_eq!(err.errors.len(), 1);
    assert!(err.errors[0].path.is_root());
}

#[test]
fn all_structural_failures_are_collected_with_paths() {
    let err = Scene::from_value(json!({
        "id": "scene-001",
        "duration": "fifteen",
        "elements": [
            {"id": "ok", "type": "prop"},
            {"id": "no-type"},
            "not an object",
            {"id": "bad-start", "type": "prop", "start_time": "soon"}
        ]
    }))
    .unwrap_err();
    assert!(err.contains_path("$.duration"));
    assert!(err.contains_path("$.elements[1].type"));
    assert!(err.contains_path("$.elements[2]"));
    assert!(err.contains_path("$.elements[3].start_time"));
    assert!(!err.contains_path("$.elements[0]"));
    assert_eq!(err.errors.len(), 4);
}

#[test]
fn elements_must_be_an_array() {
    let err = Scene::from_value(json!({"elements": {"a": 1}})).unwrap_err();
    assert!(err.contains_path("$.elements"));
}

#[test]
fn null_members_count_as_absent() {
    let scene = Scene::from_value(json!({
        "id": null,
        "duration": null,
        "location": null,
        "weather": "rain"
    }))
    .unwrap();
    assert!(!scene.has_field("id"));
    assert!(!scene.has_field("duration"));
    assert!(!scene.has_field("location"));
    assert!(scene.has_field("weather"));
}

#[test]
fn invalid_json_text_is_a_schema_error() {
    let err = Scene::from_json_str("{ \"id\": ").unwrap_err();
    let schema = err.schema_errors().unwrap();
    assert!(schema.errors[0].message.contains("parse scene JSON"));
}

#[test]
fn missing_file_is_not_a_schema_error() {
    let err = Scene::from_path("tests/data/does-not-exist.json").unwrap_err();
    assert!(err.schema_errors().is_none());
    assert!(err.to_string().contains("does-not-exist.json"));
}

#[test]
fn element_member_errors_name_the_field() {
    let err = Scene::from_value(json!({
        "elements": [
            {"id": "x", "type": "prop", "start_time": "soon", "position": "left"},
            {"id": 7, "type": "prop"}
        ]
    }))
    .unwrap_err();
    let paths: Vec<String> = err.errors.iter().map(|e| e.path.to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "$.elements[0].position",
            "$.elements[0].start_time",
            "$.elements[1].id"
        ]
    );
    assert!(err.errors[1].to_string().starts_with("$.elements[0].start_time: invalid type"));
}

#[test]
fn element_attributes_keep_unknown_members() {
    let scene = Scene::from_value(json!({
        "elements": [{
            "id": "c1",
            "type": "character",
            "position": [1, 2],
            "costume": "red cloak",
            "mood": null
        }]
    }))
    .unwrap();
    let el = &scene.elements()[0];
    assert_eq!(el.position.map(|p| (p.x, p.y, p.z)), Some((1.0, 2.0, 0.0)));
    assert_eq!(el.attributes.get("costume"), Some(&json!("red cloak")));
    assert!(!el.attributes.contains_key("mood"));
}
