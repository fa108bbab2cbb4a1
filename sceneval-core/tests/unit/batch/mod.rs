use super::*;
use crate::config::ValidatorConfig;
use crate::report::issue::IssueKind;
use crate::scene::model::Element;
use serde_json::json;

fn scene(id: &str, costume: &str) -> Scene {
    Scene {
        id: Some(id.to_string()),
        name: Some(format!("Scene {id}")),
        duration: Some(10.0),
        elements: Some(vec![
            Element::new("character")
                .with_id("character-001")
                .with_attr("costume", json!(costume)),
            Element::new("prop").with_id("prop-001"),
        ]),
        ..Scene::default()
    }
}

fn batch() -> Vec<Scene> {
    vec![
        scene("scene-001", "red cloak"),
        scene("scene-002", "red cloak"),
        scene("scene-003", "blue cloak"),
        scene("scene-004", "blue cloak"),
    ]
}

fn mismatches(report: &ValidationReport) -> usize {
    report.issues_of(IssueKind::ContinuityMismatch).count()
}

#[test]
fn each_scene_sees_only_its_predecessors() {
    let v = Validator::new(ValidatorConfig::default()).unwrap();
    let reports = v.validate_batch(&batch()).unwrap();
    let ids: Vec<_> = reports.iter().map(|r| r.scene_id.clone().unwrap()).collect();
    assert_eq!(ids, vec!["scene-001", "scene-002", "scene-003", "scene-004"]);
    let counts: Vec<_> = reports.iter().map(mismatches).collect();
    assert_eq!(counts, vec![0, 0, 1, 0]);
    assert!(reports.iter().all(|r| r.pass));
}

#[test]
fn parallel_batch_matches_sequential() {
    let sequential = Validator::new(ValidatorConfig::default())
        .unwrap()
        .validate_batch(&batch())
        .unwrap();

    let mut cfg = ValidatorConfig::default();
    cfg.advanced.parallel_processing = true;
    cfg.advanced.max_workers = 3;
    let parallel = Validator::new(cfg).unwrap().validate_batch(&batch()).unwrap();

    assert_eq!(sequential, parallel);
}

#[test]
fn empty_batch_yields_no_reports() {
    let v = Validator::new(ValidatorConfig::default()).unwrap();
    assert!(v.validate_batch(&[]).unwrap().is_empty());
}

#[test]
fn zero_workers_cannot_build_pool() {
    assert!(build_thread_pool(0).is_err());
    assert_eq!(build_thread_pool(2).unwrap().current_num_threads(), 2);
}
