use super::*;
use crate::report::issue::{Issue, IssueKind};
use crate::foundation::path::FieldPath;

fn scene(duration: f64) -> Scene {
    Scene {
        id: Some("scene-001".to_string()),
        duration: Some(duration),
        ..Scene::default()
    }
}

fn report() -> ValidationReport {
    ValidationReport::new(
        Some("scene-001".to_string()),
        vec![Issue::new(IssueKind::DurationTooShort, FieldPath::root().field("duration"), "short")],
        Vec::new(),
    )
}

#[test]
fn fingerprint_is_stable_for_equal_inputs() {
    let cfg = ValidatorConfig::default();
    let ctx = ContinuityContext::empty();
    let a = ReportCache::fingerprint(&scene(15.5), &ctx, &cfg);
    let b = ReportCache::fingerprint(&scene(15.5), &ctx, &cfg);
    assert!(a.is_some());
    assert_eq!(a, b);
}

#[test]
fn fingerprint_covers_scene_context_and_config() {
    let cfg = ValidatorConfig::default();
    let empty = ContinuityContext::empty();
    let base = ReportCache::fingerprint(&scene(15.5), &empty, &cfg);

    assert_ne!(base, ReportCache::fingerprint(&scene(16.0), &empty, &cfg));

    let prior = vec![scene(3.0)];
    assert_ne!(
        base,
        ReportCache::fingerprint(&scene(15.5), &ContinuityContext::new(&prior), &cfg)
    );

    let mut other = ValidatorConfig::default();
    other.validation_rules.min_scene_duration = 20.0;
    assert_ne!(base, ReportCache::fingerprint(&scene(15.5), &empty, &other));
}

#[test]
fn live_entries_are_returned() {
    let cache = ReportCache::new(Duration::from_secs(3600));
    let key = InputFingerprint { hi: 1, lo: 2 };
    assert!(cache.get(key).is_none());
    cache.insert(key, report());
    assert_eq!(cache.get(key), Some(report()));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.purge_expired(), 0);
}

#[test]
fn zero_ttl_expires_immediately() {
    let cache = ReportCache::new(Duration::ZERO);
    let key = InputFingerprint { hi: 7, lo: 7 };
    cache.insert(key, report());
    assert_eq!(cache.len(), 1);
    assert!(cache.get(key).is_none());
    assert!(cache.is_empty());

    cache.insert(key, report());
    assert_eq!(cache.purge_expired(), 1);
    assert!(cache.is_empty());
}

#[test]
fn insert_evicts_expired_entries_under_other_keys() {
    let cache = ReportCache::new(Duration::ZERO);
    for i in 0..5 {
        cache.insert(InputFingerprint { hi: i, lo: i }, report());
        assert_eq!(cache.len(), 1);
    }

    let cache = ReportCache::new(Duration::from_secs(3600));
    for i in 0..5 {
        cache.insert(InputFingerprint { hi: i, lo: i }, report());
    }
    assert_eq!(cache.len(), 5);
}
