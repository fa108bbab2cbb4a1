use crate::config::ValidationRules;
use crate::foundation::path::FieldPath;
use crate::report::issue::{Issue, IssueKind};
use crate::scene::model::{Scene, TransitionSpec};
use std::collections::BTreeMap;

/// Run every deterministic rule and append the violations to `issues`.
///
/// Checks never short-circuit; a scene that breaks several rules reports all of them.
pub(crate) fn check_rules(scene: &Scene, rules: &ValidationRules, issues: &mut Vec<Issue>) {
    check_required_fields(scene, rules, issues);
    check_element_types(scene, rules, issues);
    check_element_count(scene, rules, issues);
    check_duration(scene, rules, issues);
    check_timing_windows(scene, issues);
    check_names_and_ids(scene, issues);
    check_transitions(scene, issues);
    check_metadata(scene, issues);
}

fn check_required_fields(scene: &Scene, rules: &ValidationRules, issues: &mut Vec<Issue>) {
    for field in &rules.required_fields {
        if !scene.has_field(field) {
            issues.push(
                Issue::new(
                    IssueKind::MissingField,
                    FieldPath::root().field(field.as_str()),
                    format!("required field '{field}' is missing or null"),
                )
                .suggest(format!("add a non-null '{field}' member to the scene")),
            );
        }
    }
}

fn check_element_types(scene: &Scene, rules: &ValidationRules, issues: &mut Vec<Issue>) {
    for (i, el) in scene.elements().iter().enumerate() {
        if rules.allows(&el.kind) {
            continue;
        }
        issues.push(
            Issue::new(
                IssueKind::DisallowedElementType,
                FieldPath::root().field("elements").index(i).field("type"),
                format!(
                    "element '{}' has type '{}', which is not allowed",
                    el.label(i),
                    el.kind
                ),
            )
            .for_element(el.id.as_deref())
            .suggest(format!(
                "use one of: {}",
                rules.allowed_element_types.join(", ")
            )),
        );
    }
}

fn check_element_count(scene: &Scene, rules: &ValidationRules, issues: &mut Vec<Issue>) {
    let count = scene.elements().len();
    if count > rules.max_elements_per_scene {
        issues.push(
            Issue::new(
                IssueKind::TooManyElements,
                FieldPath::root().field("elements"),
                format!(
                    "scene has {count} elements, more than the maximum of {}",
                    rules.max_elements_per_scene
                ),
            )
            .suggest("split the scene or merge minor elements"),
        );
    }
}

fn check_duration(scene: &Scene, rules: &ValidationRules, issues: &mut Vec<Issue>) {
    let Some(duration) = scene.duration else {
        return;
    };
    let path = FieldPath::root().field("duration");
    if !duration.is_finite() || duration <= 0.0 {
        issues.push(Issue::new(
            IssueKind::InvalidDuration,
            path.clone(),
            format!("scene duration {duration} must be a finite number greater than 0"),
        ));
    }
    if duration.is_finite() && duration < rules.min_scene_duration {
        issues.push(
            Issue::new(
                IssueKind::DurationTooShort,
                path,
                format!(
                    "scene duration {duration}s is shorter than the minimum of {}s",
                    rules.min_scene_duration
                ),
            )
            .suggest(format!(
                "extend the scene to at least {}s",
                rules.min_scene_duration
            )),
        );
    }
}

fn check_timing_windows(scene: &Scene, issues: &mut Vec<Issue>) {
    let duration = scene.usable_duration();
    for (i, el) in scene.elements().iter().enumerate() {
        if !el.has_timing() {
            continue;
        }
        if let Err(why) = check_window(el.start_time, el.end_time, duration) {
            issues.push(
                Issue::new(
                    IssueKind::InvalidTimingWindow,
                    FieldPath::root().field("elements").index(i),
                    format!("element '{}': {why}", el.label(i)),
                )
                .for_element(el.id.as_deref())
                .suggest("keep 0 <= start_time <= end_time <= scene duration"),
            );
        }
    }

    let Some(camera) = &scene.camera else {
        return;
    };
    for (i, m) in camera.movements.iter().enumerate() {
        if m.start_time.is_none() && m.effective_end().is_none() {
            continue;
        }
        if let Err(why) = check_window(m.start_time, m.effective_end(), duration) {
            issues.push(Issue::new(
                IssueKind::InvalidTimingWindow,
                FieldPath::root()
                    .field("camera")
                    .field("movements")
                    .index(i),
                format!("camera movement {i}: {why}"),
            ));
        }
    }
}

/// Check `0 <= start <= end <= duration`.
///
/// A missing start is 0, a missing end is the scene duration. Without a usable duration the upper
/// bound is not checked.
pub(crate) fn check_window(
    start: Option<f64>,
    end: Option<f64>,
    duration: Option<f64>,
) -> Result<(), String> {
    let s = start.unwrap_or(0.0);
    if !s.is_finite() {
        return Err(format!("start_time {s} is not finite"));
    }
    if s < 0.0 {
        return Err(format!("start_time {s} is negative"));
    }
    let Some(e) = end.or(duration) else {
        return Ok(());
    };
    if !e.is_finite() {
        return Err(format!("end_time {e} is not finite"));
    }
    if s > e {
        return Err(format!("start_time {s} is after end_time {e}"));
    }
    if let Some(d) = duration
        && e > d
    {
        return Err(format!("end_time {e} exceeds scene duration {d}"));
    }
    Ok(())
}

fn check_names_and_ids(scene: &Scene, issues: &mut Vec<Issue>) {
    if let Some(name) = &scene.name
        && name.trim().is_empty()
    {
        issues.push(Issue::new(
            IssueKind::EmptyName,
            FieldPath::root().field("name"),
            "scene name is blank",
        ));
    }

    let mut seen = BTreeMap::<&str, usize>::new();
    for (i, el) in scene.elements().iter().enumerate() {
        match el.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => *seen.entry(id).or_default() += 1,
            _ => issues.push(
                Issue::new(
                    IssueKind::MissingElementId,
                    FieldPath::root().field("elements").index(i),
                    format!("element at index {i} (type '{}') has no id", el.kind),
                )
                .suggest("give every element a stable id so it can be tracked across scenes"),
            ),
        }
    }
    for (id, count) in seen {
        if count > 1 {
            issues.push(
                Issue::new(
                    IssueKind::DuplicateElementId,
                    FieldPath::root().field("elements"),
                    format!("element id '{id}' is used by {count} elements"),
                )
                .for_element(Some(id)),
            );
        }
    }
}

fn check_transitions(scene: &Scene, issues: &mut Vec<Issue>) {
    let Some(t) = &scene.transitions else {
        return;
    };
    let duration = scene.usable_duration();
    let path = FieldPath::root().field("transitions");
    let mut bad = false;
    for (key, spec) in [("in", &t.enter), ("out", &t.exit)] {
        if let Some(spec) = spec
            && let Err(why) = check_transition(spec, duration)
        {
            bad = true;
            issues.push(Issue::new(
                IssueKind::InvalidTransition,
                path.clone().field(key),
                format!("'{}' transition {why}", spec.kind),
            ));
        }
    }
    if bad {
        return;
    }
    let lengths = (
        t.enter.as_ref().and_then(|s| s.duration),
        t.exit.as_ref().and_then(|s| s.duration),
    );
    if let (Some(a), Some(b)) = lengths
        && let Some(d) = duration
        && a + b > d
    {
        issues.push(
            Issue::new(
                IssueKind::InvalidTransition,
                path,
                format!("in and out transitions ({a}s + {b}s) overlap in a {d}s scene"),
            )
            .suggest("shorten one of the transitions"),
        );
    }
}

fn check_transition(spec: &TransitionSpec, duration: Option<f64>) -> Result<(), String> {
    let Some(len) = spec.duration else {
        return Ok(());
    };
    if !len.is_finite() || len < 0.0 {
        return Err(format!("duration {len} must be finite and >= 0"));
    }
    if let Some(d) = duration
        && len > d
    {
        return Err(format!("duration {len}s is longer than the scene ({d}s)"));
    }
    Ok(())
}

fn check_metadata(scene: &Scene, issues: &mut Vec<Issue>) {
    let Some(meta) = &scene.metadata else {
        return;
    };
    for (key, value) in [("created_at", &meta.created_at), ("updated_at", &meta.updated_at)] {
        if let Some(ts) = value
            && chrono::DateTime::parse_from_rfc3339(ts).is_err()
        {
            issues.push(
                Issue::new(
                    IssueKind::InvalidTimestamp,
                    FieldPath::root().field("metadata").field(key),
                    format!("'{ts}' is not an RFC 3339 timestamp"),
                )
                .suggest("use a timestamp like 2025-05-21T10:00:00Z"),
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/validate/rules.rs"]
mod tests;
