use crate::config::ContinuityTracking;
use crate::foundation::path::FieldPath;
use crate::report::issue::{Issue, IssueKind};
use crate::scene::model::{Element, Scene};

/// Attributes that legitimately change from scene to scene and are never compared.
const PER_SCENE_ATTRIBUTES: &[&str] = &[
    "action",
    "actions",
    "animation",
    "dialogue",
    "duration",
    "movement",
    "rotation",
    "scale",
];

/// Scenes that precede the one being validated, oldest first.
///
/// The validator keeps no state between calls; callers that want cross-scene checks pass the
/// earlier scenes explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuityContext<'a> {
    prior: &'a [Scene],
}

impl<'a> ContinuityContext<'a> {
    /// Context over `prior`, oldest first.
    pub fn new(prior: &'a [Scene]) -> Self {
        Self { prior }
    }

    /// Context with no prior scenes.
    pub fn empty() -> Self {
        Self { prior: &[] }
    }

    /// Prior scenes, oldest first.
    pub fn prior_scenes(&self) -> &'a [Scene] {
        self.prior
    }

    /// Return `true` when there is nothing to compare against.
    pub fn is_empty(&self) -> bool {
        self.prior.is_empty()
    }

    /// Most recent prior occurrence of element `id`, with the index of its scene.
    fn last_occurrence(&self, id: &str) -> Option<(usize, &'a Scene, &'a Element)> {
        self.prior.iter().enumerate().rev().find_map(|(si, scene)| {
            scene
                .elements()
                .iter()
                .find(|el| el.id.as_deref() == Some(id))
                .map(|el| (si, scene, el))
        })
    }
}

/// Compare tracked elements of `scene` against their most recent prior occurrence.
pub(crate) fn check_continuity(
    scene: &Scene,
    ctx: &ContinuityContext<'_>,
    cfg: &ContinuityTracking,
    issues: &mut Vec<Issue>,
) {
    if !cfg.enabled || !cfg.track_across_scenes || ctx.is_empty() {
        return;
    }
    for (i, el) in scene.elements().iter().enumerate() {
        let Some(id) = el.id.as_deref().filter(|id| !id.trim().is_empty()) else {
            continue;
        };
        if !cfg.tracks(&el.kind) {
            continue;
        }
        let Some((scene_idx, prev_scene, prev)) = ctx.last_occurrence(id) else {
            continue;
        };
        let where_ = prior_label(prev_scene, scene_idx);
        let base = FieldPath::root().field("elements").index(i);

        let mut push = |field: &str, before: String, after: String| {
            issues.push(
                Issue::new(
                    IssueKind::ContinuityMismatch,
                    base.clone().field(field),
                    format!(
                        "element '{id}' {field} changed from {before} in {where_} to {after}"
                    ),
                )
                .with_severity(cfg.severity)
                .for_element(Some(id))
                .suggest(format!("restore {field} to {before} or document the change")),
            );
        };

        if prev.kind != el.kind {
            push("type", quoted(prev.kind.as_str()), quoted(el.kind.as_str()));
        }
        if let (Some(before), Some(after)) = (&prev.name, &el.name)
            && before != after
        {
            push("name", quoted(before), quoted(after));
        }
        for (key, after) in &el.attributes {
            if PER_SCENE_ATTRIBUTES.contains(&key.as_str()) {
                continue;
            }
            if let Some(before) = prev.attributes.get(key)
                && before != after
            {
                push(key.as_str(), before.to_string(), after.to_string());
            }
        }
    }
}

fn prior_label(scene: &Scene, index: usize) -> String {
    match &scene.id {
        Some(id) => format!("scene '{id}'"),
        None => format!("prior scene #{index}"),
    }
}

fn quoted(s: &str) -> String {
    format!("\"{s}\"")
}

#[cfg(test)]
#[path = "../../tests/unit/validate/continuity.rs"]
mod tests;
