use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One unit of media content: characters, props, environment, effects, audio, timing, camera.
///
/// Fields that a rule configuration may require are optional here so that their absence is
/// reported as a content issue rather than a decode failure. Values of the wrong JSON type are
/// rejected while decoding (see [`Scene::from_value`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    /// Stable scene identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Scene length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Ordered scene elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Element>>,
    /// Entry/exit transitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transitions: Option<Transitions>,
    /// Camera placement and moves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
    /// Authoring metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Remaining non-null top-level members, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Scene {
    /// Return `true` when the top-level member `name` is present and non-null.
    pub fn has_field(&self, name: &str) -> bool {
        match name {
            "id" => self.id.is_some(),
            "name" => self.name.is_some(),
            "description" => self.description.is_some(),
            "duration" => self.duration.is_some(),
            "elements" => self.elements.is_some(),
            "transitions" => self.transitions.is_some(),
            "camera" => self.camera.is_some(),
            "metadata" => self.metadata.is_some(),
            other => self.extra.get(other).is_some_and(|v| !v.is_null()),
        }
    }

    /// Elements in document order (empty when the member is absent).
    pub fn elements(&self) -> &[Element] {
        self.elements.as_deref().unwrap_or_default()
    }

    /// Duration usable as a timing upper bound: finite and positive.
    pub fn usable_duration(&self) -> Option<f64> {
        self.duration.filter(|d| d.is_finite() && *d > 0.0)
    }

    /// Short label for logs and messages.
    pub fn label(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| "<unnamed scene>".to_string())
    }
}

/// Element type. Unknown strings are preserved so that rule sets can allow custom types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    /// A performer or animated figure.
    Character,
    /// A handled object.
    Prop,
    /// Set, location or backdrop.
    Environment,
    /// Visual effect.
    Effect,
    /// Sound cue, music or ambience.
    Audio,
    /// On-screen text.
    Text,
    /// Any other type name.
    Other(String),
}

impl ElementKind {
    /// Wire name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Character => "character",
            Self::Prop => "prop",
            Self::Environment => "environment",
            Self::Effect => "effect",
            Self::Audio => "audio",
            Self::Text => "text",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ElementKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "character" => Self::Character,
            "prop" => Self::Prop,
            "environment" => Self::Environment,
            "effect" => Self::Effect,
            "audio" => Self::Audio,
            "text" => Self::Text,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for ElementKind {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ElementKind> for String {
    fn from(k: ElementKind) -> Self {
        match k {
            ElementKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed sub-entity of a [`Scene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Identifier, used for continuity across scenes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Element type.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Placement in scene space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    /// Time (seconds) the element enters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    /// Time (seconds) the element leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    /// Type-specific attributes (appearance, costume, intensity, ...).
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl Element {
    /// Create an element with only a type set.
    pub fn new(kind: impl Into<ElementKind>) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            name: None,
            position: None,
            start_time: None,
            end_time: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style id setter.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder-style timing setter.
    pub fn with_window(mut self, start: f64, end: f64) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Return `true` when either timing bound is set.
    pub fn has_timing(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }

    /// Label for messages: the id, or the position in the scene.
    pub fn label(&self, index: usize) -> String {
        match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => format!("index {index}"),
        }
    }
}

/// 3D point; accepts `[x, y]`, `[x, y, z]` or `{x, y, z?}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec3 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl<'de> Deserialize<'de> for Vec3 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr3([f64; 3]),
            Arr2([f64; 2]),
            Obj {
                x: f64,
                y: f64,
                #[serde(default)]
                z: f64,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr3([x, y, z]) => Ok(Self { x, y, z }),
            Repr::Arr2([x, y]) => Ok(Self { x, y, z: 0.0 }),
            Repr::Obj { x, y, z } => Ok(Self { x, y, z }),
        }
    }
}

/// Entry and exit transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transitions {
    /// Transition into the scene.
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub enter: Option<TransitionSpec>,
    /// Transition out of the scene.
    #[serde(rename = "out", default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<TransitionSpec>,
}

/// One transition; accepts a bare type name (`"fade"`) or an object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionSpec {
    /// Transition type, e.g. `fade`, `cut`, `dissolve`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Remaining parameters.
    #[serde(flatten)]
    pub params: BTreeMap<String, Value>,
}

impl<'de> Deserialize<'de> for TransitionSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Obj {
                #[serde(rename = "type")]
                kind: String,
                #[serde(default)]
                duration: Option<f64>,
                #[serde(flatten)]
                params: BTreeMap<String, Value>,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Name(kind) => Ok(Self {
                kind,
                duration: None,
                params: BTreeMap::new(),
            }),
            Repr::Obj {
                kind,
                duration,
                params,
            } => Ok(Self {
                kind,
                duration,
                params,
            }),
        }
    }
}

/// Camera placement and moves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Starting position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_position: Option<Vec3>,
    /// Moves in document order.
    #[serde(default)]
    pub movements: Vec<CameraMovement>,
    /// Remaining parameters (lens, target, ...).
    #[serde(flatten)]
    pub params: BTreeMap<String, Value>,
}

/// One camera move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraMovement {
    /// Move type, e.g. `pan`, `dolly`, `zoom`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Move start in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    /// Move end in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    /// Move length, used when `end_time` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Remaining parameters.
    #[serde(flatten)]
    pub params: BTreeMap<String, Value>,
}

impl CameraMovement {
    /// End bound, derived from `start_time + duration` when not explicit.
    pub fn effective_end(&self) -> Option<f64> {
        self.end_time.or_else(|| {
            self.duration
                .map(|d| self.start_time.unwrap_or(0.0) + d)
        })
    }
}

/// Authoring metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Creation timestamp (RFC 3339 expected).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last-modified timestamp (RFC 3339 expected).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Author name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Remaining members (version, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
