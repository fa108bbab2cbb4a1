use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::path::FieldPath;
use crate::scene::model::{Camera, Element, ElementKind, Metadata, Scene, Transitions, Vec3};
use crate::schema::{SchemaError, SchemaErrors};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

impl Scene {
    /// Decode a scene from a parsed JSON value.
    ///
    /// Every member is decoded independently so that all structural failures are reported
    /// together, each with its document path.
    pub fn from_value(value: Value) -> Result<Self, SchemaErrors> {
        decode_scene(value)
    }

    /// Parse and decode a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SceneResult<Self> {
        let value: Value = serde_json::from_reader(r).map_err(|e| {
            SchemaErrors::from(SchemaError::at(
                FieldPath::root(),
                format!("parse scene JSON: {e}"),
            ))
        })?;
        Ok(Self::from_value(value)?)
    }

    /// Parse and decode a scene from a JSON string.
    pub fn from_json_str(s: &str) -> SceneResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse and decode a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SceneError::Other(anyhow::anyhow!(
                "open scene JSON '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

fn decode_scene(value: Value) -> Result<Scene, SchemaErrors> {
    let Value::Object(mut map) = value else {
        return Err(SchemaError::at(FieldPath::root(), "scene document must be a JSON object").into());
    };
    let root = FieldPath::root();
    let mut errors = Vec::new();

    let id = take_member::<String>(&mut map, "id", &root, &mut errors);
    let name = take_member::<String>(&mut map, "name", &root, &mut errors);
    let description = take_member::<String>(&mut map, "description", &root, &mut errors);
    let duration = take_member::<f64>(&mut map, "duration", &root, &mut errors);
    let elements = take_elements(&mut map, &mut errors);
    let transitions = take_member::<Transitions>(&mut map, "transitions", &root, &mut errors);
    let camera = take_member::<Camera>(&mut map, "camera", &root, &mut errors);
    let metadata = take_member::<Metadata>(&mut map, "metadata", &root, &mut errors);

    SchemaErrors::check(errors)?;

    Ok(Scene {
        id,
        name,
        description,
        duration,
        elements,
        transitions,
        camera,
        metadata,
        extra: without_nulls(map),
    })
}

/// Remove and decode `key`; a failure is recorded at `base.key`.
fn take_member<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    key: &str,
    base: &FieldPath,
    errors: &mut Vec<SchemaError>,
) -> Option<T> {
    match map.remove(key) {
        None | Some(Value::Null) => None,
        Some(v) => match serde_json::from_value(v) {
            Ok(t) => Some(t),
            Err(e) => {
                errors.push(SchemaError::at(base.clone().field(key), e.to_string()));
                None
            }
        },
    }
}

fn take_elements(
    map: &mut Map<String, Value>,
    errors: &mut Vec<SchemaError>,
) -> Option<Vec<Element>> {
    let items = match map.remove("elements") {
        None | Some(Value::Null) => return None,
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.push(SchemaError::at(
                FieldPath::root().field("elements"),
                "elements must be an array",
            ));
            return None;
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let path = FieldPath::root().field("elements").index(i);
        let Value::Object(obj) = item else {
            errors.push(SchemaError::at(path, "element must be a JSON object"));
            continue;
        };
        if let Some(el) = decode_element(obj, &path, errors) {
            out.push(el);
        }
    }
    Some(out)
}

/// Decode one element member by member so each failure carries its field path.
fn decode_element(
    mut map: Map<String, Value>,
    path: &FieldPath,
    errors: &mut Vec<SchemaError>,
) -> Option<Element> {
    let before = errors.len();

    let id = take_member::<String>(&mut map, "id", path, errors);
    let kind = take_member::<ElementKind>(&mut map, "type", path, errors);
    if kind.is_none() && errors.len() == before {
        errors.push(SchemaError::at(
            path.clone().field("type"),
            "missing field `type`",
        ));
    }
    let name = take_member::<String>(&mut map, "name", path, errors);
    let position = take_member::<Vec3>(&mut map, "position", path, errors);
    let start_time = take_member::<f64>(&mut map, "start_time", path, errors);
    let end_time = take_member::<f64>(&mut map, "end_time", path, errors);

    if errors.len() > before {
        return None;
    }
    Some(Element {
        id,
        kind: kind?,
        name,
        position,
        start_time,
        end_time,
        attributes: without_nulls(map),
    })
}

fn without_nulls(map: Map<String, Value>) -> BTreeMap<String, Value> {
    map.into_iter().filter(|(_, v)| !v.is_null()).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/decode.rs"]
mod tests;
