use serde::{Serialize, Serializer};
use std::fmt;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathElem {
    /// Object member.
    Field(String),
    /// Array position.
    Index(usize),
}

/// JSON-style location inside a scene document, rendered as `$.elements[2].type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<PathElem>);

impl FieldPath {
    /// The document root (`$`).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Extend with an object member.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.0.push(PathElem::Field(name.into()));
        self
    }

    /// Extend with an array position.
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(PathElem::Index(i));
        self
    }

    /// Path steps from the root.
    pub fn elems(&self) -> &[PathElem] {
        &self.0
    }

    /// Return `true` for the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for p in &self.0 {
            match p {
                PathElem::Field(name) => write!(f, ".{name}")?,
                PathElem::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/path.rs"]
mod tests;
