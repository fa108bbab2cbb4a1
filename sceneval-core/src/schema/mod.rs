//! Structural (parse-boundary) errors.
//!
//! A [`SchemaError`] means the input could not be decoded into the expected record shape. This is
//! distinct from a content [`crate::Issue`], which is produced for a well-formed scene that breaks
//! a rule.

use crate::foundation::path::FieldPath;
use std::fmt;

/// One structural failure at a document location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// Offending location.
    pub path: FieldPath,
    /// Human-readable reason.
    pub message: String,
}

impl SchemaError {
    /// Build an error at `path`.
    pub fn at(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every structural failure found while decoding one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaErrors {
    /// Failures in document order.
    pub errors: Vec<SchemaError>,
}

impl SchemaErrors {
    /// Return `Ok(())` when no errors were collected.
    pub(crate) fn check(errors: Vec<SchemaError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self { errors })
        }
    }

    /// Return `true` when any error is located at `path`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path.to_string() == path)
    }
}

impl From<SchemaError> for SchemaErrors {
    fn from(e: SchemaError) -> Self {
        Self { errors: vec![e] }
    }
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

#[cfg(test)]
#[path = "../../tests/unit/schema/mod.rs"]
mod tests;
