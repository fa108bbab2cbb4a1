use crate::schema::SchemaErrors;

/// Crate-wide result alias.
pub type SceneResult<T> = Result<T, SceneError>;

/// Top-level error type for scene decoding, configuration and report export.
///
/// Content violations found while validating a well-formed scene are never
/// reported through this type; they are collected as [`crate::Issue`]s.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Input could not be decoded into the expected document shape.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaErrors),

    /// Configuration decoded but holds out-of-range values.
    #[error("config error: {0}")]
    Config(String),

    /// Report rendering or writing failed.
    #[error("export error: {0}")]
    Export(String),

    /// Serialization failure on an outbound document.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneError {
    /// Build a [`SceneError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`SceneError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`SceneError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return the structural errors when this is a [`SceneError::Schema`].
    pub fn schema_errors(&self) -> Option<&SchemaErrors> {
        match self {
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
