//! Validation reports, export adapters and report persistence.

pub(crate) mod export;
pub(crate) mod issue;
pub(crate) mod store;
pub(crate) mod validation;
