//! Scene validation: deterministic rules, continuity and the configured [`Validator`].

pub(crate) mod continuity;
pub(crate) mod rules;
pub(crate) mod validator;

pub use validator::Validator;
