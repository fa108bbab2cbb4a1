//! Scene document model and its JSON decode boundary.

pub(crate) mod decode;
pub(crate) mod model;
