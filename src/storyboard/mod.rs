//! Normalized storyboard model and its loaders.

pub(crate) mod document;
pub(crate) mod model;
