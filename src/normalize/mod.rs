//! Schema normalization: two authoring schemas in, one [`crate::Storyboard`] out.

pub(crate) mod legacy;
pub(crate) mod lenient;
pub(crate) mod nested;
pub(crate) mod pass;
pub(crate) mod schema;
