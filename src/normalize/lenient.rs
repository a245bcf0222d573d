//! Forgiving readers for loosely-typed storyboard fields.
//!
//! Authoring mistakes (a number where a string was expected, a single string instead of a
//! list) are absorbed here. A field of the wrong shape reads as absent, never as an error.

use crate::foundation::core::Point3;
use crate::storyboard::model::{Coord, Vertices};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Scalar as text. Empty strings are kept so "omitted" and "empty" stay distinct.
pub(crate) fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A list of scalars, or a single scalar promoted to a one-item list.
pub(crate) fn value_text_list(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().filter_map(value_text).collect(),
        other => value_text(other).into_iter().collect(),
    }
}

/// Non-negative integer from a number or numeric string.
pub(crate) fn value_u32(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Finite float from a number or numeric string.
pub(crate) fn value_f64(v: &Value) -> Option<f64> {
    let x = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}

/// Numeric 2- or 3-tuple, or an `{x, y, z?}` object.
pub(crate) fn value_point(v: &Value) -> Option<Point3> {
    match v {
        Value::Array(items) => {
            let comps: Option<Vec<f64>> = items
                .iter()
                .map(|c| c.as_f64().filter(|x| x.is_finite()))
                .collect();
            Point3::from_components(&comps?)
        }
        Value::Object(map) => {
            let x = map.get("x").and_then(value_f64)?;
            let y = map.get("y").and_then(value_f64)?;
            let z = map.get("z").and_then(value_f64).unwrap_or(0.0);
            Some(Point3::new(x, y, z))
        }
        _ => None,
    }
}

/// Position that is either numeric or a placeholder worth reporting.
pub(crate) fn value_coord(v: &Value) -> Option<Coord> {
    if v.is_null() {
        return None;
    }
    match value_point(v) {
        Some(p) => Some(Coord::At(p)),
        None => Some(Coord::Placeholder(display_compact(v))),
    }
}

/// Classify a vertex list as drawable or placeholder.
///
/// An empty list reads as absent. Every item must be a numeric tuple for the list to count as
/// resolved; anything else keeps the raw items for the unresolved marker.
pub(crate) fn value_vertices(v: &Value) -> Option<Vertices> {
    match v {
        Value::Null => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => {
            let pts: Option<Vec<Point3>> = items.iter().map(value_point).collect();
            Some(match pts {
                Some(pts) => Vertices::Resolved(pts),
                None => Vertices::Unresolved(items.iter().map(display_compact).collect()),
            })
        }
        other => Some(Vertices::Unresolved(vec![display_compact(other)])),
    }
}

/// Short single-line rendering of a JSON value for comments.
pub(crate) fn display_compact(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn opt_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(&Value::deserialize(d)?))
}

pub(crate) fn text_list<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text_list(&Value::deserialize(d)?))
}

pub(crate) fn opt_u32<'de, D>(d: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_u32(&Value::deserialize(d)?))
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/lenient.rs"]
mod tests;
