use crate::normalize::lenient::{value_f64, value_text};
use crate::normalize::schema::{PathElem, SchemaError};
use crate::normalize::{legacy, nested};
use crate::storyboard::model::{Figure, Segment, SegmentKind, Storyboard};
use serde_json::{Map, Value};

/// Normalize a parsed storyboard document into the handler model.
///
/// Fails only when the document is not an object or `segments` is present but not an array.
/// An absent or `null` `segments` yields an empty storyboard. Problems inside a single segment
/// never fail the document; they surface as [`SegmentKind::Unknown`] or
/// [`SegmentKind::Malformed`].
pub(crate) fn normalize_document(doc: &Value) -> Result<Storyboard, SchemaError> {
    let Some(root) = doc.as_object() else {
        return Err(SchemaError::at(&[], "storyboard must be a JSON object"));
    };

    let segments = match root.get("segments") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(normalize_segment).collect(),
        Some(_) => {
            return Err(SchemaError::at(
                &[PathElem::Field("segments")],
                "segments must be an array",
            ));
        }
    };

    tracing::debug!(segments = segments.len(), "normalized storyboard");
    Ok(Storyboard {
        title: root.get("title").and_then(value_text),
        subject: root.get("subject").and_then(value_text),
        segments,
    })
}

fn normalize_segment(raw: &Value) -> Segment {
    let Some(obj) = raw.as_object() else {
        return Segment {
            id: None,
            narration: None,
            duration_secs: None,
            tag: String::new(),
            kind: SegmentKind::Malformed {
                reason: format!("segment is not an object: {raw}"),
            },
        };
    };

    let tag = obj
        .get("type")
        .or_else(|| obj.get("kind"))
        .and_then(value_text)
        .unwrap_or_default();
    let kind = match segment_kind(&tag, raw, obj) {
        Ok(kind) => kind,
        Err(reason) => SegmentKind::Malformed { reason },
    };

    Segment {
        id: obj.get("id").and_then(value_text),
        narration: obj.get("narration").and_then(value_text),
        duration_secs: ["duration", "duration_secs", "audio_duration"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(value_f64))
            .filter(|d| *d >= 0.0),
        tag,
        kind,
    }
}

/// Route on the `type` tag, then on schema shape: segments carrying an element array go
/// through the nested reader, everything else through the flat one.
fn segment_kind(tag: &str, raw: &Value, obj: &Map<String, Value>) -> Result<SegmentKind, String> {
    let elements = nested::element_array(obj).map(Vec::as_slice);

    let kind = match tag {
        "title" | "title_card" => {
            let card = legacy::title(raw)?;
            SegmentKind::Title(match elements {
                Some(els) => nested::fill_title(card, els),
                None => card,
            })
        }
        "problem_statement" | "text_card" => {
            let card = legacy::text_card(raw)?;
            SegmentKind::TextCard(match elements {
                Some(els) => nested::fill_text_card(card, els),
                None => card,
            })
        }
        "solution_step" => SegmentKind::SolutionStep(legacy::solution_step(raw)?),
        "summary" => SegmentKind::Summary(legacy::summary(raw)?),
        "answer_reveal" => {
            let card = legacy::answer_reveal(raw)?;
            SegmentKind::AnswerReveal(match elements {
                Some(els) => nested::fill_answer(card, els),
                None => card,
            })
        }
        "geometry_drawing" => SegmentKind::GeometryDrawing(figure(elements)),
        "highlight_geometry" => SegmentKind::HighlightGeometry(figure(elements)),
        "equation_steps" | "final_equation" => {
            let chain = legacy::equation_chain(raw)?;
            let chain = match elements {
                Some(els) => nested::fill_equation(chain, els),
                None => chain,
            };
            if tag == "equation_steps" {
                SegmentKind::EquationSteps(chain)
            } else {
                SegmentKind::FinalEquation(chain)
            }
        }
        _ => SegmentKind::Unknown,
    };
    Ok(kind)
}

fn figure(elements: Option<&[Value]>) -> Figure {
    elements.map(nested::figure).unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/pass.rs"]
mod tests;
