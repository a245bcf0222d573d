//! Nested schema: segments carrying a `visual.elements` array with free-text roles.
//!
//! Each element entry is flattened into a [`VisualElement`]. Text-only kinds authored in this
//! shape fill their slots from element texts when the flat fields are missing.

use crate::normalize::lenient::{
    display_compact, value_coord, value_text, value_text_list, value_vertices,
};
use crate::storyboard::model::{
    AnswerReveal, EquationChain, Figure, Label, PointMark, StyleSpec, TextCard, TitleCard,
    VisualElement,
};
use serde_json::{Map, Value};

/// Structured style keys that may also appear directly on an element.
const ELEMENT_STYLE_KEYS: &[&str] = &[
    "fill",
    "color",
    "stroke",
    "opacity",
    "fill_opacity",
    "font_size",
];

/// `visual.elements`, or a bare `elements` array as older nested drafts wrote it.
pub(crate) fn element_array(seg: &Map<String, Value>) -> Option<&Vec<Value>> {
    seg.get("visual")
        .and_then(|v| v.get("elements"))
        .and_then(Value::as_array)
        .or_else(|| seg.get("elements").and_then(Value::as_array))
}

pub(crate) fn figure(entries: &[Value]) -> Figure {
    Figure {
        elements: entries.iter().map(element).collect(),
    }
}

/// Flatten one element entry. Non-object entries become an element with an empty role so the
/// classifier reports them instead of silently dropping them.
pub(crate) fn element(entry: &Value) -> VisualElement {
    let Some(obj) = entry.as_object() else {
        return VisualElement {
            text: value_text(entry),
            ..VisualElement::default()
        };
    };

    VisualElement {
        role: obj.get("role").and_then(value_text).unwrap_or_default(),
        shape: obj.get("shape").and_then(value_text),
        text: obj
            .get("text")
            .or_else(|| obj.get("content"))
            .and_then(value_text),
        vertices: obj.get("vertices").and_then(value_vertices),
        style: style(obj),
        labels: obj.get("labels").and_then(labels),
        points: obj.get("points").and_then(points),
    }
}

fn style(obj: &Map<String, Value>) -> StyleSpec {
    let mut spec = StyleSpec::default();
    match obj.get("style") {
        Some(Value::String(s)) => spec.descriptor = Some(s.clone()),
        Some(Value::Object(map)) => {
            for (k, v) in map {
                if matches!(k.as_str(), "descriptor" | "desc") {
                    spec.descriptor = value_text(v);
                } else {
                    spec.keys.insert(k.clone(), v.clone());
                }
            }
        }
        _ => {}
    }
    // Keys inside `style` win over the same key on the element itself.
    for &k in ELEMENT_STYLE_KEYS {
        if let Some(v) = obj.get(k) {
            spec.keys.entry(k.to_owned()).or_insert_with(|| v.clone());
        }
    }
    spec
}

/// `[{text, position}]`, `["A", "B"]`, or `{"A": [x, y, z]}`.
fn labels(v: &Value) -> Option<Vec<Label>> {
    match v {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(o) => Some(Label {
                        text: o
                            .get("text")
                            .or_else(|| o.get("label"))
                            .and_then(value_text)?,
                        position: o
                            .get("position")
                            .or_else(|| o.get("pos"))
                            .and_then(value_coord),
                    }),
                    other => value_text(other).map(|text| Label {
                        text,
                        position: None,
                    }),
                })
                .collect(),
        ),
        Value::Object(map) => Some(
            map.iter()
                .map(|(k, pos)| Label {
                    text: k.clone(),
                    position: value_coord(pos),
                })
                .collect(),
        ),
        _ => None,
    }
}

/// `[{label, position}]` or `{"M": [x, y, z]}`.
fn points(v: &Value) -> Option<Vec<PointMark>> {
    match v {
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(o) => PointMark {
                        label: o
                            .get("label")
                            .or_else(|| o.get("name"))
                            .and_then(value_text),
                        position: o
                            .get("position")
                            .or_else(|| o.get("pos"))
                            .and_then(value_coord),
                    },
                    other => PointMark {
                        label: None,
                        position: value_coord(other),
                    },
                })
                .collect(),
        ),
        Value::Object(map) => Some(
            map.iter()
                .map(|(k, pos)| PointMark {
                    label: Some(k.clone()),
                    position: value_coord(pos),
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Role-tagged texts of a text-only nested segment, in authored order.
struct TextSlots<'a> {
    entries: Vec<(String, &'a Value)>,
}

impl<'a> TextSlots<'a> {
    fn new(entries: &'a [Value]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|e| {
                    let role = e
                        .get("role")
                        .and_then(value_text)
                        .unwrap_or_default()
                        .to_lowercase();
                    (role, e)
                })
                .collect(),
        }
    }

    /// Remove and return the first entry whose role contains any trigger.
    fn take(&mut self, triggers: &[&str]) -> Option<String> {
        let idx = self
            .entries
            .iter()
            .position(|(role, _)| triggers.iter().any(|t| role.contains(t)))?;
        let (_, entry) = self.entries.remove(idx);
        entry_text(entry)
    }

    /// Remaining texts in order.
    fn rest(self) -> Vec<String> {
        self.entries
            .into_iter()
            .flat_map(|(_, e)| match e.get("lines") {
                Some(lines) => value_text_list(lines),
                None => entry_text(e).into_iter().collect(),
            })
            .collect()
    }
}

fn entry_text(e: &Value) -> Option<String> {
    match e {
        Value::Object(o) => o
            .get("text")
            .or_else(|| o.get("content"))
            .and_then(value_text),
        other => value_text(other).or_else(|| Some(display_compact(other))),
    }
}

pub(crate) fn fill_title(mut card: TitleCard, entries: &[Value]) -> TitleCard {
    let mut slots = TextSlots::new(entries);
    let subtitle = slots.take(&["副标题", "subtitle", "口诀"]);
    let title = slots.take(&["标题", "title"]);
    let mut rest = slots.rest().into_iter();
    if card.title.is_empty() {
        card.title = title.or_else(|| rest.next()).unwrap_or_default();
    }
    if card.subtitle.is_none() {
        card.subtitle = subtitle.or_else(|| rest.next());
    }
    card
}

pub(crate) fn fill_text_card(mut card: TextCard, entries: &[Value]) -> TextCard {
    let mut slots = TextSlots::new(entries);
    let label = slots.take(&["标签", "label"]);
    if card.label.is_none() {
        card.label = label;
    }
    if card.lines.is_empty() {
        card.lines = slots.rest();
    }
    card
}

pub(crate) fn fill_answer(mut card: AnswerReveal, entries: &[Value]) -> AnswerReveal {
    let mut slots = TextSlots::new(entries);
    let question = slots.take(&["问题", "回顾", "question"]);
    let insight = slots.take(&["提示", "关键", "insight", "hint"]);
    let answer = slots.take(&["答案", "answer", "结果", "result"]);
    let mut rest = slots.rest().into_iter();
    card.question = card.question.or(question);
    card.key_insight = card.key_insight.or(insight);
    card.answer = card.answer.or(answer).or_else(|| rest.next());
    card
}

pub(crate) fn fill_equation(mut chain: EquationChain, entries: &[Value]) -> EquationChain {
    let mut slots = TextSlots::new(entries);
    let title = slots.take(&["标题", "title"]);
    let result = slots.take(&["结果", "答案", "result", "answer"]);
    chain.title = chain.title.or(title);
    chain.result = chain.result.or(result);
    if chain.lines.is_empty() {
        chain.lines = slots.rest();
    }
    chain
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/nested.rs"]
mod tests;
