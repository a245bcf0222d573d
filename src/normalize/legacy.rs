//! Flat per-segment schema (the first storyboard version).
//!
//! Every field is optional and read through the lenient helpers, so a mistyped field
//! degrades to its default instead of rejecting the segment. Older spellings (`steps`,
//! `final_answer`, `insight`, ...) are separate fields so a segment carrying both spellings
//! still reads.

use crate::normalize::lenient::{opt_text, opt_u32, text_list};
use crate::storyboard::model::{
    AnswerReveal, EquationChain, SolutionStep, Summary, TextCard, TitleCard,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TitleDef {
    #[serde(deserialize_with = "opt_text")]
    title: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    subtitle: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextCardDef {
    #[serde(deserialize_with = "opt_text")]
    label: Option<String>,
    #[serde(deserialize_with = "text_list")]
    lines: Vec<String>,
    #[serde(deserialize_with = "text_list")]
    manim_figure_code: Vec<String>,
    #[serde(deserialize_with = "text_list")]
    figure_code: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SolutionStepDef {
    #[serde(deserialize_with = "opt_u32")]
    step_number: Option<u32>,
    #[serde(deserialize_with = "opt_text")]
    step_title: Option<String>,
    #[serde(deserialize_with = "text_list")]
    content_lines: Vec<String>,
    #[serde(deserialize_with = "text_list")]
    lines: Vec<String>,
    #[serde(deserialize_with = "opt_text")]
    formula: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    highlight_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SummaryDef {
    #[serde(deserialize_with = "opt_text")]
    title: Option<String>,
    #[serde(deserialize_with = "text_list")]
    points: Vec<String>,
    #[serde(deserialize_with = "opt_text")]
    key_insight: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    insight: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnswerRevealDef {
    #[serde(deserialize_with = "opt_text")]
    question: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    answer: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    final_answer: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    key_insight: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    insight: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EquationDef {
    #[serde(deserialize_with = "opt_text")]
    title: Option<String>,
    #[serde(deserialize_with = "text_list")]
    lines: Vec<String>,
    #[serde(deserialize_with = "text_list")]
    steps: Vec<String>,
    #[serde(deserialize_with = "opt_text")]
    result: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    answer: Option<String>,
}

/// The canonical spelling wins; the older one fills in only when the canonical list is empty.
fn prefer(canonical: Vec<String>, older: Vec<String>) -> Vec<String> {
    if canonical.is_empty() {
        older
    } else {
        canonical
    }
}

fn read<T: for<'de> Deserialize<'de>>(v: &Value) -> Result<T, String> {
    T::deserialize(v).map_err(|e| e.to_string())
}

pub(crate) fn title(v: &Value) -> Result<TitleCard, String> {
    let d: TitleDef = read(v)?;
    Ok(TitleCard {
        title: d.title.unwrap_or_default(),
        subtitle: d.subtitle,
    })
}

pub(crate) fn text_card(v: &Value) -> Result<TextCard, String> {
    let d: TextCardDef = read(v)?;
    Ok(TextCard {
        label: d.label,
        lines: d.lines,
        figure_code: prefer(d.manim_figure_code, d.figure_code),
    })
}

pub(crate) fn solution_step(v: &Value) -> Result<SolutionStep, String> {
    let d: SolutionStepDef = read(v)?;
    Ok(SolutionStep {
        step_number: d.step_number.filter(|&n| n > 0).unwrap_or(1),
        step_title: d.step_title,
        content_lines: prefer(d.content_lines, d.lines),
        formula: d.formula,
        highlight_color: d.highlight_color,
    })
}

pub(crate) fn summary(v: &Value) -> Result<Summary, String> {
    let d: SummaryDef = read(v)?;
    Ok(Summary {
        title: d.title,
        points: d.points,
        key_insight: d.key_insight.or(d.insight),
    })
}

pub(crate) fn answer_reveal(v: &Value) -> Result<AnswerReveal, String> {
    let d: AnswerRevealDef = read(v)?;
    Ok(AnswerReveal {
        question: d.question,
        answer: d.answer.or(d.final_answer),
        key_insight: d.key_insight.or(d.insight),
    })
}

pub(crate) fn equation_chain(v: &Value) -> Result<EquationChain, String> {
    let d: EquationDef = read(v)?;
    Ok(EquationChain {
        title: d.title,
        lines: prefer(d.lines, d.steps),
        result: d.result.or(d.answer),
    })
}
