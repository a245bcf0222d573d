use crate::foundation::core::Point3;
use std::collections::BTreeMap;

/// Normalized storyboard: the single model every segment handler consumes.
///
/// Both authoring schemas (flat legacy segments and nested `visual.elements`) converge here.
/// Segment order is animation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Storyboard {
    /// Human title of the lesson.
    pub title: Option<String>,
    /// Subject area (e.g. `数学`).
    pub subject: Option<String>,
    /// Ordered segments.
    pub segments: Vec<Segment>,
}

/// One phase of the animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Opaque id linking the segment to its narration audio.
    pub id: Option<String>,
    /// Narration text for the speech synthesizer. The generator ignores it.
    pub narration: Option<String>,
    /// Narration audio length in seconds, when known.
    pub duration_secs: Option<f64>,
    /// The `type` tag exactly as authored.
    pub tag: String,
    /// Kind-specific payload.
    pub kind: SegmentKind,
}

/// Closed set of segment kinds plus the two degraded forms.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    /// `title` / `title_card`.
    Title(TitleCard),
    /// `problem_statement` / `text_card`.
    TextCard(TextCard),
    /// `solution_step`.
    SolutionStep(SolutionStep),
    /// `summary`.
    Summary(Summary),
    /// `answer_reveal`.
    AnswerReveal(AnswerReveal),
    /// `geometry_drawing`.
    GeometryDrawing(Figure),
    /// `highlight_geometry`.
    HighlightGeometry(Figure),
    /// `equation_steps`.
    EquationSteps(EquationChain),
    /// `final_equation`.
    FinalEquation(EquationChain),
    /// A `type` tag outside the known set.
    Unknown,
    /// A known tag whose payload could not be read.
    Malformed {
        /// Why the payload was rejected.
        reason: String,
    },
}

impl SegmentKind {
    /// Stable snake_case name of the kind, independent of the authored alias.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title(_) => "title_card",
            Self::TextCard(_) => "text_card",
            Self::SolutionStep(_) => "solution_step",
            Self::Summary(_) => "summary",
            Self::AnswerReveal(_) => "answer_reveal",
            Self::GeometryDrawing(_) => "geometry_drawing",
            Self::HighlightGeometry(_) => "highlight_geometry",
            Self::EquationSteps(_) => "equation_steps",
            Self::FinalEquation(_) => "final_equation",
            Self::Unknown => "unknown",
            Self::Malformed { .. } => "malformed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleCard {
    pub title: String,
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextCard {
    /// Small corner label; the handler defaults it.
    pub label: Option<String>,
    pub lines: Vec<String>,
    /// Caller-supplied figure statements. The last one must bind `figure`.
    pub figure_code: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionStep {
    pub step_number: u32,
    pub step_title: Option<String>,
    pub content_lines: Vec<String>,
    pub formula: Option<String>,
    pub highlight_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub title: Option<String>,
    pub points: Vec<String>,
    pub key_insight: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerReveal {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub key_insight: Option<String>,
}

/// Visual payload of `geometry_drawing` / `highlight_geometry`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Figure {
    pub elements: Vec<VisualElement>,
}

/// Right-panel derivation chain (`equation_steps`, `final_equation`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquationChain {
    pub title: Option<String>,
    pub lines: Vec<String>,
    /// Boxed result / answer at the end of the chain.
    pub result: Option<String>,
}

/// One declared visual object. Omitted fields stay `None`, never empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualElement {
    /// Free-text role label, resolved by [`crate::classify`].
    pub role: String,
    pub shape: Option<String>,
    pub text: Option<String>,
    pub vertices: Option<Vertices>,
    pub style: StyleSpec,
    pub labels: Option<Vec<Label>>,
    pub points: Option<Vec<PointMark>>,
}

/// A vertex list is either drawable or a list of authoring placeholders.
#[derive(Debug, Clone, PartialEq)]
pub enum Vertices {
    /// Non-empty list of numeric coordinates.
    Resolved(Vec<Point3>),
    /// Anything else, kept in display form for the unresolved marker.
    Unresolved(Vec<String>),
}

/// A position that may still be an authoring placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Coord {
    At(Point3),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Option<Coord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointMark {
    pub label: Option<String>,
    pub position: Option<Coord>,
}

/// Raw style attributes: structured keys and/or a loose descriptor string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSpec {
    /// Structured keys such as `fill`, `opacity`, `font_size`.
    pub keys: BTreeMap<String, serde_json::Value>,
    /// Unstructured descriptor, e.g. `"fill #3b82f6, opacity 0.3"`.
    pub descriptor: Option<String>,
}

/// One `(id, text)` pair for the speech synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NarrationItem {
    pub id: String,
    pub text: String,
}
