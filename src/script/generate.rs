use crate::emit::ops::{Diagnostic, DiagnosticKind, Handle, SegmentCode, Slot};
use crate::emit::python::write_ops;
use crate::foundation::error::StoryResult;
use crate::handlers::carry::CarryOver;
use crate::handlers::{SegmentCtx, equation, geometry, text};
use crate::script::opts::GeneratorOpts;
use crate::script::preamble::{BODY_INDENT, preamble, terminal};
use crate::storyboard::model::{Segment, SegmentKind, Storyboard};

/// What one segment emitted, for callers that inspect the artifact structurally.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentReport {
    /// 1-based position in the storyboard.
    pub ordinal: usize,
    pub id: Option<String>,
    /// The authored `type` tag.
    pub tag: String,
    /// Normalized kind name (`unknown` / `malformed` for degraded segments).
    pub kind: &'static str,
    /// Handles created by this segment, in creation order.
    pub created: Vec<Handle>,
    /// Handles this segment faded out itself.
    pub disposed: Vec<Handle>,
    /// Slots this segment bound, with their members.
    pub bound: Vec<(Slot, Vec<Handle>)>,
    /// Slots this segment faded out.
    pub disposed_slots: Vec<Slot>,
    /// Slots this segment reset to `None`.
    pub released: Vec<Slot>,
    /// Seconds of animation and holds emitted.
    pub animated_secs: f64,
    /// First and last line (1-based, inclusive) of the segment in the artifact.
    pub lines: (usize, usize),
}

/// The generated artifact plus the bookkeeping behind it.
#[derive(Clone, Debug)]
pub struct GeneratedScript {
    /// Complete Python module.
    pub source: String,
    pub segments: Vec<SegmentReport>,
    /// Slots still live when the procedure ends.
    pub carry: CarryOver,
    pub diagnostics: Vec<Diagnostic>,
}

fn segment_header(ordinal: usize, seg: &Segment) -> String {
    match seg.id.as_deref() {
        Some(id) => format!("── [{ordinal}] {} · {id} ──", seg.kind.name()),
        None => format!("── [{ordinal}] {} ──", seg.kind.name()),
    }
}

/// Route one segment to its handler.
fn emit_segment(
    ordinal: usize,
    seg: &Segment,
    opts: &GeneratorOpts,
    carry: CarryOver,
) -> (SegmentCode, CarryOver) {
    let mut code = SegmentCode::new(ordinal);
    let cx = SegmentCtx {
        ordinal,
        duration: seg.duration_secs,
        opts,
    };
    tracing::debug!(ordinal, tag = %seg.tag, kind = seg.kind.name(), "emit segment");

    let carry = match &seg.kind {
        SegmentKind::Unknown => {
            code.comment(format!("Unknown segment type: {}", seg.tag));
            code.diagnose(
                DiagnosticKind::UnknownSegmentKind,
                format!("unknown segment type '{}'", seg.tag),
            );
            carry
        }
        SegmentKind::Malformed { reason } => {
            code.comment(format!("Malformed {} segment skipped: {reason}", seg.tag));
            code.diagnose(DiagnosticKind::MalformedSegment, reason.clone());
            carry
        }
        kind => {
            code.comment(segment_header(ordinal, seg));
            match kind {
                SegmentKind::Title(card) => {
                    text::title(&cx, card, &mut code);
                    carry
                }
                SegmentKind::TextCard(card) => {
                    text::text_card(&cx, card, &mut code);
                    carry
                }
                SegmentKind::SolutionStep(step) => {
                    text::solution_step(&cx, step, &mut code);
                    carry
                }
                SegmentKind::Summary(s) => {
                    text::summary(&cx, s, &mut code);
                    carry
                }
                SegmentKind::AnswerReveal(a) => {
                    text::answer_reveal(&cx, a, &mut code);
                    carry
                }
                SegmentKind::GeometryDrawing(fig) => {
                    geometry::geometry_drawing(&cx, fig, &mut code, carry)
                }
                SegmentKind::HighlightGeometry(fig) => {
                    geometry::highlight_geometry(&cx, fig, &mut code, carry)
                }
                SegmentKind::EquationSteps(chain) => {
                    equation::equation_steps(&cx, chain, &mut code, carry)
                }
                SegmentKind::FinalEquation(chain) => {
                    equation::final_equation(&cx, chain, &mut code, carry)
                }
                SegmentKind::Unknown | SegmentKind::Malformed { .. } => carry,
            }
        }
    };
    (code, carry)
}

/// Compile a storyboard into one scene script.
///
/// Never fails on storyboard content: unknown kinds, unreadable segments and placeholder
/// geometry are flagged in the artifact and in [`GeneratedScript::diagnostics`]. Only invalid
/// `opts` are an error.
#[tracing::instrument(skip_all, fields(segments = storyboard.segments.len()))]
pub fn generate(storyboard: &Storyboard, opts: &GeneratorOpts) -> StoryResult<GeneratedScript> {
    opts.validate()?;

    let mut source = preamble(opts);
    let mut line = source.lines().count();
    let mut carry = CarryOver::default();
    let mut segments = Vec::with_capacity(storyboard.segments.len());
    let mut diagnostics = Vec::new();

    for (i, seg) in storyboard.segments.iter().enumerate() {
        let (code, next) = emit_segment(i + 1, seg, opts, carry);
        carry = next;

        let before = source.len();
        write_ops(&mut source, code.ops(), BODY_INDENT);
        let emitted = source[before..].lines().count();
        let first = line + 1;
        line += emitted;

        segments.push(SegmentReport {
            ordinal: code.ordinal(),
            id: seg.id.clone(),
            tag: seg.tag.clone(),
            kind: seg.kind.name(),
            animated_secs: code.animated_secs(),
            lines: (first, line),
            created: code.created,
            disposed: code.disposed,
            bound: code.bound,
            disposed_slots: code.disposed_slots,
            released: code.released,
        });
        diagnostics.extend(code.diagnostics);

        if i + 1 < storyboard.segments.len() {
            source.push('\n');
            line += 1;
        }
    }
    source.push_str(terminal());

    tracing::info!(
        segments = segments.len(),
        diagnostics = diagnostics.len(),
        live_slots = !carry.is_empty(),
        "generated script"
    );
    Ok(GeneratedScript {
        source,
        segments,
        carry,
        diagnostics,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/script/generate.rs"]
mod tests;
