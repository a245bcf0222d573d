use super::*;
use crate::storyboard::model::{EquationChain, Figure, TitleCard, VisualElement, Vertices};
use crate::foundation::core::Point3;

fn seg(tag: &str, id: &str, kind: SegmentKind) -> Segment {
    Segment {
        id: Some(id.to_owned()),
        narration: None,
        duration_secs: None,
        tag: tag.to_owned(),
        kind,
    }
}

fn triangle() -> Figure {
    Figure {
        elements: vec![VisualElement {
            role: "三角形".to_owned(),
            vertices: Some(Vertices::Resolved(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(0.0, 2.0, 0.0),
            ])),
            ..VisualElement::default()
        }],
    }
}

fn board(segments: Vec<Segment>) -> Storyboard {
    Storyboard {
        title: None,
        subject: None,
        segments,
    }
}

#[test]
fn empty_storyboard_is_preamble_plus_terminal() {
    let out = generate(&Storyboard::default(), &GeneratorOpts::default()).unwrap();
    assert!(out.source.starts_with("from manim import *\nimport numpy as np\n"));
    assert!(out.source.contains("class TutorScene(Scene):"));
    assert!(
        out.source
            .contains("    def right_panel_title(self, text, color=\"#f59e0b\"):\n")
    );
    assert!(out.source.contains("    def result_box(self, mobject, color, fill):\n"));
    assert!(out.source.ends_with("    def _run_all_segments(self):\n        self.wait(1)\n"));
    assert!(out.segments.is_empty());
    assert!(out.carry.is_empty());
}

#[test]
fn headers_name_ordinal_kind_and_id() {
    let b = board(vec![seg(
        "title",
        "intro",
        SegmentKind::Title(TitleCard {
            title: "T".to_owned(),
            subtitle: None,
        }),
    )]);
    let out = generate(&b, &GeneratorOpts::default()).unwrap();
    assert!(out.source.contains("        # ── [1] title_card · intro ──\n"));
    assert_eq!(out.segments[0].kind, "title_card");
    assert_eq!(out.segments[0].tag, "title");
}

#[test]
fn unknown_segments_emit_one_comment_and_continue() {
    let b = board(vec![
        seg("video_clip", "v", SegmentKind::Unknown),
        seg("geometry_drawing", "g", SegmentKind::GeometryDrawing(triangle())),
    ]);
    let out = generate(&b, &GeneratorOpts::default()).unwrap();
    let (first, last) = out.segments[0].lines;
    assert_eq!(first, last);
    let line = out.source.lines().nth(first - 1).unwrap();
    assert_eq!(line, "        # Unknown segment type: video_clip");
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].kind, DiagnosticKind::UnknownSegmentKind);
    assert!(out.carry.is_live(Slot::Figure));
}

#[test]
fn malformed_segments_are_skipped_with_reason() {
    let b = board(vec![seg(
        "summary",
        "s",
        SegmentKind::Malformed {
            reason: "points must be a list".to_owned(),
        },
    )]);
    let out = generate(&b, &GeneratorOpts::default()).unwrap();
    assert!(out
        .source
        .contains("# Malformed summary segment skipped: points must be a list"));
    assert_eq!(out.diagnostics[0].kind, DiagnosticKind::MalformedSegment);
}

#[test]
fn reported_line_spans_match_the_source() {
    let b = board(vec![
        seg("geometry_drawing", "g", SegmentKind::GeometryDrawing(triangle())),
        seg(
            "final_equation",
            "f",
            SegmentKind::FinalEquation(EquationChain {
                title: None,
                lines: vec!["S = 2".to_owned()],
                result: Some("2".to_owned()),
            }),
        ),
    ]);
    let out = generate(&b, &GeneratorOpts::default()).unwrap();
    let lines: Vec<&str> = out.source.lines().collect();
    for report in &out.segments {
        let (first, last) = report.lines;
        assert!(lines[first - 1].contains(&format!("[{}]", report.ordinal)));
        assert!(!lines[last - 1].trim().is_empty());
    }
    // Segments are separated by exactly one blank line.
    assert_eq!(lines[out.segments[0].lines.1], "");
    assert_eq!(out.segments[1].lines.0, out.segments[0].lines.1 + 2);
    assert!(out.carry.is_empty());
}

#[test]
fn invalid_opts_fail_before_emitting() {
    let opts = GeneratorOpts {
        scene_name: "bad name".to_owned(),
        ..GeneratorOpts::default()
    };
    let err = generate(&Storyboard::default(), &opts).unwrap_err();
    assert!(!err.is_schema());
}
