use super::*;
use crate::emit::ops::Op;
use crate::emit::python::write_ops;
use crate::script::opts::GeneratorOpts;

fn run(f: impl FnOnce(&SegmentCtx<'_>, &mut SegmentCode), duration: Option<f64>) -> (SegmentCode, String) {
    let opts = GeneratorOpts::default();
    let cx = SegmentCtx {
        ordinal: 4,
        duration,
        opts: &opts,
    };
    let mut code = SegmentCode::new(4);
    f(&cx, &mut code);
    let mut out = String::new();
    write_ops(&mut out, code.ops(), 0);
    (code, out)
}

fn fully_disposed(code: &SegmentCode) -> bool {
    code.created().iter().all(|h| code.disposed().contains(h))
}

#[test]
fn title_reveals_then_clears_everything() {
    let card = TitleCard {
        title: "二分查找".to_owned(),
        subtitle: Some("算法入门".to_owned()),
    };
    let (code, out) = run(|cx, code| title(cx, &card, code), None);
    assert!(out.contains("s4_title = self._tx(\"二分查找\", font_size=52, weight=BOLD, color=WHITE)"));
    assert!(out.contains("s4_subtitle.next_to(s4_title, DOWN, buff=0.4)"));
    assert!(out.contains("self.wait(2)"));
    assert!(fully_disposed(&code));
    assert!(matches!(code.ops().last(), Some(Op::Clear { .. })));
}

#[test]
fn title_hold_tracks_narration_length() {
    let card = TitleCard {
        title: "T".to_owned(),
        subtitle: None,
    };
    // 0.8 reveal + hold = 5.0 of narration, then the clear.
    let (code, out) = run(|cx, code| title(cx, &card, code), Some(5.0));
    assert!(out.contains("self.wait(4.2)"));
    assert!((code.animated_secs() - 5.5).abs() < 1e-9);
}

#[test]
fn text_card_defaults_its_label() {
    let card = TextCard {
        label: None,
        lines: vec!["一个数组".to_owned(), "找出目标".to_owned()],
        figure_code: Vec::new(),
    };
    let (code, out) = run(|cx, code| text_card(cx, &card, code), None);
    assert!(out.contains("self._tx(\"题目\""));
    assert!(out.contains("s4_text = VGroup(s4_line0, s4_line1).arrange(DOWN"));
    assert!(!out.contains("figure"));
    assert!(code.diagnostics.is_empty());
    assert!(fully_disposed(&code));
}

#[test]
fn text_card_composes_bound_figure_code() {
    let card = TextCard {
        label: Some("例题".to_owned()),
        lines: vec!["求面积".to_owned()],
        figure_code: vec![
            "tri = Polygon(LEFT, RIGHT, UP)".to_owned(),
            "figure = VGroup(tri)".to_owned(),
        ],
    };
    let (code, out) = run(|cx, code| text_card(cx, &card, code), None);
    assert!(out.contains("figure = VGroup(tri)\ns4_figure = figure\n"));
    assert!(out.contains("s4_content = VGroup(s4_figure, s4_text).arrange(RIGHT, buff=0.6)"));
    assert!(out.contains("Create(s4_figure)"));
    assert!(fully_disposed(&code));
}

#[test]
fn text_card_accepts_figure_code_as_one_multiline_entry() {
    let card = TextCard {
        label: None,
        lines: vec!["求面积".to_owned()],
        figure_code: vec!["tri = Polygon(LEFT, RIGHT, UP)\nfigure = VGroup(tri)".to_owned()],
    };
    let (code, out) = run(|cx, code| text_card(cx, &card, code), None);
    assert!(out.contains("tri = Polygon(LEFT, RIGHT, UP)\nfigure = VGroup(tri)\ns4_figure = figure\n"));
    assert!(code.diagnostics.is_empty());
}

#[test]
fn text_card_skips_figure_code_without_binding() {
    let card = TextCard {
        label: None,
        lines: vec!["x".to_owned()],
        figure_code: vec!["tri = Polygon(LEFT, RIGHT, UP)".to_owned()],
    };
    let (code, out) = run(|cx, code| text_card(cx, &card, code), None);
    assert!(!out.contains("tri = Polygon"));
    assert_eq!(code.diagnostics.len(), 1);
    assert_eq!(code.diagnostics[0].kind, DiagnosticKind::MalformedSegment);
}

#[test]
fn step_color_prefers_valid_highlight_then_palette() {
    let mut step = SolutionStep {
        step_number: 8,
        ..SolutionStep::default()
    };
    assert_eq!(step_color(&step), STEP_COLORS[1]);
    step.highlight_color = Some("#abcdef".to_owned());
    assert_eq!(step_color(&step), "#abcdef");
    step.highlight_color = Some("teal".to_owned());
    assert_eq!(step_color(&step), STEP_COLORS[1]);
    step.step_number = 0;
    step.highlight_color = None;
    assert_eq!(step_color(&step), STEP_COLORS[0]);
}

#[test]
fn solution_step_uses_mathtex_for_latin_formulas() {
    let step = SolutionStep {
        step_number: 2,
        step_title: Some("取中点".to_owned()),
        content_lines: vec!["mid = (lo + hi) / 2".to_owned()],
        formula: Some("$m = \\lfloor (l + r) / 2 \\rfloor$".to_owned()),
        highlight_color: None,
    };
    let (code, out) = run(|cx, code| solution_step(cx, &step, code), None);
    assert!(out.contains("self._step_badge(2, \"#2563eb\")"));
    assert!(out.contains("MathTex(\"m = \\\\lfloor (l + r) / 2 \\\\rfloor\""));
    assert!(out.contains("s4_indicator = self._highlight_box(s4_formula, \"#2563eb\")"));
    assert!(fully_disposed(&code));
}

#[test]
fn solution_step_sets_greek_formulas_as_text() {
    let step = SolutionStep {
        step_number: 3,
        formula: Some("θ = 30°".to_owned()),
        ..SolutionStep::default()
    };
    let (_, out) = run(|cx, code| solution_step(cx, &step, code), None);
    assert!(out.contains("s4_formula = self._tx(\"θ = 30°\", font_size=32, color=WHITE)"));
    assert!(!out.contains("MathTex"));
}

#[test]
fn solution_step_sets_cjk_formulas_as_text() {
    let step = SolutionStep {
        step_number: 1,
        formula: Some("面积 = 底 × 高".to_owned()),
        ..SolutionStep::default()
    };
    let (_, out) = run(|cx, code| solution_step(cx, &step, code), None);
    assert!(out.contains("s4_formula = self._tx(\"面积 = 底 × 高\", font_size=32"));
    assert!(out.contains("步骤 1"));
    assert!(!out.contains("MathTex"));
}

#[test]
fn summary_lists_points_and_insight() {
    let s = Summary {
        title: None,
        points: vec!["每次折半".to_owned(), "O(log n)".to_owned()],
        key_insight: Some("有序才能二分".to_owned()),
    };
    let (code, out) = run(|cx, code| summary(cx, &s, code), None);
    assert!(out.contains("解题总结"));
    assert!(out.contains("✓  每次折半"));
    assert!(out.contains("s4_insight_box.next_to(s4_points, DOWN, buff=0.4)"));
    assert!(fully_disposed(&code));
}

#[test]
fn answer_reveal_boxes_the_answer() {
    let a = AnswerReveal {
        question: Some("目标在第几位？".to_owned()),
        answer: Some("第 5 位".to_owned()),
        key_insight: Some("比较 3 次".to_owned()),
    };
    let (code, out) = run(|cx, code| answer_reveal(cx, &a, code), None);
    assert!(out.contains("s4_question.move_to(UP * 1.8)"));
    assert!(out.contains("s4_answer.next_to(s4_question, DOWN, buff=0.4)"));
    assert!(out.contains("SurroundingRectangle(s4_answer, corner_radius=0.2"));
    assert!(out.contains("s4_insight_box.next_to(s4_answer, DOWN, buff=0.7)"));
    assert!(fully_disposed(&code));
}

#[test]
fn empty_answer_reveal_still_holds() {
    let (code, out) = run(|cx, code| answer_reveal(cx, &AnswerReveal::default(), code), None);
    assert!(out.starts_with("# answer_reveal has no question"));
    assert!(code.created().is_empty());
    assert!(matches!(code.ops().last(), Some(Op::Wait(_))));
}
