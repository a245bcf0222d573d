use crate::emit::ops::{DiagnosticKind, Handle, SegmentCode};
use crate::emit::python::py_str;
use crate::foundation::core::HexColor;
use crate::handlers::{MUTED, SegmentCtx, TEXT, has_non_latin_script, nonblank, tx};
use crate::storyboard::model::{AnswerReveal, SolutionStep, Summary, TextCard, TitleCard};

pub(crate) const STEP_COLORS: [&str; 6] = [
    "#7c3aed", "#2563eb", "#059669", "#d97706", "#dc2626", "#0891b2",
];

const GREEN: &str = "#34d399";
const GREEN_DARK: &str = "#064e3b";
const AMBER: &str = "#f59e0b";
const AMBER_STROKE: &str = "#fbbf24";
const ORANGE_DARK: &str = "#451a03";

pub(crate) fn title(cx: &SegmentCtx<'_>, card: &TitleCard, code: &mut SegmentCode) {
    let title = code.create(
        "title",
        tx(&card.title, "font_size=52, weight=BOLD, color=WHITE"),
    );
    match nonblank(card.subtitle.as_deref()) {
        Some(sub) => {
            let sub = code.create("subtitle", tx(sub, &format!("font_size=28, color={}", py_str(MUTED))));
            code.layout(format!("{sub}.next_to({title}, DOWN, buff=0.4)"));
            code.layout(format!("VGroup({title}, {sub}).move_to(ORIGIN)"));
            code.reveal(vec![format!("FadeIn({title}, shift=UP * 0.3)")], 0.8);
            code.reveal(vec![format!("FadeIn({sub})")], 0.5);
        }
        None => {
            code.layout(format!("{title}.move_to(ORIGIN)"));
            code.reveal(vec![format!("FadeIn({title}, shift=UP * 0.3)")], 0.8);
        }
    }
    cx.hold(code);
    code.clear_all(0.5);
}

/// Caller figure code must bind `figure` for the card to compose it.
fn binds_figure(lines: &[String]) -> bool {
    lines.iter().flat_map(|l| l.lines()).any(|l| {
        l.trim_start()
            .strip_prefix("figure")
            .is_some_and(|rest| rest.trim_start().starts_with('='))
    })
}

pub(crate) fn text_card(cx: &SegmentCtx<'_>, card: &TextCard, code: &mut SegmentCode) {
    let label_text = nonblank(card.label.as_deref()).unwrap_or("题目");
    let label = code.create(
        "label",
        tx(label_text, "font_size=22, color=\"#64748b\", weight=BOLD"),
    );
    code.layout(format!("{label}.to_corner(UL, buff=0.5)"));

    let mut lines = Vec::with_capacity(card.lines.len());
    for (i, line) in card.lines.iter().enumerate() {
        let kw = format!("font_size=30, color={}", py_str(TEXT));
        lines.push(code.create(&format!("line{i}"), tx(line, &kw)));
    }
    let chain = if lines.is_empty() {
        ""
    } else {
        ".arrange(DOWN, aligned_edge=LEFT, buff=0.2)"
    };
    let text = code.group("text", &lines, chain);

    let figure = if card.figure_code.is_empty() {
        None
    } else if binds_figure(&card.figure_code) {
        code.comment("caller-supplied figure");
        code.raw(card.figure_code.clone());
        let fig = code.create("figure", "figure");
        code.layout(format!("{fig}.scale_to_fit_height(3.0)"));
        Some(fig)
    } else {
        code.comment("figure code skipped: no line binds `figure`");
        code.diagnose(
            DiagnosticKind::MalformedSegment,
            "figure code does not bind `figure`",
        );
        None
    };

    let content = match &figure {
        Some(fig) => code.group(
            "content",
            &[fig.clone(), text.clone()],
            ".arrange(RIGHT, buff=0.6)",
        ),
        None => text.clone(),
    };
    code.layout(format!("{content}.move_to(ORIGIN)"));
    let bg = code.create(
        "box",
        format!(
            "RoundedRectangle(corner_radius=0.2, width={content}.width + 0.8, \
             height={content}.height + 0.6, fill_color=\"#1e3a5f\", fill_opacity=0.8, \
             stroke_color=\"#3b82f6\", stroke_width=2)"
        ),
    );
    code.layout(format!("{bg}.move_to({content})"));

    code.reveal(vec![format!("FadeIn({label})")], 0.4);
    code.reveal(vec![format!("DrawBorderThenFill({bg})")], 0.5);
    match &figure {
        Some(fig) => code.reveal(
            vec![
                format!("Create({fig})"),
                format!("FadeIn({text}, shift=UP * 0.1)"),
            ],
            0.9,
        ),
        None => code.reveal(vec![format!("FadeIn({text}, shift=UP * 0.1)")], 0.7),
    }
    cx.hold(code);
    code.clear_all(0.5);
}

fn step_color(step: &SolutionStep) -> String {
    step.highlight_color
        .as_deref()
        .and_then(HexColor::parse)
        .map(|c| c.as_str().to_owned())
        .unwrap_or_else(|| {
            let idx = (step.step_number.max(1) as usize - 1) % STEP_COLORS.len();
            STEP_COLORS[idx].to_owned()
        })
}

pub(crate) fn solution_step(cx: &SegmentCtx<'_>, step: &SolutionStep, code: &mut SegmentCode) {
    let n = step.step_number.max(1);
    let color = py_str(&step_color(step));
    let title_text = nonblank(step.step_title.as_deref())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("步骤 {n}"));

    let badge = code.create("badge", format!("self._step_badge({n}, {color})"));
    let title = code.create(
        "step_title",
        tx(
            &format!("  {title_text}"),
            &format!("font_size=30, color={color}, weight=BOLD"),
        ),
    );
    let header = code.group(
        "header",
        &[badge, title],
        ".arrange(RIGHT, buff=0.1)",
    );
    code.layout(format!("{header}.to_corner(UL, buff=0.5)"));

    let mut lines = Vec::with_capacity(step.content_lines.len());
    for (i, line) in step.content_lines.iter().enumerate() {
        let kw = format!("font_size=28, color={}", py_str(TEXT));
        lines.push(code.create(&format!("c{i}"), tx(line, &kw)));
    }
    code.reveal(vec![format!("FadeIn({header})")], 0.5);

    let mut anchor = header.clone();
    if !lines.is_empty() {
        let content = code.group(
            "content",
            &lines,
            ".arrange(DOWN, aligned_edge=LEFT, buff=0.15)",
        );
        code.layout(format!(
            "{content}.next_to({header}, DOWN, buff=0.4).align_to({header}, LEFT).shift(RIGHT * 0.5)"
        ));
        code.reveal(vec![format!("FadeIn({content}, shift=RIGHT * 0.1)")], 0.5);
        anchor = content;
    }

    let formula = step
        .formula
        .as_deref()
        .map(|f| f.trim())
        .filter(|f| !f.trim_matches('$').trim().is_empty());
    if let Some(f) = formula {
        let expr = if has_non_latin_script(f) {
            tx(f, "font_size=32, color=WHITE")
        } else {
            format!(
                "MathTex({}, color=WHITE, font_size=38)",
                py_str(f.trim_matches('$').trim())
            )
        };
        let formula = code.create("formula", expr);
        let bg = code.create(
            "formula_bg",
            format!("BackgroundRectangle({formula}, color={color}, fill_opacity=0.25, buff=0.2)"),
        );
        let grp = code.group("formula_group", &[bg.clone(), formula.clone()], "");
        code.layout(format!(
            "{grp}.next_to({anchor}, DOWN, buff=0.3).align_to({anchor}, LEFT)"
        ));
        code.reveal(
            vec![format!("FadeIn({bg})"), format!("Write({formula})")],
            0.7,
        );
        let indicator = code.create(
            "indicator",
            format!("self._highlight_box({formula}, {color})"),
        );
        code.reveal(vec![format!("Create({indicator})")], 0.4);
    }
    cx.hold(code);
    code.clear_all(0.5);
}

pub(crate) fn summary(cx: &SegmentCtx<'_>, s: &Summary, code: &mut SegmentCode) {
    let title_text = nonblank(s.title.as_deref()).unwrap_or("解题总结");
    let title = code.create(
        "title",
        tx(title_text, &format!("font_size=36, weight=BOLD, color={}", py_str(AMBER))),
    );
    code.layout(format!("{title}.to_edge(UP, buff=0.8)"));

    let mut points = Vec::with_capacity(s.points.len());
    for (i, p) in s.points.iter().enumerate() {
        points.push(code.create(
            &format!("pt{i}"),
            tx(&format!("✓  {p}"), "font_size=26, color=\"#86efac\""),
        ));
    }
    let mut anchor = title.clone();
    let pts = if points.is_empty() {
        None
    } else {
        let g = code.group(
            "points",
            &points,
            ".arrange(DOWN, aligned_edge=LEFT, buff=0.25)",
        );
        code.layout(format!("{g}.next_to({title}, DOWN, buff=0.5)"));
        anchor = g.clone();
        Some(g)
    };

    let insight = nonblank(s.key_insight.as_deref())
        .map(|text| insight_panel(code, text, anchor.as_str(), InsightShape::Rounded));

    code.reveal(vec![format!("Write({title})")], 0.6);
    if let Some(g) = &pts {
        code.reveal(
            vec![format!("FadeIn({g}, shift=UP * 0.1, lag_ratio=0.2)")],
            0.8,
        );
    }
    if let Some((txt, bg)) = &insight {
        code.reveal(vec![format!("DrawBorderThenFill({bg})")], 0.4);
        code.reveal(vec![format!("FadeIn({txt})")], 0.3);
    }
    cx.hold(code);
    code.clear_all(0.6);
}

enum InsightShape {
    /// Box sized from the text, placed below the anchor.
    Rounded,
    /// Box hugging the text, placed further below the anchor.
    Surrounding,
}

/// `💡` insight text on an amber panel. Returns `(text, box)`.
fn insight_panel(
    code: &mut SegmentCode,
    text: &str,
    anchor: &str,
    shape: InsightShape,
) -> (Handle, Handle) {
    let txt = code.create(
        "insight",
        tx(
            &format!("💡  {text}"),
            &format!("font_size=24, color={}", py_str(AMBER_STROKE)),
        ),
    );
    let (expr, buff) = match shape {
        InsightShape::Rounded => (
            format!(
                "RoundedRectangle(corner_radius=0.15, width={txt}.width + 0.8, \
                 height={txt}.height + 0.4, fill_color={}, fill_opacity=0.7, \
                 stroke_color={}, stroke_width=2)",
                py_str(ORANGE_DARK),
                py_str(AMBER)
            ),
            0.4,
        ),
        InsightShape::Surrounding => (
            format!(
                "SurroundingRectangle({txt}, corner_radius=0.15, buff=0.2, fill_color={}, \
                 fill_opacity=0.6, stroke_color={}, stroke_width=2)",
                py_str(ORANGE_DARK),
                py_str(AMBER)
            ),
            0.7,
        ),
    };
    let bg = code.create("insight_box", expr);
    code.layout(format!("{bg}.next_to({anchor}, DOWN, buff={buff})"));
    code.layout(format!("{txt}.move_to({bg})"));
    (txt, bg)
}

pub(crate) fn answer_reveal(cx: &SegmentCtx<'_>, a: &AnswerReveal, code: &mut SegmentCode) {
    let question = nonblank(a.question.as_deref()).map(|q| {
        let h = code.create("question", tx(q, &format!("font_size=34, color={}", py_str(MUTED))));
        code.layout(format!("{h}.move_to(UP * 1.8)"));
        h
    });
    let answer = nonblank(a.answer.as_deref()).map(|ans| {
        let h = code.create(
            "answer",
            tx(ans, &format!("font_size=64, color={}, weight=BOLD", py_str(GREEN))),
        );
        match &question {
            Some(q) => code.layout(format!("{h}.next_to({q}, DOWN, buff=0.4)")),
            None => code.layout(format!("{h}.move_to(UP * 0.4)")),
        }
        let bg = code.create(
            "answer_box",
            format!(
                "SurroundingRectangle({h}, corner_radius=0.2, buff=0.35, fill_color={}, \
                 fill_opacity=0.6, stroke_color={}, stroke_width=3)",
                py_str(GREEN_DARK),
                py_str(GREEN)
            ),
        );
        (h, bg)
    });
    let anchor = answer
        .as_ref()
        .map(|(h, _)| h.clone())
        .or_else(|| question.clone());
    let insight = nonblank(a.key_insight.as_deref()).map(|text| {
        let anchor = anchor.as_ref().map_or("ORIGIN", Handle::as_str);
        insight_panel(code, text, anchor, InsightShape::Surrounding)
    });

    if question.is_none() && answer.is_none() && insight.is_none() {
        code.comment("answer_reveal has no question, answer or insight");
    }
    if let Some(q) = &question {
        code.reveal(vec![format!("FadeIn({q}, shift=UP * 0.3)")], 0.5);
    }
    if let Some((h, bg)) = &answer {
        code.reveal(vec![format!("DrawBorderThenFill({bg})")], 0.5);
        code.reveal(vec![format!("FadeIn({h})")], 0.6);
    }
    if let Some((txt, bg)) = &insight {
        code.reveal(vec![format!("DrawBorderThenFill({bg})")], 0.4);
        code.reveal(vec![format!("FadeIn({txt})")], 0.4);
    }
    cx.hold(code);
    code.clear_all(0.5);
}

#[cfg(test)]
#[path = "../../tests/unit/handlers/text.rs"]
mod tests;
