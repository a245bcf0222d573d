use crate::emit::ops::{Handle, SegmentCode, Slot};
use crate::emit::python::py_str;
use crate::handlers::carry::CarryOver;
use crate::handlers::{SegmentCtx, TEXT, nonblank, tx};
use crate::storyboard::model::EquationChain;

/// Look of one right-panel derivation chain.
struct PanelLook {
    default_title: &'static str,
    title_color: &'static str,
    line_size: u32,
    result_size: u32,
    result_color: &'static str,
    result_fill: &'static str,
}

const CALC: PanelLook = PanelLook {
    default_title: "推导过程",
    title_color: "#f59e0b",
    line_size: 19,
    result_size: 21,
    result_color: "#c4b5fd",
    result_fill: "#4c1d95",
};

const ASSEMBLY: PanelLook = PanelLook {
    default_title: "化整为零！",
    title_color: "#10b981",
    line_size: 21,
    result_size: 30,
    result_color: "#34d399",
    result_fill: "#064e3b",
};

/// Title, lines each anchored below the previous one, then the boxed result.
fn panel(code: &mut SegmentCode, chain: &EquationChain, look: &PanelLook) -> Vec<Handle> {
    let title_text = nonblank(chain.title.as_deref()).unwrap_or(look.default_title);
    let title = code.create(
        "panel_title",
        format!(
            "self.right_panel_title({}, color={})",
            py_str(title_text),
            py_str(look.title_color)
        ),
    );
    code.reveal(vec![format!("FadeIn({title})")], 0.4);

    let mut made = vec![title.clone()];
    let mut prev = title;
    for (k, line) in chain.lines.iter().enumerate() {
        let buff = if k == 0 { "0.4" } else { "0.25" };
        let expr = format!(
            "{}.next_to({prev}, DOWN, buff={buff}).align_to({prev}, LEFT)",
            tx(line, &format!("font_size={}, color={}", look.line_size, py_str(TEXT)))
        );
        let h = code.create(&format!("eq{k}"), expr);
        code.reveal(vec![format!("FadeIn({h})")], 0.5);
        made.push(h.clone());
        prev = h;
    }

    if let Some(result) = nonblank(chain.result.as_deref()) {
        let kw = format!(
            "font_size={}, color={}, weight=BOLD",
            look.result_size,
            py_str(look.result_color)
        );
        let txt = code.create(
            "result",
            format!(
                "{}.next_to({prev}, DOWN, buff=0.4).align_to({prev}, LEFT)",
                tx(result, &kw)
            ),
        );
        let bg = code.create(
            "result_box",
            format!(
                "self.result_box({txt}, {}, {})",
                py_str(look.result_color),
                py_str(look.result_fill)
            ),
        );
        code.reveal(vec![format!("DrawBorderThenFill({bg})")], 0.4);
        code.reveal(vec![format!("FadeIn({txt})")], 0.4);
        made.push(txt);
        made.push(bg);
    }
    made
}

fn indicate_highlight(code: &mut SegmentCode, carry: &CarryOver) {
    if carry.is_live(Slot::Highlight) {
        code.reveal(
            vec![format!(
                "Indicate(self.{}, color=\"#fbbf24\", scale_factor=1.1)",
                Slot::Highlight.attr()
            )],
            0.8,
        );
    }
}

pub(crate) fn equation_steps(
    cx: &SegmentCtx<'_>,
    chain: &EquationChain,
    code: &mut SegmentCode,
    carry: CarryOver,
) -> CarryOver {
    let carry = carry.dispose_stale(Slot::Calc, code);
    let made = panel(code, chain, &CALC);
    indicate_highlight(code, &carry);
    cx.hold(code);
    carry.fill(Slot::Calc, made, code)
}

/// Dispose the calculation panel, show the assembly, then tear down every carried group.
pub(crate) fn final_equation(
    cx: &SegmentCtx<'_>,
    chain: &EquationChain,
    code: &mut SegmentCode,
    mut carry: CarryOver,
) -> CarryOver {
    if carry.take(Slot::Calc).is_some() {
        code.clear_slots(vec![Slot::Calc], Vec::new(), 0.4);
        code.release(Slot::Calc);
    }

    let made = panel(code, chain, &ASSEMBLY);
    indicate_highlight(code, &carry);
    cx.hold(code);
    code.bind(Slot::Assembly, made.clone());

    let mut slots = Vec::with_capacity(3);
    for slot in [Slot::Figure, Slot::Highlight] {
        if carry.take(slot).is_some() {
            slots.push(slot);
        }
    }
    slots.push(Slot::Assembly);
    code.clear_slots(slots, made, 0.6);
    for slot in [Slot::Figure, Slot::Highlight, Slot::Assembly] {
        code.release(slot);
    }
    carry
}

#[cfg(test)]
#[path = "../../tests/unit/handlers/equation.rs"]
mod tests;
