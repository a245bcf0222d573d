use crate::emit::python::py_str;
use crate::emit::ops::Slot;
use crate::script::opts::GeneratorOpts;
use std::fmt::Write as _;

/// Indentation of statements inside `_run_all_segments`.
pub(crate) const BODY_INDENT: usize = 8;

const HELPERS: &str = r##"
    def _tx(self, text, **kw):
        return Text(text, font=FONT, **kw)

    def _highlight_box(self, mobject, color, padding=0.2):
        return SurroundingRectangle(mobject, color=color, corner_radius=0.1,
                                    buff=padding, stroke_width=3)

    def _step_badge(self, number, color):
        circle = Circle(radius=0.28, fill_color=color, fill_opacity=1, stroke_width=0)
        label = self._tx(str(number), font_size=18, color=WHITE, weight=BOLD)
        label.move_to(circle)
        return VGroup(circle, label)

    def right_panel_title(self, text, color="#f59e0b"):
        t = self._tx(text, font_size=22, color=color, weight=BOLD)
        t.to_corner(UR, buff=0.6).shift(DOWN * 0.8)
        return t

    def result_box(self, mobject, color, fill):
        return SurroundingRectangle(mobject, corner_radius=0.12, buff=0.18,
                                    fill_color=fill, fill_opacity=0.4,
                                    stroke_color=color, stroke_width=2)
"##;

/// Module header, scene class, helpers and the opening of `_run_all_segments`.
pub(crate) fn preamble(opts: &GeneratorOpts) -> String {
    let mut out = String::new();
    out.push_str("from manim import *\nimport numpy as np\n\n");
    let _ = writeln!(out, "FONT = {}", py_str(&opts.font));
    let _ = writeln!(out, "BACKGROUND = {}", py_str(&opts.background));
    out.push_str("\n\n");
    let _ = writeln!(out, "class {}(Scene):", opts.scene_name);
    out.push_str("    def construct(self):\n");
    out.push_str("        self.camera.background_color = BACKGROUND\n");
    for slot in [Slot::Figure, Slot::Highlight, Slot::Calc] {
        let _ = writeln!(out, "        self.{} = None", slot.attr());
    }
    out.push_str("        self._run_all_segments()\n");
    out.push_str(HELPERS);
    out.push_str("\n    def _run_all_segments(self):\n");
    out
}

/// Fixed tail of the procedure.
pub(crate) fn terminal() -> &'static str {
    "        self.wait(1)\n"
}
