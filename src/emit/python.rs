//! Python rendering of emitted ops plus the literal helpers handlers build expressions with.

use crate::emit::ops::{Handle, Op};
use crate::foundation::core::Point3;
use std::fmt::Write as _;

/// Double-quoted Python string literal.
pub fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Deterministic number literal: rounded to 1e-3, no negative zero.
pub fn py_num(x: f64) -> String {
    if !x.is_finite() {
        return "0".to_owned();
    }
    let r = (x * 1000.0).round() / 1000.0;
    let r = if r == 0.0 { 0.0 } else { r };
    format!("{r}")
}

/// `np.array([x, y, z])`
pub fn py_point(p: Point3) -> String {
    format!(
        "np.array([{}, {}, {}])",
        py_num(p.x),
        py_num(p.y),
        py_num(p.z)
    )
}

/// Comments are single-line; embedded line breaks become spaces.
pub fn comment_text(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

fn join_handles(handles: &[Handle]) -> String {
    handles
        .iter()
        .map(Handle::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Append `ops` to `out`, one statement per line, indented by `indent` spaces.
pub fn write_ops(out: &mut String, ops: &[Op], indent: usize) {
    let pad = " ".repeat(indent);
    for op in ops {
        match op {
            Op::Comment(text) => {
                let _ = writeln!(out, "{pad}# {}", comment_text(text));
            }
            Op::Create { handle, expr } => {
                let _ = writeln!(out, "{pad}{handle} = {expr}");
            }
            Op::Layout(stmt) => {
                let _ = writeln!(out, "{pad}{stmt}");
            }
            Op::Raw(lines) => {
                // An entry may itself hold several lines; each one gets the body indent.
                for line in lines.iter().flat_map(|l| l.lines()) {
                    let _ = writeln!(out, "{pad}{}", line.trim_end());
                }
            }
            Op::Reveal { anims, run_time } => {
                let _ = writeln!(
                    out,
                    "{pad}self.play({}, run_time={})",
                    anims.join(", "),
                    py_num(*run_time)
                );
            }
            Op::Wait(secs) => {
                let _ = writeln!(out, "{pad}self.wait({})", py_num(*secs));
            }
            Op::Clear {
                handles,
                slots,
                run_time,
            } => {
                let mut anims = Vec::with_capacity(slots.len() + 1);
                if !handles.is_empty() {
                    anims.push(format!("FadeOut(VGroup({}))", join_handles(handles)));
                }
                for slot in slots {
                    anims.push(format!("FadeOut(self.{})", slot.attr()));
                }
                let _ = writeln!(
                    out,
                    "{pad}self.play({}, run_time={})",
                    anims.join(", "),
                    py_num(*run_time)
                );
            }
            Op::Bind { slot, members } => {
                let _ = writeln!(
                    out,
                    "{pad}self.{} = VGroup({})",
                    slot.attr(),
                    join_handles(members)
                );
            }
            Op::Release(slot) => {
                let _ = writeln!(out, "{pad}self.{} = None", slot.attr());
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/emit/python.rs"]
mod tests;
