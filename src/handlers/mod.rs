//! One handler per segment kind.
//!
//! Handlers append to a [`SegmentCode`]. Those that produce or consume a carry-over group
//! take the current [`carry::CarryOver`] by value and return the updated one.

pub(crate) mod carry;
pub(crate) mod equation;
pub(crate) mod geometry;
pub(crate) mod text;

use crate::emit::ops::SegmentCode;
use crate::emit::python::py_str;
use crate::script::opts::GeneratorOpts;

pub(crate) const TEXT: &str = "#e2e8f0";
pub(crate) const MUTED: &str = "#94a3b8";

/// Per-segment inputs shared by every handler.
pub(crate) struct SegmentCtx<'a> {
    pub ordinal: usize,
    /// Narration length, when known.
    pub duration: Option<f64>,
    pub opts: &'a GeneratorOpts,
}

impl SegmentCtx<'_> {
    pub fn hold(&self, code: &mut SegmentCode) {
        code.hold(
            self.duration,
            self.opts.default_hold_secs,
            self.opts.min_hold_secs,
        );
    }
}

/// `self._tx("text", kwargs)`
pub(crate) fn tx(text: &str, kwargs: &str) -> String {
    format!("self._tx({}, {kwargs})", py_str(text))
}

fn is_latin(c: char) -> bool {
    matches!(c as u32, 0x00..=0x024F | 0x1E00..=0x1EFF)
}

/// `true` when `s` has CJK ideographs, kana, hangul or full-width forms, or letters of any
/// other non-Latin script (Greek, Cyrillic, ...). Such text is set with `Text`, not `MathTex`.
pub(crate) fn has_non_latin_script(s: &str) -> bool {
    s.chars().any(|c| {
        matches!(c as u32, 0x2E80..=0x9FFF | 0xAC00..=0xD7AF | 0xF900..=0xFAFF | 0xFF00..=0xFFEF)
            || (c.is_alphabetic() && !is_latin(c))
    })
}

/// Trimmed, non-empty text.
pub(crate) fn nonblank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/handlers/mod.rs"]
mod tests;
