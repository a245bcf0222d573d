use crate::emit::ops::{Handle, SegmentCode, Slot};

/// Cross-segment groups left live on the scene.
///
/// Threaded by value through every handler call: a handler receives the slots as they stood
/// after the previous segment and returns them as they stand after its own. `final_equation`
/// is the only consumer that empties all three.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CarryOver {
    /// Set by `geometry_drawing`.
    pub figure: Option<Vec<Handle>>,
    /// Set by `highlight_geometry`.
    pub highlight: Option<Vec<Handle>>,
    /// Set by `equation_steps`.
    pub calc: Option<Vec<Handle>>,
}

impl CarryOver {
    fn slot_mut(&mut self, slot: Slot) -> Option<&mut Option<Vec<Handle>>> {
        match slot {
            Slot::Figure => Some(&mut self.figure),
            Slot::Highlight => Some(&mut self.highlight),
            Slot::Calc => Some(&mut self.calc),
            Slot::Assembly => None,
        }
    }

    /// Members of a live slot.
    pub fn get(&self, slot: Slot) -> Option<&[Handle]> {
        match slot {
            Slot::Figure => self.figure.as_deref(),
            Slot::Highlight => self.highlight.as_deref(),
            Slot::Calc => self.calc.as_deref(),
            Slot::Assembly => None,
        }
    }

    pub fn is_live(&self, slot: Slot) -> bool {
        self.get(slot).is_some()
    }

    /// `true` when no slot is live.
    pub fn is_empty(&self) -> bool {
        self.figure.is_none() && self.highlight.is_none() && self.calc.is_none()
    }

    pub(crate) fn take(&mut self, slot: Slot) -> Option<Vec<Handle>> {
        self.slot_mut(slot).and_then(Option::take)
    }

    /// Bind `members` into `slot`, both in the emitted code and in the carried state.
    pub(crate) fn fill(mut self, slot: Slot, members: Vec<Handle>, code: &mut SegmentCode) -> Self {
        code.bind(slot, members.clone());
        if let Some(s) = self.slot_mut(slot) {
            *s = Some(members);
        }
        self
    }

    /// A producer about to bind `slot` first fades out whatever an earlier segment left there.
    pub(crate) fn dispose_stale(mut self, slot: Slot, code: &mut SegmentCode) -> Self {
        if self.take(slot).is_some() {
            tracing::debug!(segment = code.ordinal(), slot = slot.attr(), "replacing live group");
            code.comment(format!("replace the {} left by an earlier segment", slot.attr()));
            code.clear_slots(vec![slot], Vec::new(), 0.4);
            code.release(slot);
        }
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/handlers/carry.rs"]
mod tests;
