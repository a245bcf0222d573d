use std::collections::BTreeMap;

/// Local name of one created visual object.
///
/// Names are prefixed with the 1-based segment ordinal (`s3_shaded_0`) so that handles from
/// different segments never collide inside the single generated procedure.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(String);

impl Handle {
    pub(crate) fn new(ordinal: usize, local: &str) -> Self {
        Self(format!("s{ordinal}_{local}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named cross-segment group stored on the scene instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Figure,
    Highlight,
    Calc,
    /// Built and disposed inside `final_equation`.
    Assembly,
}

impl Slot {
    /// Attribute name on the scene (`self.<attr>`).
    pub fn attr(self) -> &'static str {
        match self {
            Self::Figure => "currentFigure",
            Self::Highlight => "currentHighlight",
            Self::Calc => "currentCalc",
            Self::Assembly => "currentAssembly",
        }
    }
}

/// Non-fatal conditions absorbed during generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnresolvedGeometry,
    UnclassifiedElement,
    UnknownSegmentKind,
    MalformedSegment,
}

/// One degraded spot in the artifact, mirrored by a comment in the generated code.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 1-based segment ordinal.
    pub segment: usize,
    pub message: String,
}

/// One instruction of the emitted procedure.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Comment(String),
    /// `handle = expr`
    Create { handle: Handle, expr: String },
    /// Statement over existing handles (positioning, arranging).
    Layout(String),
    /// Caller-supplied statements, emitted verbatim.
    Raw(Vec<String>),
    /// `self.play(anims..., run_time=t)`
    Reveal { anims: Vec<String>, run_time: f64 },
    Wait(f64),
    /// Fade out local handles and/or live slots in one play call.
    Clear {
        handles: Vec<Handle>,
        slots: Vec<Slot>,
        run_time: f64,
    },
    /// `self.<slot> = VGroup(members...)`
    Bind { slot: Slot, members: Vec<Handle> },
    /// `self.<slot> = None`
    Release(Slot),
}

/// Emission of one segment: ops in order plus the bookkeeping the orchestrator reports.
#[derive(Clone, Debug)]
pub struct SegmentCode {
    ordinal: usize,
    pub(crate) ops: Vec<Op>,
    pub(crate) created: Vec<Handle>,
    pub(crate) disposed: Vec<Handle>,
    pub(crate) disposed_slots: Vec<Slot>,
    pub(crate) bound: Vec<(Slot, Vec<Handle>)>,
    pub(crate) released: Vec<Slot>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// member -> enclosing group handle
    group_of: BTreeMap<Handle, Handle>,
    animated_secs: f64,
}

impl SegmentCode {
    pub(crate) fn new(ordinal: usize) -> Self {
        Self {
            ordinal,
            ops: Vec::new(),
            created: Vec::new(),
            disposed: Vec::new(),
            disposed_slots: Vec::new(),
            bound: Vec::new(),
            released: Vec::new(),
            diagnostics: Vec::new(),
            group_of: BTreeMap::new(),
            animated_secs: 0.0,
        }
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub(crate) fn comment(&mut self, text: impl Into<String>) {
        self.ops.push(Op::Comment(text.into()));
    }

    pub(crate) fn create(&mut self, local: &str, expr: impl Into<String>) -> Handle {
        let handle = Handle::new(self.ordinal, local);
        self.ops.push(Op::Create {
            handle: handle.clone(),
            expr: expr.into(),
        });
        self.created.push(handle.clone());
        handle
    }

    /// Create `VGroup(members...)` with an optional trailing method chain.
    pub(crate) fn group(&mut self, local: &str, members: &[Handle], chain: &str) -> Handle {
        let list = members
            .iter()
            .map(Handle::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let handle = self.create(local, format!("VGroup({list}){chain}"));
        for m in members {
            self.group_of.insert(m.clone(), handle.clone());
        }
        handle
    }

    pub(crate) fn layout(&mut self, stmt: impl Into<String>) {
        self.ops.push(Op::Layout(stmt.into()));
    }

    pub(crate) fn raw(&mut self, lines: Vec<String>) {
        if !lines.is_empty() {
            self.ops.push(Op::Raw(lines));
        }
    }

    pub(crate) fn reveal(&mut self, anims: Vec<String>, run_time: f64) {
        if anims.is_empty() {
            return;
        }
        self.animated_secs += run_time;
        self.ops.push(Op::Reveal { anims, run_time });
    }

    pub(crate) fn wait(&mut self, secs: f64) {
        self.animated_secs += secs;
        self.ops.push(Op::Wait(secs));
    }

    /// Hold the frame for the rest of the narration, or `default` when no duration is known.
    ///
    /// With a duration the hold is `duration - time animated so far`, floored at `min`.
    pub(crate) fn hold(&mut self, duration: Option<f64>, default: f64, min: f64) {
        let secs = match duration {
            Some(d) => (d - self.animated_secs).max(min),
            None => default,
        };
        self.wait(secs);
    }

    /// Fade out local handles and live slots together.
    ///
    /// Every local handle is recorded as disposed; members of a group that is cleared in the
    /// same call are left out of the emitted `VGroup` since the group already covers them.
    pub(crate) fn clear(&mut self, handles: Vec<Handle>, slots: Vec<Slot>, run_time: f64) {
        if handles.is_empty() && slots.is_empty() {
            return;
        }
        self.disposed.extend(handles.iter().cloned());
        self.disposed_slots.extend(slots.iter().copied());
        let top: Vec<Handle> = handles
            .iter()
            .filter(|h| {
                self.group_of
                    .get(*h)
                    .is_none_or(|g| !handles.contains(g))
            })
            .cloned()
            .collect();
        self.animated_secs += run_time;
        self.ops.push(Op::Clear {
            handles: top,
            slots,
            run_time,
        });
    }

    /// Fade out live slots only. `covered` are this segment's handles reachable through them.
    pub(crate) fn clear_slots(&mut self, slots: Vec<Slot>, covered: Vec<Handle>, run_time: f64) {
        if slots.is_empty() {
            return;
        }
        self.disposed.extend(covered);
        self.clear(Vec::new(), slots, run_time);
    }

    /// Clear every handle this segment created so far.
    pub(crate) fn clear_all(&mut self, run_time: f64) {
        let handles = self.created.clone();
        self.clear(handles, Vec::new(), run_time);
    }

    pub(crate) fn bind(&mut self, slot: Slot, members: Vec<Handle>) {
        self.bound.push((slot, members.clone()));
        self.ops.push(Op::Bind { slot, members });
    }

    pub(crate) fn release(&mut self, slot: Slot) {
        self.released.push(slot);
        self.ops.push(Op::Release(slot));
    }

    pub(crate) fn diagnose(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(segment = self.ordinal, ?kind, %message, "degraded output");
        self.diagnostics.push(Diagnostic {
            kind,
            segment: self.ordinal,
            message,
        });
    }

    /// Total seconds of reveals, waits and clears emitted so far.
    pub fn animated_secs(&self) -> f64 {
        self.animated_secs
    }

    pub fn created(&self) -> &[Handle] {
        &self.created
    }

    pub fn disposed(&self) -> &[Handle] {
        &self.disposed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/emit/ops.rs"]
mod tests;
