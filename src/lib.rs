//! Compile lesson storyboards into Manim scene scripts, and drive the narration, muxing and
//! persona-sync tools around them.
//!
//! The core entry point is [`generate`]: a [`Storyboard`] goes in, a [`GeneratedScript`] comes
//! out, with every recoverable problem reported as a [`Diagnostic`] rather than an error.

#![forbid(unsafe_code)]

mod classify;
mod emit;
mod foundation;
mod handlers;
mod media;
mod narrate;
mod normalize;
mod script;
mod storyboard;
mod style;
mod sync;

pub use classify::role::{RoleCategory, RoleContext, classify_role};
pub use emit::ops::{Diagnostic, DiagnosticKind, Handle, Op, Slot};
pub use foundation::core::{HexColor, Point3};
pub use foundation::error::{StoryError, StoryResult};
pub use handlers::carry::CarryOver;
pub use handlers::geometry::UNRESOLVED_MARKER;
pub use media::mux::{FitPlan, MuxManifest, MuxPair, MuxReport, mux, plan_fit};
pub use media::probe::probe_duration;
pub use narrate::batch::{NarratedItem, NarrationReport, load_narration_items, narrate};
pub use narrate::synth::{
    AudioArtifact, DEFAULT_RATE, DEFAULT_VOICE, EdgeTts, NarrationOpts, SpeechSynthesizer,
};
pub use normalize::schema::{PathElem, SchemaError};
pub use script::generate::{GeneratedScript, SegmentReport, generate};
pub use script::opts::GeneratorOpts;
pub use script::output::write_script;
pub use storyboard::model::{
    AnswerReveal, Coord, EquationChain, Figure, Label, NarrationItem, PointMark, Segment,
    SegmentKind, SolutionStep, Storyboard, StyleSpec, Summary, TextCard, TitleCard, Vertices,
    VisualElement,
};
pub use style::extract::{ExtractedStyle, category_defaults, extract_style};
pub use sync::config::{GitConfig, SyncConfig};
pub use sync::git::{CommandRunner, SystemRunner};
pub use sync::run::{SyncOpts, SyncOutcome, SyncReport, sync};
