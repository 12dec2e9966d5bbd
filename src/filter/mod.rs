//! # Filter Graphs
//!
//! Typed descriptions of the two filter graphs handed to the engine. Each
//! graph is built as a list of stages and serialized once through `Display`,
//! which produces the engine's textual filter syntax.

pub mod graph;
pub mod mix;

pub use graph::{Fade, FilterGraphSpec, FilterStage, Pad, Scale, ZoomPan, EFFECT_WINDOW_FRAMES};
pub use mix::{MixGraphSpec, MIX_OUTPUT_LABEL, VIDEO_STREAM};
