//! Roadshow engine: frame-driven clocks for the looping storyline
//!
//! Builds the master timeline and the three auxiliary loops from actor
//! bindings and viewport metrics, keeps them rate-locked, and manages their
//! lifecycle so no clock survives a rebuild or teardown.

pub mod builder;
pub mod clock;
pub mod lifecycle;
pub mod sync;

pub use builder::{build, ClockSet};
pub use clock::FrameTimeline;
pub use lifecycle::{Lifecycle, Phase, PlaybackState};
