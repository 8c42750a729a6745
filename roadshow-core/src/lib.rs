//! Roadshow Core Library
//!
//! This crate provides the data model and pure derivation functions for the
//! looping roadside-rescue storyline: actor bindings, the scene threshold
//! table, telemetry interpolation, and the timeline abstraction the engine
//! builds against.

pub mod actor;
pub mod derive;
pub mod scale;
pub mod scene;
pub mod script;
pub mod telemetry;
pub mod timeline;

pub use actor::{ActorId, ActorRegistry, MissingBindings};
pub use derive::{derive_frame, StageFrame};
pub use scale::{compute_scale, StageMetrics};
pub use scene::{scene_for, Scene};
pub use script::{MessageRecord, StoryScript};
pub use telemetry::TelemetrySnapshot;
pub use timeline::{Timeline, TimelineSegment};
