//! Timeline abstraction
//!
//! The engine's scheduling logic is written against this minimal trait
//! rather than any particular animation runtime, so the builder and
//! lifecycle manager are unit-testable with a recording fake. Segments are
//! plain serializable data: the engine schedules them and derives state from
//! progress; materializing property values is the renderer's job.

use crate::actor::ActorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named easing curve attached to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ease {
    Linear,
    SineInOut,
    QuadIn,
    QuadOut,
    QuadInOut,
    BackOut,
    BounceOut,
}

/// Where a segment starts relative to the timeline built so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Immediately after the previous segment ends.
    Sequence,
    /// Offset in seconds from the previous segment's end; negative values
    /// overlap the predecessor.
    Relative(f32),
    /// Absolute time in seconds from the timeline start.
    Absolute(f32),
}

/// How many extra cycles a segment plays after its first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    None,
    Times(u32),
    Infinite,
}

/// A tweened or literal property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Number(f32),
    Text(String),
}

impl From<f32> for PropValue {
    fn from(value: f32) -> Self {
        PropValue::Number(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

/// One authored step of a timeline: a tween, hold, or parallel insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSegment {
    pub targets: Vec<ActorId>,
    pub props: BTreeMap<String, PropValue>,
    pub duration: f32,
    pub ease: Ease,
    pub position: Position,
    pub repeat: Repeat,
    pub yoyo: bool,
}

impl TimelineSegment {
    /// A tween over the given targets. Properties, easing, and placement are
    /// attached with the chained setters below.
    pub fn tween(targets: Vec<ActorId>, duration: f32) -> Self {
        Self {
            targets,
            props: BTreeMap::new(),
            duration,
            ease: Ease::Linear,
            position: Position::Sequence,
            repeat: Repeat::None,
            yoyo: false,
        }
    }

    /// A targetless hold that only consumes time.
    pub fn hold(duration: f32) -> Self {
        Self::tween(Vec::new(), duration)
    }

    pub fn prop(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    /// Length of one play cycle. A yoyo cycle runs there and back.
    pub fn cycle_len(&self) -> f32 {
        if self.yoyo {
            self.duration * 2.0
        } else {
            self.duration
        }
    }

    /// Time the segment occupies on its timeline. An infinitely repeating
    /// segment contributes one cycle; the loop itself belongs to the clock.
    pub fn placed_len(&self) -> f32 {
        match self.repeat {
            Repeat::None | Repeat::Infinite => self.cycle_len(),
            Repeat::Times(extra) => self.cycle_len() * (extra + 1) as f32,
        }
    }
}

/// Minimal clock interface the engine schedules against.
///
/// All four storyline clocks (master plus the three auxiliary loops) are
/// driven through this trait from one shared per-frame tick source, so a
/// single rate or play/pause call can be applied to them uniformly.
pub trait Timeline {
    fn add_segment(&mut self, segment: TimelineSegment);

    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;

    fn set_rate(&mut self, rate: f32);
    fn rate(&self) -> f32;

    /// Advance by `dt` wall-clock seconds. Implementations scale by their
    /// current rate and do nothing while paused or disposed.
    fn advance(&mut self, dt: f32);

    /// Normalized position in `[0, 1)` within the current loop.
    fn progress(&self) -> f32;

    /// Length of one loop in seconds.
    fn duration(&self) -> f32;

    /// Cancel all pending work immediately. Idempotent; every other method
    /// is a no-op afterwards.
    fn dispose(&mut self);
    fn is_disposed(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_builder_defaults() {
        let seg = TimelineSegment::tween(vec![ActorId::Vehicle], 1.5);
        assert_eq!(seg.duration, 1.5);
        assert_eq!(seg.ease, Ease::Linear);
        assert_eq!(seg.position, Position::Sequence);
        assert_eq!(seg.repeat, Repeat::None);
        assert!(!seg.yoyo);
        assert!(seg.props.is_empty());
    }

    #[test]
    fn test_segment_chained_setters() {
        let seg = TimelineSegment::tween(vec![ActorId::Hood], 0.8)
            .prop("rotation", -60.0)
            .ease(Ease::QuadOut)
            .at(Position::Relative(-0.2))
            .repeat(Repeat::Times(4))
            .yoyo();
        assert_eq!(seg.props.get("rotation"), Some(&PropValue::Number(-60.0)));
        assert_eq!(seg.position, Position::Relative(-0.2));
        assert_eq!(seg.repeat, Repeat::Times(4));
        assert!(seg.yoyo);
    }

    #[test]
    fn test_placed_len_accounts_for_repeat_and_yoyo() {
        let plain = TimelineSegment::hold(1.0);
        assert_eq!(plain.placed_len(), 1.0);

        let repeated = TimelineSegment::hold(0.25).repeat(Repeat::Times(3));
        assert_eq!(repeated.placed_len(), 1.0);

        let yoyoed = TimelineSegment::hold(0.4).yoyo().repeat(Repeat::Times(1));
        assert!((yoyoed.placed_len() - 1.6).abs() < 1e-6);

        let infinite = TimelineSegment::hold(0.5).repeat(Repeat::Infinite);
        assert_eq!(infinite.placed_len(), 0.5);
    }

    #[test]
    fn test_segment_serializes_with_kebab_ease() {
        let seg = TimelineSegment::tween(vec![ActorId::MechanicDot], 2.2)
            .prop("x", 80.0)
            .ease(Ease::SineInOut);
        let json = serde_json::to_string(&seg).unwrap();
        assert!(json.contains("\"sine-in-out\""), "got: {}", json);
        assert!(json.contains("mechanic_dot"), "got: {}", json);

        let back: TimelineSegment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seg);
    }
}
