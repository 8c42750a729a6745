//! Frame-driven timeline clock
//!
//! `FrameTimeline` is the concrete [`Timeline`] used in production. It
//! places authored segments on a time axis, loops indefinitely, and advances
//! only when the shared tick source feeds it wall-clock time. There is no
//! internal timer: whoever owns the frame loop calls `advance`, so disposing
//! a clock cancels everything synchronously.

use roadshow_core::timeline::{Position, Timeline, TimelineSegment};
use serde::Serialize;

/// A segment fixed to its position on the clock's time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedSegment {
    pub start: f32,
    pub end: f32,
    pub segment: TimelineSegment,
}

/// Looping clock that schedules segments and reports normalized progress.
#[derive(Debug)]
pub struct FrameTimeline {
    placed: Vec<PlacedSegment>,
    duration: f32,
    elapsed: f32,
    rate: f32,
    playing: bool,
    disposed: bool,
}

impl FrameTimeline {
    pub fn new() -> Self {
        Self {
            placed: Vec::new(),
            duration: 0.0,
            elapsed: 0.0,
            rate: 1.0,
            playing: true,
            disposed: false,
        }
    }

    /// The authored schedule, for renderers and inspection.
    pub fn segments(&self) -> &[PlacedSegment] {
        &self.placed
    }
}

impl Default for FrameTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline for FrameTimeline {
    fn add_segment(&mut self, segment: TimelineSegment) {
        if self.disposed {
            return;
        }
        // Relative and sequence placement anchor to the timeline end built
        // so far, so a negative offset overlaps the tail of the schedule.
        let start = match segment.position {
            Position::Sequence => self.duration,
            Position::Relative(offset) => (self.duration + offset).max(0.0),
            Position::Absolute(t) => t.max(0.0),
        };
        let end = start + segment.placed_len();
        self.duration = self.duration.max(end);
        self.placed.push(PlacedSegment {
            start,
            end,
            segment,
        });
    }

    fn play(&mut self) {
        if self.disposed {
            return;
        }
        self.playing = true;
    }

    fn pause(&mut self) {
        if self.disposed {
            return;
        }
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing && !self.disposed
    }

    fn set_rate(&mut self, rate: f32) {
        if self.disposed {
            return;
        }
        self.rate = rate;
    }

    fn rate(&self) -> f32 {
        self.rate
    }

    fn advance(&mut self, dt: f32) {
        if self.disposed || !self.playing || self.duration <= 0.0 {
            return;
        }
        self.elapsed = (self.elapsed + dt * self.rate).rem_euclid(self.duration);
    }

    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        let p = self.elapsed / self.duration;
        if p >= 1.0 {
            0.0
        } else {
            p
        }
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn dispose(&mut self) {
        self.playing = false;
        self.disposed = true;
        self.placed.clear();
        self.duration = 0.0;
        self.elapsed = 0.0;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
