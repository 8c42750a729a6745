//! Timeline builder
//!
//! Authors the fixed roadside-rescue script onto a master timeline and the
//! three auxiliary loops. The build is generic over the [`Timeline`]
//! implementation so the schedule can be tested against a fake clock.
//!
//! Segment ordering is significant: the scene threshold table is calibrated
//! against this declaration order, so segments may be retimed but not
//! reordered.

use roadshow_core::actor::{ActorId, ActorRegistry, MissingBindings, ROAD_MARKING_COUNT};
use roadshow_core::scale::StageMetrics;
use roadshow_core::timeline::{Ease, Position, Repeat, Timeline, TimelineSegment};

/// The master clock plus the three rate-locked auxiliary loops.
#[derive(Debug)]
pub struct ClockSet<T: Timeline> {
    pub master: T,
    pub rotation: T,
    pub bounce: T,
    pub scroll: T,
}

impl<T: Timeline> ClockSet<T> {
    pub fn clocks(&self) -> [&T; 4] {
        [&self.master, &self.rotation, &self.bounce, &self.scroll]
    }

    pub fn clocks_mut(&mut self) -> [&mut T; 4] {
        [
            &mut self.master,
            &mut self.rotation,
            &mut self.bounce,
            &mut self.scroll,
        ]
    }

    /// Feed one tick of wall-clock time to every clock. All four share this
    /// tick source, so their relative phase never drifts.
    pub fn advance_all(&mut self, dt: f32) {
        for clock in self.clocks_mut() {
            clock.advance(dt);
        }
    }

    pub fn dispose_all(&mut self) {
        for clock in self.clocks_mut() {
            clock.dispose();
        }
    }
}

/// Build the full clock set for the given bindings and viewport metrics.
///
/// Fails soft when any required actor is unbound: no timelines are
/// constructed and the caller is expected to retry once bindings resolve.
pub fn build<H, T, F>(
    actors: &ActorRegistry<H>,
    metrics: StageMetrics,
    mut new_timeline: F,
) -> Result<ClockSet<T>, MissingBindings>
where
    T: Timeline,
    F: FnMut() -> T,
{
    actors.require_complete()?;

    Ok(ClockSet {
        master: build_master(metrics, new_timeline()),
        rotation: build_rotation(new_timeline()),
        bounce: build_bounce(metrics, new_timeline()),
        scroll: build_scroll(new_timeline()),
    })
}

/// The authored storyline. Durations, easings, and overlaps are fixed
/// constants; geometry offsets scale with the viewport.
fn build_master<T: Timeline>(metrics: StageMetrics, mut master: T) -> T {
    use ActorId::*;
    let s = metrics.scale;
    let seg = TimelineSegment::tween;

    let script = [
        // Vehicle enters and settles at stage center.
        seg(vec![Vehicle], 2.4)
            .prop("x", 320.0 * s)
            .ease(Ease::QuadOut),
        // Engine trouble: idle micro-shake, smoke fading in over it.
        seg(vec![Vehicle], 0.15)
            .prop("y", -2.0)
            .repeat(Repeat::Times(5))
            .yoyo(),
        seg(vec![Smoke], 0.6)
            .prop("opacity", 1.0)
            .ease(Ease::QuadOut)
            .at(Position::Relative(-0.9)),
        // Customer steps out and asks for help.
        seg(vec![CustomerFigure], 0.6)
            .prop("x", -70.0 * s)
            .prop("opacity", 1.0)
            .ease(Ease::QuadOut),
        seg(vec![SpeechBubbleHelp], 0.35)
            .prop("opacity", 1.0)
            .prop("scale", 1.0)
            .ease(Ease::BackOut),
        seg(vec![SpeechBubbleHelp], 0.25)
            .prop("opacity", 0.0)
            .ease(Ease::QuadIn)
            .at(Position::Relative(0.3)),
        // A passer-by arrives and suggests the app.
        seg(vec![HelperFigure], 0.5)
            .prop("x", 120.0 * s)
            .prop("opacity", 1.0)
            .ease(Ease::QuadOut),
        seg(vec![SpeechBubbleApp], 0.35)
            .prop("opacity", 1.0)
            .prop("scale", 1.0)
            .ease(Ease::BackOut),
        seg(vec![SpeechBubbleApp], 0.25)
            .prop("opacity", 0.0)
            .ease(Ease::QuadIn)
            .at(Position::Relative(0.25)),
        // Booking on the phone mockup.
        seg(vec![Phone], 0.4)
            .prop("opacity", 1.0)
            .prop("scale", 1.0)
            .ease(Ease::BackOut),
        TimelineSegment::hold(0.4),
        seg(vec![Phone], 0.3).prop("opacity", 0.0).ease(Ease::QuadIn),
        // Tracking: mini-map up, then the chat panel alongside it. The
        // tracked dot crosses the map to a scaled target offset.
        seg(vec![MiniMap], 0.5)
            .prop("opacity", 1.0)
            .ease(Ease::QuadOut),
        seg(vec![ChatPanel], 0.4)
            .prop("opacity", 1.0)
            .ease(Ease::QuadOut),
        seg(vec![MechanicDot], 2.2)
            .prop("x", 80.0 * s)
            .prop("y", 60.0 * s)
            .ease(Ease::SineInOut),
        TimelineSegment::hold(0.6),
        seg(vec![MiniMap], 0.35)
            .prop("opacity", 0.0)
            .ease(Ease::QuadIn),
        seg(vec![ChatPanel], 0.35)
            .prop("opacity", 0.0)
            .ease(Ease::QuadIn)
            .at(Position::Relative(-0.35)),
        // Mechanic arrives and greets.
        seg(vec![MechanicFigure], 0.5)
            .prop("x", -140.0 * s)
            .prop("opacity", 1.0)
            .ease(Ease::QuadOut),
        seg(vec![SpeechBubbleGreeting], 0.3)
            .prop("opacity", 1.0)
            .prop("scale", 1.0)
            .ease(Ease::BackOut),
        seg(vec![SpeechBubbleGreeting], 0.25)
            .prop("opacity", 0.0)
            .ease(Ease::QuadIn)
            .at(Position::Relative(0.25)),
        // Repair: hood up, tools out, two rounds of micro-motion with the
        // vehicle jiggling under the work, smoke clearing partway through.
        seg(vec![Hood], 0.8)
            .prop("rotation", -60.0)
            .ease(Ease::QuadInOut),
        seg(vec![Tools], 0.3)
            .prop("opacity", 1.0)
            .ease(Ease::QuadOut),
        seg(vec![MechanicFigure], 0.25)
            .prop("y", -4.0)
            .repeat(Repeat::Times(4))
            .yoyo(),
        seg(vec![Vehicle], 0.2)
            .prop("x", 1.5)
            .repeat(Repeat::Times(4))
            .yoyo()
            .at(Position::Relative(-2.0)),
        seg(vec![Smoke], 0.5)
            .prop("opacity", 0.0)
            .ease(Ease::QuadIn)
            .at(Position::Relative(-0.5)),
        TimelineSegment::hold(0.3),
        seg(vec![MechanicFigure], 0.25)
            .prop("y", -3.0)
            .repeat(Repeat::Times(4))
            .yoyo(),
        seg(vec![Tools], 0.25)
            .prop("opacity", 0.0)
            .ease(Ease::QuadIn)
            .at(Position::Relative(-0.25)),
        seg(vec![Hood], 0.6)
            .prop("rotation", 0.0)
            .ease(Ease::QuadInOut),
        // Payment panel show / hold / hide.
        seg(vec![PaymentPanel], 0.45)
            .prop("opacity", 1.0)
            .prop("scale", 1.0)
            .ease(Ease::BackOut),
        TimelineSegment::hold(1.2),
        seg(vec![PaymentPanel], 0.35)
            .prop("opacity", 0.0)
            .ease(Ease::QuadIn),
        // Success panel show / hold / hide.
        seg(vec![SuccessPanel], 0.45)
            .prop("opacity", 1.0)
            .prop("scale", 1.0)
            .ease(Ease::BackOut),
        TimelineSegment::hold(1.1),
        seg(vec![SuccessPanel], 0.35)
            .prop("opacity", 0.0)
            .ease(Ease::QuadIn),
        // Everyone leaves; the vehicle drives off past the stage edge.
        seg(vec![MechanicFigure], 0.8)
            .prop("x", -260.0 * s)
            .prop("opacity", 0.0)
            .ease(Ease::QuadIn),
        seg(vec![HelperFigure], 0.8)
            .prop("x", 320.0 * s)
            .prop("opacity", 0.0)
            .ease(Ease::QuadIn)
            .at(Position::Relative(-0.8)),
        seg(vec![CustomerFigure], 0.5)
            .prop("opacity", 0.0)
            .ease(Ease::QuadIn),
        seg(vec![Vehicle], 2.8)
            .prop("x", metrics.viewport_width + 400.0)
            .ease(Ease::QuadIn),
    ];

    for segment in script {
        master.add_segment(segment);
    }
    master
}

/// Wheels spin a full turn every half second, forever.
fn build_rotation<T: Timeline>(mut rotation: T) -> T {
    rotation.add_segment(
        TimelineSegment::tween(vec![ActorId::WheelFront, ActorId::WheelRear], 0.5)
            .prop("rotation", 360.0)
            .repeat(Repeat::Infinite),
    );
    rotation
}

/// The vehicle body oscillates a few scaled pixels vertically.
fn build_bounce<T: Timeline>(metrics: StageMetrics, mut bounce: T) -> T {
    bounce.add_segment(
        TimelineSegment::tween(vec![ActorId::Vehicle], 0.4)
            .prop("y", -3.0 * metrics.scale)
            .ease(Ease::SineInOut)
            .repeat(Repeat::Infinite)
            .yoyo(),
    );
    bounce
}

/// Road markings stream past with a short per-marking stagger.
fn build_scroll<T: Timeline>(mut scroll: T) -> T {
    for i in 0..ROAD_MARKING_COUNT {
        scroll.add_segment(
            TimelineSegment::tween(vec![ActorId::RoadMarking(i)], 1.0)
                .prop("x", -100.0)
                .at(Position::Absolute(i as f32 * 0.1))
                .repeat(Repeat::Infinite),
        );
    }
    scroll
}
