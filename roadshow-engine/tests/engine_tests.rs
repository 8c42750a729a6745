//! Integration tests for the timeline builder and engine lifecycle

use roadshow_core::actor::{ActorId, ActorRegistry};
use roadshow_core::scale::StageMetrics;
use roadshow_core::scene::Scene;
use roadshow_core::timeline::{PropValue, Timeline, TimelineSegment};
use roadshow_engine::{build, sync, FrameTimeline, Lifecycle, Phase};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Helper: registry with every required actor bound to its slug.
fn full_registry() -> ActorRegistry<String> {
    let mut registry = ActorRegistry::new();
    for id in ActorId::required() {
        let slug = id.slug();
        registry.bind(id, slug);
    }
    registry
}

fn full_build(width: f32) -> roadshow_engine::ClockSet<FrameTimeline> {
    build(
        &full_registry(),
        StageMetrics::from_width(width),
        FrameTimeline::new,
    )
    .expect("build with complete registry should succeed")
}

// ==================== Builder ====================

#[test]
fn test_build_produces_four_clocks() {
    let set = full_build(1200.0);

    assert_eq!(set.master.segments().len(), 40);
    assert!(
        set.master.duration() > 20.0,
        "master loop should run tens of seconds, got {}",
        set.master.duration()
    );
    assert!((set.rotation.duration() - 0.5).abs() < 1e-6);
    assert!((set.bounce.duration() - 0.8).abs() < 1e-6);
    assert!((set.scroll.duration() - 1.3).abs() < 1e-6);
}

#[test]
fn test_build_fails_soft_on_missing_binding() {
    let mut partial: ActorRegistry<String> = ActorRegistry::new();
    for id in ActorId::required() {
        if id != ActorId::Vehicle {
            let slug = id.slug();
            partial.bind(id, slug);
        }
    }

    let result = build(&partial, StageMetrics::from_width(1200.0), FrameTimeline::new);
    let missing = result.err().expect("build should signal missing bindings");
    assert_eq!(missing.0, vec![ActorId::Vehicle]);
}

#[test]
fn test_scale_applies_to_tracked_dot_geometry() {
    let narrow = full_build(660.0); // scale clamps to 0.55
    let wide = full_build(1200.0); // scale 1.0

    let dot_x = |set: &roadshow_engine::ClockSet<FrameTimeline>| -> f32 {
        let placed = set
            .master
            .segments()
            .iter()
            .find(|p| p.segment.targets == [ActorId::MechanicDot])
            .expect("master should contain the tracked-dot tween");
        assert!((placed.segment.duration - 2.2).abs() < 1e-6);
        match placed.segment.props.get("x") {
            Some(PropValue::Number(x)) => *x,
            other => panic!("dot tween should have a numeric x target, got {:?}", other),
        }
    };

    assert!((dot_x(&narrow) - 80.0 * 0.55).abs() < 1e-4);
    assert!((dot_x(&wide) - 80.0).abs() < 1e-4);
}

#[test]
fn test_drive_away_crosses_viewport_plus_margin() {
    let set = full_build(1200.0);
    let last = set.master.segments().last().unwrap();
    assert_eq!(last.segment.targets, vec![ActorId::Vehicle]);
    match last.segment.props.get("x") {
        Some(PropValue::Number(x)) => assert_eq!(*x, 1600.0),
        other => panic!("drive-away should target x, got {:?}", other),
    }
}

// ==================== Rate synchronizer ====================

#[test]
fn test_set_rate_locks_all_four_clocks() {
    let mut set = full_build(1200.0);

    let applied = sync::set_rate(&mut set, 2.0);
    assert_eq!(applied, 2.0);
    for clock in set.clocks() {
        assert_eq!(clock.rate(), 2.0);
    }

    // Out-of-range rates are clamped, still uniformly.
    assert_eq!(sync::set_rate(&mut set, 9.0), 2.0);
    assert_eq!(sync::set_rate(&mut set, 0.1), 0.25);
    for clock in set.clocks() {
        assert_eq!(clock.rate(), 0.25);
    }
}

#[test]
fn test_set_playing_affects_all_four_clocks() {
    let mut set = full_build(1200.0);

    sync::set_playing(&mut set, false);
    for clock in set.clocks() {
        assert!(!clock.is_playing());
    }

    sync::set_playing(&mut set, true);
    for clock in set.clocks() {
        assert!(clock.is_playing());
    }
}

#[test]
fn test_rate_lock_survives_many_changes() {
    let mut set = full_build(1200.0);
    for step in 0..50 {
        let requested = 0.1 + step as f32 * 0.07;
        sync::set_rate(&mut set, requested);
        let master_rate = set.master.rate();
        for clock in set.clocks() {
            assert_eq!(clock.rate(), master_rate, "clock drifted at step {}", step);
        }
    }
}

// ==================== Lifecycle ====================

#[test]
fn test_lifecycle_stays_inert_without_bindings() {
    let mut engine = Lifecycle::new(FrameTimeline::new);
    assert_eq!(engine.phase(), Phase::Uninitialized);

    let mut partial: ActorRegistry<String> = ActorRegistry::new();
    partial.bind(ActorId::Vehicle, "vehicle".to_string());
    engine.bind(partial);
    assert_eq!(engine.phase(), Phase::Bound);

    assert!(engine.start().is_err());
    assert_eq!(engine.phase(), Phase::Bound);
    assert!(!engine.has_active_clocks());
    assert!(engine.advance(0.016).is_none());

    // Recovery: rebinding a complete registry makes the next start succeed.
    engine.bind(full_registry());
    assert!(engine.start().is_ok());
    assert_eq!(engine.phase(), Phase::Running);
}

#[test]
fn test_lifecycle_end_to_end_scenario() {
    let mut engine = Lifecycle::new(FrameTimeline::new);
    engine.bind(full_registry());
    engine.set_viewport_width(1200.0);
    engine.start().unwrap();

    let loop_len = engine.clocks().unwrap().master.duration();

    // Advance to 30% of the loop at speed 1.
    let frame = engine.advance(loop_len * 0.30).unwrap();
    assert!((frame.progress - 0.30).abs() < 1e-4);
    assert_eq!(frame.scene, Scene::Chatting);
    let tracking = frame.telemetry.tracking.expect("tracking window active");
    assert_eq!(tracking.eta_seconds, 100);
    assert!((tracking.distance_km - 2.1).abs() < 1e-6);
    assert_eq!(frame.visible_messages.len(), 1);
    assert_eq!(frame.repair_step, None);

    // Wrap a full loop back to 27%: the mechanic is en route on the map.
    let frame = engine.advance(loop_len * 0.97).unwrap();
    assert!((frame.progress - 0.27).abs() < 1e-4);
    assert_eq!(frame.scene, Scene::TrackingMechanic);
}

#[test]
fn test_pause_freezes_derived_state() {
    let mut engine = Lifecycle::new(FrameTimeline::new);
    engine.bind(full_registry());
    engine.start().unwrap();

    let loop_len = engine.clocks().unwrap().master.duration();
    let before = engine.advance(loop_len * 0.5).unwrap();

    engine.set_playing(false);
    let frozen = engine.advance(10.0).unwrap();
    assert_eq!(frozen.progress, before.progress);
    assert_eq!(frozen.scene, before.scene);

    engine.set_playing(true);
    let resumed = engine.advance(loop_len * 0.01).unwrap();
    assert!(resumed.progress > before.progress);
}

#[test]
fn test_speed_change_applies_live_without_rebuild() {
    let mut engine = Lifecycle::new(FrameTimeline::new);
    engine.bind(full_registry());
    engine.start().unwrap();

    let loop_len = engine.clocks().unwrap().master.duration();
    engine.set_speed(2.0);
    assert_eq!(engine.playback().speed, 2.0);

    // Wall dt of 5% of the loop covers 10% at double speed.
    let frame = engine.advance(loop_len * 0.05).unwrap();
    assert!((frame.progress - 0.10).abs() < 1e-4);

    // Clamped, and still applied to every clock.
    engine.set_speed(99.0);
    assert_eq!(engine.playback().speed, 2.0);
    for clock in engine.clocks().unwrap().clocks() {
        assert_eq!(clock.rate(), 2.0);
    }
}

#[test]
fn test_dispose_is_idempotent() {
    let mut engine = Lifecycle::new(FrameTimeline::new);
    engine.bind(full_registry());
    engine.start().unwrap();
    assert!(engine.has_active_clocks());

    engine.dispose();
    assert_eq!(engine.phase(), Phase::Disposed);
    assert!(!engine.has_active_clocks());
    assert!(engine.advance(0.016).is_none());

    engine.dispose();
    assert_eq!(engine.phase(), Phase::Disposed);
}

// ==================== Leak detection across rebuilds ====================

/// Minimal fake timeline that tracks how many undisposed instances exist.
struct LeakProbe {
    live: Arc<AtomicUsize>,
    duration: f32,
    elapsed: f32,
    rate: f32,
    playing: bool,
    disposed: bool,
}

impl LeakProbe {
    fn new(live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self {
            live,
            duration: 0.0,
            elapsed: 0.0,
            rate: 1.0,
            playing: true,
            disposed: false,
        }
    }
}

impl Timeline for LeakProbe {
    fn add_segment(&mut self, segment: TimelineSegment) {
        if !self.disposed {
            self.duration += segment.placed_len();
        }
    }

    fn play(&mut self) {
        self.playing = !self.disposed;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing && !self.disposed
    }

    fn set_rate(&mut self, rate: f32) {
        if !self.disposed {
            self.rate = rate;
        }
    }

    fn rate(&self) -> f32 {
        self.rate
    }

    fn advance(&mut self, dt: f32) {
        if !self.disposed && self.playing && self.duration > 0.0 {
            self.elapsed = (self.elapsed + dt * self.rate).rem_euclid(self.duration);
        }
    }

    fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            0.0
        }
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
        self.disposed = true;
        self.playing = false;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[test]
fn test_rapid_rebuilds_never_leak_clocks() {
    let live = Arc::new(AtomicUsize::new(0));
    let probe_counter = live.clone();
    let mut engine = Lifecycle::new(move || LeakProbe::new(probe_counter.clone()));

    engine.bind(full_registry());
    engine.start().unwrap();
    assert_eq!(live.load(Ordering::SeqCst), 4);

    // Simulate a drag-resize: many consecutive rebuilds.
    for width in (400..1400).step_by(50) {
        engine.set_viewport_width(width as f32);
        assert_eq!(
            live.load(Ordering::SeqCst),
            4,
            "exactly one clock set must be live after a rebuild"
        );
    }

    engine.dispose();
    assert_eq!(live.load(Ordering::SeqCst), 0);

    engine.dispose();
    assert_eq!(live.load(Ordering::SeqCst), 0, "double dispose must not underflow");
}

#[test]
fn test_drop_releases_clocks() {
    let live = Arc::new(AtomicUsize::new(0));
    let probe_counter = live.clone();
    {
        let mut engine = Lifecycle::new(move || LeakProbe::new(probe_counter.clone()));
        engine.bind(full_registry());
        engine.start().unwrap();
        assert_eq!(live.load(Ordering::SeqCst), 4);
    }
    assert_eq!(live.load(Ordering::SeqCst), 0, "drop must dispose all clocks");
}
