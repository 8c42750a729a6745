//! Engine lifecycle
//!
//! Owns creation, disposal, and rebuild of the four clocks. The state
//! machine is `Uninitialized -> Bound -> Running -> Disposed`; a viewport
//! change while running is a full dispose-then-rebuild (old segment
//! geometry is invalid once the scale changes), while speed and play/pause
//! changes apply live to the existing clocks.
//!
//! Single-writer discipline: only this type issues build, dispose, and rate
//! calls, so the four clocks can never be mutated independently.

use crate::builder::{self, ClockSet};
use crate::sync;
use roadshow_core::actor::{ActorRegistry, MissingBindings};
use roadshow_core::derive::{derive_frame, StageFrame};
use roadshow_core::scale::StageMetrics;
use roadshow_core::script::StoryScript;
use roadshow_core::timeline::Timeline;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Lifecycle phase of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    Bound,
    Running,
    Disposed,
}

/// User-facing playback state. Mutated only through the lifecycle manager in
/// response to explicit intent (play/pause, speed slider, resize).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackState {
    pub playing: bool,
    pub speed: f32,
    pub metrics: StageMetrics,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            playing: true,
            speed: 1.0,
            metrics: StageMetrics::default(),
        }
    }
}

/// Owns the clock set and enforces the lifecycle contract: at most one set
/// of clocks is live at any time, and disposal is idempotent.
pub struct Lifecycle<H, T, F>
where
    T: Timeline,
    F: FnMut() -> T,
{
    phase: Phase,
    new_timeline: F,
    actors: Option<ActorRegistry<H>>,
    playback: PlaybackState,
    script: StoryScript,
    clocks: Option<ClockSet<T>>,
}

impl<H, T, F> Lifecycle<H, T, F>
where
    T: Timeline,
    F: FnMut() -> T,
{
    pub fn new(new_timeline: F) -> Self {
        Self::with_script(new_timeline, StoryScript::default())
    }

    pub fn with_script(new_timeline: F, script: StoryScript) -> Self {
        Self {
            phase: Phase::Uninitialized,
            new_timeline,
            actors: None,
            playback: PlaybackState::default(),
            script,
            clocks: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn script(&self) -> &StoryScript {
        &self.script
    }

    pub fn clocks(&self) -> Option<&ClockSet<T>> {
        self.clocks.as_ref()
    }

    pub fn has_active_clocks(&self) -> bool {
        self.clocks.is_some()
    }

    /// Supply the resolved actor bindings. The registry is taken as a whole
    /// and treated as immutable from here on.
    pub fn bind(&mut self, actors: ActorRegistry<H>) {
        if self.phase == Phase::Disposed {
            warn!("bind called on disposed engine, ignoring");
            return;
        }
        self.actors = Some(actors);
        if self.phase == Phase::Uninitialized {
            self.phase = Phase::Bound;
        }
    }

    /// Build the clocks and start running. Fails soft on missing bindings:
    /// the engine stays inert in `Bound` and the caller may retry after the
    /// next render pass resolves them.
    pub fn start(&mut self) -> Result<(), MissingBindings> {
        match self.phase {
            Phase::Uninitialized | Phase::Disposed => {
                warn!(phase = ?self.phase, "start called before bind or after dispose");
                return Ok(());
            }
            Phase::Bound | Phase::Running => {}
        }
        self.rebuild()
    }

    /// Viewport width changed: recompute the scale and rebuild the clock
    /// geometry from scratch. A build never sees a stale scale because the
    /// metrics are recomputed here, immediately before building.
    pub fn set_viewport_width(&mut self, width_px: f32) {
        self.playback.metrics = StageMetrics::from_width(width_px);
        if self.phase == Phase::Running {
            debug!(width_px, scale = self.playback.metrics.scale, "viewport changed, rebuilding");
            if let Err(missing) = self.rebuild() {
                warn!(?missing, "rebuild after resize failed");
            }
        }
    }

    /// Change the speed multiplier. Applies live to all four clocks; no
    /// geometry rebuild is needed for a rate change.
    pub fn set_speed(&mut self, speed: f32) {
        let clamped = sync::clamp_rate(speed);
        self.playback.speed = clamped;
        if let Some(clocks) = self.clocks.as_mut() {
            sync::set_rate(clocks, clamped);
        }
    }

    /// Play or pause all four clocks together.
    pub fn set_playing(&mut self, playing: bool) {
        self.playback.playing = playing;
        if let Some(clocks) = self.clocks.as_mut() {
            sync::set_playing(clocks, playing);
        }
    }

    /// Advance every clock by `dt` wall-clock seconds and derive the frame
    /// for the new master progress. Returns `None` while not running.
    pub fn advance(&mut self, dt: f32) -> Option<StageFrame> {
        let clocks = self.clocks.as_mut()?;
        clocks.advance_all(dt);
        let progress = clocks.master.progress();
        Some(derive_frame(progress, &self.script))
    }

    /// Derive the frame at the current master progress without advancing.
    pub fn current_frame(&self) -> Option<StageFrame> {
        let clocks = self.clocks.as_ref()?;
        Some(derive_frame(clocks.master.progress(), &self.script))
    }

    /// Dispose the previous clock set (if any) and build a fresh one with
    /// the current metrics, then re-apply speed and play state. Old clocks
    /// are always killed before new ones exist, so a rebuild can never leave
    /// two sets ticking.
    fn rebuild(&mut self) -> Result<(), MissingBindings> {
        if let Some(mut old) = self.clocks.take() {
            old.dispose_all();
        }

        let actors = match self.actors.as_ref() {
            Some(actors) => actors,
            None => return Ok(()),
        };

        match builder::build(actors, self.playback.metrics, &mut self.new_timeline) {
            Ok(mut clocks) => {
                sync::set_rate(&mut clocks, self.playback.speed);
                sync::set_playing(&mut clocks, self.playback.playing);
                self.clocks = Some(clocks);
                self.phase = Phase::Running;
                info!(
                    duration = self.clocks.as_ref().map(|c| c.master.duration()),
                    scale = self.playback.metrics.scale,
                    "clocks built"
                );
                Ok(())
            }
            Err(missing) => {
                // Fail-soft: no animation, no crash. Stay bound and inert.
                self.phase = Phase::Bound;
                warn!(missing = ?missing.0, "timeline build skipped, engine inert");
                Err(missing)
            }
        }
    }

    /// Tear everything down. Safe to call any number of times.
    pub fn dispose(&mut self) {
        if let Some(mut clocks) = self.clocks.take() {
            clocks.dispose_all();
        }
        if self.phase != Phase::Disposed {
            info!("engine disposed");
        }
        self.phase = Phase::Disposed;
    }
}

impl<H, T, F> Drop for Lifecycle<H, T, F>
where
    T: Timeline,
    F: FnMut() -> T,
{
    fn drop(&mut self) {
        // Release on every exit path, not just explicit teardown.
        if let Some(mut clocks) = self.clocks.take() {
            clocks.dispose_all();
        }
    }
}
