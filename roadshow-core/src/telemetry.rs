//! Simulated tracking telemetry and discrete counters
//!
//! All derivations here are pure functions of master progress, recomputed on
//! every tick. Nothing is cached: progress can move non-monotonically when
//! the user pauses or changes playback speed, and a cached value would
//! desynchronize from the visual state.

use crate::scene::wrap_progress;
use serde::{Deserialize, Serialize};

/// Progress window where the mechanic is en route and the map + chat are up.
pub const TRACKING_WINDOW: (f32, f32) = (0.28, 0.40);

/// Progress window of the detailed repair sequence.
pub const REPAIR_WINDOW: (f32, f32) = (0.42, 0.65);

const ETA_START_SECONDS: f32 = 120.0;
const ETA_FLOOR_SECONDS: f32 = 5.0;
const DISTANCE_START_KM: f32 = 2.5;
const DISTANCE_FLOOR_KM: f32 = 0.1;

/// Simulated en-route telemetry shown during the tracking window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingTelemetry {
    pub eta_seconds: u32,
    pub distance_km: f32,
}

/// Normalized position within a `(lo, hi)` window, `None` outside it.
fn window_t(progress: f32, window: (f32, f32)) -> Option<f32> {
    let p = wrap_progress(progress);
    let (lo, hi) = window;
    if p >= lo && p < hi {
        Some((p - lo) / (hi - lo))
    } else {
        None
    }
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// ETA and distance while the mechanic is en route. Both count down
/// monotonically within the window and are floor-clamped so the display
/// never reaches zero before the arrival cut.
pub fn tracking_telemetry(progress: f32) -> Option<TrackingTelemetry> {
    let t = window_t(progress, TRACKING_WINDOW)?;
    Some(TrackingTelemetry {
        eta_seconds: (ETA_START_SECONDS * (1.0 - t)).round().max(ETA_FLOOR_SECONDS) as u32,
        distance_km: round1(DISTANCE_START_KM * (1.0 - t)).max(DISTANCE_FLOOR_KM),
    })
}

/// How many chat messages have been revealed at this progress.
///
/// Monotonically non-decreasing within the chat window, 0 outside it. The
/// final message appears only as the window closes; `t = 1` itself is
/// excluded by the window's upper bound.
pub fn visible_message_count(progress: f32, message_count: usize) -> usize {
    match window_t(progress, TRACKING_WINDOW) {
        Some(t) => ((t * message_count as f32).floor() as usize).min(message_count),
        None => 0,
    }
}

/// Typing-indicator flicker: on for one of every four twentieths of the chat
/// window, suppressed near both edges.
pub fn typing_indicator_visible(progress: f32) -> bool {
    match window_t(progress, TRACKING_WINDOW) {
        Some(t) => t > 0.1 && t < 0.9 && (t * 20.0).floor() as i64 % 4 == 0,
        None => false,
    }
}

/// Index of the active repair step, `None` outside the repair window.
pub fn repair_step_index(progress: f32, step_count: usize) -> Option<usize> {
    if step_count == 0 {
        return None;
    }
    let t = window_t(progress, REPAIR_WINDOW)?;
    Some(((t * step_count as f32).floor() as usize).min(step_count - 1))
}

/// All derived counters for one tick, bundled for the presentation layer.
/// Fields are `None` while their window is inactive; the presentation
/// decides what to show in that case (typically the last value it rendered).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub tracking: Option<TrackingTelemetry>,
    pub visible_message_count: usize,
    pub typing_indicator_visible: bool,
    pub repair_step_index: Option<usize>,
}

impl TelemetrySnapshot {
    pub fn at(progress: f32, message_count: usize, repair_step_count: usize) -> Self {
        Self {
            tracking: tracking_telemetry(progress),
            visible_message_count: visible_message_count(progress, message_count),
            typing_indicator_visible: typing_indicator_visible(progress),
            repair_step_index: repair_step_index(progress, repair_step_count),
        }
    }
}
