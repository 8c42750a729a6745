//! Frame driver
//!
//! The single tick source for the engine: a ~60Hz loop that feeds measured
//! wall-clock deltas into the engine and broadcasts each derived frame.
//! Using the measured delta rather than the nominal interval keeps playback
//! speed honest when the task is scheduled late.

use crate::state::{AppState, StageEvent};
use chrono::Utc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::info;

const FRAME_INTERVAL: Duration = Duration::from_millis(16); // ~60Hz

/// Start the frame driver task, cancelling any previous one first. There is
/// never more than one driver ticking the engine.
pub async fn start(state: AppState) {
    let cancel_token = {
        let mut cancel = state.driver_cancel.write().await;
        if let Some(token) = cancel.take() {
            token.cancel();
        }
        let token = CancellationToken::new();
        *cancel = Some(token.clone());
        token
    };

    tokio::spawn(run(state, cancel_token));
}

/// Stop the frame driver task if one is running.
pub async fn stop(state: &AppState) {
    let mut cancel = state.driver_cancel.write().await;
    if let Some(token) = cancel.take() {
        token.cancel();
    }
}

async fn run(state: AppState, cancel_token: CancellationToken) {
    info!("frame driver started");

    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let dt = last_tick.elapsed().as_secs_f32();
        last_tick = Instant::now();

        let frame = {
            let mut engine = state.engine.write().await;
            engine.advance(dt)
        };

        // Ignore send errors: no subscribers just means nobody is watching
        if let Some(frame) = frame {
            let _ = state.frame_tx.send(StageEvent {
                timestamp: Utc::now(),
                frame,
            });
        }
    }

    info!("frame driver stopped");
}
