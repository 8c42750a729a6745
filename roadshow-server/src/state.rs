//! Application state management

use chrono::{DateTime, Utc};
use roadshow_core::actor::{ActorId, ActorRegistry};
use roadshow_core::derive::StageFrame;
use roadshow_engine::{FrameTimeline, Lifecycle};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// The concrete engine the server drives. Actor handles are DOM-element id
/// strings; the browser-side renderer resolves them, the server never does.
pub type StageEngine = Lifecycle<String, FrameTimeline, fn() -> FrameTimeline>;

/// One broadcast stage update.
#[derive(Debug, Clone, Serialize)]
pub struct StageEvent {
    pub timestamp: DateTime<Utc>,
    pub frame: StageFrame,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The running engine behind a single writer lock. The frame driver and
    /// the control endpoints both mutate through it.
    pub engine: Arc<RwLock<StageEngine>>,

    /// Broadcast channel for derived stage frames
    /// Multiple consumers can subscribe to receive frames
    pub frame_tx: broadcast::Sender<StageEvent>,

    /// Cancellation token for the frame driver task
    pub driver_cancel: Arc<RwLock<Option<CancellationToken>>>,
}

/// Registry binding every required actor to its element-id slug.
pub fn slug_registry() -> ActorRegistry<String> {
    let mut registry = ActorRegistry::new();
    for id in ActorId::required() {
        let slug = id.slug();
        registry.bind(id, slug);
    }
    registry
}

impl AppState {
    pub fn new() -> Self {
        let mut engine: StageEngine = Lifecycle::new(FrameTimeline::new);
        engine.bind(slug_registry());
        if let Err(missing) = engine.start() {
            // The slug registry is complete, so this only fires if the
            // required-actor set and the registry fall out of sync.
            warn!(missing = ?missing.0, "engine start failed, serving inert state");
        }

        // Capacity for ~1.5s of frames at 60Hz before slow consumers lag
        let (frame_tx, _) = broadcast::channel(100);

        Self {
            engine: Arc::new(RwLock::new(engine)),
            frame_tx,
            driver_cancel: Arc::new(RwLock::new(None)),
        }
    }

    /// Subscribe to derived stage frames
    pub fn subscribe(&self) -> broadcast::Receiver<StageEvent> {
        self.frame_tx.subscribe()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
