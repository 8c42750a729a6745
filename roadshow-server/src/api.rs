//! REST API and SSE routes

use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{Stream, StreamExt as FuturesStreamExt};
use roadshow_core::scene::SCENE_TABLE;
use serde::Deserialize;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tower_http::cors::CorsLayer;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/stage", get(stage_snapshot))
        .route("/api/stage/stream", get(stage_stream))
        .route("/api/script", get(script))
        .route("/api/timeline", get(timeline))
        .route("/api/playback/control", post(playback_control))
        .route("/api/viewport", post(viewport))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// === Status Page ===

async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Roadshow</title></head>
<body>
  <h1>Roadshow stage server</h1>
  <ul>
    <li><code>GET /api/stage</code> - current stage snapshot</li>
    <li><code>GET /api/stage/stream</code> - SSE stream of stage frames</li>
    <li><code>GET /api/script</code> - narrative script and scene table</li>
    <li><code>GET /api/timeline</code> - placed segments of all four clocks</li>
    <li><code>POST /api/playback/control</code> - {"action": "play" | "pause" | "speed", "value": ...}</li>
    <li><code>POST /api/viewport</code> - {"width": ...}</li>
  </ul>
</body>
</html>"#,
    )
}

// === Stage Snapshot Endpoint ===

async fn stage_snapshot(State(state): State<AppState>) -> Json<serde_json::Value> {
    let engine = state.engine.read().await;
    Json(serde_json::json!({
        "phase": engine.phase(),
        "playback": engine.playback(),
        "frame": engine.current_frame(),
    }))
}

// === Stage Stream Endpoint ===

async fn stage_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => Some(Ok(Event::default().data(json))),
                Err(e) => {
                    tracing::error!("Failed to serialize stage event: {}", e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Broadcast stream error: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

// === Script Endpoint ===

async fn script(State(state): State<AppState>) -> Json<serde_json::Value> {
    let engine = state.engine.read().await;
    let script = engine.script();
    let scene_table: Vec<serde_json::Value> = SCENE_TABLE
        .iter()
        .map(|(bound, scene)| serde_json::json!({ "upper_bound": bound, "scene": scene }))
        .collect();

    Json(serde_json::json!({
        "messages": script.messages,
        "repair_steps": script.repair_steps,
        "scene_table": scene_table,
    }))
}

// === Timeline Endpoint ===

async fn timeline(State(state): State<AppState>) -> Json<serde_json::Value> {
    let engine = state.engine.read().await;
    let value = match engine.clocks() {
        Some(clocks) => serde_json::json!({
            "master": clocks.master.segments(),
            "rotation": clocks.rotation.segments(),
            "bounce": clocks.bounce.segments(),
            "scroll": clocks.scroll.segments(),
        }),
        // Inert engine: the schedule simply has nothing placed yet
        None => serde_json::json!({
            "master": [],
            "rotation": [],
            "bounce": [],
            "scroll": [],
        }),
    };
    Json(value)
}

// === Playback Control Endpoint ===

#[derive(Deserialize)]
struct PlaybackControlRequest {
    action: String,
    value: Option<f32>,
}

async fn playback_control(
    State(state): State<AppState>,
    Json(request): Json<PlaybackControlRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let mut engine = state.engine.write().await;

    match request.action.as_str() {
        "play" => {
            engine.set_playing(true);
            Ok(Json(serde_json::json!({"status": "playing"})))
        }
        "pause" => {
            engine.set_playing(false);
            Ok(Json(serde_json::json!({"status": "paused"})))
        }
        "speed" => {
            let speed = request
                .value
                .ok_or((StatusCode::BAD_REQUEST, "Missing 'value' for speed".to_string()))?;
            // Out-of-range speeds are clamped, not rejected
            engine.set_speed(speed);
            Ok(Json(serde_json::json!({
                "status": "speed_set",
                "speed": engine.playback().speed,
            })))
        }
        _ => Err((
            StatusCode::BAD_REQUEST,
            format!("Unknown action: {}", request.action),
        )),
    }
}

// === Viewport Endpoint ===

#[derive(Deserialize)]
struct ViewportRequest {
    width: f32,
}

async fn viewport(
    State(state): State<AppState>,
    Json(request): Json<ViewportRequest>,
) -> Json<serde_json::Value> {
    let mut engine = state.engine.write().await;
    engine.set_viewport_width(request.width);
    Json(serde_json::json!({
        "status": "ok",
        "metrics": engine.playback().metrics,
    }))
}
