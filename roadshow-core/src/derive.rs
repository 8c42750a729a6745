//! Per-tick derived state
//!
//! One pure function from master progress to everything the presentation
//! layer renders. Called once per frame by whatever owns the frame loop;
//! the result is never persisted.

use crate::scene::{scene_for, wrap_progress, Scene};
use crate::script::{MessageRecord, StoryScript};
use crate::telemetry::TelemetrySnapshot;
use serde::Serialize;

/// Everything derived from one progress value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageFrame {
    pub progress: f32,
    pub scene: Scene,
    pub telemetry: TelemetrySnapshot,
    pub visible_messages: Vec<MessageRecord>,
    pub repair_step: Option<String>,
}

impl StageFrame {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Derive the complete stage frame for a progress value.
pub fn derive_frame(progress: f32, script: &StoryScript) -> StageFrame {
    let progress = wrap_progress(progress);
    let telemetry = TelemetrySnapshot::at(
        progress,
        script.messages.len(),
        script.repair_steps.len(),
    );
    let visible_messages = script.messages[..telemetry.visible_message_count].to_vec();
    let repair_step = telemetry
        .repair_step_index
        .map(|i| script.repair_steps[i].clone());

    StageFrame {
        progress,
        scene: scene_for(progress),
        telemetry,
        visible_messages,
        repair_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_outside_all_windows() {
        let script = StoryScript::roadside_rescue();
        let frame = derive_frame(0.05, &script);
        assert_eq!(frame.scene, Scene::Driving);
        assert!(frame.telemetry.tracking.is_none());
        assert!(frame.visible_messages.is_empty());
        assert_eq!(frame.repair_step, None);
    }

    #[test]
    fn test_frame_during_chat_window() {
        let script = StoryScript::roadside_rescue();
        let frame = derive_frame(0.30, &script);
        assert_eq!(frame.scene, Scene::Chatting);
        assert_eq!(frame.visible_messages.len(), 1);
        assert_eq!(frame.visible_messages[0], script.messages[0]);
        let tracking = frame.telemetry.tracking.unwrap();
        assert_eq!(tracking.eta_seconds, 100);
    }

    #[test]
    fn test_frame_during_repair_window() {
        let script = StoryScript::roadside_rescue();
        let frame = derive_frame(0.43, &script);
        assert_eq!(frame.scene, Scene::DetailedRepair);
        assert_eq!(frame.repair_step.as_deref(), Some("Diagnosing the cooling system"));
    }

    #[test]
    fn test_frame_wraps_progress() {
        let script = StoryScript::roadside_rescue();
        let frame = derive_frame(1.30, &script);
        assert!((frame.progress - 0.30).abs() < 1e-5);
        assert_eq!(frame.scene, Scene::Chatting);
    }

    #[test]
    fn test_frame_serializes() {
        let script = StoryScript::roadside_rescue();
        let json = derive_frame(0.30, &script).to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["scene"], "chatting");
        assert_eq!(parsed["telemetry"]["tracking"]["eta_seconds"], 100);
        assert_eq!(parsed["visible_messages"].as_array().unwrap().len(), 1);
    }
}
