//! Static narrative content
//!
//! The chat transcript and repair step labels are fixed script data; which
//! prefix of them is visible at any instant is derived from progress, never
//! stored per-message.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Customer,
    Mechanic,
}

/// One scripted chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub sender: Sender,
    pub text: String,
    pub timestamp_label: String,
    /// Fraction of the chat window at which this message is revealed.
    pub reveal_threshold_fraction: f32,
}

/// The full authored narrative: chat transcript plus repair step labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryScript {
    pub messages: Vec<MessageRecord>,
    pub repair_steps: Vec<String>,
}

impl StoryScript {
    /// The roadside-rescue storyline shipped with the engine.
    pub fn roadside_rescue() -> Self {
        let raw_messages: [(Sender, &str, &str); 7] = [
            (Sender::Customer, "Hi, my car broke down on Route 9. Smoke from the hood.", "14:02"),
            (Sender::Mechanic, "Hello! I'm on my way, about 2.5 km out.", "14:02"),
            (Sender::Customer, "Great, we're next to the old gas station.", "14:03"),
            (Sender::Mechanic, "Got it. Looks like a coolant issue from your photo.", "14:03"),
            (Sender::Customer, "Anything we should do meanwhile?", "14:04"),
            (Sender::Mechanic, "Keep the engine off and the hood closed.", "14:04"),
            (Sender::Mechanic, "Almost there, I can see you.", "14:05"),
        ];

        let count = raw_messages.len() as f32;
        let messages = raw_messages
            .into_iter()
            .enumerate()
            .map(|(i, (sender, text, stamp))| MessageRecord {
                sender,
                text: text.to_string(),
                timestamp_label: stamp.to_string(),
                reveal_threshold_fraction: (i + 1) as f32 / count,
            })
            .collect();

        let repair_steps = [
            "Diagnosing the cooling system",
            "Replacing the burst coolant hose",
            "Refilling coolant",
            "Running the engine to temperature",
            "Final inspection and cleanup",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        Self {
            messages,
            repair_steps,
        }
    }
}

impl Default for StoryScript {
    fn default() -> Self {
        Self::roadside_rescue()
    }
}
