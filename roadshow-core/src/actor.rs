//! Actor identities and the render-handle registry
//!
//! Every renderable entity in the storyline has a stable [`ActorId`]. The
//! presentation layer resolves each id to an opaque render handle once, and
//! the resulting [`ActorRegistry`] is passed immutably into the timeline
//! builder. A registry missing any required binding fails the build softly:
//! no timelines are constructed and the engine stays inert.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Number of road-marking actors the scroll clock staggers across.
pub const ROAD_MARKING_COUNT: u8 = 4;

/// Stable name for a renderable entity. Identity is fixed for the lifetime
/// of the presentation that bound it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorId {
    // Vehicle and road
    Vehicle,
    Hood,
    WheelFront,
    WheelRear,
    RoadSurface,
    RoadMarking(u8),

    // Figures
    CustomerFigure,
    HelperFigure,
    MechanicFigure,

    // UI overlays
    SpeechBubbleHelp,
    SpeechBubbleApp,
    SpeechBubbleGreeting,
    Phone,
    MiniMap,
    MechanicDot,
    ChatPanel,
    PaymentPanel,
    SuccessPanel,
    Smoke,
    Tools,
}

impl ActorId {
    /// The full set of bindings the timeline builder requires.
    pub fn required() -> Vec<ActorId> {
        let mut ids = vec![
            ActorId::Vehicle,
            ActorId::Hood,
            ActorId::WheelFront,
            ActorId::WheelRear,
            ActorId::RoadSurface,
            ActorId::CustomerFigure,
            ActorId::HelperFigure,
            ActorId::MechanicFigure,
            ActorId::SpeechBubbleHelp,
            ActorId::SpeechBubbleApp,
            ActorId::SpeechBubbleGreeting,
            ActorId::Phone,
            ActorId::MiniMap,
            ActorId::MechanicDot,
            ActorId::ChatPanel,
            ActorId::PaymentPanel,
            ActorId::SuccessPanel,
            ActorId::Smoke,
            ActorId::Tools,
        ];
        ids.extend((0..ROAD_MARKING_COUNT).map(ActorId::RoadMarking));
        ids
    }

    /// Kebab-case identifier, usable as a DOM element id or scene-graph key.
    pub fn slug(&self) -> String {
        match self {
            ActorId::Vehicle => "vehicle".to_string(),
            ActorId::Hood => "hood".to_string(),
            ActorId::WheelFront => "wheel-front".to_string(),
            ActorId::WheelRear => "wheel-rear".to_string(),
            ActorId::RoadSurface => "road-surface".to_string(),
            ActorId::RoadMarking(i) => format!("road-marking-{}", i),
            ActorId::CustomerFigure => "customer-figure".to_string(),
            ActorId::HelperFigure => "helper-figure".to_string(),
            ActorId::MechanicFigure => "mechanic-figure".to_string(),
            ActorId::SpeechBubbleHelp => "speech-bubble-help".to_string(),
            ActorId::SpeechBubbleApp => "speech-bubble-app".to_string(),
            ActorId::SpeechBubbleGreeting => "speech-bubble-greeting".to_string(),
            ActorId::Phone => "phone".to_string(),
            ActorId::MiniMap => "mini-map".to_string(),
            ActorId::MechanicDot => "mechanic-dot".to_string(),
            ActorId::ChatPanel => "chat-panel".to_string(),
            ActorId::PaymentPanel => "payment-panel".to_string(),
            ActorId::SuccessPanel => "success-panel".to_string(),
            ActorId::Smoke => "smoke".to_string(),
            ActorId::Tools => "tools".to_string(),
        }
    }
}

/// One or more required actors had no binding at build time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing actor bindings: {0:?}")]
pub struct MissingBindings(pub Vec<ActorId>);

/// Immutable mapping from actor ids to opaque render handles.
///
/// The handle type is whatever the presentation layer renders with (a DOM id
/// string, a node index, a sprite reference). The engine never inspects it;
/// it only checks that every required actor is bound.
#[derive(Debug, Clone)]
pub struct ActorRegistry<H> {
    bindings: HashMap<ActorId, H>,
}

impl<H> ActorRegistry<H> {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn bind(&mut self, id: ActorId, handle: H) {
        self.bindings.insert(id, handle);
    }

    pub fn get(&self, id: &ActorId) -> Option<&H> {
        self.bindings.get(id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Required actors that have no binding yet.
    pub fn missing(&self) -> Vec<ActorId> {
        ActorId::required()
            .into_iter()
            .filter(|id| !self.bindings.contains_key(id))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Signal-style completeness check for the builder.
    pub fn require_complete(&self) -> Result<(), MissingBindings> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingBindings(missing))
        }
    }
}

impl<H> Default for ActorRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_registry() -> ActorRegistry<String> {
        let mut registry = ActorRegistry::new();
        for id in ActorId::required() {
            let slug = id.slug();
            registry.bind(id, slug);
        }
        registry
    }

    #[test]
    fn test_required_set_includes_all_road_markings() {
        let required = ActorId::required();
        for i in 0..ROAD_MARKING_COUNT {
            assert!(required.contains(&ActorId::RoadMarking(i)));
        }
    }

    #[test]
    fn test_empty_registry_is_incomplete() {
        let registry: ActorRegistry<String> = ActorRegistry::new();
        assert!(!registry.is_complete());
        assert_eq!(registry.missing().len(), ActorId::required().len());
    }

    #[test]
    fn test_full_registry_is_complete() {
        let registry = full_registry();
        assert!(registry.is_complete());
        assert!(registry.require_complete().is_ok());
    }

    #[test]
    fn test_missing_reports_only_unbound_actors() {
        let mut registry = full_registry();
        registry.bindings.remove(&ActorId::Smoke);
        let missing = registry.missing();
        assert_eq!(missing, vec![ActorId::Smoke]);

        let err = registry.require_complete().unwrap_err();
        assert_eq!(err, MissingBindings(vec![ActorId::Smoke]));
    }

    #[test]
    fn test_slugs_are_unique() {
        let required = ActorId::required();
        let slugs: std::collections::HashSet<String> =
            required.iter().map(|id| id.slug()).collect();
        assert_eq!(slugs.len(), required.len());
    }
}
