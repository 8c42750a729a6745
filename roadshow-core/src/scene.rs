//! Scene mapping
//!
//! Maps normalized master progress onto exactly one scene of the storyline
//! via an ordered threshold table. Bounds are upper-exclusive (`progress <
//! bound` wins), matching the source narrative's transitions; swapping to
//! inclusive bounds would shift every transition by one frame.

use serde::{Deserialize, Serialize};

/// One phase of the scripted narrative. Exactly one is active at any
/// progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scene {
    Driving,
    Breakdown,
    HelperArrives,
    BookingMechanic,
    TrackingMechanic,
    Chatting,
    MechanicArrives,
    DetailedRepair,
    Payment,
    Success,
    DrivingAway,
}

/// Ordered `(upper_bound_exclusive, scene)` pairs, evaluated top-down.
/// The final scene covers everything from the last bound to the loop end.
pub const SCENE_TABLE: [(f32, Scene); 10] = [
    (0.08, Scene::Driving),
    (0.14, Scene::Breakdown),
    (0.22, Scene::HelperArrives),
    (0.26, Scene::BookingMechanic),
    (0.28, Scene::TrackingMechanic),
    (0.40, Scene::Chatting),
    (0.42, Scene::MechanicArrives),
    (0.65, Scene::DetailedRepair),
    (0.75, Scene::Payment),
    (0.82, Scene::Success),
];

/// Wrap an arbitrary progress value into `[0, 1)`.
///
/// The master timeline loops indefinitely, so progress exactly at 1.0 is the
/// same instant as 0.0 and derived scene identity stays continuous across
/// the wrap.
pub fn wrap_progress(progress: f32) -> f32 {
    let wrapped = progress.rem_euclid(1.0);
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Total mapping from progress to the active scene.
pub fn scene_for(progress: f32) -> Scene {
    let p = wrap_progress(progress);
    for (bound, scene) in SCENE_TABLE {
        if p < bound {
            return scene;
        }
    }
    Scene::DrivingAway
}
