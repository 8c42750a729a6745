//! Responsive stage scale
//!
//! The stage is authored against a 1200 px reference width. Narrower
//! viewports shrink pixel offsets and tween distances by a clamped factor;
//! wider viewports never scale up past 1.0.

use serde::{Deserialize, Serialize};

/// Reference width the storyline geometry is authored for.
pub const BASE_VIEWPORT_WIDTH: f32 = 1200.0;

pub const MIN_SCALE: f32 = 0.55;
pub const MAX_SCALE: f32 = 1.0;

/// Clamped responsive scale factor for a viewport width in pixels.
pub fn compute_scale(viewport_width_px: f32) -> f32 {
    (viewport_width_px / BASE_VIEWPORT_WIDTH).clamp(MIN_SCALE, MAX_SCALE)
}

/// Viewport width and the scale derived from it, constructed together so a
/// timeline build can never pair a width with a stale scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageMetrics {
    pub viewport_width: f32,
    pub scale: f32,
}

impl StageMetrics {
    pub fn from_width(viewport_width_px: f32) -> Self {
        let width = viewport_width_px.max(0.0);
        Self {
            viewport_width: width,
            scale: compute_scale(width),
        }
    }
}

impl Default for StageMetrics {
    fn default() -> Self {
        Self::from_width(BASE_VIEWPORT_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_clamps_low() {
        assert_eq!(compute_scale(0.0), 0.55);
        assert_eq!(compute_scale(100.0), 0.55);
    }

    #[test]
    fn test_scale_at_reference_width() {
        assert_eq!(compute_scale(1200.0), 1.0);
    }

    #[test]
    fn test_scale_clamps_high() {
        assert_eq!(compute_scale(3000.0), 1.0);
    }

    #[test]
    fn test_scale_linear_between_clamps() {
        assert!((compute_scale(900.0) - 0.75).abs() < 1e-6);
        assert!((compute_scale(660.0) - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_metrics_pair_width_and_scale() {
        let metrics = StageMetrics::from_width(900.0);
        assert_eq!(metrics.viewport_width, 900.0);
        assert!((metrics.scale - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_metrics_negative_width_treated_as_zero() {
        let metrics = StageMetrics::from_width(-50.0);
        assert_eq!(metrics.viewport_width, 0.0);
        assert_eq!(metrics.scale, MIN_SCALE);
    }
}
