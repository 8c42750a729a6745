//! Playback rate synchronization
//!
//! One shared speed multiplier and play state for the whole clock set. Rate
//! and play/pause always apply to master and all three auxiliary clocks in
//! the same call; mutating a subset would let the loops drift out of phase
//! with the storyline.

use crate::builder::ClockSet;
use roadshow_core::timeline::Timeline;

pub const MIN_RATE: f32 = 0.25;
pub const MAX_RATE: f32 = 2.0;

/// Clamp a requested speed multiplier into the supported range. Out-of-range
/// input is a caller mistake we absorb, never an error.
pub fn clamp_rate(rate: f32) -> f32 {
    if rate.is_finite() {
        rate.clamp(MIN_RATE, MAX_RATE)
    } else {
        1.0
    }
}

/// Apply one playback rate to all four clocks atomically. Returns the
/// clamped rate actually applied.
pub fn set_rate<T: Timeline>(clocks: &mut ClockSet<T>, rate: f32) -> f32 {
    let rate = clamp_rate(rate);
    for clock in clocks.clocks_mut() {
        clock.set_rate(rate);
    }
    rate
}

/// Play or pause all four clocks together. Never a subset.
pub fn set_playing<T: Timeline>(clocks: &mut ClockSet<T>, playing: bool) {
    for clock in clocks.clocks_mut() {
        if playing {
            clock.play();
        } else {
            clock.pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_rate_bounds() {
        assert_eq!(clamp_rate(0.1), MIN_RATE);
        assert_eq!(clamp_rate(5.0), MAX_RATE);
        assert_eq!(clamp_rate(1.5), 1.5);
        assert_eq!(clamp_rate(f32::NAN), 1.0);
        assert_eq!(clamp_rate(f32::INFINITY), 1.0);
    }
}
