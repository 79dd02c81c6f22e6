//! Touchline - real-time sports simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball flight, tackles, role steering, match rules)
//! - `tuning`: Data-driven coefficients for every component

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Nominal simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest timestep accepted per tick, regardless of real frame time
    pub const MAX_DT: f32 = 0.032;
    /// Reference tick rate for per-tick multiplicative decays
    pub const REFERENCE_HZ: f32 = 60.0;

    /// Pitch dimensions (metres). Depth runs along y, goals at y = ±PITCH_HALF_LENGTH.
    pub const PITCH_HALF_WIDTH: f32 = 34.0;
    pub const PITCH_HALF_LENGTH: f32 = 52.5;
    pub const GOAL_HALF_WIDTH: f32 = 3.66;
    pub const CROSSBAR_HEIGHT: f32 = 2.44;
    pub const PENALTY_AREA_DEPTH: f32 = 16.5;
    pub const PENALTY_AREA_HALF_WIDTH: f32 = 20.16;
    pub const PENALTY_SPOT_DISTANCE: f32 = 11.0;
    pub const GOAL_AREA_DEPTH: f32 = 5.5;

    /// Gridiron dimensions (yards). Goal lines at y = ±GRIDIRON_GOAL_LINE.
    pub const GRIDIRON_HALF_WIDTH: f32 = 26.65;
    pub const GRIDIRON_GOAL_LINE: f32 = 50.0;
    pub const GRIDIRON_END_ZONE_DEPTH: f32 = 10.0;

    /// Velocities below this are treated as rest
    pub const VELOCITY_EPSILON: f32 = 0.05;
}

/// Normalize `v`, substituting `fallback` when `v` has no usable direction
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(fallback)
}

/// Convert a per-reference-tick decay factor into one for a step of `dt` seconds
#[inline]
pub fn decay_for(factor_per_tick: f32, dt: f32) -> f32 {
    factor_per_tick.powf(dt * consts::REFERENCE_HZ)
}

/// Exponential smoothing weight for a blend rate (per second) over `dt`
#[inline]
pub fn smoothing_alpha(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_or_fallback() {
        assert_eq!(normalize_or(Vec2::ZERO, Vec2::Y), Vec2::Y);
        let n = normalize_or(Vec2::new(3.0, 4.0), Vec2::Y);
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_decay_matches_reference_tick() {
        assert!((decay_for(0.9, consts::SIM_DT) - 0.9).abs() < 1e-5);
        assert!((decay_for(0.9, 2.0 * consts::SIM_DT) - 0.81).abs() < 1e-5);
    }

    #[test]
    fn test_smoothing_alpha_bounds() {
        assert_eq!(smoothing_alpha(10.0, 0.0), 0.0);
        let a = smoothing_alpha(10.0, consts::SIM_DT);
        assert!(a > 0.0 && a < 1.0);
    }
}
