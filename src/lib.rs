//! Mover Physics - real-time 2D motion and collision for webcam overlays
//!
//! Core modules:
//! - `sim`: Movers, pairwise collision detection/response, pooled lifecycle
//! - `render`: Software canvas and drawable assets
//! - `settings`: Data-driven tuning and effect presets
//! - `error`: Configuration errors

pub mod error;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{EffectPreset, Settings};

use glam::Vec2;

/// Simulation defaults
pub mod consts {
    /// Initial velocity-update rate before the first frame is measured
    pub const DEFAULT_UPDATES_PER_SECOND: f32 = 30.0;
    /// Shortest frame interval accepted from the clock (caps re-estimated rate at 240 Hz)
    pub const MIN_FRAME_DT: f32 = 1.0 / 240.0;
    /// Longest frame interval accepted from the clock (a stalled host must not teleport movers)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Micro-step budget for resolving an overlap before despawning
    pub const DEFAULT_MAX_MICRO_STEPS: u32 = 50;
    /// Extra separation margin between colliding bodies (pixels)
    pub const DEFAULT_BUFFER: f32 = 0.0;

    /// Downward acceleration (pixels/s² in per-second mode)
    pub const DEFAULT_GRAVITY: f32 = 0.0;
    /// Fraction of speed kept after a border bounce
    pub const DEFAULT_DAMPENING: f32 = 1.0;

    /// Seconds between host spawns
    pub const DEFAULT_SPAWN_INTERVAL: f32 = 0.5;

    /// Default frame size (webcam 720p)
    pub const DEFAULT_FRAME_WIDTH: u32 = 1280;
    pub const DEFAULT_FRAME_HEIGHT: u32 = 720;
}

/// Convert polar (magnitude, angle) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (magnitude, angle)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_polar_round_trip_quadrant() {
        let v = polar_to_cartesian(10.0, PI / 2.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 10.0).abs() < 1e-5);

        let (r, theta) = cartesian_to_polar(Vec2::new(-3.0, 0.0));
        assert!((r - 3.0).abs() < 1e-5);
        assert!((theta - PI).abs() < 1e-5);
    }
}
