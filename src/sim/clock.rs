//! Shared frame timing
//!
//! The host frame rate is not fixed, so the simulation measures real elapsed
//! time once per frame and hands the same Δt to every mover.

use std::time::Instant;

use crate::consts::{DEFAULT_UPDATES_PER_SECOND, MAX_FRAME_DT, MIN_FRAME_DT};

/// Clamp a measured frame interval into the accepted range
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(MIN_FRAME_DT, MAX_FRAME_DT)
    } else {
        MAX_FRAME_DT
    }
}

/// Wall-clock Δt between successive frames
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    initial_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATES_PER_SECOND)
    }
}

impl FrameClock {
    /// `initial_rate` is the assumed frame rate until a real interval exists
    pub fn new(initial_rate: f32) -> Self {
        let initial_dt = if initial_rate.is_finite() && initial_rate > 0.0 {
            clamp_dt(1.0 / initial_rate)
        } else {
            clamp_dt(1.0 / DEFAULT_UPDATES_PER_SECOND)
        };
        Self {
            last: None,
            initial_dt,
        }
    }

    /// Seconds since the previous lap (the initial estimate on the first lap)
    pub fn lap(&mut self) -> f32 {
        let now = Instant::now();
        let dt = match self.last {
            Some(prev) => clamp_dt(now.duration_since(prev).as_secs_f32()),
            None => self.initial_dt,
        };
        self.last = Some(now);
        dt
    }

    /// Forget the previous frame (e.g. after the host was paused)
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_lap_uses_initial_rate() {
        let mut clock = FrameClock::new(20.0);
        assert!((clock.lap() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_laps_are_clamped() {
        let mut clock = FrameClock::new(60.0);
        clock.lap();
        // Back-to-back laps are shorter than the minimum
        let dt = clock.lap();
        assert!(dt >= MIN_FRAME_DT && dt <= MAX_FRAME_DT);
    }

    #[test]
    fn test_clamp_dt_handles_garbage() {
        assert_eq!(clamp_dt(f32::NAN), MAX_FRAME_DT);
        assert_eq!(clamp_dt(10.0), MAX_FRAME_DT);
        assert_eq!(clamp_dt(0.0), MIN_FRAME_DT);
    }

    #[test]
    fn test_reset_restores_initial() {
        let mut clock = FrameClock::new(10.0);
        clock.lap();
        clock.reset();
        assert!((clock.lap() - 0.1).abs() < 1e-6);
    }
}
