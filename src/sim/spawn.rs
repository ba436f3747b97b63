//! Host-side spawner feeding a pool at a limited rate
//!
//! Seeded RNG so a recorded session can be replayed with the same spawns.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::mover::{ActiveRegion, Mover, RateLimiter, Shape};
use crate::render::{Asset, Disc, Tile, colors};
use crate::settings::{EffectPreset, Settings};

/// Spawns preset-specific movers at random positions and headings
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    limiter: RateLimiter,
    seed: u64,
}

impl Spawner {
    pub fn new(seed: u64, interval: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            limiter: RateLimiter::new(interval),
            seed,
        }
    }

    pub fn from_settings(settings: &Settings, seed: u64) -> Self {
        Self::new(seed, settings.spawn_interval)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Feed one frame's `dt`; returns a new mover when the spawn interval has elapsed
    pub fn poll(&mut self, dt: f32, settings: &Settings) -> Option<Mover> {
        self.limiter.poll(dt)?;
        Some(self.spawn(settings))
    }

    /// Build one mover for the current preset, ignoring the rate limit
    pub fn spawn(&mut self, settings: &Settings) -> Mover {
        let size = self.rng.random_range(settings.min_size..=settings.max_size);
        match settings.preset {
            EffectPreset::BouncingBalls => self.spawn_asset(Disc::new(size), settings),
            EffectPreset::FlyingTiles => {
                self.spawn_asset(Tile::new(size * 2.0, size * 2.0), settings)
            }
            EffectPreset::FallingText => self.spawn_asset(
                Tile::new(size * 4.0, size * 1.5)
                    .with_color(colors::TEXT_BOX)
                    .with_border(colors::BALL),
                settings,
            ),
        }
    }

    fn spawn_asset<A: Asset + 'static>(&mut self, asset: A, settings: &Settings) -> Mover {
        let speed = self.rng.random_range(settings.min_speed..=settings.max_speed);
        let heading = self.rng.random_range(0.0..TAU);

        // Fully inside the frame so the first update does not flag an exit
        let shape = Shape::from_extent(asset.extent());
        let frame = ActiveRegion::frame(settings.frame_width as f32, settings.frame_height as f32);
        let area = frame.inset_for(&shape);
        let center = Vec2::new(
            self.rng.random_range(area.x_min..=area.x_max),
            self.rng.random_range(area.y_min..=area.y_max),
        );

        Mover::builder(asset)
            .settings(settings)
            .center(center)
            .polar_velocity(speed, heading)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_respects_interval() {
        let settings = Settings::default();
        let mut spawner = Spawner::new(7, 0.5);

        // First poll spawns immediately
        assert!(spawner.poll(0.1, &settings).is_some());
        assert!(spawner.poll(0.1, &settings).is_none());
        assert!(spawner.poll(0.2, &settings).is_none());
        assert!(spawner.poll(0.2, &settings).is_some());
    }

    #[test]
    fn test_spawns_inside_frame_with_speed_in_range() {
        let settings = Settings::default();
        let mut spawner = Spawner::from_settings(&settings, 42);
        let frame = ActiveRegion::frame(settings.frame_width as f32, settings.frame_height as f32);
        for _ in 0..50 {
            let mover = spawner.spawn(&settings);
            assert!(mover.region().contains(mover.center()));
            assert!(frame.contains(mover.center()));
            let speed = mover.velocity().length();
            assert!(speed >= settings.min_speed - 1e-2 && speed <= settings.max_speed + 1e-2);
        }
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let settings = Settings::from_preset(EffectPreset::FlyingTiles);
        let mut a = Spawner::new(99, 0.5);
        let mut b = Spawner::new(99, 0.5);
        for _ in 0..10 {
            let (ma, mb) = (a.spawn(&settings), b.spawn(&settings));
            assert_eq!(ma.center(), mb.center());
            assert_eq!(ma.velocity(), mb.velocity());
            assert_eq!(ma.shape(), mb.shape());
        }
    }

    #[test]
    fn test_preset_shapes() {
        let mut spawner = Spawner::new(1, 0.5);
        let text = spawner.spawn(&Settings::from_preset(EffectPreset::FallingText));
        assert!(matches!(text.shape(), Shape::Rectangle { width, height } if width > height));
        assert!(text.gravity() < 0.0);

        let ball = spawner.spawn(&Settings::default());
        assert!(matches!(ball.shape(), Shape::Circle { .. }));
    }
}
