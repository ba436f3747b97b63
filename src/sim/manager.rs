//! Bounded, insertion-ordered pool of movers
//!
//! Per frame: resolve collisions, update velocities, integrate, prune
//! finished movers, draw. The pool owns every mover it is given; callers keep
//! a [`MoverId`] handle instead of a reference.

use super::body::FixedRegion;
use super::clock::FrameClock;
use super::collision::{CollisionDetector, CollisionOutcome};
use super::mover::{Mover, MoverId};
use crate::render::Canvas;
use crate::settings::Settings;

/// Owns the movers of one effect/scene plus the detector that resolves them
#[derive(Debug)]
pub struct CollisionManager {
    /// Oldest first
    movers: Vec<Mover>,
    max_movers: Option<usize>,
    collisions_enabled: bool,
    border_collision_enabled: bool,
    detector: CollisionDetector,
    clock: FrameClock,
    next_id: u64,
}

impl Default for CollisionManager {
    fn default() -> Self {
        Self::new(None, true, true, CollisionDetector::default())
    }
}

impl CollisionManager {
    pub fn new(
        max_movers: Option<usize>,
        collisions_enabled: bool,
        border_collision_enabled: bool,
        detector: CollisionDetector,
    ) -> Self {
        Self {
            movers: Vec::new(),
            max_movers,
            collisions_enabled,
            border_collision_enabled,
            detector,
            clock: FrameClock::default(),
            next_id: 1,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut manager = Self::new(
            settings.max_movers,
            settings.collisions_enabled,
            settings.border_collision_enabled,
            CollisionDetector::from_settings(settings),
        );
        manager.clock = FrameClock::new(settings.updates_per_second);
        manager
    }

    /// Add a mover at the end of the pool, evicting the oldest on overflow
    pub fn append(&mut self, mut mover: Mover) -> MoverId {
        let id = MoverId(self.next_id);
        self.next_id += 1;
        mover.id = id;
        self.movers.push(mover);

        if let Some(max) = self.max_movers {
            if self.movers.len() > max {
                let excess = self.movers.len() - max;
                for evicted in self.movers.drain(..excess) {
                    log::trace!(
                        "Pool full ({}), evicting mover {:?} (finished: {})",
                        max,
                        evicted.id(),
                        evicted.is_finished()
                    );
                }
            }
        }
        id
    }

    /// Pairwise collisions (index order), then every mover's own velocity update
    pub fn update_velocities(&mut self, dt: f32) {
        if self.collisions_enabled && self.movers.len() >= 2 {
            for i in 0..self.movers.len() - 1 {
                let (head, tail) = self.movers.split_at_mut(i + 1);
                let a = &mut head[i];
                for b in tail.iter_mut() {
                    self.detector.collide(a, b);
                }
            }
        }

        for mover in &mut self.movers {
            mover.update_velocity(dt);
        }
    }

    /// Integrate every mover, then drop the finished ones (order preserved)
    pub fn advance(&mut self, dt: f32) {
        for mover in &mut self.movers {
            mover.advance(dt);
        }

        let before = self.movers.len();
        self.movers.retain(|m| !m.is_finished());
        let pruned = before - self.movers.len();
        if pruned > 0 {
            log::trace!("Pruned {} finished movers, {} remain", pruned, self.movers.len());
        }
    }

    /// Draw in pool order (newest on top)
    pub fn write(&self, canvas: &mut Canvas) {
        for mover in &self.movers {
            mover.write(canvas);
        }
    }

    /// One host frame using the measured wall-clock interval
    pub fn tick(&mut self, canvas: &mut Canvas) {
        let dt = self.clock.lap();
        self.tick_with_dt(dt, canvas);
    }

    /// One host frame with an explicit interval (fixed-step hosts, tests)
    pub fn tick_with_dt(&mut self, dt: f32, canvas: &mut Canvas) {
        self.update_velocities(dt);
        self.advance(dt);
        self.write(canvas);
    }

    /// Bounce every pooled mover off a tracked region; returns the hit count
    pub fn collide_region(&mut self, region: &FixedRegion) -> usize {
        let detector = &self.detector;
        self.movers
            .iter_mut()
            .map(|mover| detector.collide_region(region, mover))
            .filter(CollisionOutcome::is_hit)
            .count()
    }

    pub fn detector(&self) -> &CollisionDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut CollisionDetector {
        &mut self.detector
    }

    pub fn collisions_enabled(&self) -> bool {
        self.collisions_enabled
    }

    pub fn set_collisions_enabled(&mut self, enabled: bool) {
        self.collisions_enabled = enabled;
    }

    /// Advisory border policy for movers the host creates
    pub fn border_collision_enabled(&self) -> bool {
        self.border_collision_enabled
    }

    pub fn max_movers(&self) -> Option<usize> {
        self.max_movers
    }

    pub fn len(&self) -> usize {
        self.movers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movers.is_empty()
    }

    pub fn contains(&self, id: MoverId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: MoverId) -> Option<&Mover> {
        self.movers.iter().find(|m| m.id() == id)
    }

    pub fn get_mut(&mut self, id: MoverId) -> Option<&mut Mover> {
        self.movers.iter_mut().find(|m| m.id() == id)
    }

    /// Movers oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Mover> {
        self.movers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Mover> {
        self.movers.iter_mut()
    }

    pub fn ids(&self) -> Vec<MoverId> {
        self.movers.iter().map(Mover::id).collect()
    }

    /// Drop every mover (scene restart); ids keep counting up
    pub fn clear(&mut self) {
        self.movers.clear();
        self.clock.reset();
    }
}
