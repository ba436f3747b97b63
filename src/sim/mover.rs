//! Movers: one drawable asset plus its kinematic state
//!
//! A mover integrates its own velocity, bounces off (or leaves through) its
//! active region and draws its asset. Collision response between movers lives
//! in [`super::collision`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_UPDATES_PER_SECOND;
use crate::polar_to_cartesian;
use crate::render::{Asset, Canvas, Extent, colors};
use crate::settings::Settings;

/// Stable handle for a mover inside a [`super::CollisionManager`] pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MoverId(pub u64);

impl MoverId {
    /// Id carried by movers that were never appended to a pool
    pub const UNASSIGNED: MoverId = MoverId(0);
}

/// Hitbox shape, fixed at construction from the asset's extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rectangle { width: f32, height: f32 },
}

impl Shape {
    pub fn from_extent(extent: Extent) -> Self {
        match extent {
            Extent::Radius(radius) => Shape::Circle { radius },
            Extent::Size { width, height } => Shape::Rectangle { width, height },
        }
    }

    /// Half size along each axis
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Rectangle { width, height } => Vec2::new(width, height) * 0.5,
        }
    }

    /// Radius of the smallest circle enclosing the shape
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => radius,
            Shape::Rectangle { .. } => self.half_extents().length(),
        }
    }

    pub fn area(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
            Shape::Rectangle { width, height } => width * height,
        }
    }
}

/// Collision mass
///
/// A massless body is kinematic: it pushes others around but collision
/// response never changes its own velocity or position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Mass {
    Finite(f32),
    Massless,
}

impl Mass {
    /// Finite mass, or massless when `mass` is not a positive finite number
    pub fn finite(mass: f32) -> Self {
        if mass.is_finite() && mass > 0.0 {
            Mass::Finite(mass)
        } else {
            Mass::Massless
        }
    }

    /// True for anything with a zero inverse mass, including a directly
    /// built `Finite` that is zero, negative, infinite or NaN
    #[inline]
    pub fn is_massless(&self) -> bool {
        self.inverse() == 0.0
    }

    /// 1/m, zero for massless bodies
    #[inline]
    pub fn inverse(&self) -> f32 {
        match *self {
            Mass::Finite(m) if m > 0.0 => 1.0 / m,
            _ => 0.0,
        }
    }
}

/// How gravity is applied on each velocity update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GravityMode {
    /// Flat decrement per update, independent of frame rate
    PerTick,
    /// Scaled by the time elapsed since the previous update
    #[default]
    PerSecond,
}

/// Axis-aligned bounds a mover's center must stay within
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveRegion {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Default for ActiveRegion {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl ActiveRegion {
    pub const UNBOUNDED: ActiveRegion = ActiveRegion {
        x_min: f32::NEG_INFINITY,
        x_max: f32::INFINITY,
        y_min: f32::NEG_INFINITY,
        y_max: f32::INFINITY,
    };

    pub fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Whole video frame
    pub fn frame(width: f32, height: f32) -> Self {
        Self::new(0.0, width, 0.0, height)
    }

    /// Shrink by the shape's half extent so the body, not just its center,
    /// stays inside. An axis narrower than the body collapses to its midpoint.
    pub fn inset_for(&self, shape: &Shape) -> Self {
        let half = shape.half_extents();
        let (x_min, x_max) = inset_axis(self.x_min, self.x_max, half.x);
        let (y_min, y_max) = inset_axis(self.y_min, self.y_max, half.y);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.x_min, self.x_max), p.y.clamp(self.y_min, self.y_max))
    }
}

fn inset_axis(min: f32, max: f32, half: f32) -> (f32, f32) {
    let (lo, hi) = (min + half, max - half);
    if lo <= hi {
        (lo, hi)
    } else {
        let mid = (min + max) * 0.5;
        (mid, mid)
    }
}

/// Accumulates frame time and fires at most once per interval
///
/// Fires on the very first poll so a freshly spawned mover reacts immediately.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    interval: f32,
    accumulated: f32,
    primed: bool,
}

/// Relative slack so a rate re-estimated from `dt` still fires every `dt`
const LIMITER_SLACK: f32 = 1e-3;

impl RateLimiter {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.0),
            accumulated: 0.0,
            primed: false,
        }
    }

    pub fn from_rate(per_second: f32) -> Self {
        let mut limiter = Self::new(0.0);
        limiter.set_rate(per_second);
        limiter
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn set_rate(&mut self, per_second: f32) {
        if per_second.is_finite() && per_second > 0.0 {
            self.interval = 1.0 / per_second;
        }
    }

    /// Feed `dt` seconds; returns the accumulated time when the limiter fires
    pub fn poll(&mut self, dt: f32) -> Option<f32> {
        if dt.is_finite() && dt > 0.0 {
            self.accumulated += dt;
        }
        if !self.primed || self.accumulated >= self.interval * (1.0 - LIMITER_SLACK) {
            self.primed = true;
            let elapsed = self.accumulated;
            self.accumulated = 0.0;
            Some(elapsed)
        } else {
            None
        }
    }
}

/// A simulated 2D body carrying a drawable asset
#[derive(Debug)]
pub struct Mover {
    pub(crate) id: MoverId,
    center: Vec2,
    velocity: Vec2,
    shape: Shape,
    mass: Mass,
    gravity: f32,
    gravity_mode: GravityMode,
    dampening: f32,
    /// Bounds for the center (already inset by the half extent)
    region: ActiveRegion,
    border_collision: bool,
    updates_per_second: f32,
    limiter: RateLimiter,
    finished: bool,
    debug_hitbox: bool,
    asset: Box<dyn Asset>,
}

impl Mover {
    pub fn builder(asset: impl Asset + 'static) -> MoverBuilder {
        MoverBuilder::new(Box::new(asset))
    }

    pub fn id(&self) -> MoverId {
        self.id
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn mass(&self) -> Mass {
        self.mass
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn dampening(&self) -> f32 {
        self.dampening
    }

    pub fn region(&self) -> &ActiveRegion {
        &self.region
    }

    pub fn border_collision(&self) -> bool {
        self.border_collision
    }

    pub fn updates_per_second(&self) -> f32 {
        self.updates_per_second
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Mark inert; the owning pool drops it on the next prune
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn asset(&self) -> &dyn Asset {
        self.asset.as_ref()
    }

    /// Apply gravity and border response, throttled to `updates_per_second`
    ///
    /// `dt` is the host frame interval in seconds.
    pub fn update_velocity(&mut self, dt: f32) {
        if self.finished {
            return;
        }
        self.limiter.set_rate(self.updates_per_second);
        let Some(elapsed) = self.limiter.poll(dt) else {
            return;
        };

        self.velocity.y -= match self.gravity_mode {
            GravityMode::PerTick => self.gravity,
            GravityMode::PerSecond => self.gravity * elapsed,
        };

        let next = self.center + self.velocity / self.updates_per_second;
        let exits_x = next.x < self.region.x_min || next.x > self.region.x_max;
        let exits_y = next.y < self.region.y_min || next.y > self.region.y_max;
        if !(exits_x || exits_y) {
            return;
        }

        if !self.border_collision {
            self.finished = true;
            return;
        }
        if exits_x {
            self.velocity.x = -self.velocity.x * self.dampening;
        }
        if exits_y {
            self.velocity.y = -self.velocity.y * self.dampening;
        }
    }

    /// Integrate one frame of `dt` seconds
    ///
    /// The frame interval becomes the mover's re-estimated update rate.
    pub fn advance(&mut self, dt: f32) {
        if self.finished {
            return;
        }
        if dt.is_finite() && dt > 0.0 {
            self.updates_per_second = 1.0 / dt;
        }
        self.step();
    }

    /// One micro-step at the current update rate (used to push overlaps apart)
    pub fn nudge(&mut self) {
        if !self.finished {
            self.step();
        }
    }

    fn step(&mut self) {
        self.center += self.velocity / self.updates_per_second;
        self.center = self.region.clamp(self.center);
    }

    /// Draw the asset, plus the hitbox outline in debug mode
    pub fn write(&self, canvas: &mut Canvas) {
        if self.finished {
            return;
        }
        self.asset.draw(canvas, self.center);
        if self.debug_hitbox {
            match self.shape {
                Shape::Circle { radius } => {
                    canvas.stroke_circle(self.center, radius, colors::HITBOX)
                }
                Shape::Rectangle { width, height } => {
                    canvas.stroke_rect(self.center, Vec2::new(width, height), colors::HITBOX)
                }
            }
        }
    }
}

/// Fluent construction of a [`Mover`]
#[derive(Debug)]
pub struct MoverBuilder {
    asset: Box<dyn Asset>,
    center: Vec2,
    velocity: Vec2,
    mass: Option<Mass>,
    gravity: f32,
    gravity_mode: GravityMode,
    dampening: f32,
    region: ActiveRegion,
    border_collision: bool,
    updates_per_second: f32,
    debug_hitbox: bool,
}

impl MoverBuilder {
    fn new(asset: Box<dyn Asset>) -> Self {
        Self {
            asset,
            center: Vec2::ZERO,
            velocity: Vec2::ZERO,
            mass: None,
            gravity: 0.0,
            gravity_mode: GravityMode::default(),
            dampening: 1.0,
            region: ActiveRegion::UNBOUNDED,
            border_collision: true,
            updates_per_second: DEFAULT_UPDATES_PER_SECOND,
            debug_hitbox: false,
        }
    }

    /// Physics defaults from settings: gravity, dampening, border policy,
    /// initial rate, debug outline and the full frame as active region
    pub fn settings(mut self, settings: &Settings) -> Self {
        self.gravity = settings.gravity;
        self.gravity_mode = settings.gravity_mode;
        self.dampening = settings.dampening;
        self.border_collision = settings.border_collision_enabled;
        self.updates_per_second = settings.updates_per_second;
        self.debug_hitbox = settings.debug_hitboxes;
        self.region = ActiveRegion::frame(settings.frame_width as f32, settings.frame_height as f32);
        self
    }

    pub fn center(mut self, center: Vec2) -> Self {
        self.center = center;
        self
    }

    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Velocity from speed (pixels/s) and heading (radians)
    pub fn polar_velocity(mut self, magnitude: f32, angle: f32) -> Self {
        self.velocity = polar_to_cartesian(magnitude, angle);
        self
    }

    pub fn mass(mut self, mass: Mass) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn massless(self) -> Self {
        self.mass(Mass::Massless)
    }

    pub fn gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn gravity_mode(mut self, mode: GravityMode) -> Self {
        self.gravity_mode = mode;
        self
    }

    pub fn dampening(mut self, dampening: f32) -> Self {
        self.dampening = dampening;
        self
    }

    pub fn region(mut self, region: ActiveRegion) -> Self {
        self.region = region;
        self
    }

    pub fn border_collision(mut self, enabled: bool) -> Self {
        self.border_collision = enabled;
        self
    }

    pub fn updates_per_second(mut self, rate: f32) -> Self {
        self.updates_per_second = rate;
        self
    }

    pub fn debug_hitbox(mut self, enabled: bool) -> Self {
        self.debug_hitbox = enabled;
        self
    }

    pub fn build(self) -> Mover {
        let shape = Shape::from_extent(self.asset.extent());
        let mass = self.mass.unwrap_or_else(|| Mass::finite(shape.area()));
        let updates_per_second = if self.updates_per_second.is_finite() && self.updates_per_second > 0.0 {
            self.updates_per_second
        } else {
            DEFAULT_UPDATES_PER_SECOND
        };

        Mover {
            id: MoverId::UNASSIGNED,
            center: self.center,
            velocity: self.velocity,
            shape,
            mass,
            gravity: self.gravity,
            gravity_mode: self.gravity_mode,
            dampening: self.dampening.clamp(0.0, 1.0),
            region: self.region.inset_for(&shape),
            border_collision: self.border_collision,
            updates_per_second,
            limiter: RateLimiter::from_rate(updates_per_second),
            finished: false,
            debug_hitbox: self.debug_hitbox,
            asset: self.asset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Disc, Tile};
    use proptest::prelude::*;

    fn ball(center: Vec2, velocity: Vec2) -> MoverBuilder {
        Mover::builder(Disc::new(0.5))
            .center(center)
            .velocity(velocity)
            .region(ActiveRegion::new(0.0, 500.0, 0.0, 500.0))
            .updates_per_second(60.0)
    }

    #[test]
    fn test_border_bounce_flips_velocity() {
        let mut mover = ball(Vec2::new(499.0, 250.0), Vec2::new(200.0, 0.0))
            .dampening(1.0)
            .build();

        mover.update_velocity(1.0 / 60.0);
        assert!((mover.velocity().x + 200.0).abs() < 1e-4);

        mover.advance(1.0 / 60.0);
        assert!(mover.center().x >= 0.0 && mover.center().x <= 500.0);
        assert!(!mover.is_finished());
    }

    #[test]
    fn test_dampening_scales_bounce() {
        let mut mover = ball(Vec2::new(250.0, 1.0), Vec2::new(0.0, -120.0))
            .dampening(0.5)
            .build();
        mover.update_velocity(1.0 / 60.0);
        assert!((mover.velocity().y - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_exit_without_border_collision_finishes() {
        let mut mover = ball(Vec2::new(499.0, 250.0), Vec2::new(200.0, 0.0))
            .border_collision(false)
            .build();
        mover.update_velocity(1.0 / 60.0);
        assert!(mover.is_finished());

        // Inert once finished
        let before = mover.center();
        mover.advance(1.0 / 60.0);
        assert_eq!(mover.center(), before);
    }

    #[test]
    fn test_gravity_per_tick_vs_per_second() {
        let mut tick = ball(Vec2::new(250.0, 250.0), Vec2::ZERO)
            .gravity(10.0)
            .gravity_mode(GravityMode::PerTick)
            .build();
        tick.update_velocity(0.1);
        assert!((tick.velocity().y + 10.0).abs() < 1e-5);

        let mut scaled = ball(Vec2::new(250.0, 250.0), Vec2::ZERO)
            .gravity(10.0)
            .gravity_mode(GravityMode::PerSecond)
            .build();
        scaled.update_velocity(0.1);
        assert!((scaled.velocity().y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_update_velocity_is_throttled() {
        let mut mover = ball(Vec2::new(250.0, 250.0), Vec2::ZERO)
            .gravity(1.0)
            .gravity_mode(GravityMode::PerTick)
            .updates_per_second(10.0)
            .build();

        // First poll always fires
        mover.update_velocity(0.01);
        assert!((mover.velocity().y + 1.0).abs() < 1e-5);

        // 0.05s of a 0.1s interval: no update yet
        for _ in 0..5 {
            mover.update_velocity(0.01);
        }
        assert!((mover.velocity().y + 1.0).abs() < 1e-5);

        for _ in 0..5 {
            mover.update_velocity(0.01);
        }
        assert!((mover.velocity().y + 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_advance_reestimates_rate() {
        let mut mover = ball(Vec2::new(100.0, 100.0), Vec2::new(30.0, 0.0)).build();
        mover.advance(0.1);
        assert!((mover.updates_per_second() - 10.0).abs() < 1e-3);
        assert!((mover.center().x - 103.0).abs() < 1e-3);
    }

    #[test]
    fn test_polar_velocity() {
        let mover = Mover::builder(Disc::new(1.0))
            .polar_velocity(100.0, std::f32::consts::FRAC_PI_2)
            .build();
        assert!(mover.velocity().x.abs() < 1e-3);
        assert!((mover.velocity().y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_default_mass_is_area() {
        let tile = Mover::builder(Tile::new(10.0, 4.0)).build();
        assert_eq!(tile.mass(), Mass::Finite(40.0));
        assert_eq!(tile.shape(), Shape::Rectangle { width: 10.0, height: 4.0 });

        let disc = Mover::builder(Disc::new(2.0)).build();
        match disc.mass() {
            Mass::Finite(m) => assert!((m - 4.0 * std::f32::consts::PI).abs() < 1e-4),
            Mass::Massless => panic!("disc should have mass"),
        }
    }

    #[test]
    fn test_region_inset_and_collapse() {
        let region = ActiveRegion::new(0.0, 100.0, 0.0, 10.0);
        let inset = region.inset_for(&Shape::Rectangle { width: 20.0, height: 30.0 });
        assert_eq!(inset.x_min, 10.0);
        assert_eq!(inset.x_max, 90.0);
        // Body taller than the region: pinned to the middle
        assert_eq!(inset.y_min, 5.0);
        assert_eq!(inset.y_max, 5.0);
    }

    #[test]
    fn test_write_draws_hitbox_outline() {
        let builder = || {
            Mover::builder(Tile::new(10.0, 10.0))
                .center(Vec2::new(20.0, 20.0))
                .region(ActiveRegion::frame(40.0, 40.0))
        };

        let mut canvas = Canvas::new(40, 40);
        builder().debug_hitbox(true).build().write(&mut canvas);
        assert_eq!(canvas.pixel(15, 15), Some(colors::HITBOX));
        assert_eq!(canvas.pixel(24, 20), Some(colors::HITBOX));
        assert_eq!(canvas.pixel(20, 24), Some(colors::HITBOX));
        assert_eq!(canvas.pixel(20, 20), Some(colors::TILE));
        assert_ne!(canvas.pixel(25, 20), Some(colors::HITBOX));

        let mut canvas = Canvas::new(40, 40);
        builder().build().write(&mut canvas);
        assert_eq!(canvas.pixel(15, 15), Some(colors::TILE));
    }

    #[test]
    fn test_write_after_finish_draws_nothing() {
        let mut canvas = Canvas::new(40, 40);
        let mut mover = Mover::builder(Disc::new(6.0))
            .center(Vec2::new(20.0, 20.0))
            .region(ActiveRegion::frame(40.0, 40.0))
            .debug_hitbox(true)
            .build();
        mover.finish();
        mover.write(&mut canvas);
        assert!(canvas.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_mass_finite_rejects_non_positive() {
        assert_eq!(Mass::finite(0.0), Mass::Massless);
        assert_eq!(Mass::finite(f32::NAN), Mass::Massless);
        assert_eq!(Mass::Massless.inverse(), 0.0);
        for degenerate in [0.0, -3.0, f32::INFINITY, f32::NAN] {
            assert!(Mass::Finite(degenerate).is_massless());
        }
        assert!(!Mass::Finite(1.0e-3).is_massless());
        assert_eq!(Mass::finite(4.0).inverse(), 0.25);
    }

    proptest! {
        #[test]
        fn prop_center_stays_in_region(
            x in 0.0f32..500.0,
            y in 0.0f32..300.0,
            vx in -5000.0f32..5000.0,
            vy in -5000.0f32..5000.0,
            gravity in -2000.0f32..2000.0,
            dampening in 0.0f32..=1.0,
            dts in proptest::collection::vec(0.001f32..0.25, 1..40),
        ) {
            let region = ActiveRegion::new(0.0, 500.0, 0.0, 300.0);
            let mut mover = Mover::builder(Disc::new(5.0))
                .center(Vec2::new(x, y))
                .velocity(Vec2::new(vx, vy))
                .gravity(gravity)
                .dampening(dampening)
                .region(region)
                .build();

            for dt in dts {
                mover.update_velocity(dt);
                mover.advance(dt);
                prop_assert!(region.contains(mover.center()));
            }
        }
    }
}
