//! Pairwise collision detection and response
//!
//! Circles bounce with a mass-weighted elastic impulse along the line of
//! centers; rectangles reflect along their separating axis. After the impulse
//! the bodies are nudged apart one micro-step at a time. A pair that cannot be
//! separated within the micro-step budget is despawned instead of being left
//! embedded in each other.

use glam::Vec2;

use super::body::{Body, FixedRegion};
use super::mover::{Mover, Shape};
use crate::consts::{DEFAULT_BUFFER, DEFAULT_MAX_MICRO_STEPS};
use crate::settings::Settings;

/// Squared center distance below which the line of centers is undefined
const MIN_DIST_SQ: f32 = 1e-8;

/// What a single `collide` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Bodies were not touching
    Miss,
    /// Bodies collided and were separated in `micro_steps` nudges
    Resolved { micro_steps: u32 },
    /// Separation did not converge; the massed participants were finished
    Despawned { micro_steps: u32 },
    /// Pair not eligible: unsupported shapes, both massless or a finished body
    Skipped,
}

impl CollisionOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(
            self,
            CollisionOutcome::Resolved { .. } | CollisionOutcome::Despawned { .. }
        )
    }
}

/// Stateless collision engine with two tunables
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionDetector {
    /// Extra separation margin added to the contact distance
    pub buffer: f32,
    /// Upper bound on separation nudges per collision
    pub max_micro_steps: u32,
}

impl Default for CollisionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER, DEFAULT_MAX_MICRO_STEPS)
    }
}

impl CollisionDetector {
    pub fn new(buffer: f32, max_micro_steps: u32) -> Self {
        Self {
            buffer,
            max_micro_steps,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.buffer, settings.max_micro_steps)
    }

    /// Presence test with the detector's own buffer
    pub fn check<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: Body + ?Sized,
        B: Body + ?Sized,
    {
        self.check_with_buffer(a, b, self.buffer)
    }

    /// Presence test; never mutates either body
    ///
    /// Rectangle pairs use box overlap, anything involving a circle compares
    /// center distance against the sum of (bounding) radii.
    pub fn check_with_buffer<A, B>(&self, a: &A, b: &B, buffer: f32) -> bool
    where
        A: Body + ?Sized,
        B: Body + ?Sized,
    {
        match (a.shape(), b.shape()) {
            (Shape::Rectangle { .. }, Shape::Rectangle { .. }) => {
                let gap = box_gap(a, b, buffer);
                gap.x <= 0.0 && gap.y <= 0.0
            }
            (sa, sb) => {
                let reach = sa.bounding_radius() + sb.bounding_radius() + buffer;
                a.center().distance(b.center()) <= reach
            }
        }
    }

    /// Resolve a collision between two bodies with the detector's buffer
    pub fn collide<A, B>(&self, a: &mut A, b: &mut B) -> CollisionOutcome
    where
        A: Body + ?Sized,
        B: Body + ?Sized,
    {
        self.collide_with_buffer(a, b, self.buffer)
    }

    /// Resolve a collision, separating overlapping bodies by micro-steps
    ///
    /// The impulse (circles) or axis reflection (rectangles) is only applied
    /// while the bodies approach each other. An overlapping pair that is
    /// already moving apart keeps its velocities and is only pushed apart.
    pub fn collide_with_buffer<A, B>(
        &self,
        a: &mut A,
        b: &mut B,
        buffer: f32,
    ) -> CollisionOutcome
    where
        A: Body + ?Sized,
        B: Body + ?Sized,
    {
        if a.is_finished() || b.is_finished() {
            return CollisionOutcome::Skipped;
        }
        if a.mass().is_massless() && b.mass().is_massless() {
            return CollisionOutcome::Skipped;
        }

        match (a.shape(), b.shape()) {
            (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
                self.collide_circles(a, b, ra + rb + buffer)
            }
            (Shape::Rectangle { .. }, Shape::Rectangle { .. }) => self.collide_rects(a, b, buffer),
            _ => CollisionOutcome::Skipped,
        }
    }

    /// Bounce a mover off a read-only tracked region
    pub fn collide_region(&self, region: &FixedRegion, mover: &mut Mover) -> CollisionOutcome {
        let mut anchor = *region;
        self.collide(&mut anchor, mover)
    }

    fn collide_circles<A, B>(&self, a: &mut A, b: &mut B, reach: f32) -> CollisionOutcome
    where
        A: Body + ?Sized,
        B: Body + ?Sized,
    {
        if a.center().distance(b.center()) > reach {
            return CollisionOutcome::Miss;
        }

        let (va, vb) = elastic_impulse(
            a.center(),
            a.velocity(),
            a.mass().inverse(),
            b.center(),
            b.velocity(),
            b.mass().inverse(),
        );
        apply_velocities(a, b, va, vb);

        self.separate(a, b, |a, b| a.center().distance(b.center()) > reach)
    }

    fn collide_rects<A, B>(&self, a: &mut A, b: &mut B, buffer: f32) -> CollisionOutcome
    where
        A: Body + ?Sized,
        B: Body + ?Sized,
    {
        let gap = box_gap(a, b, buffer);
        if gap.x > 0.0 || gap.y > 0.0 {
            return CollisionOutcome::Miss;
        }

        // Shallowest penetration (largest signed gap) is the separating axis
        let axis = if gap.x >= gap.y { Vec2::X } else { Vec2::Y };
        let offset = (a.center() - b.center()).dot(axis);
        let closing = (a.velocity() - b.velocity()).dot(axis);
        if offset * closing < 0.0 {
            let (va, vb) = (reflect_axis(a.velocity(), axis), reflect_axis(b.velocity(), axis));
            apply_velocities(a, b, va, vb);
        }

        self.separate(a, b, |a, b| {
            let gap = box_gap(a, b, buffer);
            gap.x > 0.0 || gap.y > 0.0
        })
    }

    /// Nudge the massed bodies until `separated` holds or the budget runs out
    fn separate<A, B, F>(&self, a: &mut A, b: &mut B, separated: F) -> CollisionOutcome
    where
        A: Body + ?Sized,
        B: Body + ?Sized,
        F: Fn(&A, &B) -> bool,
    {
        let move_a = !a.mass().is_massless();
        let move_b = !b.mass().is_massless();

        let mut steps = 0;
        while !separated(&*a, &*b) {
            if steps >= self.max_micro_steps {
                if move_a {
                    a.finish();
                }
                if move_b {
                    b.finish();
                }
                log::debug!(
                    "Overlap did not resolve in {} micro-steps, despawning ({:?} vs {:?})",
                    steps,
                    a.center(),
                    b.center()
                );
                return CollisionOutcome::Despawned { micro_steps: steps };
            }
            if move_a {
                a.nudge();
            }
            if move_b {
                b.nudge();
            }
            steps += 1;
        }

        CollisionOutcome::Resolved { micro_steps: steps }
    }
}

/// Signed per-axis gap between two boxes grown by `buffer` (negative = penetration)
fn box_gap<A, B>(a: &A, b: &B, buffer: f32) -> Vec2
where
    A: Body + ?Sized,
    B: Body + ?Sized,
{
    let reach = a.shape().half_extents() + b.shape().half_extents() + Vec2::splat(buffer);
    (a.center() - b.center()).abs() - reach
}

/// Only bodies with mass take the new velocity
fn apply_velocities<A, B>(a: &mut A, b: &mut B, va: Vec2, vb: Vec2)
where
    A: Body + ?Sized,
    B: Body + ?Sized,
{
    if !a.mass().is_massless() {
        a.set_velocity(va);
    }
    if !b.mass().is_massless() {
        b.set_velocity(vb);
    }
}

/// Negate the velocity component along a unit axis
#[inline]
pub fn reflect_axis(velocity: Vec2, axis: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(axis) * axis
}

/// Two-body elastic collision along the line of centers
///
/// Masses enter as inverses so a massless side (inverse 0) acts as an
/// immovable anchor. Tangential components are untouched. Bodies that are
/// already separating, or whose centers coincide, keep their velocities.
///
/// v1' = v1 - 2·m2/(m1+m2)·⟨v1-v2, c1-c2⟩/|c1-c2|²·(c1-c2)
pub fn elastic_impulse(
    c1: Vec2,
    v1: Vec2,
    inv_m1: f32,
    c2: Vec2,
    v2: Vec2,
    inv_m2: f32,
) -> (Vec2, Vec2) {
    let n = c1 - c2;
    let dist_sq = n.length_squared();
    let inv_sum = inv_m1 + inv_m2;
    if dist_sq < MIN_DIST_SQ || inv_sum <= 0.0 {
        return (v1, v2);
    }

    let approach = (v1 - v2).dot(n);
    if approach >= 0.0 {
        return (v1, v2);
    }

    let k = 2.0 * approach / dist_sq;
    let v1_new = v1 - (inv_m1 / inv_sum) * k * n;
    let v2_new = v2 + (inv_m2 / inv_sum) * k * n;
    (v1_new, v2_new)
}
