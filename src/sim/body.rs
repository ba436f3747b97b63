//! Kinematic surface shared by movers and externally tracked regions

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::mover::{Mass, Mover, Shape};

/// What the collision detector needs to know about a participant
pub trait Body {
    fn center(&self) -> Vec2;

    fn velocity(&self) -> Vec2;

    fn set_velocity(&mut self, velocity: Vec2);

    fn shape(&self) -> Shape;

    fn mass(&self) -> Mass;

    fn is_finished(&self) -> bool;

    fn finish(&mut self);

    /// Advance one micro-step along the current velocity
    fn nudge(&mut self);
}

impl Body for Mover {
    fn center(&self) -> Vec2 {
        Mover::center(self)
    }

    fn velocity(&self) -> Vec2 {
        Mover::velocity(self)
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        Mover::set_velocity(self, velocity);
    }

    fn shape(&self) -> Shape {
        Mover::shape(self)
    }

    fn mass(&self) -> Mass {
        Mover::mass(self)
    }

    fn is_finished(&self) -> bool {
        Mover::is_finished(self)
    }

    fn finish(&mut self) {
        Mover::finish(self);
    }

    fn nudge(&mut self) {
        Mover::nudge(self);
    }
}

/// A massless, externally owned obstacle (e.g. a tracked face)
///
/// Written by the tracker once per detection cycle and only read by the
/// simulation: collisions never move it, change its velocity or finish it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedRegion {
    pub center: Vec2,
    pub shape: Shape,
    /// Tracker-reported motion, used as the obstacle's velocity in impulses
    pub velocity: Vec2,
}

impl FixedRegion {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            shape: Shape::Circle { radius },
            velocity: Vec2::ZERO,
        }
    }

    pub fn rect(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            shape: Shape::Rectangle { width, height },
            velocity: Vec2::ZERO,
        }
    }

    /// From a detector bounding box given as top-left corner plus size
    pub fn from_bounding_box(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::rect(Vec2::new(x + width * 0.5, y + height * 0.5), width, height)
    }

    /// Circle inscribed in a detector bounding box (rounder bounces off faces)
    pub fn inscribed_circle(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::circle(
            Vec2::new(x + width * 0.5, y + height * 0.5),
            width.min(height) * 0.5,
        )
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

impl Body for FixedRegion {
    fn center(&self) -> Vec2 {
        self.center
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, _velocity: Vec2) {}

    fn shape(&self) -> Shape {
        self.shape
    }

    fn mass(&self) -> Mass {
        Mass::Massless
    }

    fn is_finished(&self) -> bool {
        false
    }

    fn finish(&mut self) {}

    fn nudge(&mut self) {}
}
