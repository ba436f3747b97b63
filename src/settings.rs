//! Simulation settings and effect presets
//!
//! Loaded from JSON by the host; every field has a default so a settings file
//! only needs the values it overrides.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::GravityMode;

/// Overlay effect presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EffectPreset {
    /// Balls bouncing around the frame and off each other
    #[default]
    BouncingBalls,
    /// Image tiles flying across and leaving the frame
    FlyingTiles,
    /// Text boxes falling and piling up at the bottom edge
    FallingText,
}

impl EffectPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectPreset::BouncingBalls => "BouncingBalls",
            EffectPreset::FlyingTiles => "FlyingTiles",
            EffectPreset::FallingText => "FallingText",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "bouncingballs" | "balls" => Some(EffectPreset::BouncingBalls),
            "flyingtiles" | "tiles" => Some(EffectPreset::FlyingTiles),
            "fallingtext" | "text" => Some(EffectPreset::FallingText),
            _ => None,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which kind of movers the host spawns
    pub preset: EffectPreset,

    // === Motion ===
    /// Subtracted from vy on each velocity update (frames are y-down, so
    /// negative values pull toward the bottom edge)
    pub gravity: f32,
    pub gravity_mode: GravityMode,
    /// Fraction of speed kept after a border bounce (0.0 - 1.0)
    pub dampening: f32,
    /// Initial velocity-update rate, re-estimated every frame
    pub updates_per_second: f32,

    // === Collisions ===
    pub collisions_enabled: bool,
    /// Default border policy for new movers: bounce (true) or leave and despawn
    pub border_collision_enabled: bool,
    /// Extra separation margin (pixels)
    pub buffer: f32,
    /// Micro-step budget before a stuck pair is despawned
    pub max_micro_steps: u32,

    // === Pool ===
    /// Pool capacity; oldest movers are evicted first. None = unbounded
    pub max_movers: Option<usize>,

    // === Spawning ===
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Spawn speed range (pixels/s)
    pub min_speed: f32,
    pub max_speed: f32,
    /// Spawn size range (radius, or half width for tiles)
    pub min_size: f32,
    pub max_size: f32,

    // === Frame ===
    pub frame_width: u32,
    pub frame_height: u32,
    /// Draw hitbox outlines over every mover
    pub debug_hitboxes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: EffectPreset::BouncingBalls,

            gravity: DEFAULT_GRAVITY,
            gravity_mode: GravityMode::PerSecond,
            dampening: DEFAULT_DAMPENING,
            updates_per_second: DEFAULT_UPDATES_PER_SECOND,

            collisions_enabled: true,
            border_collision_enabled: true,
            buffer: DEFAULT_BUFFER,
            max_micro_steps: DEFAULT_MAX_MICRO_STEPS,

            max_movers: Some(30),

            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            min_speed: 80.0,
            max_speed: 240.0,
            min_size: 12.0,
            max_size: 30.0,

            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            debug_hitboxes: false,
        }
    }
}

impl Settings {
    /// Create settings from an effect preset (applies preset defaults)
    pub fn from_preset(preset: EffectPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply an effect preset (updates preset-dependent physics)
    ///
    /// Preset-dependent fields start from their defaults, so switching presets
    /// never carries values over from the previous one.
    pub fn apply_preset(&mut self, preset: EffectPreset) {
        let base = Self::default();
        self.preset = preset;
        self.gravity = base.gravity;
        self.gravity_mode = base.gravity_mode;
        self.dampening = base.dampening;
        self.border_collision_enabled = base.border_collision_enabled;
        self.max_movers = base.max_movers;
        self.spawn_interval = base.spawn_interval;
        self.min_speed = base.min_speed;
        self.max_speed = base.max_speed;

        match preset {
            EffectPreset::BouncingBalls => {}
            EffectPreset::FlyingTiles => {
                // Tiles leave through the frame edge and despawn
                self.border_collision_enabled = false;
                self.max_movers = Some(20);
                self.min_speed = 150.0;
                self.max_speed = 400.0;
            }
            EffectPreset::FallingText => {
                self.gravity = -600.0;
                self.gravity_mode = GravityMode::PerSecond;
                self.dampening = 0.6;
                self.max_movers = Some(15);
                self.spawn_interval = 1.0;
            }
        }
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(
            "dampening",
            self.dampening,
            (0.0..=1.0).contains(&self.dampening),
            "0.0..=1.0",
        )?;
        check(
            "updates_per_second",
            self.updates_per_second,
            self.updates_per_second.is_finite() && self.updates_per_second > 0.0,
            "> 0",
        )?;
        check(
            "max_micro_steps",
            self.max_micro_steps as f32,
            self.max_micro_steps > 0,
            ">= 1",
        )?;
        check("buffer", self.buffer, self.buffer.is_finite() && self.buffer >= 0.0, ">= 0")?;
        check("gravity", self.gravity, self.gravity.is_finite(), "finite")?;
        check(
            "spawn_interval",
            self.spawn_interval,
            self.spawn_interval.is_finite() && self.spawn_interval > 0.0,
            "> 0",
        )?;
        check(
            "min_speed",
            self.min_speed,
            self.min_speed.is_finite() && self.min_speed >= 0.0,
            ">= 0",
        )?;
        check(
            "max_speed",
            self.max_speed,
            self.max_speed.is_finite() && self.max_speed >= self.min_speed,
            ">= min_speed",
        )?;
        check(
            "min_size",
            self.min_size,
            self.min_size.is_finite() && self.min_size > 0.0,
            "> 0",
        )?;
        check(
            "max_size",
            self.max_size,
            self.max_size.is_finite() && self.max_size >= self.min_size,
            ">= min_size",
        )?;
        check(
            "frame_width",
            self.frame_width as f32,
            self.frame_width > 0,
            ">= 1",
        )?;
        check(
            "frame_height",
            self.frame_height as f32,
            self.frame_height > 0,
            ">= 1",
        )?;
        Ok(())
    }
}

fn check(field: &'static str, value: f32, ok: bool, expected: &'static str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            expected,
        })
    }
}
