//! Headless mover demo
//!
//! Usage: `mover-demo [preset | settings.json]`
//!
//! Spawns movers for the chosen effect, sweeps a synthetic tracked face across
//! the frame and lets the movers bounce off it, logging pool statistics.
//! Run with `RUST_LOG=debug` to see despawns.

use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use mover_physics::render::{Canvas, colors};
use mover_physics::sim::{CollisionManager, FixedRegion, Shape, Spawner};
use mover_physics::{EffectPreset, Settings};

/// Demo length (20 s at 30 fps)
const FRAMES: u32 = 600;
const FRAME_DT: f32 = 1.0 / 30.0;
/// Synthetic face: radius and sweep period (seconds)
const FACE_RADIUS: f32 = 90.0;
const FACE_PERIOD: f32 = 8.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Mover demo starting...");

    let settings = load_settings()?;
    log::info!(
        "Preset {}, {}x{}, max movers {:?}",
        settings.preset.as_str(),
        settings.frame_width,
        settings.frame_height,
        settings.max_movers
    );

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    log::info!("Spawner seed: {}", seed);

    let mut manager = CollisionManager::from_settings(&settings);
    let mut spawner = Spawner::from_settings(&settings, seed);
    let mut canvas = Canvas::new(settings.frame_width, settings.frame_height);
    let mut spawned = 0u32;

    for frame in 0..FRAMES {
        if let Some(mover) = spawner.poll(FRAME_DT, &settings) {
            manager.append(mover);
            spawned += 1;
        }

        let face = face_at(frame as f32 * FRAME_DT, &settings);
        let hits = manager.collide_region(&face);

        canvas.clear(colors::BACKGROUND);
        match face.shape {
            Shape::Circle { radius } => canvas.stroke_circle(face.center, radius, colors::FACE),
            Shape::Rectangle { width, height } => {
                canvas.stroke_rect(face.center, Vec2::new(width, height), colors::FACE)
            }
        }
        manager.tick_with_dt(FRAME_DT, &mut canvas);

        if frame % 60 == 0 {
            log::info!(
                "Frame {}: {} movers alive, {} spawned, {} face hits",
                frame,
                manager.len(),
                spawned,
                hits
            );
        }
    }

    log::info!(
        "Done: {} frames, {} spawned, {} alive, {} bytes per frame",
        FRAMES,
        spawned,
        manager.len(),
        canvas.as_bytes().len()
    );
    Ok(())
}

/// Settings from a preset name, a JSON file, or defaults
fn load_settings() -> Result<Settings, Box<dyn Error>> {
    let Some(arg) = std::env::args().nth(1) else {
        return Ok(Settings::default());
    };
    if let Some(preset) = EffectPreset::from_str(&arg) {
        return Ok(Settings::from_preset(preset));
    }
    let json = std::fs::read_to_string(&arg)?;
    let settings = Settings::from_json(&json)?;
    log::info!("Loaded settings from {}", arg);
    Ok(settings)
}

/// Face sweeping left and right across the middle of the frame
///
/// Balls bounce off a round face; tiles only collide with boxes, so tile
/// presets get the detector-style bounding box instead.
fn face_at(time: f32, settings: &Settings) -> FixedRegion {
    let (w, h) = (settings.frame_width as f32, settings.frame_height as f32);
    let omega = std::f32::consts::TAU / FACE_PERIOD;
    let amplitude = w / 3.0;
    let center = Vec2::new(w * 0.5 + amplitude * (omega * time).sin(), h * 0.5);
    let velocity = Vec2::new(amplitude * omega * (omega * time).cos(), 0.0);
    let face = match settings.preset {
        EffectPreset::BouncingBalls => FixedRegion::circle(center, FACE_RADIUS),
        EffectPreset::FlyingTiles | EffectPreset::FallingText => {
            FixedRegion::rect(center, FACE_RADIUS * 2.0, FACE_RADIUS * 2.4)
        }
    };
    face.with_velocity(velocity)
}
