//! Mover simulation
//!
//! Everything here runs synchronously on the host's render thread, once per
//! displayed frame:
//! - Single shared Δt per frame, passed explicitly
//! - Pair resolution in pool (insertion) order
//! - No rendering or capture dependencies beyond the canvas passed to `write`

pub mod body;
pub mod clock;
pub mod collision;
pub mod manager;
pub mod mover;
pub mod spawn;

pub use body::{Body, FixedRegion};
pub use clock::{FrameClock, clamp_dt};
pub use collision::{CollisionDetector, CollisionOutcome, elastic_impulse, reflect_axis};
pub use manager::CollisionManager;
pub use mover::{ActiveRegion, GravityMode, Mass, Mover, MoverBuilder, MoverId, RateLimiter, Shape};
pub use spawn::Spawner;
