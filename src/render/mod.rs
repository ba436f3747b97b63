//! Software rendering onto video frames
//!
//! The host owns a [`Canvas`] per displayed frame; movers draw their [`Asset`]
//! into it at their current center.

pub mod asset;
pub mod canvas;

pub use asset::{Asset, Disc, Extent, Tile};
pub use canvas::{Canvas, Rgba, colors};
