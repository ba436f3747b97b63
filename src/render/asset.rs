//! Drawable assets carried by movers
//!
//! An asset reports its own extent, which fixes the mover's hitbox at
//! construction time, and knows how to draw itself centered at a position.

use glam::Vec2;

use super::canvas::{Canvas, Rgba, colors};

/// Drawable extent of an asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// Round asset (balls, bubbles)
    Radius(f32),
    /// Rectangular asset (image tiles, text boxes)
    Size { width: f32, height: f32 },
}

/// Anything a mover can carry and draw
pub trait Asset: std::fmt::Debug {
    fn extent(&self) -> Extent;

    fn draw(&self, canvas: &mut Canvas, position: Vec2);
}

/// A solid disc (bouncing ball)
#[derive(Debug, Clone)]
pub struct Disc {
    pub radius: f32,
    pub color: Rgba,
}

impl Disc {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            color: colors::BALL,
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }
}

impl Asset for Disc {
    fn extent(&self) -> Extent {
        Extent::Radius(self.radius)
    }

    fn draw(&self, canvas: &mut Canvas, position: Vec2) {
        canvas.fill_circle(position, self.radius, self.color);
    }
}

/// A rectangular tile (flying image tile or text box placeholder)
#[derive(Debug, Clone)]
pub struct Tile {
    pub width: f32,
    pub height: f32,
    pub color: Rgba,
    /// Optional frame drawn around the tile
    pub border: Option<Rgba>,
}

impl Tile {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            color: colors::TILE,
            border: None,
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_border(mut self, border: Rgba) -> Self {
        self.border = Some(border);
        self
    }
}

impl Asset for Tile {
    fn extent(&self) -> Extent {
        Extent::Size {
            width: self.width,
            height: self.height,
        }
    }

    fn draw(&self, canvas: &mut Canvas, position: Vec2) {
        let size = Vec2::new(self.width, self.height);
        canvas.fill_rect(position, size, self.color);
        if let Some(border) = self.border {
            canvas.stroke_rect(position, size, border);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extents() {
        assert_eq!(Disc::new(7.0).extent(), Extent::Radius(7.0));
        assert_eq!(
            Tile::new(30.0, 12.0).extent(),
            Extent::Size {
                width: 30.0,
                height: 12.0
            }
        );
    }

    #[test]
    fn test_tile_border_drawn() {
        let mut canvas = Canvas::new(20, 20);
        let tile = Tile::new(10.0, 10.0).with_border(colors::HITBOX);
        tile.draw(&mut canvas, Vec2::new(10.0, 10.0));
        assert_eq!(canvas.pixel(5, 5), Some(colors::HITBOX));
        assert_eq!(canvas.pixel(10, 10), Some(colors::TILE));
    }
}
