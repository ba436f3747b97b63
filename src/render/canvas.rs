//! RGBA frame buffer with clipped 2D primitives

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// One RGBA8 pixel
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// Colors for overlay elements
pub mod colors {
    use super::Rgba;

    pub const BACKGROUND: Rgba = Rgba::opaque(5, 5, 12);
    pub const BALL: Rgba = Rgba::opaque(255, 255, 255);
    pub const TILE: Rgba = Rgba::opaque(102, 178, 255);
    pub const TEXT_BOX: Rgba = Rgba::opaque(230, 217, 77);
    pub const HITBOX: Rgba = Rgba::opaque(255, 40, 40);
    pub const FACE: Rgba = Rgba::opaque(51, 204, 102);
}

/// A video frame the overlay is drawn into
///
/// Row-major, origin at the top-left pixel. All drawing is clipped to the frame.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Read a pixel (None outside the frame)
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Raw RGBA8 bytes, suitable for handing to a video sink
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[inline]
    fn put(&mut self, x: i64, y: i64, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Pixel-space bounding box of a shape, clipped to the frame
    fn clip_box(&self, min: Vec2, max: Vec2) -> Option<(i64, i64, i64, i64)> {
        let x0 = (min.x.floor() as i64).max(0);
        let y0 = (min.y.floor() as i64).max(0);
        let x1 = (max.x.ceil() as i64).min(self.width as i64 - 1);
        let y1 = (max.y.ceil() as i64).min(self.height as i64 - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }

    /// Filled disc (pixel centers inside the radius)
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let r = Vec2::splat(radius);
        let Some((x0, y0, x1, y1)) = self.clip_box(center - r, center + r) else {
            return;
        };
        let r_sq = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if (p - center).length_squared() <= r_sq {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// One-pixel circle outline
    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let r = Vec2::splat(radius + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip_box(center - r, center + r) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if ((p - center).length() - radius).abs() <= 0.5 {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Filled axis-aligned rectangle centered at `center`
    pub fn fill_rect(&mut self, center: Vec2, size: Vec2, color: Rgba) {
        let half = size * 0.5;
        let Some((x0, y0, x1, y1)) = self.clip_box(center - half, center + half - Vec2::ONE)
        else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.put(x, y, color);
            }
        }
    }

    /// One-pixel rectangle outline centered at `center`
    pub fn stroke_rect(&mut self, center: Vec2, size: Vec2, color: Rgba) {
        let min = center - size * 0.5;
        let max = center + size * 0.5 - Vec2::ONE;
        let (x0, y0) = (min.x.floor() as i64, min.y.floor() as i64);
        let (x1, y1) = (max.x.ceil() as i64, max.y.ceil() as i64);
        // Edges keep their unclipped coordinates; only the spans are clipped
        let Some((cx0, cy0, cx1, cy1)) = self.clip_box(min, max) else {
            return;
        };
        for x in cx0..=cx1 {
            self.put(x, y0, color);
            self.put(x, y1, color);
        }
        for y in cy0..=cy1 {
            self.put(x0, y, color);
            self.put(x1, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_circle_center_and_outside() {
        let mut canvas = Canvas::new(40, 40);
        canvas.fill_circle(Vec2::new(20.0, 20.0), 5.0, colors::BALL);
        assert_eq!(canvas.pixel(20, 20), Some(colors::BALL));
        assert_eq!(canvas.pixel(30, 30), Some(Rgba::default()));
    }

    #[test]
    fn test_drawing_is_clipped() {
        let mut canvas = Canvas::new(10, 10);
        // Mostly off-frame; must not panic
        canvas.fill_circle(Vec2::new(-5.0, -5.0), 8.0, colors::BALL);
        canvas.fill_rect(Vec2::new(100.0, 100.0), Vec2::splat(20.0), colors::TILE);
        canvas.stroke_rect(Vec2::new(0.0, 0.0), Vec2::splat(30.0), colors::HITBOX);
        assert_eq!(canvas.pixel(0, 0), Some(colors::BALL));
        assert_eq!(canvas.pixel(-1, 0), None);
    }

    #[test]
    fn test_stroke_rect_outline_and_huge_rects() {
        let mut canvas = Canvas::new(20, 20);
        canvas.stroke_rect(Vec2::new(10.0, 10.0), Vec2::new(6.0, 4.0), colors::HITBOX);
        assert_eq!(canvas.pixel(7, 8), Some(colors::HITBOX));
        assert_eq!(canvas.pixel(12, 11), Some(colors::HITBOX));
        assert_eq!(canvas.pixel(10, 10), Some(Rgba::default()));

        // Spans are clipped to the frame; edges far outside draw nothing
        let mut canvas = Canvas::new(8, 8);
        canvas.stroke_rect(Vec2::ZERO, Vec2::splat(f32::INFINITY), colors::HITBOX);
        canvas.stroke_rect(Vec2::new(4.0, 4.0), Vec2::splat(1.0e9), colors::HITBOX);
        assert!(canvas.as_bytes().iter().all(|&b| b == 0));

        // A huge rect with one edge inside the frame still draws that edge
        canvas.stroke_rect(Vec2::new(2.0, 5.0e8), Vec2::new(4.0, 1.0e9), colors::HITBOX);
        assert_eq!(canvas.pixel(0, 4), Some(colors::HITBOX));
        assert_eq!(canvas.pixel(3, 7), Some(colors::HITBOX));
        assert_eq!(canvas.pixel(1, 4), Some(Rgba::default()));
    }

    #[test]
    fn test_fill_rect_extent() {
        let mut canvas = Canvas::new(20, 20);
        canvas.fill_rect(Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0), colors::TILE);
        assert_eq!(canvas.pixel(8, 9), Some(colors::TILE));
        assert_eq!(canvas.pixel(11, 10), Some(colors::TILE));
        assert_eq!(canvas.pixel(12, 10), Some(Rgba::default()));
        assert_eq!(canvas.pixel(10, 11), Some(Rgba::default()));
    }

    #[test]
    fn test_as_bytes_layout() {
        let mut canvas = Canvas::new(2, 1);
        canvas.clear(Rgba::new(1, 2, 3, 4));
        assert_eq!(canvas.as_bytes(), &[1, 2, 3, 4, 1, 2, 3, 4]);
    }
}
