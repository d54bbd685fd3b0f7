//! RGBA pixel buffers and a software blitter

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

use super::Surface;
use crate::sim::Rect;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Source-over blend of `self` onto `dst`
    fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            0 => dst,
            255 => self,
            a => {
                let a = a as u32;
                let inv = 255 - a;
                let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv) / 255) as u8;
                Rgba {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: (a + dst.a as u32 * inv / 255).min(255) as u8,
                }
            }
        }
    }
}

/// Owned width x height RGBA image, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Fully transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Build from a per-pixel generator `f(x, y)`
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Out-of-bounds writes are ignored
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Copy of a sub-rectangle, clipped to the buffer
    pub fn sub_image(&self, x: u32, y: u32, width: u32, height: u32) -> PixelBuffer {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        let w = x_end.saturating_sub(x);
        let h = y_end.saturating_sub(y);
        PixelBuffer::from_fn(w, h, |sx, sy| {
            self.pixels[((y + sy) * self.width + x + sx) as usize]
        })
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Number of pixels that are not fully transparent and not pure black
    pub fn lit_pixels(&self) -> usize {
        self.pixels
            .iter()
            .filter(|p| p.a != 0 && (p.r, p.g, p.b) != (0, 0, 0))
            .count()
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.over(self.pixels[i]);
        }
    }

    /// Integer pixel range covered by `rect`, clipped to the buffer
    fn clip(&self, min: DVec2, max: DVec2) -> Option<(u32, u32, u32, u32)> {
        let bounds = DVec2::new(self.width as f64, self.height as f64);
        let lo = min.floor().max(DVec2::ZERO).min(bounds);
        let hi = max.ceil().max(DVec2::ZERO).min(bounds);
        if lo.x >= hi.x || lo.y >= hi.y || lo.is_nan() || hi.is_nan() {
            return None;
        }
        Some((lo.x as u32, lo.y as u32, hi.x as u32, hi.y as u32))
    }
}

impl Surface for PixelBuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_image(&mut self, image: &PixelBuffer, transform: DAffine2) {
        if image.width == 0 || image.height == 0 || transform.matrix2.determinant() == 0.0 {
            return;
        }

        let extent = DVec2::new(image.width as f64, image.height as f64);
        let corners = [
            DVec2::ZERO,
            DVec2::new(extent.x, 0.0),
            DVec2::new(0.0, extent.y),
            extent,
        ]
        .map(|c| transform.transform_point2(c));
        let min = corners.iter().copied().fold(DVec2::INFINITY, DVec2::min);
        let max = corners.iter().copied().fold(DVec2::NEG_INFINITY, DVec2::max);

        let Some((x0, y0, x1, y1)) = self.clip(min, max) else {
            return;
        };

        // Nearest-neighbour: sample the source at each destination pixel centre
        let inverse = transform.inverse();
        for y in y0..y1 {
            for x in x0..x1 {
                let src = inverse.transform_point2(DVec2::new(x as f64 + 0.5, y as f64 + 0.5));
                if src.x < 0.0 || src.y < 0.0 || src.x >= extent.x || src.y >= extent.y {
                    continue;
                }
                if let Some(color) = image.get(src.x as u32, src.y as u32) {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((x0, y0, x1, y1)) = self.clip(rect.min, rect.max) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::placement;

    #[test]
    fn test_from_fn_is_row_major() {
        let buf = PixelBuffer::from_fn(3, 2, |x, y| Rgba::opaque(x as u8, y as u8, 0));
        assert_eq!(buf.get(2, 1), Some(Rgba::opaque(2, 1, 0)));
        assert_eq!(buf.get(3, 0), None);
    }

    #[test]
    fn test_sub_image_clips() {
        let buf = PixelBuffer::from_fn(4, 4, |x, y| Rgba::opaque(x as u8, y as u8, 9));
        let sub = buf.sub_image(2, 1, 10, 2);
        assert_eq!((sub.width(), sub.height()), (2, 2));
        assert_eq!(sub.get(0, 0), Some(Rgba::opaque(2, 1, 9)));
        assert_eq!(sub.get(1, 1), Some(Rgba::opaque(3, 2, 9)));
    }

    #[test]
    fn test_draw_image_translated_and_scaled() {
        let mut canvas = PixelBuffer::filled(16, 16, Rgba::BLACK);
        let dot = PixelBuffer::filled(1, 1, Rgba::WHITE);
        canvas.draw_image(&dot, placement(DVec2::new(2.0, 3.0), 2.0, 0.0));

        // Lands at (4, 6) and covers 2x2
        assert_eq!(canvas.get(4, 6), Some(Rgba::WHITE));
        assert_eq!(canvas.get(5, 7), Some(Rgba::WHITE));
        assert_eq!(canvas.get(6, 6), Some(Rgba::BLACK));
        assert_eq!(canvas.lit_pixels(), 4);
    }

    #[test]
    fn test_transparent_pixels_do_not_overwrite() {
        let mut canvas = PixelBuffer::filled(4, 4, Rgba::WHITE);
        let clear = PixelBuffer::new(4, 4);
        canvas.draw_image(&clear, DAffine2::IDENTITY);
        assert_eq!(canvas.lit_pixels(), 16);
    }

    #[test]
    fn test_fully_offscreen_draw_is_noop() {
        let mut canvas = PixelBuffer::filled(8, 8, Rgba::BLACK);
        let img = PixelBuffer::filled(4, 4, Rgba::WHITE);
        canvas.draw_image(&img, placement(DVec2::new(-100.0, 500.0), 1.0, 0.0));
        assert_eq!(canvas.lit_pixels(), 0);
    }

    #[test]
    fn test_fill_rect_blends() {
        let mut canvas = PixelBuffer::filled(4, 4, Rgba::BLACK);
        canvas.fill_rect(
            Rect::new(DVec2::new(1.0, 1.0), DVec2::new(3.0, 3.0)),
            Rgba::new(255, 0, 0, 255),
        );
        assert_eq!(canvas.get(1, 1), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(canvas.get(3, 3), Some(Rgba::BLACK));
        assert_eq!(canvas.lit_pixels(), 4);
    }
}
