//! Rendering seam
//!
//! The simulation draws through the `Surface` trait only. A surface can draw a
//! pixel buffer under an affine transform and fill a rectangle. `PixelBuffer`
//! implements `Surface` itself, which gives a CPU rasterizer for tests and for
//! the headless runner.

pub mod pixels;

pub use pixels::{PixelBuffer, Rgba};

use glam::{DAffine2, DVec2};

use crate::sim::Rect;

/// A drawable target
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> (u32, u32);

    /// Draw `image` with its local pixel space mapped through `transform`
    fn draw_image(&mut self, image: &PixelBuffer, transform: DAffine2);

    /// Fill an axis-aligned rectangle (screen space)
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
}

/// Rotate, then translate, then scale.
///
/// Positions are kept in unscaled sprite space, so the on-screen location of a
/// sprite drawn at `translate` is `translate * scale`.
pub fn placement(translate: DVec2, scale: f64, rotation: f64) -> DAffine2 {
    DAffine2::from_scale(DVec2::splat(scale))
        * DAffine2::from_translation(translate)
        * DAffine2::from_angle(rotation)
}
