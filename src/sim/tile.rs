//! Background tiles
//!
//! A tile is a fixed-size patch of the scrolling world with its own pixels.
//! Two flat variants share one contract (id, draw, update, offscreen test,
//! bounds):
//! - `StarsTile`: viewport-sized, sparse random speckle, drawn unscaled
//! - `BackdropTile`: the one-off ground tile, a vertical sky gradient

use glam::DVec2;
use rand::Rng;

use super::geom::Rect;
use super::gradient::Gradient;
use crate::renderer::{PixelBuffer, Rgba, Surface, placement};

/// Stable tile identity, allocated by the background and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(pub u64);

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tile#{}", self.0)
    }
}

/// Sky stops, bottom (0) to top (1)
pub fn sky_gradient() -> Gradient {
    Gradient::new()
        .with_stop(0.0, Rgba::WHITE)
        .with_stop(0.3, Rgba::opaque(203, 219, 255))
        .with_stop(0.5, Rgba::opaque(99, 155, 255))
        .with_stop(0.8, Rgba::opaque(99, 155, 255))
        .with_stop(1.0, Rgba::BLACK)
}

#[derive(Debug, Clone)]
pub struct StarsTile {
    id: TileId,
    position: DVec2,
    size: DVec2,
    bounds: Rect,
    image: PixelBuffer,
}

impl StarsTile {
    /// Speckle `width * height * density` random white pixels
    pub fn new<R: Rng>(
        id: TileId,
        position: DVec2,
        size: DVec2,
        density: f64,
        rng: &mut R,
    ) -> Self {
        let (w, h) = (size.x.max(0.0) as u32, size.y.max(0.0) as u32);
        let mut image = PixelBuffer::new(w, h);
        if w > 0 && h > 0 {
            let stars = (w as f64 * h as f64 * density).ceil() as usize;
            for _ in 0..stars {
                image.set(rng.random_range(0..w), rng.random_range(0..h), Rgba::WHITE);
            }
        }

        log::debug!("new {id} at {position}");

        Self {
            id,
            position,
            size,
            bounds: Rect::from_origin_size(position, size),
            image,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackdropTile {
    id: TileId,
    position: DVec2,
    size: DVec2,
    bounds: Rect,
    scale: f64,
    image: PixelBuffer,
}

impl BackdropTile {
    /// Gradient-filled tile whose bottom edge sits on the viewport bottom
    pub fn new(id: TileId, size: DVec2, viewport_height: f64, scale: f64) -> Self {
        let gradient = sky_gradient();
        let (w, h) = (size.x.max(0.0) as u32, size.y.max(0.0) as u32);
        let rows: Vec<Rgba> = (0..h)
            .map(|y| gradient.color_at((h - y) as f64 / h as f64))
            .collect();
        let image = PixelBuffer::from_fn(w, h, |_, y| rows[y as usize]);

        let position = DVec2::new(0.0, viewport_height - size.y);
        Self {
            id,
            position,
            size,
            bounds: Rect::from_origin_size(position, size),
            scale,
            image,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// A streamed background tile
#[derive(Debug, Clone)]
pub enum Tile {
    Backdrop(BackdropTile),
    Stars(StarsTile),
}

impl Tile {
    pub fn id(&self) -> TileId {
        match self {
            Tile::Backdrop(t) => t.id,
            Tile::Stars(t) => t.id,
        }
    }

    /// Top-left corner
    pub fn position(&self) -> DVec2 {
        match self {
            Tile::Backdrop(t) => t.position,
            Tile::Stars(t) => t.position,
        }
    }

    /// World-space bounds after the latest `update`
    pub fn bounds(&self) -> Rect {
        match self {
            Tile::Backdrop(t) => t.bounds,
            Tile::Stars(t) => t.bounds,
        }
    }

    pub fn image(&self) -> &PixelBuffer {
        match self {
            Tile::Backdrop(t) => &t.image,
            Tile::Stars(t) => &t.image,
        }
    }

    /// Translate by `velocity` and recompute bounds
    pub fn update(&mut self, velocity: DVec2) {
        let (position, size, bounds) = match self {
            Tile::Backdrop(t) => (&mut t.position, t.size, &mut t.bounds),
            Tile::Stars(t) => (&mut t.position, t.size, &mut t.bounds),
        };
        *position += velocity;
        *bounds = Rect::from_origin_size(*position, size);
    }

    /// Scrolled below the bottom of the viewport
    pub fn is_offscreen(&self, viewport_height: f64) -> bool {
        self.position().y > viewport_height
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        match self {
            Tile::Backdrop(t) => surface.draw_image(&t.image, placement(t.position, t.scale, 0.0)),
            Tile::Stars(t) => surface.draw_image(&t.image, placement(t.position, 1.0, 0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn stars_at(position: DVec2) -> Tile {
        let mut rng = Pcg32::seed_from_u64(7);
        Tile::Stars(StarsTile::new(
            TileId(1),
            position,
            DVec2::new(80.0, 60.0),
            0.05,
            &mut rng,
        ))
    }

    #[test]
    fn test_stars_tile_is_speckled() {
        let tile = stars_at(DVec2::ZERO);
        let lit = tile.image().lit_pixels();
        // 240 draws, a few may land on the same pixel
        assert!(lit > 200 && lit <= 241, "lit = {lit}");
    }

    #[test]
    fn test_stars_tile_is_deterministic_per_seed() {
        assert_eq!(stars_at(DVec2::ZERO).image(), stars_at(DVec2::ZERO).image());
    }

    #[test]
    fn test_backdrop_rests_on_viewport_bottom() {
        let tile = Tile::Backdrop(BackdropTile::new(
            TileId(0),
            DVec2::new(8.0, 30.0),
            10.0,
            1.0,
        ));
        assert_eq!(tile.bounds().min, DVec2::new(0.0, -20.0));
        assert_eq!(tile.bounds().max, DVec2::new(8.0, 10.0));
    }

    #[test]
    fn test_backdrop_paints_white_floor_black_sky() {
        let tile = BackdropTile::new(TileId(0), DVec2::new(4.0, 100.0), 100.0, 1.0);
        // Top row is p = 1 (black), bottom row is p = 1/h (almost white)
        assert_eq!(tile.image.get(0, 0), Some(Rgba::BLACK));
        let bottom = tile.image.get(3, 99).unwrap();
        assert!(bottom.r > 250 && bottom.g > 250 && bottom.b > 250);
    }

    #[test]
    fn test_offscreen_only_below_viewport() {
        let mut tile = stars_at(DVec2::new(0.0, 590.0));
        assert!(!tile.is_offscreen(600.0));
        tile.update(DVec2::new(0.0, 10.0));
        assert!(!tile.is_offscreen(600.0));
        tile.update(DVec2::new(0.0, 0.5));
        assert!(tile.is_offscreen(600.0));

        let above = stars_at(DVec2::new(0.0, -5000.0));
        assert!(!above.is_offscreen(600.0));
    }

    #[test]
    fn test_draw_places_tile_pixels() {
        let mut canvas = PixelBuffer::filled(200, 200, Rgba::BLACK);
        let tile = stars_at(DVec2::new(50.0, 50.0));
        tile.draw(&mut canvas);
        assert_eq!(canvas.lit_pixels(), tile.image().lit_pixels());
    }

    proptest! {
        #[test]
        fn prop_update_translates_bounds(
            x in -2000.0f64..2000.0, y in -2000.0f64..2000.0,
            dx in -50.0f64..50.0, dy in -50.0f64..50.0,
        ) {
            let mut tile = stars_at(DVec2::new(x, y));
            let before = tile.bounds();
            let v = DVec2::new(dx, dy);
            tile.update(v);
            let after = tile.bounds();
            prop_assert!((after.min - (before.min + v)).length() < 1e-9);
            prop_assert!((after.max - (before.max + v)).length() < 1e-9);
            prop_assert_eq!(tile.position(), after.min);
        }
    }
}
