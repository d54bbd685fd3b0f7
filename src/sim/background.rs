//! Background streaming
//!
//! Keeps exactly the tiles needed around the player. Every logical tick:
//! 1. every tile drifts by the player's scaled velocity; tiles below the
//!    viewport are evicted the same tick
//! 2. the ground tile rising to y >= 0 ends the scripted lift-off
//! 3. outside lift-off, the tile under the player's probe point becomes the
//!    current tile, and any missing N/NE/NW neighbour is created as a stars tile

use std::collections::BTreeMap;

use glam::DVec2;
use rand_pcg::Pcg32;

use super::clock::TickGate;
use super::player::PlayerKinematics;
use super::tile::{BackdropTile, StarsTile, Tile, TileId};
use crate::consts::{GROUND_TILE_ROWS, LOGICAL_TICK_MS, TILE_DRIFT_DIVISOR};
use crate::error::SimError;
use crate::renderer::Surface;
use crate::settings::Viewport;

/// Slots probed around the current tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbour {
    Current,
    North,
    NorthEast,
    NorthWest,
}

impl Neighbour {
    pub const ALL: [Neighbour; 4] = [
        Neighbour::Current,
        Neighbour::North,
        Neighbour::NorthEast,
        Neighbour::NorthWest,
    ];

    /// World offset of this slot from the current tile's top-left corner
    pub fn offset(self, viewport: Viewport) -> DVec2 {
        let (w, h) = (viewport.width, viewport.height);
        match self {
            Neighbour::Current => DVec2::ZERO,
            Neighbour::North => DVec2::new(0.0, -h),
            Neighbour::NorthEast => DVec2::new(w, -h),
            Neighbour::NorthWest => DVec2::new(-w, -h),
        }
    }
}

pub struct Background {
    viewport: Viewport,
    stars_density: f64,
    /// Active set, iterated oldest first
    tiles: BTreeMap<TileId, Tile>,
    /// Ground tile; its top edge reaching y >= 0 marks touchdown
    first_tile: TileId,
    next_tile_id: u64,
    tick: TickGate,
    rng: Pcg32,
}

impl Background {
    /// Start with the ground backdrop and point the player at it
    pub fn new(
        viewport: Viewport,
        stars_density: f64,
        backdrop_scale: f64,
        rng: Pcg32,
        player: &mut PlayerKinematics,
    ) -> Self {
        let first_tile = TileId(0);
        let ground = BackdropTile::new(
            first_tile,
            DVec2::new(viewport.width, viewport.height * GROUND_TILE_ROWS),
            viewport.height,
            backdrop_scale,
        );
        player.current_tile = Some(first_tile);

        Self {
            viewport,
            stars_density,
            tiles: BTreeMap::from([(first_tile, Tile::Backdrop(ground))]),
            first_tile,
            next_tile_id: 1,
            tick: TickGate::new(LOGICAL_TICK_MS),
            rng,
        }
    }

    pub fn update(&mut self, player: &mut PlayerKinematics, delta_ms: f64) -> Result<(), SimError> {
        if self.tick.advance(delta_ms).is_none() {
            return Ok(());
        }

        let drift = player.velocity * (delta_ms / TILE_DRIFT_DIVISOR);
        let viewport_height = self.viewport.height;
        let first_tile = self.first_tile;
        let mut touchdown = false;
        self.tiles.retain(|id, tile| {
            tile.update(drift);
            if *id == first_tile && tile.bounds().min.y >= 0.0 {
                touchdown = true;
            }
            if tile.is_offscreen(viewport_height) {
                log::debug!("killing {id}");
                return false;
            }
            true
        });

        if touchdown && player.is_lifting {
            log::debug!("touchdown, lift-off complete");
            player.is_lifting = false;
        }
        if player.is_lifting {
            return Ok(());
        }

        let probe = player.probe_point();
        let Some(current) = self.tile_containing(probe).map(|t| (t.id(), t.bounds())) else {
            let err = SimError::TileNotFound {
                probe,
                collision_box: player.collision_box(),
                last_tile: player
                    .current_tile
                    .and_then(|id| self.tiles.get(&id))
                    .map(Tile::bounds),
            };
            log::error!("{err}");
            return Err(err);
        };
        let (current_id, current_bounds) = current;

        if player.current_tile != Some(current_id) {
            log::trace!("{current_id} contains player, last tile {current_bounds}");
            player.current_tile = Some(current_id);
        }

        let recentre = self.viewport.size() / 2.0;
        // Slot 0 is the current tile, resolved above from the player's own probe
        for &slot in &Neighbour::ALL[1..] {
            let origin = current_bounds.min + slot.offset(self.viewport);
            if self.tile_containing(origin + recentre).is_none() {
                self.spawn_stars(origin);
            }
        }

        log::trace!("active tiles: {}", self.tiles.len());
        Ok(())
    }

    fn spawn_stars(&mut self, position: DVec2) -> TileId {
        let id = TileId(self.next_tile_id);
        self.next_tile_id += 1;
        let tile = StarsTile::new(
            id,
            position,
            self.viewport.size(),
            self.stars_density,
            &mut self.rng,
        );
        self.tiles.insert(id, Tile::Stars(tile));
        id
    }

    /// Oldest active tile whose bounds contain `point`
    pub fn tile_containing(&self, point: DVec2) -> Option<&Tile> {
        self.tiles.values().find(|t| t.bounds().contains_point(point))
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn first_tile(&self) -> TileId {
        self.first_tile
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        for tile in self.tiles.values() {
            tile.draw(surface);
        }
    }
}
