//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the frame delta handed to `update`
//! - Seeded RNG only, one PCG stream per component
//! - Stable iteration order where it matters (tile ids, object ids)
//! - Drawing goes through the `Surface` trait, never a platform API

pub mod background;
pub mod clock;
pub mod geom;
pub mod gradient;
pub mod input;
pub mod platform;
pub mod player;
pub mod spawner;
pub mod tile;
pub mod world;

pub use background::{Background, Neighbour};
pub use clock::TickGate;
pub use geom::{Rect, is_zero, sanitize};
pub use gradient::{ColorStop, Gradient};
pub use input::{Action, InputSource, TickInput};
pub use platform::Platform;
pub use player::PlayerKinematics;
pub use spawner::{
    ObjectKind, Pickup, PlanetKind, PlanetSpawner, PowerupKind, PowerupSpawner, SpawnedObject,
    Spawner, SpawnerConfig,
};
pub use tile::{BackdropTile, StarsTile, Tile, TileId, sky_gradient};
pub use world::World;
