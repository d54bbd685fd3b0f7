//! Sprite loading
//!
//! Sprites are requested by logical name from an `AssetLoader` supplied by
//! the host, once, at startup. A missing or unusable sprite is fatal.

use crate::consts::{PLATFORM_FRAMES, PLATFORM_SIZE, PLAYER_FRAMES, PLAYER_SIZE};
use crate::error::AssetError;
use crate::renderer::{PixelBuffer, Rgba};
use crate::sim::spawner::PLANET_VARIANTS;

pub const PLAYER_SHEET: &str = "player";
pub const PLATFORM_SHEET: &str = "platform";
pub const PLANET_SPRITES: [&str; PLANET_VARIANTS as usize] =
    ["planet-1", "planet-2", "planet-3", "planet-4"];
pub const FUEL_SPRITE: &str = "gas";
pub const OXYGEN_SPRITE: &str = "o2";
pub const GAUGE_FRAME_SPRITE: &str = "ui-level-bar";
pub const FUEL_LEVEL_SPRITE: &str = "red-level";
pub const O2_LEVEL_SPRITE: &str = "blue-level";

/// Host capability: fetch a sprite by logical name
pub trait AssetLoader {
    fn load(&self, name: &str) -> Result<PixelBuffer, AssetError>;
}

/// Every sprite the game draws
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    /// Horizontal strip of `PLAYER_FRAMES` square cells
    pub player: PixelBuffer,
    /// Horizontal strip of `PLATFORM_FRAMES` square cells
    pub platform: PixelBuffer,
    pub planets: Vec<PixelBuffer>,
    pub fuel: PixelBuffer,
    pub oxygen: PixelBuffer,
    pub gauge_frame: PixelBuffer,
    pub fuel_level: PixelBuffer,
    pub o2_level: PixelBuffer,
}

impl SpriteAtlas {
    pub fn load(loader: &impl AssetLoader) -> Result<Self, AssetError> {
        let player = load_sheet(loader, PLAYER_SHEET, PLAYER_SIZE as u32, PLAYER_FRAMES)?;
        let platform = load_sheet(
            loader,
            PLATFORM_SHEET,
            PLATFORM_SIZE as u32,
            PLATFORM_FRAMES,
        )?;

        let planets = PLANET_SPRITES
            .iter()
            .map(|name| loader.load(name))
            .collect::<Result<Vec<_>, _>>()?;

        let gauge_frame = loader.load(GAUGE_FRAME_SPRITE)?;
        let fuel_level = loader.load(FUEL_LEVEL_SPRITE)?;
        let o2_level = loader.load(O2_LEVEL_SPRITE)?;

        log::info!("Loaded {} sprites", PLANET_SPRITES.len() + 7);

        Ok(Self {
            player,
            platform,
            planets,
            fuel: loader.load(FUEL_SPRITE)?,
            oxygen: loader.load(OXYGEN_SPRITE)?,
            gauge_frame,
            fuel_level,
            o2_level,
        })
    }
}

/// Load an animation strip and check it holds `frames` cells of `cell` pixels
fn load_sheet(
    loader: &impl AssetLoader,
    name: &str,
    cell: u32,
    frames: u32,
) -> Result<PixelBuffer, AssetError> {
    let sheet = loader.load(name)?;
    if sheet.width() < cell * frames || sheet.height() < cell {
        return Err(AssetError::Malformed {
            name: name.to_string(),
            reason: format!(
                "sheet is {}x{}, need {frames} frames of {cell}x{cell}",
                sheet.width(),
                sheet.height(),
            ),
        });
    }
    Ok(sheet)
}

/// Gauge sprite height (unscaled)
pub const GAUGE_HEIGHT: u32 = 120;
const GAUGE_WIDTH: u32 = 32;
const OBJECT_SIZE: u32 = 32;

const FUEL_RED: Rgba = Rgba::opaque(0xAC, 0x32, 0x32);
const O2_BLUE: Rgba = Rgba::opaque(0x5B, 0x6E, 0xE1);

/// Generates flat placeholder art for every known sprite name
#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralLoader;

impl AssetLoader for ProceduralLoader {
    fn load(&self, name: &str) -> Result<PixelBuffer, AssetError> {
        let sprite = match name {
            PLAYER_SHEET => player_sheet(),
            PLATFORM_SHEET => platform_sheet(),
            FUEL_SPRITE => capsule(FUEL_RED),
            OXYGEN_SPRITE => capsule(O2_BLUE),
            GAUGE_FRAME_SPRITE => gauge_frame(),
            FUEL_LEVEL_SPRITE => gauge_fill(FUEL_RED),
            O2_LEVEL_SPRITE => gauge_fill(O2_BLUE),
            _ => match PLANET_SPRITES.iter().position(|p| *p == name) {
                Some(variant) => planet(variant),
                None => {
                    return Err(AssetError::NotFound {
                        name: name.to_string(),
                    });
                }
            },
        };
        log::debug!(
            "generated sprite `{name}` ({}x{})",
            sprite.width(),
            sprite.height()
        );
        Ok(sprite)
    }
}

fn player_sheet() -> PixelBuffer {
    let cell = PLAYER_SIZE as u32;
    let suit = Rgba::opaque(0xEE, 0xEE, 0xEE);
    let visor = Rgba::opaque(0x30, 0x60, 0xA0);
    let flame = Rgba::opaque(0xFF, 0xA0, 0x20);
    PixelBuffer::from_fn(cell * PLAYER_FRAMES, cell, |x, y| {
        let frame = x / cell;
        let (cx, cy) = (x % cell, y);
        let body = (24..40).contains(&cx) && (16..48).contains(&cy);
        let head = (26..38).contains(&cx) && (8..16).contains(&cy);
        // Thrust frames flicker between two flame lengths
        let flame_len = if frame >= 2 { 6 + (frame % 2) * 6 } else { 0 };
        if head {
            visor
        } else if body {
            suit
        } else if (28..36).contains(&cx) && (48..48 + flame_len).contains(&cy) {
            flame
        } else {
            Rgba::TRANSPARENT
        }
    })
}

/// Pad below the player's feet; each frame folds its struts further out
fn platform_sheet() -> PixelBuffer {
    let cell = PLATFORM_SIZE as u32;
    let deck = Rgba::opaque(0x84, 0x7E, 0x87);
    let strut = Rgba::opaque(0x59, 0x56, 0x52);
    PixelBuffer::from_fn(cell * PLATFORM_FRAMES, cell, |x, y| {
        let frame = x / cell;
        let cx = x % cell;
        let reach = 4 + frame * 4;
        if (56..60).contains(&y) && (16..48).contains(&cx) {
            deck
        } else if (60..64).contains(&y) && (16 - reach..48 + reach).contains(&cx) {
            strut
        } else {
            Rgba::TRANSPARENT
        }
    })
}

fn planet(variant: usize) -> PixelBuffer {
    const PALETTE: [Rgba; PLANET_VARIANTS as usize] = [
        Rgba::opaque(0xD9, 0x57, 0x63),
        Rgba::opaque(0x6A, 0xBE, 0x30),
        Rgba::opaque(0xDF, 0x71, 0x26),
        Rgba::opaque(0x76, 0x42, 0x8A),
    ];
    let color = PALETTE[variant % PALETTE.len()];
    let r = OBJECT_SIZE as f64 / 2.0;
    PixelBuffer::from_fn(OBJECT_SIZE, OBJECT_SIZE, |x, y| {
        let (dx, dy) = (x as f64 + 0.5 - r, y as f64 + 0.5 - r);
        if dx * dx + dy * dy <= r * r {
            color
        } else {
            Rgba::TRANSPARENT
        }
    })
}

fn capsule(color: Rgba) -> PixelBuffer {
    PixelBuffer::from_fn(OBJECT_SIZE, OBJECT_SIZE, |x, y| {
        if (8..24).contains(&x) && (4..28).contains(&y) {
            color
        } else {
            Rgba::TRANSPARENT
        }
    })
}

fn gauge_fill(color: Rgba) -> PixelBuffer {
    PixelBuffer::filled(GAUGE_WIDTH, GAUGE_HEIGHT, color)
}

fn gauge_frame() -> PixelBuffer {
    let outline = Rgba::opaque(0x22, 0x20, 0x34);
    PixelBuffer::from_fn(GAUGE_WIDTH, GAUGE_HEIGHT, |x, y| {
        let edge = x < 2 || y < 2 || x >= GAUGE_WIDTH - 2 || y >= GAUGE_HEIGHT - 2;
        if edge { outline } else { Rgba::TRANSPARENT }
    })
}
