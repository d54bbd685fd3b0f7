//! Error types
//!
//! Three families, matching how each is handled:
//! - `SimError`: a broken streaming invariant. Logged loudly, the frame still renders.
//! - `AssetError`: a sprite the host could not supply. Fatal at startup.
//! - `ConfigError`: settings that could not be read or do not validate.

use std::path::PathBuf;

use glam::DVec2;
use thiserror::Error;

use crate::sim::Rect;

#[derive(Debug, Error)]
pub enum SimError {
    /// No active background tile contains the player's probe point.
    #[error(
        "cannot locate the current tile: probe {probe}, box {collision_box}, last tile {}",
        describe_tile(.last_tile)
    )]
    TileNotFound {
        probe: DVec2,
        collision_box: Rect,
        last_tile: Option<Rect>,
    },
}

fn describe_tile(tile: &Option<Rect>) -> String {
    tile.map_or_else(|| "<evicted>".to_string(), |r| r.to_string())
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("sprite `{name}` not found")]
    NotFound { name: String },
    #[error("sprite `{name}` is unusable: {reason}")]
    Malformed { name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings from {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize settings for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
