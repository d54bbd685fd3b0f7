//! Skydrift - a vertical arcade drift through an endless starfield
//!
//! Core modules:
//! - `sim`: Simulation core (player kinematics, tile streaming, spawners)
//! - `renderer`: Drawing seam (surface trait, pixel buffers, software blitter)
//! - `assets`: Sprite loading by logical name
//! - `hud`: Gauge and distance readouts
//! - `settings`: Runtime configuration

pub mod assets;
pub mod error;
pub mod hud;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use assets::{AssetLoader, SpriteAtlas};
pub use error::{AssetError, ConfigError, SimError};
pub use settings::{Settings, Viewport};

/// Game configuration constants
pub mod consts {
    use glam::DVec2;

    /// Window dimensions (pixels)
    pub const WINDOW_WIDTH: f64 = 800.0;
    pub const WINDOW_HEIGHT: f64 = 600.0;

    /// Fixed logical tick shared by the player and the background (60 Hz)
    pub const LOGICAL_TICK_MS: f64 = 1000.0 / 60.0;

    /// Player sprite cell size and draw scale
    pub const PLAYER_SIZE: f64 = 64.0;
    pub const PLAYER_SCALE: f64 = 3.0;
    /// Gap between the player's feet and the bottom of the window
    pub const PLAYER_GROUND_MARGIN: f64 = 20.0;
    /// Animation frames in the player sheet; thrust cycles back to frame 2
    pub const PLAYER_FRAMES: u32 = 8;
    pub const PLAYER_THRUST_FIRST_FRAME: u32 = 2;
    /// Time between animation frames while thrusting
    pub const ANIMATION_FRAME_MS: f64 = 100.0;

    /// Render anchors used while leaning (unscaled pixels)
    pub const LEFT_LEAN_OFFSET: DVec2 = DVec2::new(-13.0, 33.0);
    pub const RIGHT_LEAN_OFFSET: DVec2 = DVec2::new(34.0, -12.0);
    /// Lean angle (radians, 45 degrees)
    pub const LEAN_ANGLE: f64 = std::f64::consts::FRAC_PI_4;

    /// Launch platform sheet: square cells, drawn at `PLAYER_SCALE`
    pub const PLATFORM_SIZE: f64 = 64.0;
    pub const PLATFORM_FRAMES: u32 = 4;
    /// Time between platform animation frames
    pub const PLATFORM_FRAME_MS: f64 = 75.0;
    /// Platform drift per frame is `velocity * PLATFORM_DRIFT`
    pub const PLATFORM_DRIFT: f64 = PLATFORM_FRAME_MS / 1000.0;

    /// Per-component velocity clamp applied before thrust is added
    pub const VELOCITY_LIMIT: f64 = 50.0;
    /// Velocity decay applied every tick while coasting
    pub const FRICTION_FACTOR: f64 = 0.99;
    /// Scripted lift-off velocity
    pub const LIFT_VELOCITY: DVec2 = DVec2::new(0.0, 100.0);

    /// Gauge range for fuel and oxygen
    pub const GAUGE_MAX: f64 = 100.0;
    /// Fuel burnt per millisecond of thrust is `delta / FUEL_BURN_DIVISOR`
    pub const FUEL_BURN_DIVISOR: f64 = 100.0;
    /// Oxygen breathed per millisecond of flight is `delta / O2_BURN_DIVISOR`
    pub const O2_BURN_DIVISOR: f64 = 1000.0;
    /// Flat amount granted by a power-up (clamped to GAUGE_MAX)
    pub const PICKUP_AMOUNT: f64 = 100.0;

    /// Background tiles drift by `velocity * delta / TILE_DRIFT_DIVISOR`
    pub const TILE_DRIFT_DIVISOR: f64 = 300.0;
    /// Fraction of pixels lit in a stars tile
    pub const STARS_DENSITY: f64 = 0.0005;
    /// Ground backdrop height in viewport heights
    pub const GROUND_TILE_ROWS: f64 = 3.0;
    /// Ground backdrop draw scale
    pub const BACKDROP_SCALE: f64 = 1.0;
}
