//! Composition root
//!
//! Owns the player, the launch platform, the background and both spawners, and
//! advances them in a fixed order every frame: player, platform, background,
//! planets, power-ups. Each component gates its own logical tick on the shared
//! frame delta.

use rand_pcg::Pcg32;

use super::background::Background;
use super::input::InputSource;
use super::platform::Platform;
use super::player::PlayerKinematics;
use super::spawner::{PlanetSpawner, PowerupSpawner};
use crate::assets::SpriteAtlas;
use crate::error::SimError;
use crate::renderer::Surface;
use crate::settings::{Settings, Viewport};

/// PCG stream per component so each draws an independent sequence
const BACKGROUND_STREAM: u64 = 1;
const PLANET_STREAM: u64 = 2;
const POWERUP_STREAM: u64 = 3;

pub struct World {
    viewport: Viewport,
    seed: u64,
    show_collision_boxes: bool,
    player: PlayerKinematics,
    platform: Platform,
    background: Background,
    planets: PlanetSpawner,
    powerups: PowerupSpawner,
}

impl World {
    pub fn new(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("World seed: {seed}");

        let viewport = settings.viewport;
        let mut player = PlayerKinematics::new(viewport.width, viewport.height);
        let background = Background::new(
            viewport,
            settings.stars_density,
            settings.backdrop_scale,
            Pcg32::new(seed, BACKGROUND_STREAM),
            &mut player,
        );
        let platform = Platform::new(&player, viewport.height);
        let planets = PlanetSpawner::new(
            settings.planets.clone(),
            viewport,
            Pcg32::new(seed, PLANET_STREAM),
        );
        let powerups = PowerupSpawner::new(
            settings.powerups.clone(),
            viewport,
            Pcg32::new(seed, POWERUP_STREAM),
        );

        Self {
            viewport,
            seed,
            show_collision_boxes: settings.show_collision_boxes,
            player,
            platform,
            background,
            planets,
            powerups,
        }
    }

    /// Advance one frame of `delta_ms` wall-clock time.
    ///
    /// A streaming failure is returned after the spawners have still run, so
    /// the frame stays consistent and the host decides how loud to be.
    pub fn update(&mut self, delta_ms: f64, input: &impl InputSource) -> Result<(), SimError> {
        self.player.update(delta_ms, input);
        self.platform.update(&mut self.player, delta_ms);
        let streamed = self.background.update(&mut self.player, delta_ms);
        self.planets.update(&mut self.player, delta_ms);
        self.powerups.update(&mut self.player, delta_ms);
        streamed
    }

    /// Back to front: background, platform, planets, power-ups, player
    pub fn draw(&self, surface: &mut impl Surface, atlas: &SpriteAtlas) {
        self.background.draw(surface);
        self.platform.draw(surface, atlas);
        self.planets.draw(surface, atlas, false);
        self.powerups.draw(surface, atlas, self.show_collision_boxes);
        self.player.draw(surface, atlas, self.show_collision_boxes);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn player(&self) -> &PlayerKinematics {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerKinematics {
        &mut self.player
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn planets(&self) -> &PlanetSpawner {
        &self.planets
    }

    pub fn powerups(&self) -> &PowerupSpawner {
        &self.powerups
    }
}
