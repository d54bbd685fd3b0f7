//! Probabilistic object spawners (planets, power-ups)
//!
//! One lifecycle, two instantiations that differ in constants and in what a
//! touch does:
//! - drift: `position += velocity + player_velocity * influence`
//! - cull: removed once below the viewport; objects above or beside it stay
//!   active but are left out of the drawable subset
//! - birth: time-scaled chance per tick while the player is flying, launched
//!   toward the player's position at spawn time
//! - pickup (power-ups only): a touch grants the resource and removes the object

use std::collections::HashMap;
use std::fmt;

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::TickGate;
use super::geom::{Rect, sanitize};
use super::player::PlayerKinematics;
use crate::assets::SpriteAtlas;
use crate::consts::{LOGICAL_TICK_MS, PICKUP_AMOUNT};
use crate::error::ConfigError;
use crate::renderer::{PixelBuffer, Rgba, Surface, placement};
use crate::settings::Viewport;

/// Debug overlay color for object collision boxes
const COLLISION_BOX_COLOR: Rgba = Rgba::new(0x70, 0x70, 0xFF, 0x90);

/// Number of planet sprite variants
pub const PLANET_VARIANTS: u8 = 4;

/// Tuning for one spawner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerConfig {
    /// Logical tick of this spawner
    pub update_interval_ms: f64,
    /// Spawn chance per `probability_window_ms` of elapsed time
    pub spawn_probability: f64,
    pub probability_window_ms: f64,
    /// Objects are positioned in unscaled space and drawn at this scale
    pub draw_scale: f64,
    /// Sprite edge length (unscaled)
    pub object_size: f64,
    /// Launch speed range `[min, max)`
    pub min_speed: f64,
    pub max_speed: f64,
    /// Player-influence coefficient range `[min, max)`
    pub min_influence: f64,
    pub max_influence: f64,
}

impl SpawnerConfig {
    pub fn planets() -> Self {
        Self {
            update_interval_ms: 20.0,
            spawn_probability: 0.2,
            probability_window_ms: 1000.0,
            draw_scale: 3.0,
            object_size: 32.0,
            min_speed: 0.5,
            max_speed: 2.0,
            min_influence: 0.0,
            max_influence: 0.1,
        }
    }

    pub fn powerups() -> Self {
        Self {
            update_interval_ms: LOGICAL_TICK_MS,
            spawn_probability: 0.5,
            probability_window_ms: 500.0,
            draw_scale: 2.0,
            object_size: 32.0,
            min_speed: 0.0,
            max_speed: 0.5,
            min_influence: 0.025,
            max_influence: 0.05,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("update_interval_ms", self.update_interval_ms),
            ("probability_window_ms", self.probability_window_ms),
            ("draw_scale", self.draw_scale),
            ("object_size", self.object_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        if !(self.spawn_probability.is_finite() && self.spawn_probability >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "spawn_probability",
                reason: format!("must be non-negative, got {}", self.spawn_probability),
            });
        }
        let ranges = [
            ("speed", self.min_speed, self.max_speed),
            ("influence", self.min_influence, self.max_influence),
        ];
        for (field, min, max) in ranges {
            if !(min.is_finite() && max.is_finite() && min <= max) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("range [{min}, {max}) is empty or not finite"),
                });
            }
        }
        Ok(())
    }
}

/// Effect of touching an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pickup {
    Fuel(f64),
    Oxygen(f64),
}

impl Pickup {
    pub fn apply(self, player: &mut PlayerKinematics) {
        match self {
            Pickup::Fuel(amount) => player.add_fuel(amount),
            Pickup::Oxygen(amount) => player.add_o2(amount),
        }
    }
}

/// Per-kind behavior plugged into the shared spawner
pub trait ObjectKind: Copy + fmt::Debug {
    /// Name used in logs
    const NAME: &'static str;

    /// Pick the kind of a newly spawned object
    fn roll<R: Rng>(rng: &mut R) -> Self;

    /// What touching the object does; `None` objects never collide
    fn pickup(self) -> Option<Pickup> {
        None
    }

    fn sprite(self, atlas: &SpriteAtlas) -> Option<&PixelBuffer>;
}

/// Decorative planet, one of several sprite variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanetKind {
    pub variant: u8,
}

impl ObjectKind for PlanetKind {
    const NAME: &'static str = "planet";

    fn roll<R: Rng>(rng: &mut R) -> Self {
        Self {
            variant: rng.random_range(0..PLANET_VARIANTS),
        }
    }

    fn sprite(self, atlas: &SpriteAtlas) -> Option<&PixelBuffer> {
        atlas.planets.get(self.variant as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    Fuel,
    Oxygen,
}

impl ObjectKind for PowerupKind {
    const NAME: &'static str = "powerup";

    fn roll<R: Rng>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            PowerupKind::Oxygen
        } else {
            PowerupKind::Fuel
        }
    }

    fn pickup(self) -> Option<Pickup> {
        Some(match self {
            PowerupKind::Fuel => Pickup::Fuel(PICKUP_AMOUNT),
            PowerupKind::Oxygen => Pickup::Oxygen(PICKUP_AMOUNT),
        })
    }

    fn sprite(self, atlas: &SpriteAtlas) -> Option<&PixelBuffer> {
        Some(match self {
            PowerupKind::Fuel => &atlas.fuel,
            PowerupKind::Oxygen => &atlas.oxygen,
        })
    }
}

/// A live spawned object
#[derive(Debug, Clone)]
pub struct SpawnedObject<K> {
    pub id: u64,
    /// Unscaled position
    pub position: DVec2,
    pub velocity: DVec2,
    /// How strongly the player's velocity drags this object
    pub influence: f64,
    pub kind: K,
    /// Last scaled collision rectangle (pickups only)
    pub collision_box: Option<Rect>,
}

impl<K> SpawnedObject<K> {
    pub fn new(id: u64, position: DVec2, velocity: DVec2, influence: f64, kind: K) -> Self {
        Self {
            id,
            position,
            velocity,
            influence,
            kind,
            collision_box: None,
        }
    }

    fn drift(&mut self, player_velocity: DVec2) {
        self.position += self.velocity + player_velocity * self.influence;
    }

    /// Screen-space rectangle of the drawn sprite
    pub fn scaled_bounds(&self, scale: f64, size: f64) -> Rect {
        Rect::from_origin_size(self.position * scale, DVec2::splat(size * scale))
    }
}

pub struct Spawner<K: ObjectKind> {
    config: SpawnerConfig,
    viewport: Viewport,
    /// Lifecycle-tracked objects, unordered
    active: HashMap<u64, SpawnedObject<K>>,
    /// Visible subset, ascending id
    drawable: Vec<u64>,
    last_id: u64,
    tick: TickGate,
    /// Player distance at the previous spawn check
    last_player_distance: DVec2,
    rng: Pcg32,
}

pub type PlanetSpawner = Spawner<PlanetKind>;
pub type PowerupSpawner = Spawner<PowerupKind>;

impl<K: ObjectKind> Spawner<K> {
    pub fn new(config: SpawnerConfig, viewport: Viewport, rng: Pcg32) -> Self {
        Self {
            tick: TickGate::new(config.update_interval_ms),
            config,
            viewport,
            active: HashMap::new(),
            drawable: Vec::new(),
            last_id: 0,
            last_player_distance: DVec2::ZERO,
            rng,
        }
    }

    pub fn update(&mut self, player: &mut PlayerKinematics, delta_ms: f64) {
        let Some(elapsed) = self.tick.advance(delta_ms) else {
            return;
        };

        let scale = self.config.draw_scale;
        let size = self.config.object_size;
        let floor = self.viewport.height / scale;
        let player_velocity = player.velocity;

        let mut dead = Vec::new();
        for (&id, object) in self.active.iter_mut() {
            object.drift(player_velocity);

            if object.position.y > floor {
                log::debug!("killing {} {id}", K::NAME);
                dead.push(id);
                continue;
            }

            if let Some(pickup) = object.kind.pickup() {
                let bounds = object.scaled_bounds(scale, size);
                object.collision_box = Some(bounds);
                if player.collides(&bounds) {
                    log::debug!("{} {id} collected: {pickup:?}", K::NAME);
                    pickup.apply(player);
                    dead.push(id);
                }
            }
        }
        for id in dead {
            self.active.remove(&id);
        }

        self.refresh_drawable();
        self.try_spawn(player, elapsed);
    }

    fn is_drawable(&self, object: &SpawnedObject<K>) -> bool {
        let margin = self.config.object_size * self.config.draw_scale;
        let p = object.position;
        p.x > -margin && p.y > -margin && p.x < self.viewport.width && p.y < self.viewport.height
    }

    fn refresh_drawable(&mut self) {
        let mut drawable: Vec<u64> = self
            .active
            .values()
            .filter(|o| self.is_drawable(o))
            .map(|o| o.id)
            .collect();
        drawable.sort_unstable();
        self.drawable = drawable;
    }

    /// Poisson-style birth: the chance grows with the time since the last check
    fn try_spawn(&mut self, player: &PlayerKinematics, elapsed_ms: f64) {
        let distance = player.relative_position();
        let moved = distance != self.last_player_distance;
        self.last_player_distance = distance;
        if !moved || !player.flying || player.is_lifting {
            return;
        }

        let chance = elapsed_ms / self.config.probability_window_ms * self.config.spawn_probability;
        if self.rng.random::<f64>() >= chance {
            return;
        }

        // Biased toward the top half when spawning above the viewport
        let fx = self.rng.random::<f64>() * 2.0 - 0.5;
        let mut fy = self.rng.random::<f64>();
        if fx > 0.0 && fx < 1.0 {
            fy *= 0.5;
        }
        fy -= 0.5;

        let extent =
            (self.viewport.size() - DVec2::splat(self.config.object_size)) / self.config.draw_scale;
        let position = DVec2::new(fx, fy) * extent;

        let speed = self.sample(self.config.min_speed, self.config.max_speed);
        let velocity = sanitize((player.position() - position).normalize()) * speed;
        let influence = self.sample(self.config.min_influence, self.config.max_influence);
        let kind = K::roll(&mut self.rng);

        let id = self.spawn_at(position, velocity, influence, kind);
        log::debug!(
            "spawning {} {id} ({kind:?}) at {position} vel {velocity}",
            K::NAME
        );
    }

    /// Uniform in `[min, max)`, or `min` for an empty range
    fn sample(&mut self, min: f64, max: f64) -> f64 {
        min + self.rng.random::<f64>() * (max - min)
    }

    /// Add an object with the next id
    pub fn spawn_at(&mut self, position: DVec2, velocity: DVec2, influence: f64, kind: K) -> u64 {
        let id = self.last_id + 1;
        self.insert(SpawnedObject::new(id, position, velocity, influence, kind));
        id
    }

    /// Add an object with its own id; later ids continue past it
    pub fn insert(&mut self, object: SpawnedObject<K>) {
        self.last_id = self.last_id.max(object.id);
        self.active.insert(object.id, object);
    }

    pub fn get(&self, id: u64) -> Option<&SpawnedObject<K>> {
        self.active.get(&id)
    }

    /// Id of the most recent object, if any was ever added
    pub fn last_spawned(&self) -> Option<u64> {
        (self.last_id > 0).then_some(self.last_id)
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn active(&self) -> impl Iterator<Item = &SpawnedObject<K>> {
        self.active.values()
    }

    /// Visible objects, oldest first
    pub fn drawable(&self) -> impl Iterator<Item = &SpawnedObject<K>> {
        self.drawable.iter().filter_map(|id| self.active.get(id))
    }

    pub fn drawable_ids(&self) -> &[u64] {
        &self.drawable
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    pub fn draw(
        &self,
        surface: &mut impl Surface,
        atlas: &SpriteAtlas,
        show_collision_boxes: bool,
    ) {
        for object in self.drawable() {
            if show_collision_boxes {
                if let Some(bounds) = object.collision_box {
                    surface.fill_rect(bounds, COLLISION_BOX_COLOR);
                }
            }
            if let Some(sprite) = object.kind.sprite(atlas) {
                let transform = placement(object.position, self.config.draw_scale, 0.0);
                surface.draw_image(sprite, transform);
            }
        }
    }
}
