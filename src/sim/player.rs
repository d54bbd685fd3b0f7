//! Player kinematics
//!
//! Position is a render anchor in unscaled sprite space. Three anchors are
//! precomputed (straight, leaning left, leaning right) so a lean is an anchor
//! swap. Velocity is in world units: +y climbs, +x drifts the world right
//! (the player heads left).
//!
//! State flow: Grounded -> Lifting -> Flying <-> Steadying. Running out of
//! oxygen zeroes velocity every tick but is not terminal.

use glam::DVec2;

use super::clock::TickGate;
use super::geom::{Rect, sanitize};
use super::input::{Action, InputSource};
use super::tile::TileId;
use crate::assets::SpriteAtlas;
use crate::consts::*;
use crate::renderer::{Rgba, Surface, placement};

/// Debug overlay color for the player's collision box
const COLLISION_BOX_COLOR: Rgba = Rgba::new(0xFF, 0x70, 0x70, 0x90);

#[derive(Debug, Clone)]
pub struct PlayerKinematics {
    /// Active render anchor (one of the three below)
    position: DVec2,
    up_position: DVec2,
    left_position: DVec2,
    right_position: DVec2,
    /// Sprite rotation (radians)
    rotation: f64,
    pub velocity: DVec2,
    pub acceleration: DVec2,
    /// Distance travelled, surfaced as the HUD readout
    relative_position: DVec2,
    /// Tile the player was last found in; the background may reassign it
    pub current_tile: Option<TileId>,
    fuel: f64,
    o2: f64,
    is_accelerating: bool,
    pub flying: bool,
    /// Scripted lift-off in progress; cleared by the background on touchdown
    pub is_lifting: bool,
    animation_frame: u32,
    frame_step_ms: f64,
    tick: TickGate,
}

impl Default for PlayerKinematics {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            up_position: DVec2::ZERO,
            left_position: LEFT_LEAN_OFFSET,
            right_position: RIGHT_LEAN_OFFSET,
            rotation: 0.0,
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            relative_position: DVec2::ZERO,
            current_tile: None,
            fuel: GAUGE_MAX,
            o2: GAUGE_MAX,
            is_accelerating: false,
            flying: false,
            is_lifting: false,
            animation_frame: 0,
            frame_step_ms: 0.0,
            tick: TickGate::new(LOGICAL_TICK_MS),
        }
    }
}

impl PlayerKinematics {
    /// Player standing centred near the bottom of a `width x height` viewport
    pub fn new(width: f64, height: f64) -> Self {
        let mut player = Self::default();
        player.set_position(Self::spawn_point(width, height));
        player
    }

    /// Unscaled anchor that puts the scaled sprite centred, just above the floor
    pub fn spawn_point(width: f64, height: f64) -> DVec2 {
        let scaled = PLAYER_SIZE * PLAYER_SCALE;
        let anchor = DVec2::new(
            (width - scaled) / 2.0,
            height - scaled - PLAYER_GROUND_MARGIN,
        );
        anchor / PLAYER_SCALE
    }

    /// Set the straight anchor and derive the two lean anchors from it
    pub fn set_position(&mut self, position: DVec2) -> &mut Self {
        self.up_position = position;
        self.left_position = position + LEFT_LEAN_OFFSET;
        self.right_position = position + RIGHT_LEAN_OFFSET;
        self.position = position;
        self
    }

    /// Add thrust.
    ///
    /// The velocity clamp runs on the pre-thrust velocity, so the result can
    /// exceed `VELOCITY_LIMIT` by the accumulated acceleration.
    pub fn accelerate(&mut self, amount: DVec2) -> &mut Self {
        self.flying = true;
        self.acceleration += amount;
        self.velocity = self
            .velocity
            .clamp(DVec2::splat(-VELOCITY_LIMIT), DVec2::splat(VELOCITY_LIMIT));
        self.velocity += self.acceleration;
        self.is_accelerating = true;
        self
    }

    /// Stop thrusting. Friction on the remaining velocity is the caller's job.
    pub fn steady(&mut self) -> &mut Self {
        self.acceleration = DVec2::ZERO;
        self.is_accelerating = false;
        self.animation_frame = 1;
        self
    }

    /// Full stop
    pub fn stand_up(&mut self) -> &mut Self {
        self.velocity = DVec2::ZERO;
        self.acceleration = DVec2::ZERO;
        self.is_accelerating = false;
        self.animation_frame = 0;
        self
    }

    /// Advance by one frame; physics only runs when the logical tick elapses
    pub fn update(&mut self, delta_ms: f64, input: &impl InputSource) {
        self.frame_step_ms += delta_ms;
        if self.is_accelerating && self.fuel > 0.0 && self.frame_step_ms >= ANIMATION_FRAME_MS {
            self.frame_step_ms = 0.0;
            self.animation_frame += 1;
            if self.animation_frame == PLAYER_FRAMES {
                self.animation_frame = PLAYER_THRUST_FIRST_FRAME;
            }
        }

        if self.tick.advance(delta_ms).is_none() {
            return;
        }

        if self.is_lifting {
            self.velocity = LIFT_VELOCITY;
        } else {
            if self.flying {
                self.o2 = clamp_gauge(self.o2 - delta_ms / O2_BURN_DIVISOR);
            }
            if self.o2 <= 0.0 {
                self.velocity = DVec2::ZERO;
            }

            let direction = if input.is_held(Action::Left) {
                self.rotation = -LEAN_ANGLE;
                self.position = self.left_position;
                1.0
            } else if input.is_held(Action::Right) {
                self.rotation = LEAN_ANGLE;
                self.position = self.right_position;
                -1.0
            } else {
                self.rotation = 0.0;
                self.position = self.up_position;
                0.0
            };

            if input.is_held(Action::Thrust) && self.fuel > 0.0 {
                if !self.flying {
                    self.is_lifting = true;
                    log::debug!("lift-off");
                }
                self.accelerate(DVec2::new(direction, 1.0) / delta_ms);
                self.fuel = clamp_gauge(self.fuel - delta_ms / FUEL_BURN_DIVISOR);
            } else if !self.flying {
                self.stand_up();
            } else {
                self.steady();
                self.velocity *= FRICTION_FACTOR;
            }
        }

        self.velocity = sanitize(self.velocity);
        self.relative_position += self.velocity * (delta_ms / 1000.0);
    }

    pub fn add_o2(&mut self, amount: f64) {
        self.o2 = clamp_gauge(self.o2 + amount);
    }

    pub fn add_fuel(&mut self, amount: f64) {
        self.fuel = clamp_gauge(self.fuel + amount);
    }

    /// Scaled sprite box, inset by a quarter of the sprite width on each side
    pub fn collision_box(&self) -> Rect {
        let scaled = PLAYER_SIZE * PLAYER_SCALE;
        let min = self.up_position * PLAYER_SCALE;
        let inset = DVec2::new(scaled / 4.0, 0.0);
        Rect::new(min + inset, min + DVec2::splat(scaled) - inset)
    }

    /// True when any corner of `rect` lies in the player's collision box.
    ///
    /// Corner containment only: a rect that fully surrounds the player without
    /// a corner inside it does not count as a hit.
    pub fn collides(&self, rect: &Rect) -> bool {
        let area = self.collision_box();
        let hit = rect.corners().into_iter().any(|c| area.contains_point(c));
        log::trace!("collision test player {area} obj {rect}: {hit}");
        hit
    }

    /// Shift the active render anchor vertically until the next tick resets it
    pub fn nudge_anchor(&mut self, dy: f64) {
        self.position.y += dy;
    }

    /// Screen-space point the background uses to find the player's tile
    pub fn probe_point(&self) -> DVec2 {
        self.position * PLAYER_SCALE
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Straight anchor, the one the player stands on
    pub fn up_position(&self) -> DVec2 {
        self.up_position
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn relative_position(&self) -> DVec2 {
        self.relative_position
    }

    pub fn fuel(&self) -> f64 {
        self.fuel
    }

    pub fn o2(&self) -> f64 {
        self.o2
    }

    pub fn is_accelerating(&self) -> bool {
        self.is_accelerating
    }

    pub fn animation_frame(&self) -> u32 {
        self.animation_frame
    }

    pub fn draw(&self, surface: &mut impl Surface, atlas: &SpriteAtlas, show_collision_box: bool) {
        if show_collision_box {
            surface.fill_rect(self.collision_box(), COLLISION_BOX_COLOR);
        }

        let size = PLAYER_SIZE as u32;
        let frame = atlas
            .player
            .sub_image(self.animation_frame * size, 0, size, size);
        let transform = placement(self.position, PLAYER_SCALE, self.rotation);
        surface.draw_image(&frame, transform);
    }
}

fn clamp_gauge(value: f64) -> f64 {
    value.clamp(0.0, GAUGE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::TickInput;
    use proptest::prelude::*;

    const FRAME_MS: f64 = 17.0;

    fn player() -> PlayerKinematics {
        PlayerKinematics::new(WINDOW_WIDTH, WINDOW_HEIGHT)
    }

    #[test]
    fn test_spawn_point_centres_scaled_sprite() {
        let p = player();
        assert_eq!(p.probe_point(), DVec2::new(304.0, 388.0));
        assert_eq!(p.fuel(), 100.0);
        assert_eq!(p.o2(), 100.0);
    }

    #[test]
    fn test_rest_without_input_stays_grounded() {
        let mut p = player();
        let before = p.position();
        p.update(FRAME_MS, &TickInput::default());

        assert!(!p.flying);
        assert_eq!(p.velocity, DVec2::ZERO);
        assert_eq!(p.position(), before);
        assert_eq!(p.relative_position(), DVec2::ZERO);
        assert_eq!(p.o2(), 100.0);
    }

    #[test]
    fn test_no_physics_before_tick_elapses() {
        let mut p = player();
        p.update(5.0, &TickInput::thrust());
        assert!(!p.flying);
        assert_eq!(p.fuel(), 100.0);
    }

    #[test]
    fn test_thrust_from_ground_starts_lift() {
        let mut p = player();
        p.update(FRAME_MS, &TickInput::thrust());

        assert!(p.flying);
        assert!(p.is_lifting);
        assert!(p.is_accelerating());
        assert!((p.velocity.y - 1.0 / FRAME_MS).abs() < 1e-12);
        assert_eq!(p.velocity.x, 0.0);
        assert!((p.fuel() - (100.0 - FRAME_MS / 100.0)).abs() < 1e-12);

        // While lifting, velocity is scripted regardless of input
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        p.update(FRAME_MS, &left);
        assert_eq!(p.velocity, LIFT_VELOCITY);
        assert_eq!(p.rotation(), 0.0);
    }

    #[test]
    fn test_accelerate_clamps_before_adding() {
        let mut p = player();
        p.velocity = DVec2::new(80.0, -80.0);
        p.accelerate(DVec2::new(1.0, 1.0));
        // Clamp is applied to the old velocity, so the limit is exceeded
        assert_eq!(p.velocity, DVec2::new(51.0, -49.0));
        assert!(p.flying);
    }

    #[test]
    fn test_coasting_applies_friction() {
        let mut p = player();
        p.flying = true;
        p.velocity = DVec2::new(10.0, 20.0);
        p.acceleration = DVec2::new(1.0, 1.0);
        p.update(FRAME_MS, &TickInput::default());

        assert_eq!(p.acceleration, DVec2::ZERO);
        assert_eq!(p.animation_frame(), 1);
        assert!((p.velocity - DVec2::new(9.9, 19.8)).length() < 1e-12);
        assert!(p.o2() < 100.0);
    }

    #[test]
    fn test_out_of_oxygen_stops_drift() {
        let mut p = player();
        p.flying = true;
        p.add_o2(-500.0);
        p.velocity = DVec2::new(5.0, 5.0);
        p.update(FRAME_MS, &TickInput::default());

        assert_eq!(p.o2(), 0.0);
        assert_eq!(p.velocity, DVec2::ZERO);
    }

    #[test]
    fn test_nan_velocity_is_reset() {
        let mut p = player();
        p.flying = true;
        p.velocity = DVec2::new(f64::NAN, 3.0);
        p.update(FRAME_MS, &TickInput::default());
        assert_eq!(p.velocity.x, 0.0);
        assert!(p.velocity.y > 0.0);
    }

    #[test]
    fn test_nudge_lasts_until_next_tick() {
        let mut p = player();
        let up = p.up_position();
        p.nudge_anchor(-1.0);
        assert_eq!(p.position(), up - DVec2::Y);
        // Collision box follows the straight anchor, not the nudged one
        assert_eq!(p.collision_box().min, DVec2::new(352.0, 388.0));

        p.update(FRAME_MS, &TickInput::default());
        assert_eq!(p.position(), up);
    }

    #[test]
    fn test_lean_swaps_anchor() {
        let mut p = player();
        let up = p.position();

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        p.update(FRAME_MS, &left);
        assert_eq!(p.position(), up + LEFT_LEAN_OFFSET);
        assert_eq!(p.rotation(), -LEAN_ANGLE);

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        p.update(FRAME_MS, &right);
        assert_eq!(p.position(), up + RIGHT_LEAN_OFFSET);
        assert_eq!(p.rotation(), LEAN_ANGLE);

        p.update(FRAME_MS, &TickInput::default());
        assert_eq!(p.position(), up);
    }

    #[test]
    fn test_thrust_while_leaning_left_pushes_world_right() {
        let mut p = player();
        p.flying = true;
        let input = TickInput {
            left: true,
            thrust: true,
            ..Default::default()
        };
        p.update(FRAME_MS, &input);
        assert!(p.velocity.x > 0.0);
        assert!(!p.is_lifting);
    }

    #[test]
    fn test_no_fuel_means_no_thrust() {
        let mut p = player();
        p.add_fuel(-100.0);
        p.update(FRAME_MS, &TickInput::thrust());
        assert!(!p.flying);
        assert_eq!(p.velocity, DVec2::ZERO);
    }

    #[test]
    fn test_thrust_animation_cycles() {
        let mut p = player();
        for _ in 0..20 {
            p.update(FRAME_MS, &TickInput::thrust());
        }
        assert_eq!(p.animation_frame(), 3);

        for _ in 20..42 {
            p.update(FRAME_MS, &TickInput::thrust());
        }
        assert_eq!(p.animation_frame(), 7);

        for _ in 42..48 {
            p.update(FRAME_MS, &TickInput::thrust());
        }
        assert_eq!(p.animation_frame(), PLAYER_THRUST_FIRST_FRAME);
    }

    #[test]
    fn test_distance_integrates_velocity() {
        let mut p = player();
        p.flying = true;
        p.velocity = DVec2::new(0.0, 10.0);
        p.update(20.0, &TickInput::default());
        // Friction first, then 20 ms of travel
        assert!((p.relative_position().y - 9.9 * 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_collides_when_corner_inside() {
        let p = player();
        let b = p.collision_box();
        let expected = Rect::new(DVec2::new(352.0, 388.0), DVec2::new(448.0, 580.0));
        assert_eq!(b, expected);

        let overlapping =
            Rect::from_origin_size(DVec2::new(440.0, 570.0), DVec2::new(64.0, 64.0));
        assert!(p.collides(&overlapping));

        let apart = Rect::from_origin_size(DVec2::new(0.0, 0.0), DVec2::new(64.0, 64.0));
        assert!(!p.collides(&apart));
    }

    #[test]
    fn test_surrounding_rect_is_not_a_hit() {
        let p = player();
        let surrounding = Rect::new(DVec2::new(300.0, 300.0), DVec2::new(500.0, 700.0));
        assert!(!p.collides(&surrounding));

        // Straddling the box with no corner inside is also missed
        let straddling = Rect::new(DVec2::new(390.0, 300.0), DVec2::new(410.0, 700.0));
        assert!(!p.collides(&straddling));
    }

    proptest! {
        #[test]
        fn prop_gauges_stay_in_range(
            amounts in proptest::collection::vec(-500.0f64..500.0, 1..20),
        ) {
            let mut p = player();
            for a in amounts {
                p.add_fuel(a);
                p.add_o2(a);
                prop_assert!((0.0..=GAUGE_MAX).contains(&p.fuel()));
                prop_assert!((0.0..=GAUGE_MAX).contains(&p.o2()));
            }
        }

        #[test]
        fn prop_collides_iff_some_corner_inside(
            x in 200.0f64..600.0, y in 300.0f64..700.0,
            w in 1.0f64..300.0, h in 1.0f64..300.0,
        ) {
            let p = player();
            let rect = Rect::from_origin_size(DVec2::new(x, y), DVec2::new(w, h));
            let b = p.collision_box();
            let expected = rect.corners().iter().any(|c| b.contains_point(*c));
            prop_assert_eq!(p.collides(&rect), expected);
        }
    }
}
