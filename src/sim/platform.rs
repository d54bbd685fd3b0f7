//! Launch platform
//!
//! The pad the player stands on at spawn. Once the player leaves the ground it
//! plays its unfold animation, bobbing the player's render anchor one pixel
//! per frame, and then falls away with the world as the player climbs.

use glam::DVec2;

use super::clock::TickGate;
use super::player::PlayerKinematics;
use crate::assets::SpriteAtlas;
use crate::consts::*;
use crate::renderer::{Surface, placement};

#[derive(Debug, Clone)]
pub struct Platform {
    /// Unscaled render anchor, same space as the player's
    position: DVec2,
    frame: u32,
    /// Screen height (unscaled) below which the pad is no longer drawn
    floor: f64,
    tick: TickGate,
}

impl Platform {
    /// Pad under the player's straight anchor in a viewport `height` tall
    pub fn new(player: &PlayerKinematics, height: f64) -> Self {
        Self {
            position: player.up_position(),
            frame: 0,
            floor: height / PLAYER_SCALE,
            tick: TickGate::new(PLATFORM_FRAME_MS),
        }
    }

    /// Idle while the player is grounded; afterwards each 75 ms step unfolds
    /// one frame and drifts with the player's velocity.
    pub fn update(&mut self, player: &mut PlayerKinematics, delta_ms: f64) {
        if !player.is_lifting && !player.flying {
            return;
        }
        if self.tick.advance(delta_ms).is_none() {
            return;
        }

        // Undo the previous frame's bob before applying the next one
        if player.position().y < player.up_position().y {
            player.nudge_anchor(1.0);
        }
        if self.frame + 1 < PLATFORM_FRAMES {
            self.frame += 1;
            player.nudge_anchor(-1.0);
        }

        self.position += player.velocity * PLATFORM_DRIFT;
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// False once the pad has fallen past the bottom of the screen
    pub fn is_visible(&self) -> bool {
        self.position.y <= self.floor
    }

    pub fn draw(&self, surface: &mut impl Surface, atlas: &SpriteAtlas) {
        if !self.is_visible() {
            return;
        }
        let size = PLATFORM_SIZE as u32;
        let cell = atlas.platform.sub_image(self.frame * size, 0, size, size);
        surface.draw_image(&cell, placement(self.position, PLAYER_SCALE, 0.0));
    }
}
