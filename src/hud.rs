//! Heads-up display: oxygen and fuel gauges, distance readout
//!
//! Only geometry lives here. The distance label is produced as text and a
//! screen position; rendering glyphs is left to the host.

use glam::DVec2;

use crate::assets::SpriteAtlas;
use crate::renderer::{PixelBuffer, Surface, placement};
use crate::settings::Viewport;
use crate::sim::PlayerKinematics;

/// HUD draw scale
pub const UI_SCALE: f64 = 3.0;
/// Gauge width (unscaled)
pub const BAR_WIDTH: f64 = 32.0;
/// Empty rows at the top and bottom of a gauge (unscaled)
pub const BAR_MARGIN: u32 = 7;
pub const MARGIN_LEFT: f64 = 10.0;

/// Fill state of one gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gauge {
    /// Rows of the fill sprite shown, margins included
    pub level: u32,
    /// Screen-space offset of the fill from the top of the bar
    pub offset: i64,
}

impl Gauge {
    /// Gauge for `value` in `[0, 100]` on a bar `bar_height` rows tall
    pub fn measure(bar_height: u32, value: f64) -> Self {
        let usable = bar_height.saturating_sub(2 * BAR_MARGIN) as f64;
        let level = (usable * value.clamp(0.0, 100.0) / 100.0) as u32 + BAR_MARGIN;
        let offset = (bar_height as i64 - level as i64) * UI_SCALE as i64
            - (BAR_MARGIN as i64) * UI_SCALE as i64;
        Self { level, offset }
    }
}

#[derive(Debug, Clone)]
pub struct Hud {
    o2_position: DVec2,
    fuel_position: DVec2,
    label_position: DVec2,
    o2: Gauge,
    fuel: Gauge,
    distance: f64,
}

impl Hud {
    pub fn new(viewport: Viewport) -> Self {
        let top = viewport.height / UI_SCALE;
        Self {
            o2_position: DVec2::new(MARGIN_LEFT, top),
            fuel_position: DVec2::new(MARGIN_LEFT + BAR_WIDTH * UI_SCALE, top),
            label_position: DVec2::new(MARGIN_LEFT * 2.0, viewport.height - 10.0),
            o2: Gauge::default(),
            fuel: Gauge::default(),
            distance: 0.0,
        }
    }

    /// Refresh gauges from the player; `bar_height` is the fill sprite height
    pub fn update(&mut self, player: &PlayerKinematics, bar_height: u32) {
        self.o2 = Gauge::measure(bar_height, player.o2());
        self.fuel = Gauge::measure(bar_height, player.fuel());
        self.distance = player.relative_position().y;
    }

    pub fn o2(&self) -> Gauge {
        self.o2
    }

    pub fn fuel(&self) -> Gauge {
        self.fuel
    }

    pub fn o2_position(&self) -> DVec2 {
        self.o2_position
    }

    pub fn fuel_position(&self) -> DVec2 {
        self.fuel_position
    }

    /// Distance travelled, e.g. `"42km"`
    pub fn distance_label(&self) -> String {
        format!("{}km", self.distance.round() as i64)
    }

    /// Baseline position for the distance label
    pub fn label_position(&self) -> DVec2 {
        self.label_position
    }

    pub fn draw(&self, surface: &mut impl Surface, atlas: &SpriteAtlas) {
        draw_gauge(
            surface,
            &atlas.o2_level,
            &atlas.gauge_frame,
            self.o2_position,
            self.o2,
        );
        draw_gauge(
            surface,
            &atlas.fuel_level,
            &atlas.gauge_frame,
            self.fuel_position,
            self.fuel,
        );
    }
}

fn draw_gauge(
    surface: &mut impl Surface,
    fill: &PixelBuffer,
    frame: &PixelBuffer,
    position: DVec2,
    gauge: Gauge,
) {
    let shown = fill.sub_image(0, 0, fill.width(), gauge.level);
    let fill_at = DVec2::new(position.x, position.y + gauge.offset as f64);
    surface.draw_image(&shown, placement(fill_at / UI_SCALE, UI_SCALE, 0.0));
    surface.draw_image(frame, placement(position / UI_SCALE, UI_SCALE, 0.0));
}
