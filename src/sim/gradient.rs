//! Vertical color gradients for the ground backdrop

use glam::DVec3;

use crate::renderer::Rgba;

/// A color stop at `percent` in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub percent: f64,
    /// RGB channels in `[0, 255]`
    pub color: DVec3,
}

/// Ordered list of color stops, kept sorted by percent
#[derive(Debug, Clone, Default)]
pub struct Gradient {
    stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stop(mut self, percent: f64, color: Rgba) -> Self {
        self.add_stop(percent, color);
        self
    }

    pub fn add_stop(&mut self, percent: f64, color: Rgba) {
        self.stops.push(ColorStop {
            percent,
            color: DVec3::new(color.r as f64, color.g as f64, color.b as f64),
        });
        // Stable, so stops sharing a percent keep insertion order
        self.stops.sort_by(|a, b| a.percent.total_cmp(&b.percent));
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at `percent`.
    ///
    /// Linear interpolation between the last stop below `percent` and the first
    /// stop at or above it. A query at or below the first stop returns that
    /// stop; a query past every stop returns opaque white.
    pub fn color_at(&self, percent: f64) -> Rgba {
        let mut last: Option<&ColorStop> = None;
        for stop in &self.stops {
            if stop.percent < percent {
                last = Some(stop);
                continue;
            }

            let Some(prev) = last else {
                return to_rgba(stop.color);
            };
            let span = stop.percent - prev.percent;
            if span <= 0.0 {
                return to_rgba(stop.color);
            }
            let t = (percent - prev.percent) / span;
            return to_rgba(prev.color + (stop.color - prev.color) * t);
        }

        Rgba::WHITE
    }
}

/// Channels truncate toward zero
fn to_rgba(c: DVec3) -> Rgba {
    Rgba::opaque(c.x as u8, c.y as u8, c.z as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sky() -> Gradient {
        Gradient::new()
            .with_stop(1.0, Rgba::BLACK)
            .with_stop(0.0, Rgba::WHITE)
            .with_stop(0.5, Rgba::opaque(99, 155, 255))
            .with_stop(0.3, Rgba::opaque(203, 219, 255))
            .with_stop(0.8, Rgba::opaque(99, 155, 255))
    }

    #[test]
    fn test_stops_are_sorted() {
        let g = sky();
        let percents: Vec<f64> = g.stops().iter().map(|s| s.percent).collect();
        assert_eq!(percents, vec![0.0, 0.3, 0.5, 0.8, 1.0]);
    }

    #[test]
    fn test_endpoints_return_stop_colors() {
        let g = sky();
        assert_eq!(g.color_at(0.0), Rgba::WHITE);
        assert_eq!(g.color_at(1.0), Rgba::BLACK);
        assert_eq!(g.color_at(0.5), Rgba::opaque(99, 155, 255));
    }

    #[test]
    fn test_midpoint_gray() {
        let g = Gradient::new()
            .with_stop(0.0, Rgba::WHITE)
            .with_stop(1.0, Rgba::BLACK);
        assert_eq!(g.color_at(0.5), Rgba::opaque(127, 127, 127));
    }

    #[test]
    fn test_past_last_stop_is_white() {
        let g = Gradient::new()
            .with_stop(0.0, Rgba::BLACK)
            .with_stop(0.5, Rgba::BLACK);
        assert_eq!(g.color_at(0.75), Rgba::WHITE);
        assert_eq!(Gradient::new().color_at(0.2), Rgba::WHITE);
    }

    #[test]
    fn test_flat_segment_holds_color() {
        let g = sky();
        assert_eq!(g.color_at(0.65), Rgba::opaque(99, 155, 255));
    }

    proptest! {
        #[test]
        fn prop_continuous_across_stops(p in 0.0f64..1.0, eps in 1e-9f64..1e-6) {
            let g = sky();
            let a = g.color_at(p);
            let b = g.color_at((p + eps).min(1.0));
            // Steepest segment is 255 per 0.2, so tiny steps move at most one level
            prop_assert!((a.r as i32 - b.r as i32).abs() <= 1);
            prop_assert!((a.g as i32 - b.g as i32).abs() <= 1);
            prop_assert!((a.b as i32 - b.b as i32).abs() <= 1);
        }

        #[test]
        fn prop_two_stop_gradient_is_monotonic(p in 0.0f64..1.0, q in 0.0f64..1.0) {
            let g = Gradient::new()
                .with_stop(0.0, Rgba::WHITE)
                .with_stop(1.0, Rgba::BLACK);
            let (lo, hi) = if p <= q { (p, q) } else { (q, p) };
            prop_assert!(g.color_at(lo).r >= g.color_at(hi).r);
        }
    }
}
