//! Vector helpers and axis-aligned rectangles
//!
//! Vectors are `glam::DVec2` values. They are `Copy`, so every call site that
//! mutates with `+=`/`*=` works on its own copy and the caller's value is untouched.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Replace NaN components with zero (normalizing a zero vector yields NaN)
#[inline]
pub fn sanitize(v: DVec2) -> DVec2 {
    DVec2::new(
        if v.x.is_nan() { 0.0 } else { v.x },
        if v.y.is_nan() { 0.0 } else { v.y },
    )
}

/// True when both components are exactly zero
#[inline]
pub fn is_zero(v: DVec2) -> bool {
    v == DVec2::ZERO
}

/// Axis-aligned rectangle with `min <= max` componentwise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    /// Build from any two opposite corners
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_origin_size(origin: DVec2, size: DVec2) -> Self {
        Self::new(origin, origin + size)
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    /// Same rectangle moved by `offset`
    #[inline]
    pub fn translated(&self, offset: DVec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Inclusive on both corners
    #[inline]
    pub fn contains_point(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// min, max, bottom-left (min.x, max.y), top-right (max.x, min.y)
    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            self.max,
            DVec2::new(self.min.x, self.max.y),
            DVec2::new(self.max.x, self.min.y),
        ]
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2})-({:.2}, {:.2})",
            self.min.x, self.min.y, self.max.x, self.max.y
        )
    }
}
