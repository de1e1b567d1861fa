//! Toroidal arena geometry.
//!
//! The arena is a square of side `size` whose opposite edges are identified.
//! Positions live in `[0, size)`, headings in `(-π, π]`.  Distances and
//! bearings between two points always use the shorter way around the wrap.

use std::f64::consts::{PI, TAU};

/// Convert degrees to radians.
#[inline]
pub fn dtor(d: f64) -> f64 {
    d.to_radians()
}

/// Normalize an angle into `(-π, π]`.
///
/// Values already in range are returned unchanged.  Non-finite input is
/// returned as-is; a controller producing NaN is a programming error.
#[inline]
pub fn wrap_angle(a: f64) -> f64 {
    if (a > -PI && a <= PI) || !a.is_finite() {
        return a;
    }
    let r = (a + PI).rem_euclid(TAU) - PI;
    if r <= -PI { r + TAU } else { r }
}

// ── Pose ──────────────────────────────────────────────────────────────────────

/// Position and heading of one agent.
///
/// `#[repr(C)]` because poses are stored directly in the shared world region.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading in radians, `(-π, π]`, measured counter-clockwise from +x.
    pub a: f64,
}

impl Pose {
    #[inline]
    pub fn new(x: f64, y: f64, a: f64) -> Self {
        Self { x, y, a }
    }
}

impl std::fmt::Display for Pose {
    /// The termination-output format: `x 0.500000 y 0.250000 a -1.570796`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x {:.6} y {:.6} a {:.6}", self.x, self.y, self.a)
    }
}

// ── Torus ─────────────────────────────────────────────────────────────────────

/// A square toroidal arena of side `size`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Torus {
    pub size: f64,
}

impl Torus {
    #[inline]
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    /// Map any finite coordinate into `[0, size)`.
    ///
    /// Idempotent on values already in range.
    #[inline]
    pub fn wrap_distance(&self, d: f64) -> f64 {
        if (d >= 0.0 && d < self.size) || !d.is_finite() {
            return d;
        }
        let r = d.rem_euclid(self.size);
        // A tiny negative input can round up to exactly `size`.
        if r >= self.size { 0.0 } else { r }
    }

    /// Shortest signed displacement from `from` to `to` along one axis.
    #[inline]
    pub fn delta(&self, from: f64, to: f64) -> f64 {
        let half = self.size * 0.5;
        let d = to - from;
        if d > half {
            d - self.size
        } else if d < -half {
            d + self.size
        } else {
            d
        }
    }

    /// Wrap both coordinates of `pose` and its heading.
    #[inline]
    pub fn normalize(&self, pose: Pose) -> Pose {
        Pose {
            x: self.wrap_distance(pose.x),
            y: self.wrap_distance(pose.y),
            a: wrap_angle(pose.a),
        }
    }
}
