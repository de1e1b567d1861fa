//! Velocity command.

/// Commanded velocity for one tick.
///
/// `v` is the distance travelled along the current heading and `w` the
/// change of heading in radians, both per tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Speed {
    pub v: f64,
    pub w: f64,
}

impl Speed {
    pub const ZERO: Speed = Speed { v: 0.0, w: 0.0 };

    #[inline]
    pub fn new(v: f64, w: f64) -> Self {
        Self { v, w }
    }
}
