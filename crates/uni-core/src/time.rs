//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter.  One tick is one
//! parallel sense-decide-move phase followed by one serial transition; there
//! is no wall-clock mapping, only the optional pacing delay between ticks.

use std::fmt;

/// Number of completed ticks.
///
/// `Tick(0)` is the initial state before any tick has run; after the serial
/// phase of the first tick the counter reads `Tick(1)`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The following tick.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    /// `true` if `n` divides this tick (and `n > 0`).
    #[inline]
    pub fn is_multiple_of(self, n: u64) -> bool {
        n > 0 && self.0 % n == 0
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
