//! Seeded simulation-level RNG.
//!
//! The only randomness in the engine is the initial placement of agents.
//! The same seed always produces the same population, so runs are
//! reproducible (the tick loop itself is deterministic for a deterministic
//! controller).

use std::f64::consts::PI;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{Pose, Torus};

/// Simulation-level RNG for global operations such as initial placement.
///
/// Used only in single-threaded contexts (world construction).
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// A pose uniformly distributed over the arena with a uniform heading.
    pub fn pose(&mut self, torus: &Torus) -> Pose {
        Pose {
            x: self.0.gen_range(0.0..torus.size),
            y: self.0.gen_range(0.0..torus.size),
            // Half-open on the left so the result is already in (-π, π].
            a: -self.0.gen_range(-PI..PI),
        }
    }
}
