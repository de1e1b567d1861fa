//! Fluent builder for [`WorldState`].
//!
//! # Usage
//!
//! ```rust
//! use uni_agent::{RegionKind, WorldBuilder};
//! use uni_core::UniConfig;
//!
//! let config = UniConfig { population_size: 50, ..UniConfig::default() };
//! let world = WorldBuilder::new(&config)
//!     .unwrap()
//!     .seed(42)
//!     .region(RegionKind::Private)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(world.population(), 50);
//! assert_eq!(world.tick().0, 0);
//! ```

use tracing::debug;
use uni_core::{Pose, SimRng, UniConfig};

use crate::{
    AgentError, AgentResult, Pixel, PoseRecord, RegionKind, SharedRegion, WorldLayout, WorldParams,
    WorldState,
};

/// Fluent builder for [`WorldState`].
///
/// Initial poses are drawn uniformly from a seeded [`SimRng`] unless an
/// explicit list is supplied with [`poses`](Self::poses).
pub struct WorldBuilder {
    params: WorldParams,
    seed:   u64,
    poses:  Option<Vec<Pose>>,
    kind:   RegionKind,
}

impl WorldBuilder {
    /// Validate `config` and start a builder seeded with `config.seed`.
    pub fn new(config: &UniConfig) -> AgentResult<Self> {
        Ok(Self {
            params: WorldParams::from_config(config)?,
            seed:   config.seed,
            poses:  None,
            kind:   RegionKind::Private,
        })
    }

    /// Seed for random placement.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Place agents at exactly these poses instead of at random.  Poses are
    /// normalized onto the torus; the count must equal the population.
    pub fn poses(mut self, poses: Vec<Pose>) -> Self {
        self.poses = Some(poses);
        self
    }

    /// Where to allocate the region.
    pub fn region(mut self, kind: RegionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn build(self) -> AgentResult<WorldState> {
        let p = self.params;
        let n = p.population;

        let poses: Vec<Pose> = match self.poses {
            Some(poses) if poses.len() != n => {
                return Err(AgentError::PopulationMismatch { expected: n, got: poses.len() });
            }
            Some(poses) => poses.into_iter().map(|pose| p.torus.normalize(pose)).collect(),
            None => {
                let mut rng = SimRng::new(self.seed);
                (0..n).map(|_| rng.pose(&p.torus)).collect()
            }
        };

        let layout = WorldLayout::new(n, p.pixel_count, p.geometry.cell_count())?;
        let region = SharedRegion::new(layout.len, self.kind)?;
        debug!(
            population = n,
            cells = layout.cells,
            bytes = layout.len,
            kind = ?self.kind,
            "world region allocated"
        );

        let mut world = WorldState::from_parts(region, layout, p);
        {
            let (front, back, pixels) = world.init_arrays();
            for ((slot, spare), pose) in front.iter_mut().zip(back.iter_mut()).zip(poses) {
                *slot = PoseRecord::new(pose, &p.geometry);
                *spare = *slot;
            }
            pixels.fill(Pixel::empty(p.range));
        }
        world.init_grid();
        Ok(world)
    }
}
