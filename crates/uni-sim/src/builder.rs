//! Fluent builder for constructing a [`Sim`].

use tracing::debug;
use uni_agent::{RegionKind, WorldBuilder};
use uni_behavior::Controller;
use uni_core::{Pose, UniConfig};

use crate::{RunControl, Sim, SimResult, Substrate, partition};

/// Fluent builder for [`Sim<C>`].
///
/// # Required inputs
///
/// - [`UniConfig`]: the run parameters
/// - `C: Controller`: the decision policy
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                    |
/// |---------------------|--------------------------------------------|
/// | `.substrate(s)`     | `Substrate::Threads`                       |
/// | `.poses(v)`         | Uniform random placement from `config.seed` |
/// | `.control(c)`       | A fresh `RunControl`                       |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, Stationary)
///     .substrate(Substrate::Processes)
///     .build()?;
/// let summary = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<C: Controller> {
    config:     UniConfig,
    controller: C,
    substrate:  Substrate,
    poses:      Option<Vec<Pose>>,
    control:    Option<RunControl>,
}

impl<C: Controller> SimBuilder<C> {
    pub fn new(config: UniConfig, controller: C) -> Self {
        Self {
            config,
            controller,
            substrate: Substrate::Threads,
            poses:     None,
            control:   None,
        }
    }

    pub fn substrate(mut self, substrate: Substrate) -> Self {
        self.substrate = substrate;
        self
    }

    /// Place agents at these poses instead of at random.  Must be length
    /// `population_size`.
    pub fn poses(mut self, poses: Vec<Pose>) -> Self {
        self.poses = Some(poses);
        self
    }

    /// Steer the run through an existing handle (e.g. one shared with a UI
    /// thread created before the simulation).
    pub fn control(mut self, control: RunControl) -> Self {
        self.control = Some(control);
        self
    }

    /// Validate the configuration, allocate and populate the world, and
    /// return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<C>> {
        #[cfg(not(unix))]
        if self.substrate == Substrate::Processes {
            return Err(crate::SimError::Unsupported("the process substrate"));
        }

        let region = match self.substrate {
            Substrate::Threads   => RegionKind::Private,
            Substrate::Processes => RegionKind::ProcessShared,
        };
        let mut world = WorldBuilder::new(&self.config)?.region(region);
        if let Some(poses) = self.poses {
            world = world.poses(poses);
        }
        let world = world.build()?;

        let partitions = partition(world.population(), self.config.workers);
        debug!(?partitions, substrate = %self.substrate, "population partitioned");

        Ok(Sim {
            config:     self.config,
            world,
            controller: self.controller,
            control:    self.control.unwrap_or_default(),
            substrate:  self.substrate,
            partitions,
        })
    }
}
