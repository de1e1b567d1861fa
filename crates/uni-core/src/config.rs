//! Top-level run configuration.

use crate::{Torus, UniError, UniResult, dtor};

/// Validated parameters for one simulation run.
///
/// Typically filled in from command-line flags by the application crate and
/// passed to the simulation builder, which calls [`UniConfig::validate`]
/// before allocating anything.  `Default` gives the stock `universe`
/// parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniConfig {
    /// Number of agents.  Fixed for the lifetime of the run.
    pub population_size: usize,

    /// Side length of the square toroidal world.
    pub world_size: f64,

    /// Maximum sensing distance.
    pub range: f64,

    /// Sensor field of view in degrees, centered on the heading.
    pub fov_degrees: f64,

    /// Number of angular bins ("pixels") in each agent's sensor.
    pub pixel_count: usize,

    /// Stop after this many ticks.  `0` runs until stopped externally.
    pub tick_cap: u64,

    /// Sleep this many milliseconds in the serial phase of every tick.
    pub pacing_ms: u64,

    /// Number of workers (threads or processes) sharing the population.
    pub workers: usize,

    /// Seed for the initial random placement.
    pub seed: u64,

    /// Initial observer window size in pixels.  Carried for the
    /// visualization layer; the engine never reads it.
    pub window_size: u32,

    /// Whether an observer should draw sensor fields.  Carried for the
    /// visualization layer; the engine never reads it.
    pub show_sensor_overlay: bool,
}

impl Default for UniConfig {
    fn default() -> Self {
        Self {
            population_size:     100,
            world_size:          1.0,
            range:               0.1,
            fov_degrees:         270.0,
            pixel_count:         8,
            tick_cap:            0,
            pacing_ms:           50,
            workers:             1,
            seed:                0,
            window_size:         600,
            show_sensor_overlay: true,
        }
    }
}

impl UniConfig {
    /// Field of view in radians.
    #[inline]
    pub fn fov(&self) -> f64 {
        dtor(self.fov_degrees)
    }

    /// The arena described by `world_size`.
    #[inline]
    pub fn torus(&self) -> Torus {
        Torus::new(self.world_size)
    }

    /// `true` when a tick cap is configured and `completed` has reached it.
    #[inline]
    pub fn cap_reached(&self, completed: u64) -> bool {
        self.tick_cap > 0 && completed >= self.tick_cap
    }

    /// Check every scalar parameter.
    ///
    /// Grid-shape checks (`num_sectors >= 1`, `sector_width >= range`) need
    /// the spatial crate and happen in `SectorGeometry::new`.
    pub fn validate(&self) -> UniResult<()> {
        if !(self.world_size.is_finite() && self.world_size > 0.0) {
            return Err(UniError::Config(format!(
                "world size must be a positive number, got {}",
                self.world_size
            )));
        }
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(UniError::Config(format!(
                "sensor range must be a positive number, got {}",
                self.range
            )));
        }
        if !(self.fov_degrees.is_finite() && self.fov_degrees > 0.0 && self.fov_degrees <= 360.0) {
            return Err(UniError::Config(format!(
                "field of view must be in (0, 360] degrees, got {}",
                self.fov_degrees
            )));
        }
        if self.pixel_count == 0 {
            return Err(UniError::Config("pixel count must be at least 1".into()));
        }
        if self.workers == 0 {
            return Err(UniError::Config("worker count must be at least 1".into()));
        }
        // u32::MAX is the AgentId::INVALID sentinel.
        if self.population_size >= u32::MAX as usize {
            return Err(UniError::Config(format!(
                "population {} exceeds the AgentId range",
                self.population_size
            )));
        }
        Ok(())
    }
}
