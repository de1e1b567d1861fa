//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `uni-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("world size {world_size} is smaller than sensor range {range}: no sectors fit")]
    NoSectors { world_size: f64, range: f64 },

    #[error("sector width {sector_width} is smaller than sensor range {range}")]
    SectorTooNarrow { sector_width: f64, range: f64 },

    #[error("invalid grid parameter: {0}")]
    Invalid(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
