//! World-state error type.

use thiserror::Error;

use uni_core::UniError;
use uni_spatial::SpatialError;

/// Errors produced by `uni-agent`.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Core(#[from] UniError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("shared region: {0}")]
    Region(#[from] std::io::Error),

    #[error("world too large: {population} agents × {pixel_count} pixels over {cells} cells")]
    TooLarge { population: usize, pixel_count: usize, cells: usize },

    #[error("expected {expected} initial poses, got {got}")]
    PopulationMismatch { expected: usize, got: usize },
}

pub type AgentResult<T> = Result<T, AgentError>;
