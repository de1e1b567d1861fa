//! `uni-spatial` — the toroidal sector grid used to find sensing candidates.
//!
//! The arena is cut into `num_sectors × num_sectors` square cells at least
//! one sensor range wide.  Every agent is registered in the 3×3 block of
//! cells around its own home cell, so a single query of an agent's home cell
//! yields every other agent that could be within range.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`geometry`] | `SectorGeometry`, `Block` (wrapped 3×3 neighbourhood)     |
//! | [`grid`]     | `GridStorage`, `GridView` (CSR over borrowed slices), `SectorGrid` (owned) |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `SectorGeometry`.       |

pub mod error;
pub mod geometry;
pub mod grid;


pub use error::{SpatialError, SpatialResult};
pub use geometry::{Block, MAX_SECTORS_PER_AXIS, SectorGeometry};
pub use grid::{BLOCK_CELLS, GridStorage, GridView, SectorGrid};
