//! `uni-agent` — the world state every worker shares.
//!
//! All per-agent engine state lives in one contiguous byte region: a small
//! header of atomics, two pose buffers (current and next), the pixel table
//! and the sector-grid tables.  The region is an anonymous mapping when all
//! workers are threads of one process, and a `MAP_SHARED` file mapping when
//! workers are forked processes; either way every array is addressed by a
//! byte offset computed once by [`WorldLayout`].
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`record`]  | `PoseRecord`, `Tint`, `Pixel`, `Header` (region element types) |
//! | [`layout`]  | `WorldLayout` (byte offsets)                              |
//! | [`region`]  | `SharedRegion`, `RegionKind`                              |
//! | [`world`]   | `WorldParams`, `WorldState`, `TickView`, `Partition`      |
//! | [`builder`] | `WorldBuilder` (fluent construction)                      |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `WorldParams`.          |

pub mod builder;
pub mod error;
pub mod layout;
pub mod record;
pub mod region;
pub mod world;


pub use builder::WorldBuilder;
pub use error::{AgentError, AgentResult};
pub use layout::WorldLayout;
pub use record::{Header, Pixel, PoseRecord, Tint};
pub use region::{RegionKind, SharedRegion};
pub use world::{Partition, TickView, WorldParams, WorldState};
