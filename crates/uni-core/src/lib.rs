//! `uni-core` — foundational types for the `universe` simulator.
//!
//! This crate is a dependency of every other `uni-*` crate.  It has no
//! `uni-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `CellId`                                       |
//! | [`geom`]    | `Pose`, `Torus`, `wrap_angle`, degree/radian helpers      |
//! | [`time`]    | `Tick`                                                    |
//! | [`config`]  | `UniConfig` — validated run parameters                    |
//! | [`rng`]     | `SimRng` (seeded placement RNG)                           |
//! | [`error`]   | `UniError`, `UniResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod config;
pub mod error;
pub mod geom;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::UniConfig;
pub use error::{UniError, UniResult};
pub use geom::{Pose, Torus, dtor, wrap_angle};
pub use ids::{AgentId, CellId};
pub use rng::SimRng;
pub use time::Tick;
