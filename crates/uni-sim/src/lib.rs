//! `uni-sim` — barrier-synchronized tick scheduler for the universe
//! simulator.
//!
//! # Tick protocol
//!
//! ```text
//! every worker, forever:
//!   ① Compute — for each agent of my fixed partition, in id order:
//!                 sense (pixels) → Controller::control → move (next buffer)
//!   ② Barrier — wait until every worker has finished ①
//!   ③ Serial  — exactly one participant: swap buffers, rebuild the sector
//!               grid, tick += 1, observer hooks, pacing, then halt on the
//!               tick cap or a stop request, or block while paused
//!   ④ Release — everyone resumes; exit if the world has halted
//! ```
//!
//! Workers are either threads of the calling process ([`Substrate::Threads`],
//! condvar barrier) or forked child processes over a `MAP_SHARED` world
//! ([`Substrate::Processes`], semaphore-pair barrier, Unix only).  The
//! protocol code is shared; only the [`TickBarrier`] backend and the way
//! workers are started differ.
//!
//! # Crate layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`sim`]       | `Sim`, `Substrate`, `RunSummary`                      |
//! | [`builder`]   | `SimBuilder`                                          |
//! | [`barrier`]   | `TickBarrier`, `Arrival`, `CondvarBarrier`            |
//! | `semaphore`   | `SemaphoreBarrier` (Unix)                             |
//! | [`control`]   | `RunControl` (pause / resume / stop)                  |
//! | [`observer`]  | `SimObserver`, `NoopObserver`, `HaltReason`           |
//! | [`partition`] | Static split of the population across workers         |
//! | [`error`]     | `SimError`, `SimResult<T>`                            |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the compute phase of `Sim::step` on Rayon's pool. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use uni_behavior::Stationary;
//! use uni_core::UniConfig;
//! use uni_sim::{NoopObserver, SimBuilder, Substrate};
//!
//! let config = UniConfig { tick_cap: 100, pacing_ms: 0, workers: 4, ..UniConfig::default() };
//! let mut sim = SimBuilder::new(config, Stationary)
//!     .substrate(Substrate::Threads)
//!     .build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! assert_eq!(summary.ticks, 100);
//! ```

pub mod barrier;
pub mod builder;
pub mod control;
pub mod error;
pub mod observer;
pub mod partition;
#[cfg(unix)]
pub mod semaphore;
pub mod sim;

#[cfg(unix)]
mod process;
mod threads;
mod worker;

#[cfg(test)]
mod tests;

pub use barrier::{Arrival, CondvarBarrier, TickBarrier};
pub use builder::SimBuilder;
pub use control::RunControl;
pub use error::{SimError, SimResult};
pub use observer::{HaltReason, NoopObserver, SimObserver};
pub use partition::partition;
#[cfg(unix)]
pub use semaphore::SemaphoreBarrier;
pub use sim::{RunSummary, Sim, Substrate};
