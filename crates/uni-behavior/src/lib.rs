//! `uni-behavior` — the per-agent decision policy seam.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`speed`]      | `Speed` — commanded forward and angular velocity          |
//! | [`context`]    | `SenseContext<'a>` — what one agent knows this tick       |
//! | [`controller`] | `Controller` trait, closure impl, `Stationary`            |
//!
//! # Design notes
//!
//! Within a tick each agent is processed as sense → decide → move.  The
//! controller is the "decide" step: it sees the agent's committed pose and
//! the pixels just computed for it, and returns a `Speed` that the motion
//! model applies immediately.  Speeds are not stored between ticks.
//!
//! Workers call the same controller concurrently for different agents, so
//! implementations must be `Send + Sync`.  The engine supplies no default
//! policy; the embedding application always chooses one.

pub mod context;
pub mod controller;
pub mod speed;


pub use context::SenseContext;
pub use controller::{Controller, Stationary};
pub use speed::Speed;
