//! `uni-mobility` — agent motion.
//!
//! | Module          | Contents                                          |
//! |-----------------|---------------------------------------------------|
//! | [`kinematics`]  | `update_pose` — one unicycle step on the torus    |
//!
//! # Movement model
//!
//! Each tick an agent first moves `v` along its committed heading, then turns
//! by `w`.  Position wraps onto `[0, world_size)²` and heading onto
//! `(-π, π]`.  The result goes to the agent's next-buffer slot together with
//! its home cell and tint, so the serial phase can rebuild the grid without
//! recomputing either.

pub mod kinematics;


pub use kinematics::update_pose;
