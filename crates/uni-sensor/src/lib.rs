//! `uni-sensor` — the angular rangefinder.
//!
//! Each agent's sensor covers a field of view centred on its heading, split
//! into `pixel_count` equal angular bins.  A bin reports the nearest other
//! agent whose bearing falls inside it and whose distance is within range.
//!
//! | Module      | Contents                                   |
//! |-------------|--------------------------------------------|
//! | [`pixels`]  | `update_pixels`, `bin_index`                |

pub mod pixels;


pub use pixels::{bin_index, update_pixels};
