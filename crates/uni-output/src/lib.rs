//! `uni-output` — simulation output writers for the universe simulator.
//!
//! | Backend      | Destination                                        |
//! |--------------|----------------------------------------------------|
//! | [`TextWriter`] | Any `io::Write`: one `x … y … a …` line per agent at the tick cap |
//! | [`CsvWriter`]  | `pose_snapshots.csv`, `final_poses.csv` in a directory |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `uni_sim::SimObserver`.  Writers compose as pairs, and
//! `Option<W>` is a writer that may be absent.
//!
//! # Usage
//!
//! ```rust,ignore
//! use uni_output::{CsvWriter, SimOutputObserver, TextWriter};
//!
//! let writer = (TextWriter::new(std::io::stdout()), CsvWriter::new(Path::new("./out"))?);
//! let mut obs = SimOutputObserver::new(writer, 10);
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod text;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{FinalPoseRow, PoseSnapshotRow};
pub use text::TextWriter;
pub use writer::OutputWriter;
