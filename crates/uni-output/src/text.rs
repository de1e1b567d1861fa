//! Plain-text termination output.
//!
//! One line per agent in population order, `x <x> y <y> a <heading>` with
//! six decimals:
//!
//! ```text
//! x 0.412345 y 0.998001 a -2.356194
//! ```

use std::io::Write;

use crate::{FinalPoseRow, OutputResult, PoseSnapshotRow};
use crate::writer::OutputWriter;

/// Writes final poses as text lines to any `Write` (usually stdout).
pub struct TextWriter<W: Write> {
    out:      W,
    finished: bool,
}

impl<W: Write> TextWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, finished: false }
    }

    /// Unwrap the inner sink (e.g. a `Vec<u8>` in tests).
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputWriter for TextWriter<W> {
    fn write_snapshots(&mut self, _rows: &[PoseSnapshotRow]) -> OutputResult<()> {
        Ok(())
    }

    fn write_final(&mut self, rows: &[FinalPoseRow]) -> OutputResult<()> {
        for row in rows {
            writeln!(self.out, "{}", row.pose())?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}
