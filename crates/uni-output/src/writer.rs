//! The `OutputWriter` trait implemented by all backend writers.

use crate::{FinalPoseRow, OutputResult, PoseSnapshotRow};

/// Trait implemented by the text and CSV writers.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write a batch of pose snapshots.  Backends without a snapshot stream
    /// ignore them.
    fn write_snapshots(&mut self, rows: &[PoseSnapshotRow]) -> OutputResult<()>;

    /// Write the final pose of every agent, in population order.
    fn write_final(&mut self, rows: &[FinalPoseRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<A: OutputWriter, B: OutputWriter> OutputWriter for (A, B) {
    fn write_snapshots(&mut self, rows: &[PoseSnapshotRow]) -> OutputResult<()> {
        self.0.write_snapshots(rows)?;
        self.1.write_snapshots(rows)
    }

    fn write_final(&mut self, rows: &[FinalPoseRow]) -> OutputResult<()> {
        self.0.write_final(rows)?;
        self.1.write_final(rows)
    }

    fn finish(&mut self) -> OutputResult<()> {
        let first = self.0.finish();
        self.1.finish()?;
        first
    }
}

impl<W: OutputWriter> OutputWriter for Option<W> {
    fn write_snapshots(&mut self, rows: &[PoseSnapshotRow]) -> OutputResult<()> {
        self.as_mut().map_or(Ok(()), |w| w.write_snapshots(rows))
    }

    fn write_final(&mut self, rows: &[FinalPoseRow]) -> OutputResult<()> {
        self.as_mut().map_or(Ok(()), |w| w.write_final(rows))
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.as_mut().map_or(Ok(()), OutputWriter::finish)
    }
}
