//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tracing::debug;
use uni_agent::WorldState;
use uni_core::{AgentId, Tick};
use uni_sim::{HaltReason, SimObserver};

use crate::row::{FinalPoseRow, PoseSnapshotRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes pose snapshots every `snapshot_every` ticks
/// and the final poses when the tick cap is reached.
///
/// A run ended by [`RunControl::stop`](uni_sim::RunControl::stop) only
/// flushes the writer; termination output belongs to capped runs.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:         W,
    snapshot_every: u64,
    last_error:     Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`.  `snapshot_every = 0` disables
    /// snapshots.
    pub fn new(writer: W, snapshot_every: u64) -> Self {
        Self { writer, snapshot_every, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect output after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, world: &WorldState) {
        if !tick.is_multiple_of(self.snapshot_every) {
            return;
        }
        let rows: Vec<PoseSnapshotRow> = world
            .current()
            .iter()
            .enumerate()
            .map(|(i, rec)| PoseSnapshotRow {
                tick:       tick.0,
                agent_id:   i as u32,
                x:          rec.pose.x,
                y:          rec.pose.y,
                a:          rec.pose.a,
                detections: world.detections(AgentId(i as u32)) as u32,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, tick: Tick, reason: HaltReason, world: &WorldState) {
        if reason == HaltReason::TickCap {
            let rows: Vec<FinalPoseRow> = world
                .poses()
                .enumerate()
                .map(|(i, pose)| FinalPoseRow::new(i as u32, pose))
                .collect();
            debug!(%tick, agents = rows.len(), "writing final poses");
            let result = self.writer.write_final(&rows);
            self.store_err(result);
        }
        let result = self.writer.finish();
        self.store_err(result);
    }
}
