//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `pose_snapshots.csv` (`tick,agent_id,x,y,a,detections`)
//! - `final_poses.csv` (`agent_id,x,y,a`)

use std::fs::File;
use std::path::Path;

use csv::{Writer, WriterBuilder};
use tracing::debug;

use crate::{FinalPoseRow, OutputError, OutputResult, PoseSnapshotRow};
use crate::writer::OutputWriter;

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    finals:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        if !dir.is_dir() {
            return Err(OutputError::NotADirectory(dir.to_path_buf()));
        }
        let mut snapshots = open(&dir.join("pose_snapshots.csv"))?;
        snapshots.write_record(["tick", "agent_id", "x", "y", "a", "detections"])?;

        let mut finals = open(&dir.join("final_poses.csv"))?;
        finals.write_record(["agent_id", "x", "y", "a"])?;

        debug!(dir = %dir.display(), "CSV output opened");
        Ok(Self { snapshots, finals, finished: false })
    }
}

/// Headers are written explicitly so that a run with no rows still produces
/// a well-formed file.
fn open(path: &Path) -> OutputResult<Writer<File>> {
    Ok(WriterBuilder::new().has_headers(false).from_path(path)?)
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[PoseSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.serialize(row)?;
        }
        Ok(())
    }

    fn write_final(&mut self, rows: &[FinalPoseRow]) -> OutputResult<()> {
        for row in rows {
            self.finals.serialize(row)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.finals.flush()?;
        Ok(())
    }
}
