//! Plain data row types written by output backends.

use serde::Serialize;
use uni_core::Pose;

/// One agent's committed pose and sensor summary at a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoseSnapshotRow {
    pub tick:       u64,
    pub agent_id:   u32,
    pub x:          f64,
    pub y:          f64,
    pub a:          f64,
    /// Number of non-empty pixels after the agent's last sense.
    pub detections: u32,
}

/// One agent's pose when the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalPoseRow {
    pub agent_id: u32,
    pub x:        f64,
    pub y:        f64,
    pub a:        f64,
}

impl FinalPoseRow {
    pub fn new(agent_id: u32, pose: Pose) -> Self {
        Self { agent_id, x: pose.x, y: pose.y, a: pose.a }
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        Pose { x: self.x, y: self.y, a: self.a }
    }
}
