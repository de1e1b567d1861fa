//! Unicycle kinematics.

use uni_agent::{PoseRecord, WorldParams};
use uni_behavior::Speed;
use uni_core::{Pose, wrap_angle};

/// Advance `current` by `speed` and store the result in `next`.
///
/// `current` is never modified: other workers may be sensing it.
#[inline]
pub fn update_pose(current: &PoseRecord, speed: Speed, params: &WorldParams, next: &mut PoseRecord) {
    let Pose { x, y, a } = current.pose;
    let torus = &params.torus;
    let pose = Pose {
        x: torus.wrap_distance(x + speed.v * a.cos()),
        y: torus.wrap_distance(y + speed.v * a.sin()),
        a: wrap_angle(a + speed.w),
    };
    *next = PoseRecord::new(pose, &params.geometry);
}
