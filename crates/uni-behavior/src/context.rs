//! Read-only inputs of one controller call.

use uni_agent::{Pixel, WorldParams};
use uni_core::{Pose, Tick};

/// What an agent knows when its controller runs.
///
/// Built by the worker for each agent after sensing; all borrows end before
/// the serial phase of the tick.
pub struct SenseContext<'a> {
    /// Ticks committed before this one.
    pub tick:   Tick,

    /// The agent's committed pose.
    pub pose:   Pose,

    /// The sensor reading just computed for this agent, `pixel_count` bins
    /// ordered from the rightmost (clockwise) edge of the field of view to
    /// the leftmost.
    pub pixels: &'a [Pixel],

    pub params: &'a WorldParams,
}

impl<'a> SenseContext<'a> {
    #[inline]
    pub fn new(tick: Tick, pose: Pose, pixels: &'a [Pixel], params: &'a WorldParams) -> Self {
        Self { tick, pose, pixels, params }
    }

    /// Bins holding a detected agent.
    #[inline]
    pub fn detections(&self) -> impl Iterator<Item = (usize, &'a Pixel)> + 'a {
        self.pixels.iter().enumerate().filter(|(_, p)| !p.is_empty())
    }

    /// The nearest detection, if any, as `(bin, pixel)`.
    pub fn nearest(&self) -> Option<(usize, &'a Pixel)> {
        self.detections().min_by(|a, b| a.1.range.total_cmp(&b.1.range))
    }
}
