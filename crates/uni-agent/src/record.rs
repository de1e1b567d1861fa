//! Element types stored in the shared world region.
//!
//! Every type here is `#[repr(C)]`, `Copy`, and valid when all-zero, so a
//! freshly mapped (zero-filled) region is already a well-formed world.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use uni_core::{AgentId, CellId, Pose, Tick};
use uni_spatial::SectorGeometry;

// ── Tint ──────────────────────────────────────────────────────────────────────

/// Display colour of an agent: the checkerboard parity of its home cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Tint {
    /// Even cell (`col + row` even).
    #[default]
    Blue = 0,
    /// Odd cell.
    Red = 1,
}

impl Tint {
    pub fn for_cell(geometry: &SectorGeometry, cell: CellId) -> Tint {
        let (col, row) = geometry.coords(cell);
        if (col + row) % 2 == 0 { Tint::Blue } else { Tint::Red }
    }

    /// RGB triple in `[0, 1]`.
    pub fn rgb(self) -> [f32; 3] {
        match self {
            Tint::Blue => [0.0, 0.0, 1.0],
            Tint::Red  => [1.0, 0.0, 0.0],
        }
    }
}

// ── PoseRecord ────────────────────────────────────────────────────────────────

/// One buffered pose slot.  The home cell and tint always describe `pose`;
/// the three are written and swapped together.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct PoseRecord {
    pub pose: Pose,
    pub home: CellId,
    pub tint: Tint,
}

impl PoseRecord {
    /// A record for `pose` (assumed normalized) with home cell and tint
    /// filled in.
    pub fn new(pose: Pose, geometry: &SectorGeometry) -> Self {
        let home = geometry.home_cell(pose.x, pose.y);
        Self { pose, home, tint: Tint::for_cell(geometry, home) }
    }
}

// ── Pixel ─────────────────────────────────────────────────────────────────────

/// One angular bin of an agent's sensor.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct Pixel {
    /// Distance to the detected agent, or the sensor range when empty.
    pub range: f64,
    /// The detected agent, or `AgentId::INVALID` when empty.
    pub robot: AgentId,
}

impl Pixel {
    /// An empty bin for a sensor of the given range.
    #[inline]
    pub fn empty(range: f64) -> Self {
        Self { range, robot: AgentId::INVALID }
    }

    #[inline]
    pub fn robot(&self) -> Option<AgentId> {
        self.robot.is_valid().then_some(self.robot)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.robot.is_valid()
    }
}

// ── Header ────────────────────────────────────────────────────────────────────

/// Run-wide scalars at the start of the region.
///
/// Only the coordinator of the serial phase writes `front` and `tick`; any
/// participant may read them.  `halted` is set once and never cleared.
#[derive(Debug, Default)]
#[repr(C)]
pub struct Header {
    front:  AtomicU32,
    halted: AtomicU32,
    tick:   AtomicU64,
}

impl Header {
    /// Index (0 or 1) of the buffer holding committed poses.
    #[inline]
    pub fn front(&self) -> usize {
        self.front.load(Ordering::Acquire) as usize
    }

    #[inline]
    pub(crate) fn flip(&self) -> usize {
        let next = 1 - self.front();
        self.front.store(next as u32, Ordering::Release);
        next
    }

    #[inline]
    pub fn tick(&self) -> Tick {
        Tick(self.tick.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn advance(&self) -> Tick {
        Tick(self.tick.fetch_add(1, Ordering::AcqRel)).next()
    }

    #[inline]
    pub fn halt(&self) {
        self.halted.store(1, Ordering::Release);
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire) != 0
    }
}
