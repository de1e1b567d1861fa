//! `WorldState`: typed access to the shared world region.
//!
//! # Access discipline
//!
//! A tick has two phases.
//!
//! 1. **Parallel.**  Every worker holds a [`Partition`] for its own
//!    contiguous agent range: shared views of the current pose buffer and the
//!    grid, exclusive slices of its agents' next-buffer slots and pixel rows.
//!    Partitions of disjoint ranges never alias.
//! 2. **Serial.**  Exactly one coordinator calls [`WorldState::commit`]
//!    while every other worker is parked at the barrier.
//!
//! The barrier between the phases provides the happens-before edges; the
//! unsafe entry points below spell out what their callers must uphold.
//! Everything reachable from `&self` without `unsafe` only reads committed
//! state and is meant for observers and for code running between runs.

use std::ops::Range;

use uni_core::{AgentId, Pose, Tick, Torus, UniConfig};
use uni_spatial::{GridStorage, GridView, SectorGeometry};

use crate::{AgentResult, Header, Pixel, PoseRecord, RegionKind, SharedRegion, WorldLayout};

// ── WorldParams ───────────────────────────────────────────────────────────────

/// Read-only parameters derived from a validated [`UniConfig`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldParams {
    pub torus:       Torus,
    /// Sensor range.
    pub range:       f64,
    /// Field of view in radians.
    pub fov:         f64,
    pub pixel_count: usize,
    pub population:  usize,
    pub geometry:    SectorGeometry,
}

impl WorldParams {
    /// Validate `config` and derive the grid geometry.
    pub fn from_config(config: &UniConfig) -> AgentResult<Self> {
        config.validate()?;
        let geometry = SectorGeometry::new(config.world_size, config.range)?;
        Ok(Self {
            torus:       config.torus(),
            range:       config.range,
            fov:         config.fov(),
            pixel_count: config.pixel_count,
            population:  config.population_size,
            geometry,
        })
    }

    #[inline]
    pub fn radians_per_pixel(&self) -> f64 {
        self.fov / self.pixel_count as f64
    }
}

// ── TickView ──────────────────────────────────────────────────────────────────

/// Everything a worker may read during the parallel phase.
#[derive(Copy, Clone)]
pub struct TickView<'a> {
    /// Ticks committed before this one.
    pub tick:    Tick,
    pub params:  &'a WorldParams,
    pub current: &'a [PoseRecord],
    pub grid:    GridView<'a>,
}

/// A worker's share of one tick: read access to committed state plus
/// exclusive access to the next slots and pixel rows of `agents`.
///
/// `next[i]` and `pixels[i * pixel_count ..][.. pixel_count]` belong to agent
/// `agents.start + i`.
pub struct Partition<'a> {
    pub view:   TickView<'a>,
    pub agents: Range<usize>,
    pub next:   &'a mut [PoseRecord],
    pub pixels: &'a mut [Pixel],
}

// ── WorldState ────────────────────────────────────────────────────────────────

/// The complete engine state of one run, backed by a [`SharedRegion`].
///
/// Build with [`WorldBuilder`](crate::WorldBuilder).
pub struct WorldState {
    region: SharedRegion,
    base:   *mut u8,
    layout: WorldLayout,
    params: WorldParams,
}

// SAFETY: all mutation through `&WorldState` goes through `unsafe` methods
// whose contracts require the caller to keep concurrent writes disjoint and
// ordered by the tick barrier.  The header is atomics only.
unsafe impl Send for WorldState {}
unsafe impl Sync for WorldState {}

impl WorldState {
    pub(crate) fn from_parts(mut region: SharedRegion, layout: WorldLayout, params: WorldParams) -> Self {
        debug_assert!(region.len() >= layout.len);
        let base = region.as_mut_ptr();
        Self { region, base, layout, params }
    }

    // ── Read-only access ──────────────────────────────────────────────────

    #[inline]
    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    #[inline]
    pub fn layout(&self) -> &WorldLayout {
        &self.layout
    }

    #[inline]
    pub fn population(&self) -> usize {
        self.layout.population
    }

    #[inline]
    pub fn region_kind(&self) -> RegionKind {
        self.region.kind()
    }

    #[inline]
    pub fn header(&self) -> &Header {
        // SAFETY: offset 0 is aligned for `Header` and only ever accessed
        // through its atomics.
        unsafe { &*self.base.add(self.layout.header).cast::<Header>() }
    }

    /// Number of committed ticks.
    #[inline]
    pub fn tick(&self) -> Tick {
        self.header().tick()
    }

    /// The committed pose buffer, indexed by `AgentId`.
    #[inline]
    pub fn current(&self) -> &[PoseRecord] {
        // SAFETY: the front buffer is never written while a shared borrow
        // from safe code can exist (see module docs).
        unsafe { self.buffer(self.header().front()) }
    }

    #[inline]
    pub fn pose(&self, agent: AgentId) -> Pose {
        self.current()[agent.index()].pose
    }

    /// Committed poses in population order.
    pub fn poses(&self) -> impl Iterator<Item = Pose> + '_ {
        self.current().iter().map(|r| r.pose)
    }

    /// The sensor reading `agent` produced in the last committed tick.
    #[inline]
    pub fn pixels(&self, agent: AgentId) -> &[Pixel] {
        let pc = self.layout.pixel_count;
        &self.pixel_table()[agent.index() * pc..][..pc]
    }

    /// Number of occupied bins in `agent`'s last reading.
    pub fn detections(&self, agent: AgentId) -> usize {
        self.pixels(agent).iter().filter(|p| !p.is_empty()).count()
    }

    /// All pixel rows, `population × pixel_count`.
    #[inline]
    pub fn pixel_table(&self) -> &[Pixel] {
        // SAFETY: as for `current`.
        unsafe { self.array(self.layout.pixels, self.layout.population * self.layout.pixel_count) }
    }

    /// The grid as rebuilt from the committed poses.
    #[inline]
    pub fn grid(&self) -> GridView<'_> {
        // SAFETY: as for `current`.
        unsafe {
            GridView::new(
                self.params.geometry,
                self.array(self.layout.starts, self.layout.cells + 1),
                self.array(self.layout.members, self.layout.population * uni_spatial::BLOCK_CELLS),
            )
        }
    }

    // ── Tick protocol ─────────────────────────────────────────────────────

    /// Hand out the parallel-phase share of `agents`.
    ///
    /// # Safety
    ///
    /// Until the returned partition is dropped: no other live partition may
    /// overlap `agents`, and neither [`commit`](Self::commit) nor any safe
    /// reader of the next buffer or the pixel table may run concurrently.
    pub unsafe fn partition_mut(&self, agents: Range<usize>) -> Partition<'_> {
        debug_assert!(agents.end <= self.layout.population);
        let pc = self.layout.pixel_count;
        let front = self.header().front();
        let next_at = self.layout.poses[1 - front] + agents.start * size_of::<PoseRecord>();
        let pixels_at = self.layout.pixels + agents.start * pc * size_of::<Pixel>();
        // SAFETY: per the contract above, the slices created here cover only
        // `agents` and are the only live references to those bytes.
        unsafe {
            Partition {
                view:   self.view_unchecked(front),
                next:   self.array_mut(next_at, agents.len()),
                pixels: self.array_mut(pixels_at, agents.len() * pc),
                agents,
            }
        }
    }

    /// The whole population as one partition.
    pub fn split_mut(&mut self) -> Partition<'_> {
        let n = self.layout.population;
        // SAFETY: `&mut self` excludes every other borrow.
        unsafe { self.partition_mut(0..n) }
    }

    /// The serial phase: make the next buffer current, rebuild the grid from
    /// it and advance the tick counter.  Returns the new tick count.
    ///
    /// # Safety
    ///
    /// Must run on exactly one participant, after every partition of this
    /// tick has been dropped and its writes made visible (the tick barrier),
    /// and before any partition of the following tick is created.
    pub unsafe fn commit(&self) -> Tick {
        let header = self.header();
        let front = header.flip();
        // SAFETY: exclusive per the contract above.
        unsafe { self.rebuild_grid(front) };
        header.advance()
    }

    /// [`commit`](Self::commit) for a caller that owns the world.
    pub fn commit_mut(&mut self) -> Tick {
        // SAFETY: `&mut self` excludes every other borrow.
        unsafe { self.commit() }
    }

    /// Set the halt flag read by every worker after each barrier.
    #[inline]
    pub fn halt(&self) {
        self.header().halt();
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.header().is_halted()
    }

    // ── Construction helpers ──────────────────────────────────────────────

    /// Exclusive access to both pose buffers and the pixel table.
    pub(crate) fn init_arrays(&mut self) -> (&mut [PoseRecord], &mut [PoseRecord], &mut [Pixel]) {
        let n = self.layout.population;
        // SAFETY: `&mut self`, and the three arrays are disjoint.
        unsafe {
            (
                self.array_mut(self.layout.poses[0], n),
                self.array_mut(self.layout.poses[1], n),
                self.array_mut(self.layout.pixels, n * self.layout.pixel_count),
            )
        }
    }

    pub(crate) fn init_grid(&mut self) {
        let front = self.header().front();
        // SAFETY: `&mut self`.
        unsafe { self.rebuild_grid(front) }
    }

    // ── Raw region access ─────────────────────────────────────────────────

    unsafe fn rebuild_grid(&self, front: usize) {
        let cells = self.layout.cells;
        // SAFETY: the caller has exclusive access to the grid tables; the
        // front buffer is only read.
        unsafe {
            let homes = self.buffer(front).iter().map(|r| r.home);
            GridStorage::new(
                self.array_mut(self.layout.starts, cells + 1),
                self.array_mut(self.layout.cursor, cells),
                self.array_mut(self.layout.members, self.layout.population * uni_spatial::BLOCK_CELLS),
            )
            .rebuild(&self.params.geometry, homes);
        }
    }

    unsafe fn view_unchecked(&self, front: usize) -> TickView<'_> {
        // SAFETY: forwarded to the caller.
        unsafe {
            TickView {
                tick:    self.header().tick(),
                params:  &self.params,
                current: self.buffer(front),
                grid:    GridView::new(
                    self.params.geometry,
                    self.array(self.layout.starts, self.layout.cells + 1),
                    self.array(self.layout.members, self.layout.population * uni_spatial::BLOCK_CELLS),
                ),
            }
        }
    }

    unsafe fn buffer(&self, which: usize) -> &[PoseRecord] {
        unsafe { self.array(self.layout.poses[which], self.layout.population) }
    }

    unsafe fn array<T>(&self, offset: usize, len: usize) -> &[T] {
        // SAFETY: `WorldLayout` keeps every array in bounds and aligned, and
        // zero bytes are a valid value of every element type.
        unsafe { std::slice::from_raw_parts(self.base.add(offset).cast::<T>(), len) }
    }

    #[allow(clippy::mut_from_ref)]
    unsafe fn array_mut<T>(&self, offset: usize, len: usize) -> &mut [T] {
        // SAFETY: as for `array`; exclusivity is the caller's obligation.
        unsafe { std::slice::from_raw_parts_mut(self.base.add(offset).cast::<T>(), len) }
    }
}

impl std::fmt::Debug for WorldState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldState")
            .field("population", &self.layout.population)
            .field("tick", &self.tick())
            .field("region", &self.region.kind())
            .field("bytes", &self.layout.len)
            .finish()
    }
}
