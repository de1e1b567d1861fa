//! Sector registration table in CSR form.
//!
//! # Data layout
//!
//! Given a `CellId c`, the agents registered there occupy
//!
//! ```text
//! members[ starts[c] .. starts[c+1] ]
//! ```
//!
//! `starts` has `cell_count + 1` entries and `members` has room for
//! `9 × population` ids, the most a full rebuild can write.  Within a cell
//! members are in ascending `AgentId` order.
//!
//! The tables are plain slices so they can sit either in owned `Vec`s
//! ([`SectorGrid`]) or inside the shared world region (`uni-agent` borrows
//! them through [`GridStorage`] and [`GridView`]).

use uni_core::{AgentId, CellId};

use crate::SectorGeometry;

/// Registrations per agent in the worst case (full 3×3 block).
pub const BLOCK_CELLS: usize = 9;

// ── GridView ──────────────────────────────────────────────────────────────────

/// Read-only view of a built grid.
#[derive(Copy, Clone)]
pub struct GridView<'a> {
    pub geometry: SectorGeometry,
    starts:       &'a [u32],
    members:      &'a [AgentId],
}

impl<'a> GridView<'a> {
    /// Wrap existing tables.  `starts.len()` must be `cell_count + 1`.
    pub fn new(geometry: SectorGeometry, starts: &'a [u32], members: &'a [AgentId]) -> Self {
        debug_assert_eq!(starts.len(), geometry.cell_count() + 1);
        Self { geometry, starts, members }
    }

    /// Agents registered at `cell`, in ascending id order.
    #[inline]
    pub fn query(&self, cell: CellId) -> &'a [AgentId] {
        let start = self.starts[cell.index()] as usize;
        let end   = self.starts[cell.index() + 1] as usize;
        &self.members[start..end]
    }

    /// Total registrations across all cells.
    #[inline]
    pub fn registrations(&self) -> usize {
        self.starts[self.starts.len() - 1] as usize
    }
}

// ── GridStorage ───────────────────────────────────────────────────────────────

/// Mutable grid tables, borrowed for the duration of one rebuild.
pub struct GridStorage<'a> {
    starts:  &'a mut [u32],
    cursor:  &'a mut [u32],
    members: &'a mut [AgentId],
}

impl<'a> GridStorage<'a> {
    /// `starts` needs `cell_count + 1` entries, `cursor` `cell_count`, and
    /// `members` at least `9 × population`.
    pub fn new(starts: &'a mut [u32], cursor: &'a mut [u32], members: &'a mut [AgentId]) -> Self {
        debug_assert_eq!(starts.len(), cursor.len() + 1);
        Self { starts, cursor, members }
    }

    /// Clear every cell and register each agent in the 3×3 block around its
    /// home cell.
    ///
    /// `homes` yields the home cell of agent 0, 1, 2, … in order; it is
    /// walked twice (count, then fill), so it must be cheap to clone.
    pub fn rebuild<I>(&mut self, geometry: &SectorGeometry, homes: I)
    where
        I: IntoIterator<Item = CellId> + Clone,
    {
        debug_assert_eq!(self.cursor.len(), geometry.cell_count());

        // Count per cell, shifted by one so the prefix sum yields starts.
        self.starts.fill(0);
        for home in homes.clone() {
            for &cell in geometry.block(home).as_slice() {
                self.starts[cell.index() + 1] += 1;
            }
        }
        for c in 0..self.cursor.len() {
            self.starts[c + 1] += self.starts[c];
        }

        self.cursor.copy_from_slice(&self.starts[..self.cursor.len()]);
        for (i, home) in homes.into_iter().enumerate() {
            let id = AgentId(i as u32);
            for &cell in geometry.block(home).as_slice() {
                let slot = &mut self.cursor[cell.index()];
                self.members[*slot as usize] = id;
                *slot += 1;
            }
        }
    }

    /// Read-only view over the tables as last rebuilt.
    pub fn view(&self, geometry: SectorGeometry) -> GridView<'_> {
        GridView::new(geometry, &*self.starts, &*self.members)
    }
}

// ── SectorGrid ────────────────────────────────────────────────────────────────

/// An owned sector grid for callers that keep state in ordinary memory.
pub struct SectorGrid {
    pub geometry: SectorGeometry,
    starts:       Vec<u32>,
    cursor:       Vec<u32>,
    members:      Vec<AgentId>,
}

impl SectorGrid {
    /// Allocate an empty grid sized for `population` agents.
    pub fn new(geometry: SectorGeometry, population: usize) -> Self {
        let cells = geometry.cell_count();
        Self {
            geometry,
            starts:  vec![0; cells + 1],
            cursor:  vec![0; cells],
            members: vec![AgentId::INVALID; population * BLOCK_CELLS],
        }
    }

    /// Rebuild from the agents' home cells (see [`GridStorage::rebuild`]).
    pub fn rebuild<I>(&mut self, homes: I)
    where
        I: IntoIterator<Item = CellId> + Clone,
    {
        let geometry = self.geometry;
        GridStorage::new(&mut self.starts, &mut self.cursor, &mut self.members)
            .rebuild(&geometry, homes);
    }

    /// Rebuild from raw positions.
    pub fn rebuild_from_positions(&mut self, positions: &[(f64, f64)]) {
        let geometry = self.geometry;
        self.rebuild(positions.iter().map(move |&(x, y)| geometry.home_cell(x, y)));
    }

    #[inline]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(self.geometry, &self.starts, &self.members)
    }

    #[inline]
    pub fn query(&self, cell: CellId) -> &[AgentId] {
        self.view().query(cell)
    }
}
