//! Sector-grid shape and cell arithmetic.
//!
//! Cells are addressed row-major: `CellId(row * num_sectors + col)`, with
//! `col` along x and `row` along y.  Both axes wrap.

use uni_core::CellId;

use crate::{SpatialError, SpatialResult};

/// Upper bound on sectors per axis.  The grid tables grow with the square of
/// this, and they live in a fixed-size shared region.  Finer grids are
/// clamped to it: wider sectors still satisfy `sector_width >= range`.
pub const MAX_SECTORS_PER_AXIS: u32 = 4096;

/// Shape of the sector grid for one run.
///
/// Invariant: `num_sectors >= 1` and `sector_width >= range`, so two agents
/// within sensing range are always in the same or adjacent cells.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectorGeometry {
    pub num_sectors:  u32,
    pub sector_width: f64,
}

impl SectorGeometry {
    /// Derive the grid from the arena side and sensor range.
    ///
    /// `num_sectors = floor(world_size / range)`, at most
    /// [`MAX_SECTORS_PER_AXIS`].  If floating-point rounding leaves
    /// `world_size / num_sectors` a hair below `range`, one sector is dropped
    /// so the width invariant holds exactly.
    pub fn new(world_size: f64, range: f64) -> SpatialResult<Self> {
        if !(world_size.is_finite() && world_size > 0.0) {
            return Err(SpatialError::Invalid(format!("world size {world_size}")));
        }
        if !(range.is_finite() && range > 0.0) {
            return Err(SpatialError::Invalid(format!("sensor range {range}")));
        }

        let sectors = (world_size / range).floor();
        if !(sectors >= 1.0) {
            return Err(SpatialError::NoSectors { world_size, range });
        }
        let mut n = sectors.min(MAX_SECTORS_PER_AXIS as f64) as u32;
        while n > 1 && world_size / (n as f64) < range {
            n -= 1;
        }
        let sector_width = world_size / n as f64;
        if sector_width < range {
            return Err(SpatialError::SectorTooNarrow { sector_width, range });
        }

        Ok(Self { num_sectors: n, sector_width })
    }

    /// Total number of cells, `num_sectors²`.
    #[inline]
    pub fn cell_count(&self) -> usize {
        let n = self.num_sectors as usize;
        n * n
    }

    /// Column (or row) index of a coordinate.
    ///
    /// Clamped to `num_sectors - 1`: a coordinate that rounds onto the far
    /// edge still lands in the last sector.
    #[inline]
    pub fn sector_of(&self, coord: f64) -> u32 {
        // `as` saturates: negatives and NaN become 0.
        ((coord / self.sector_width) as u32).min(self.num_sectors - 1)
    }

    /// The cell containing `(x, y)`.
    #[inline]
    pub fn home_cell(&self, x: f64, y: f64) -> CellId {
        self.cell(self.sector_of(x), self.sector_of(y))
    }

    #[inline]
    pub fn cell(&self, col: u32, row: u32) -> CellId {
        CellId(row * self.num_sectors + col)
    }

    /// `(col, row)` of `cell`.
    #[inline]
    pub fn coords(&self, cell: CellId) -> (u32, u32) {
        (cell.0 % self.num_sectors, cell.0 / self.num_sectors)
    }

    /// The wrapped 3×3 block of cells centered on `cell`.
    ///
    /// With one or two sectors per axis the wrapped neighbours coincide;
    /// duplicates are dropped per axis so each cell appears once.
    pub fn block(&self, cell: CellId) -> Block {
        let (col, row) = self.coords(cell);
        let cols = self.axis_neighbours(col);
        let rows = self.axis_neighbours(row);

        let mut out = Block { cells: [CellId::INVALID; 9], len: 0 };
        for &r in &rows.0[..rows.1] {
            for &c in &cols.0[..cols.1] {
                out.cells[out.len] = self.cell(c, r);
                out.len += 1;
            }
        }
        out
    }

    fn axis_neighbours(&self, i: u32) -> ([u32; 3], usize) {
        let n = self.num_sectors;
        match n {
            1 => ([0, 0, 0], 1),
            2 => ([i, 1 - i, 0], 2),
            _ => ([(i + n - 1) % n, i, (i + 1) % n], 3),
        }
    }
}

/// Up to nine distinct cells of a wrapped 3×3 neighbourhood.
#[derive(Copy, Clone, Debug)]
pub struct Block {
    cells: [CellId; 9],
    len:   usize,
}

impl Block {
    #[inline]
    pub fn as_slice(&self) -> &[CellId] {
        &self.cells[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
