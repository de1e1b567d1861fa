//! Byte layout of the world region.
//!
//! ```text
//! ┌────────┬──────────┬──────────┬───────────────┬────────┬────────┬─────────┐
//! │ Header │ poses[0] │ poses[1] │ pixels (N×P)  │ starts │ cursor │ members │
//! └────────┴──────────┴──────────┴───────────────┴────────┴────────┴─────────┘
//! ```
//!
//! Each array starts on a cache-line boundary.

use std::mem::{align_of, size_of};

use uni_core::AgentId;
use uni_spatial::BLOCK_CELLS;

use crate::{AgentError, AgentResult, Header, Pixel, PoseRecord};

const ALIGN: usize = 64;

/// Offsets (in bytes from the region base) and element counts of every array.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorldLayout {
    pub population:  usize,
    pub pixel_count: usize,
    pub cells:       usize,

    pub header:  usize,
    pub poses:   [usize; 2],
    pub pixels:  usize,
    pub starts:  usize,
    pub cursor:  usize,
    pub members: usize,

    /// Total region length in bytes.
    pub len: usize,
}

impl WorldLayout {
    pub fn new(population: usize, pixel_count: usize, cells: usize) -> AgentResult<Self> {
        let too_large = || AgentError::TooLarge { population, pixel_count, cells };

        // Grid offsets are u32 and must index every registration.
        let registrations = population.checked_mul(BLOCK_CELLS).ok_or_else(too_large)?;
        if registrations > u32::MAX as usize {
            return Err(too_large());
        }

        let mut end = 0usize;
        let mut place = |count: usize, elem: usize| -> AgentResult<usize> {
            let offset = align_up(end).ok_or_else(too_large)?;
            let bytes = count.checked_mul(elem).ok_or_else(too_large)?;
            end = offset.checked_add(bytes).ok_or_else(too_large)?;
            Ok(offset)
        };

        let header  = place(1, size_of::<Header>())?;
        let poses0  = place(population, size_of::<PoseRecord>())?;
        let poses1  = place(population, size_of::<PoseRecord>())?;
        let pixels  = place(population.checked_mul(pixel_count).ok_or_else(too_large)?, size_of::<Pixel>())?;
        let starts  = place(cells + 1, size_of::<u32>())?;
        let cursor  = place(cells, size_of::<u32>())?;
        let members = place(registrations, size_of::<AgentId>())?;
        let len = align_up(end).ok_or_else(too_large)?;

        debug_assert!(align_of::<PoseRecord>() <= ALIGN && align_of::<Pixel>() <= ALIGN);

        Ok(Self {
            population,
            pixel_count,
            cells,
            header,
            poses: [poses0, poses1],
            pixels,
            starts,
            cursor,
            members,
            len,
        })
    }
}

fn align_up(n: usize) -> Option<usize> {
    Some(n.checked_add(ALIGN - 1)? & !(ALIGN - 1))
}
