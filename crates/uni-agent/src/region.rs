//! Zero-filled memory regions backing the world and the process barrier.

use std::fs::File;

use memmap2::MmapMut;

use crate::AgentResult;

/// Who may see writes to a region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RegionKind {
    /// Threads of this process only.
    #[default]
    Private,
    /// This process and any child forked after the region was created.
    ProcessShared,
}

/// A fixed-length, zero-initialized, page-aligned byte region.
///
/// `ProcessShared` regions are `MAP_SHARED` mappings of an unlinked temporary
/// file, so a forked child writes the same physical pages as its parent.
pub struct SharedRegion {
    map:   MmapMut,
    kind:  RegionKind,
    _file: Option<File>,
}

impl SharedRegion {
    pub fn new(len: usize, kind: RegionKind) -> AgentResult<Self> {
        let len = len.max(1);
        match kind {
            RegionKind::Private => {
                let map = MmapMut::map_anon(len)?;
                Ok(Self { map, kind, _file: None })
            }
            RegionKind::ProcessShared => {
                let file = tempfile::tempfile()?;
                file.set_len(len as u64)?;
                // SAFETY: the file is unlinked and private to this process
                // tree, so nothing outside it can truncate or modify it.
                let map = unsafe { MmapMut::map_mut(&file)? };
                Ok(Self { map, kind, _file: Some(file) })
            }
        }
    }

    #[inline]
    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Base address of the region.
    ///
    /// The pointer stays valid for the life of `self`.  Callers that write
    /// through it from several threads or processes are responsible for
    /// keeping those writes disjoint.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.map.as_mut_ptr()
    }
}
