//! Semaphore-pair barrier for forked worker processes.
//!
//! For every follower rank `i ≥ 1` there are two process-shared counting
//! semaphores, `done[i]` and `ready[i]`, living in their own `MAP_SHARED`
//! region created before the fork.  Rank 0 is always the leader:
//!
//! ```text
//! follower i:  post(done[i])  → wait(ready[i])
//! leader:      wait(done[1..]) → serial phase → post(ready[1..])
//! ```

use std::io;
use std::mem::size_of;

use uni_agent::{RegionKind, SharedRegion};

use crate::{Arrival, SimError, SimResult, TickBarrier};

pub struct SemaphoreBarrier {
    parties: usize,
    sems:    *mut libc::sem_t,
    _region: SharedRegion,
}

// SAFETY: POSIX semaphores may be used concurrently from any thread or
// process that can address them.
unsafe impl Send for SemaphoreBarrier {}
unsafe impl Sync for SemaphoreBarrier {}

impl SemaphoreBarrier {
    /// Create `2 × parties` semaphores, all at zero.
    ///
    /// Must be called before forking so the children inherit the mapping.
    pub fn new(parties: usize) -> SimResult<Self> {
        assert!(parties > 0, "a barrier needs at least one participant");
        let count = 2 * parties;
        let mut region = SharedRegion::new(count * size_of::<libc::sem_t>(), RegionKind::ProcessShared)
            .map_err(|e| match e {
                uni_agent::AgentError::Region(io) => SimError::Barrier(io),
                other => SimError::World(other),
            })?;
        let sems = region.as_mut_ptr().cast::<libc::sem_t>();

        for i in 0..count {
            // SAFETY: `i < count`, the region holds `count` semaphores and is
            // page-aligned.
            let rc = unsafe { libc::sem_init(sems.add(i), 1, 0) };
            if rc != 0 {
                let err = io::Error::last_os_error();
                for j in 0..i {
                    // SAFETY: initialized above and never waited on.
                    unsafe { libc::sem_destroy(sems.add(j)) };
                }
                return Err(SimError::Barrier(err));
            }
        }

        Ok(Self { parties, sems, _region: region })
    }

    #[inline]
    fn done(&self, rank: usize) -> *mut libc::sem_t {
        debug_assert!(rank < self.parties);
        // SAFETY: in bounds.
        unsafe { self.sems.add(rank) }
    }

    #[inline]
    fn ready(&self, rank: usize) -> *mut libc::sem_t {
        debug_assert!(rank < self.parties);
        // SAFETY: in bounds.
        unsafe { self.sems.add(self.parties + rank) }
    }

    /// Post `done[rank]` on behalf of a follower that can no longer do it
    /// itself (it died).  Used by the parent's reaper.
    pub(crate) fn post_done(&self, rank: usize) {
        post(self.done(rank));
    }
}

impl TickBarrier for SemaphoreBarrier {
    fn parties(&self) -> usize {
        self.parties
    }

    fn arrive(&self, rank: usize) -> Arrival {
        if rank == 0 {
            for i in 1..self.parties {
                wait(self.done(i));
            }
            Arrival::Leader
        } else {
            post(self.done(rank));
            wait(self.ready(rank));
            Arrival::Follower
        }
    }

    fn release(&self, rank: usize) {
        debug_assert_eq!(rank, 0, "only rank 0 leads the semaphore barrier");
        for i in 1..self.parties {
            post(self.ready(i));
        }
    }

    fn abort(&self, rank: usize) {
        if rank == 0 {
            self.release(0);
        } else {
            post(self.done(rank));
        }
    }
}

impl Drop for SemaphoreBarrier {
    fn drop(&mut self) {
        for i in 0..2 * self.parties {
            // SAFETY: initialized in `new`; children have exited.
            unsafe { libc::sem_destroy(self.sems.add(i)) };
        }
    }
}

fn wait(sem: *mut libc::sem_t) {
    loop {
        // SAFETY: `sem` was initialized by `SemaphoreBarrier::new`.
        if unsafe { libc::sem_wait(sem) } == 0 {
            return;
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            panic!("sem_wait failed: {err}");
        }
    }
}

fn post(sem: *mut libc::sem_t) {
    // SAFETY: `sem` was initialized by `SemaphoreBarrier::new`.
    if unsafe { libc::sem_post(sem) } != 0 {
        panic!("sem_post failed: {}", io::Error::last_os_error());
    }
}
