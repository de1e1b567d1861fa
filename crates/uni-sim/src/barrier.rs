//! The tick barrier abstraction and its in-process backend.

use std::sync::{Condvar, Mutex, PoisonError};

/// Outcome of [`TickBarrier::arrive`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arrival {
    /// Every participant has arrived and this one must run the serial
    /// phase, then call [`TickBarrier::release`].
    Leader,
    /// The serial phase has finished (or the barrier was aborted) and the
    /// next tick may begin.
    Follower,
}

/// A reusable barrier separating the parallel and serial phases of a tick.
///
/// Exactly one participant per tick gets [`Arrival::Leader`].  Followers
/// return from `arrive` only after the leader's `release`, so everything the
/// leader wrote in between is visible to them, and everything any
/// participant wrote before arriving is visible to the leader.
pub trait TickBarrier: Sync {
    /// Number of participants.
    fn parties(&self) -> usize;

    fn arrive(&self, rank: usize) -> Arrival;

    /// Wake the followers of the current tick.  Leader only.
    fn release(&self, rank: usize);

    /// Unblock everyone after a participant failed.  Waiting and future
    /// `arrive` calls return without a full quorum; callers must consult
    /// the world's halt flag, which is set before `abort` is called.
    fn abort(&self, rank: usize);
}

// ── CondvarBarrier ────────────────────────────────────────────────────────────

#[derive(Debug)]
struct BarrierState {
    remaining:  usize,
    generation: u64,
    broken:     bool,
}

/// Counter + condition-variable barrier for threads of one process.
///
/// The last thread to arrive leads.
#[derive(Debug)]
pub struct CondvarBarrier {
    parties: usize,
    state:   Mutex<BarrierState>,
    cvar:    Condvar,
}

impl CondvarBarrier {
    pub fn new(parties: usize) -> Self {
        assert!(parties > 0, "a barrier needs at least one participant");
        Self {
            parties,
            state: Mutex::new(BarrierState { remaining: parties, generation: 0, broken: false }),
            cvar:  Condvar::new(),
        }
    }
}

impl TickBarrier for CondvarBarrier {
    fn parties(&self) -> usize {
        self.parties
    }

    fn arrive(&self, _rank: usize) -> Arrival {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.broken {
            return Arrival::Follower;
        }
        state.remaining -= 1;
        if state.remaining == 0 {
            return Arrival::Leader;
        }
        let generation = state.generation;
        while state.generation == generation && !state.broken {
            state = self.cvar.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        Arrival::Follower
    }

    fn release(&self, _rank: usize) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.remaining = self.parties;
        state.generation = state.generation.wrapping_add(1);
        self.cvar.notify_all();
    }

    fn abort(&self, _rank: usize) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.broken = true;
        self.cvar.notify_all();
    }
}
