//! The per-tick protocol, written once for every barrier backend.
//!
//! ```text
//! loop:
//!   ① Compute — for each agent of my partition: sense → decide → move
//!   ② Arrive  — block at the tick barrier
//!   ③ Serial  — the leader alone: commit, notify, pace, cap/pause/stop
//!   ④ Release — the leader wakes everyone
//!   ⑤ Exit if the halt flag is set
//! ```

use std::ops::Range;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::trace;
use uni_agent::{Partition, Pixel, PoseRecord, TickView, WorldState};
use uni_behavior::{Controller, SenseContext};
use uni_core::AgentId;
use uni_mobility::update_pose;
use uni_sensor::update_pixels;

use crate::{Arrival, HaltReason, RunControl, SimObserver, TickBarrier};

// ── Compute phase ─────────────────────────────────────────────────────────────

/// Sense, decide and move one agent.
#[inline]
pub(crate) fn compute_agent<C: Controller + ?Sized>(
    agent:      AgentId,
    view:       &TickView<'_>,
    controller: &C,
    pixels:     &mut [Pixel],
    next:       &mut PoseRecord,
) {
    update_pixels(agent, view, pixels);
    let current = &view.current[agent.index()];
    let ctx = SenseContext::new(view.tick, current.pose, pixels, view.params);
    let speed = controller.control(agent, &ctx);
    update_pose(current, speed, view.params, next);
}

/// Run the compute phase for every agent of `part`, in id order.
pub(crate) fn compute_partition<C: Controller + ?Sized>(part: Partition<'_>, controller: &C) {
    let Partition { view, agents, next, pixels } = part;
    let pc = view.params.pixel_count;
    for ((i, slot), row) in agents.zip(next.iter_mut()).zip(pixels.chunks_exact_mut(pc)) {
        compute_agent(AgentId(i as u32), &view, controller, row, slot);
    }
}

// ── Serial phase ──────────────────────────────────────────────────────────────

/// State the leader of each tick needs for the serial phase.
///
/// Shared by reference between all workers of a thread run: whichever
/// thread leads a tick uses it, one at a time.
pub(crate) struct Coordinator<'a, O> {
    world:    &'a WorldState,
    observer: Mutex<&'a mut O>,
    control:  &'a RunControl,
    tick_cap: u64,
    pacing:   Duration,
    outcome:  Mutex<Option<HaltReason>>,
}

impl<'a, O: SimObserver> Coordinator<'a, O> {
    pub(crate) fn new(
        world:    &'a WorldState,
        observer: &'a mut O,
        control:  &'a RunControl,
        tick_cap: u64,
        pacing:   Duration,
    ) -> Self {
        Self {
            world,
            observer: Mutex::new(observer),
            control,
            tick_cap,
            pacing,
            outcome: Mutex::new(None),
        }
    }

    /// Commit the tick and decide whether the run continues.
    ///
    /// # Safety
    ///
    /// Only the barrier leader may call this, between `arrive` returning
    /// [`Arrival::Leader`] and `release`.
    unsafe fn serial_phase(&self) {
        // SAFETY: every other participant is parked at the barrier.
        let tick = unsafe { self.world.commit() };
        trace!(%tick, "tick committed");

        let mut observer = self.observer.lock().unwrap_or_else(PoisonError::into_inner);
        observer.on_tick_end(tick, self.world);

        if !self.pacing.is_zero() {
            std::thread::sleep(self.pacing);
        }

        let reason = if self.tick_cap > 0 && tick.0 >= self.tick_cap {
            Some(HaltReason::TickCap)
        } else if self.control.checkpoint() {
            Some(HaltReason::Stopped)
        } else {
            None
        };

        if let Some(reason) = reason {
            observer.on_sim_end(tick, reason, self.world);
            *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = Some(reason);
            self.world.halt();
        }
    }

    /// Why the run ended, or `None` if it was aborted by a failure.
    pub(crate) fn outcome(&self) -> Option<HaltReason> {
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Worker loop ───────────────────────────────────────────────────────────────

/// Sets the halt flag and breaks the barrier if a worker unwinds, so the
/// remaining participants do not wait forever.
struct AbortOnUnwind<'a, B: TickBarrier + ?Sized> {
    rank:    usize,
    world:   &'a WorldState,
    barrier: &'a B,
}

impl<B: TickBarrier + ?Sized> Drop for AbortOnUnwind<'_, B> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.world.halt();
            self.barrier.abort(self.rank);
        }
    }
}

/// Drive `agents` until the world halts.
///
/// Called once per worker with its fixed partition.  `world` must be the
/// world the coordinator commits, and the partitions of all participants
/// must be disjoint.
pub(crate) fn worker_loop<C, B, O>(
    rank:        usize,
    agents:      Range<usize>,
    world:       &WorldState,
    controller:  &C,
    barrier:     &B,
    coordinator: &Coordinator<'_, O>,
) where
    C: Controller + ?Sized,
    B: TickBarrier + ?Sized,
    O: SimObserver,
{
    let _guard = AbortOnUnwind { rank, world, barrier };
    loop {
        // SAFETY: partitions are disjoint and the previous commit finished
        // before the barrier released us.
        let part = unsafe { world.partition_mut(agents.clone()) };
        compute_partition(part, controller);

        if barrier.arrive(rank) == Arrival::Leader {
            if !world.is_halted() {
                // SAFETY: we are the leader of this tick.
                unsafe { coordinator.serial_phase() };
            }
            barrier.release(rank);
        }

        if world.is_halted() {
            break;
        }
    }
}
