//! Process substrate: ranks `1..W` are forked children, rank 0 is the
//! calling process, `SemaphoreBarrier` between them.
//!
//! Children run only the compute phase (sensing, the user's controller,
//! movement) and the barrier protocol; they never touch the observer or the
//! run control, and leave with `_exit` so no destructor or buffered output
//! of the parent runs twice.

use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use tracing::{debug, warn};
use uni_agent::WorldState;
use uni_behavior::Controller;

use crate::worker::{Coordinator, worker_loop};
use crate::{SemaphoreBarrier, SimError, SimObserver, SimResult, TickBarrier};

/// Exit status of a child whose worker loop panicked.
const PANIC_EXIT: i32 = 101;

/// How often the reaper polls children that have not exited yet.
const REAP_INTERVAL: Duration = Duration::from_millis(10);

pub(crate) fn run<C, O>(
    world:       &WorldState,
    controller:  &C,
    partitions:  &[Range<usize>],
    coordinator: &Coordinator<'_, O>,
) -> SimResult<()>
where
    C: Controller,
    O: SimObserver + Send,
{
    let barrier = SemaphoreBarrier::new(partitions.len())?;
    let mut children: Vec<(usize, libc::pid_t)> = Vec::with_capacity(partitions.len() - 1);

    for (rank, agents) in partitions.iter().cloned().enumerate().skip(1) {
        debug!(rank, agents = ?agents, "forking worker process");
        // SAFETY: the child only runs the worker loop, then `_exit`s.  The
        // engine's compute path does not allocate or lock; the controller is
        // bound by the restriction documented on `Controller`.
        match unsafe { libc::fork() } {
            -1 => {
                let source = std::io::Error::last_os_error();
                // Children already started finish their first compute phase,
                // see the halt flag after the barrier, and exit.
                world.halt();
                barrier.abort(0);
                reap(&children, world, &barrier);
                return Err(SimError::Spawn { rank, source });
            }
            0 => {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    worker_loop(rank, agents, world, controller, &barrier, coordinator)
                }));
                let code = if result.is_ok() { 0 } else { PANIC_EXIT };
                // SAFETY: terminating the child without unwinding further.
                unsafe { libc::_exit(code) }
            }
            pid => children.push((rank, pid)),
        }
    }

    let (parent, failures) = std::thread::scope(|s| {
        let reaper = s.spawn(|| reap(&children, world, &barrier));
        let parent = panic::catch_unwind(AssertUnwindSafe(|| {
            worker_loop(0, partitions[0].clone(), world, controller, &barrier, coordinator)
        }));
        let failures = reaper.join().unwrap_or_default();
        (parent, failures)
    });

    if parent.is_err() {
        return Err(SimError::WorkerPanicked { rank: 0 });
    }
    match failures.first() {
        Some(&(rank, status)) => Err(SimError::WorkerFailed { rank, status }),
        None => Ok(()),
    }
}

/// Wait for every child and return those that did not exit cleanly.
///
/// A child that dies without reaching the barrier would leave rank 0 waiting
/// on its `done` semaphore forever; the reaper halts the world and posts on
/// the child's behalf.
fn reap(children: &[(usize, libc::pid_t)], world: &WorldState, barrier: &SemaphoreBarrier) -> Vec<(usize, i32)> {
    let mut pending: Vec<(usize, libc::pid_t)> = children.to_vec();
    let mut failures = Vec::new();

    while !pending.is_empty() {
        pending.retain(|&(rank, pid)| {
            let mut status: libc::c_int = 0;
            // SAFETY: `pid` is our child and `status` is a valid out-pointer.
            let rc = unsafe { libc::waitpid(pid, &mut status, libc::WNOHANG) };
            if rc == 0 {
                return true;
            }
            if rc == -1 {
                let err = std::io::Error::last_os_error();
                if err.kind() == std::io::ErrorKind::Interrupted {
                    return true;
                }
                // Reaped elsewhere; nothing more to learn.
                warn!(rank, pid, error = %err, "lost track of worker process");
                return false;
            }

            let clean = libc::WIFEXITED(status) && libc::WEXITSTATUS(status) == 0;
            if !clean {
                warn!(rank, pid, status, "worker process exited abnormally");
                if !world.is_halted() {
                    world.halt();
                    barrier.post_done(rank);
                }
                failures.push((rank, status));
            }
            false
        });
        if !pending.is_empty() {
            std::thread::sleep(REAP_INTERVAL);
        }
    }
    failures
}
