//! Thread substrate: one scoped thread per partition, `CondvarBarrier`.

use std::ops::Range;

use tracing::{debug, warn};
use uni_agent::WorldState;
use uni_behavior::Controller;

use crate::worker::{Coordinator, worker_loop};
use crate::{CondvarBarrier, SimError, SimObserver, SimResult, TickBarrier};

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
    let barrier = CondvarBarrier::new(partitions.len());

    std::thread::scope(|s| {
        let mut handles = Vec::with_capacity(partitions.len());
        let mut failure = None;

        for (rank, agents) in partitions.iter().cloned().enumerate() {
            debug!(rank, agents = ?agents, "starting worker thread");
            let barrier = &barrier;
            let spawned = std::thread::Builder::new()
                .name(format!("uni-worker-{rank}"))
                .spawn_scoped(s, move || {
                    worker_loop(rank, agents, world, controller, barrier, coordinator)
                });
            match spawned {
                Ok(handle) => handles.push((rank, handle)),
                Err(source) => {
                    // Release the workers already started; no tick commits
                    // because the quorum is never reached.
                    world.halt();
                    barrier.abort(rank);
                    failure = Some(SimError::Spawn { rank, source });
                    break;
                }
            }
        }

        for (rank, handle) in handles {
            if handle.join().is_err() {
                warn!(rank, "worker thread panicked");
                failure.get_or_insert(SimError::WorkerPanicked { rank });
            }
        }

        failure.map_or(Ok(()), Err)
    })
}
