//! Integration tests for uni-sim.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use uni_agent::WorldState;
use uni_behavior::{SenseContext, Speed, Stationary};
use uni_core::{AgentId, Pose, Tick, UniConfig};

use crate::{HaltReason, NoopObserver, RunControl, SimBuilder, SimObserver, Substrate};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(population: usize, tick_cap: u64, workers: usize) -> UniConfig {
    UniConfig {
        population_size: population,
        tick_cap,
        pacing_ms: 0,
        workers,
        seed: 7,
        ..UniConfig::default()
    }
}

/// Turns toward whatever it sees, cruises otherwise.  The next pose depends
/// on the neighbours, so any cross-partition visibility bug shows up in the
/// final poses.
fn reactive(agent: AgentId, ctx: &SenseContext<'_>) -> Speed {
    match ctx.nearest() {
        Some((bin, _)) if bin < ctx.pixels.len() / 2 => Speed::new(0.002, -0.1),
        Some(_) => Speed::new(0.002, 0.1),
        None => Speed::new(0.01, if agent.0 % 2 == 0 { 0.02 } else { -0.02 }),
    }
}

#[derive(Default)]
struct Recorder {
    starts: usize,
    ticks:  Vec<u64>,
    ends:   Vec<(Tick, HaltReason)>,
}

impl SimObserver for Recorder {
    fn on_run_start(&mut self, _world: &WorldState) {
        self.starts += 1;
    }

    fn on_tick_end(&mut self, tick: Tick, world: &WorldState) {
        assert_eq!(world.tick(), tick);
        self.ticks.push(tick.0);
    }

    fn on_sim_end(&mut self, tick: Tick, reason: HaltReason, _world: &WorldState) {
        self.ends.push((tick, reason));
    }
}

fn final_poses_stepped(population: usize, ticks: u64) -> Vec<Pose> {
    let mut sim = SimBuilder::new(test_config(population, 0, 1), reactive).build().unwrap();
    for _ in 0..ticks {
        sim.step().unwrap();
    }
    sim.world().poses().collect()
}

// ── partition ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod partition_tests {
    use crate::partition;

    #[test]
    fn remainder_goes_to_leading_workers() {
        assert_eq!(partition(10, 3), vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn single_worker_takes_everything() {
        assert_eq!(partition(5, 1), vec![0..5]);
    }

    #[test]
    fn more_workers_than_agents_leaves_empty_tails() {
        let parts = partition(2, 4);
        assert_eq!(parts, vec![0..1, 1..2, 2..2, 2..2]);
    }

    #[test]
    fn ranges_are_contiguous_and_cover_population() {
        for population in [0, 1, 7, 100, 1_001] {
            for workers in 1..9 {
                let parts = partition(population, workers);
                assert_eq!(parts.len(), workers);
                let mut next = 0;
                for r in &parts {
                    assert_eq!(r.start, next);
                    next = r.end;
                }
                assert_eq!(next, population);
                let max = parts.iter().map(|r| r.len()).max().unwrap();
                let min = parts.iter().map(|r| r.len()).min().unwrap();
                assert!(max - min <= 1);
            }
        }
    }
}

// ── Barriers ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod barrier_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::{Arrival, CondvarBarrier, TickBarrier};

    /// Every participant runs `rounds` generations; the leader of each
    /// publishes the round number, which followers must see after `arrive`.
    fn exercise<B: TickBarrier>(barrier: &B, rounds: usize) -> usize {
        let leaders = AtomicUsize::new(0);
        let published = AtomicUsize::new(usize::MAX);

        std::thread::scope(|s| {
            for rank in 0..barrier.parties() {
                let (leaders, published) = (&leaders, &published);
                s.spawn(move || {
                    for round in 0..rounds {
                        if barrier.arrive(rank) == Arrival::Leader {
                            leaders.fetch_add(1, Ordering::Relaxed);
                            published.store(round, Ordering::Relaxed);
                            barrier.release(rank);
                        }
                        assert_eq!(published.load(Ordering::Relaxed), round);
                        // Second barrier so nobody publishes the next round
                        // before everyone has checked this one.
                        if barrier.arrive(rank) == Arrival::Leader {
                            barrier.release(rank);
                        }
                    }
                });
            }
        });
        leaders.into_inner()
    }

    #[test]
    fn condvar_barrier_has_one_leader_per_generation() {
        let barrier = CondvarBarrier::new(4);
        assert_eq!(exercise(&barrier, 200), 200);
    }

    #[test]
    fn single_party_always_leads() {
        let barrier = CondvarBarrier::new(1);
        for _ in 0..3 {
            assert_eq!(barrier.arrive(0), Arrival::Leader);
            barrier.release(0);
        }
    }

    #[test]
    fn abort_releases_waiters() {
        let barrier = CondvarBarrier::new(3);
        std::thread::scope(|s| {
            let waiter = s.spawn(|| barrier.arrive(1));
            std::thread::sleep(std::time::Duration::from_millis(20));
            barrier.abort(0);
            assert_eq!(waiter.join().unwrap(), Arrival::Follower);
        });
        // Broken for good: later arrivals do not block.
        assert_eq!(barrier.arrive(2), Arrival::Follower);
    }

    #[cfg(unix)]
    #[test]
    fn semaphore_barrier_rank_zero_leads_every_generation() {
        let barrier = crate::SemaphoreBarrier::new(3).unwrap();
        assert_eq!(exercise(&barrier, 100), 100);
    }

    #[cfg(unix)]
    #[test]
    fn semaphore_barrier_single_party() {
        let barrier = crate::SemaphoreBarrier::new(1).unwrap();
        assert_eq!(barrier.arrive(0), Arrival::Leader);
        barrier.release(0);
    }
}

// ── RunControl ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod control_tests {
    use crate::RunControl;

    #[test]
    fn toggle_flips_and_reports() {
        let c = RunControl::new();
        assert!(!c.is_paused());
        assert!(c.toggle_pause());
        assert!(c.is_paused());
        assert!(!c.toggle_pause());
        assert!(!c.is_paused());
    }

    #[test]
    fn clones_share_state() {
        let a = RunControl::new();
        let b = a.clone();
        b.stop();
        assert!(a.is_stopped());
        assert!(a.checkpoint());
    }

    #[test]
    fn stop_releases_a_paused_checkpoint() {
        let c = RunControl::new();
        c.pause();
        std::thread::scope(|s| {
            let waiter = s.spawn(|| c.checkpoint());
            std::thread::sleep(std::time::Duration::from_millis(20));
            c.stop();
            assert!(waiter.join().unwrap());
        });
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use uni_agent::AgentError;

    use super::*;
    use crate::SimError;

    #[test]
    fn builds_with_defaults() {
        let sim = SimBuilder::new(test_config(10, 5, 3), Stationary).build().unwrap();
        assert_eq!(sim.world().population(), 10);
        assert_eq!(sim.tick(), Tick::ZERO);
        assert_eq!(sim.substrate(), Substrate::Threads);
        assert_eq!(sim.partitions(), &[0..4, 4..7, 7..10]);
    }

    #[test]
    fn explicit_poses_are_used() {
        let poses = vec![Pose::new(0.1, 0.2, 0.3), Pose::new(0.4, 0.5, -0.6)];
        let sim = SimBuilder::new(test_config(2, 5, 1), Stationary)
            .poses(poses.clone())
            .build()
            .unwrap();
        assert_eq!(sim.world().poses().collect::<Vec<_>>(), poses);
    }

    #[test]
    fn pose_count_mismatch_errors() {
        let result = SimBuilder::new(test_config(3, 5, 1), Stationary)
            .poses(vec![Pose::default(); 2])
            .build();
        assert!(matches!(
            result,
            Err(SimError::World(AgentError::PopulationMismatch { expected: 3, got: 2 }))
        ));
    }

    #[test]
    fn invalid_config_errors() {
        let result = SimBuilder::new(test_config(3, 5, 0), Stationary).build();
        assert!(matches!(result, Err(SimError::World(_))));
    }

    #[test]
    fn external_control_handle_is_shared() {
        let control = RunControl::new();
        let sim = SimBuilder::new(test_config(3, 5, 1), Stationary)
            .control(control.clone())
            .build()
            .unwrap();
        control.pause();
        assert!(sim.control().is_paused());
    }
}

// ── step ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod step_tests {
    use super::*;

    #[test]
    fn step_advances_tick_and_moves_agents() {
        let mut sim = SimBuilder::new(test_config(5, 0, 1), reactive).build().unwrap();
        let before: Vec<Pose> = sim.world().poses().collect();
        assert_eq!(sim.step().unwrap(), Tick(1));
        assert_eq!(sim.step().unwrap(), Tick(2));
        let after: Vec<Pose> = sim.world().poses().collect();
        assert_ne!(before, after);
    }

    #[test]
    fn stationary_agents_stay_put() {
        let mut sim = SimBuilder::new(test_config(5, 0, 1), Stationary).build().unwrap();
        let before: Vec<Pose> = sim.world().poses().collect();
        sim.step().unwrap();
        let after: Vec<Pose> = sim.world().poses().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn step_after_finished_run_reports_halted() {
        let mut sim = SimBuilder::new(test_config(3, 2, 1), Stationary).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert!(matches!(sim.step(), Err(crate::SimError::Halted)));
        assert_eq!(sim.tick(), Tick(2));
    }
}

// ── run ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use std::time::Duration;

    use super::*;
    use crate::SimError;

    fn run_to_cap(substrate: Substrate, workers: usize) {
        let mut sim = SimBuilder::new(test_config(3, 5, workers), Stationary)
            .substrate(substrate)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let summary = sim.run(&mut rec).unwrap();

        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.reason, HaltReason::TickCap);
        assert_eq!(sim.tick(), Tick(5));
        assert!(sim.world().is_halted());
        assert_eq!(rec.starts, 1);
        assert_eq!(rec.ticks, vec![1, 2, 3, 4, 5]);
        assert_eq!(rec.ends, vec![(Tick(5), HaltReason::TickCap)]);
    }

    #[test]
    fn threads_run_exactly_to_cap() {
        run_to_cap(Substrate::Threads, 1);
        run_to_cap(Substrate::Threads, 2);
    }

    #[cfg(unix)]
    #[test]
    fn processes_run_exactly_to_cap() {
        run_to_cap(Substrate::Processes, 1);
        run_to_cap(Substrate::Processes, 2);
    }

    #[test]
    fn more_workers_than_agents() {
        let mut sim = SimBuilder::new(test_config(2, 3, 4), Stationary).build().unwrap();
        let summary = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(summary.ticks, 3);
    }

    #[test]
    fn threaded_run_matches_sequential_steps() {
        let expected = final_poses_stepped(40, 20);
        let mut sim = SimBuilder::new(test_config(40, 20, 4), reactive).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.world().poses().collect::<Vec<_>>(), expected);
    }

    #[cfg(unix)]
    #[test]
    fn process_run_matches_sequential_steps() {
        let expected = final_poses_stepped(40, 20);
        let mut sim = SimBuilder::new(test_config(40, 20, 3), reactive)
            .substrate(Substrate::Processes)
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.tick(), Tick(20));
        assert_eq!(sim.world().poses().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn second_run_reports_halted() {
        let mut sim = SimBuilder::new(test_config(3, 2, 1), Stationary).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert!(matches!(sim.run(&mut NoopObserver), Err(SimError::Halted)));
        assert_eq!(sim.tick(), Tick(2));
    }

    #[test]
    fn cap_already_reached_runs_no_ticks() {
        let mut sim = SimBuilder::new(test_config(3, 2, 1), Stationary).build().unwrap();
        sim.step().unwrap();
        sim.step().unwrap();
        let mut rec = Recorder::default();
        let summary = sim.run(&mut rec).unwrap();
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.reason, HaltReason::TickCap);
        assert!(rec.ticks.is_empty());
        assert_eq!(rec.ends, vec![(Tick(2), HaltReason::TickCap)]);
        assert!(sim.world().is_halted());
    }

    /// Stops the run from inside the serial phase once `at` ticks commit.
    struct StopAt {
        control: RunControl,
        at:      u64,
        seen:    Arc<AtomicU64>,
    }

    impl SimObserver for StopAt {
        fn on_tick_end(&mut self, tick: Tick, _world: &WorldState) {
            self.seen.store(tick.0, Ordering::Relaxed);
            if tick.0 == self.at {
                self.control.stop();
            }
        }
    }

    #[test]
    fn stop_ends_an_uncapped_run() {
        let mut sim = SimBuilder::new(test_config(6, 0, 2), Stationary).build().unwrap();
        let seen = Arc::new(AtomicU64::new(0));
        let mut obs = StopAt { control: sim.control(), at: 3, seen: Arc::clone(&seen) };
        let summary = sim.run(&mut obs).unwrap();
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.reason, HaltReason::Stopped);
        assert_eq!(seen.load(Ordering::Relaxed), 3);
    }

    #[cfg(unix)]
    #[test]
    fn stop_ends_a_process_run() {
        let mut sim = SimBuilder::new(test_config(6, 0, 3), Stationary)
            .substrate(Substrate::Processes)
            .build()
            .unwrap();
        let seen = Arc::new(AtomicU64::new(0));
        let mut obs = StopAt { control: sim.control(), at: 4, seen: Arc::clone(&seen) };
        let summary = sim.run(&mut obs).unwrap();
        assert_eq!(summary.ticks, 4);
        assert_eq!(summary.reason, HaltReason::Stopped);
    }

    #[test]
    fn paused_run_waits_at_tick_boundary() {
        let control = RunControl::new();
        control.pause();
        let mut sim = SimBuilder::new(test_config(4, 0, 2), Stationary)
            .control(control.clone())
            .build()
            .unwrap();

        std::thread::scope(|s| {
            let remote = control.clone();
            s.spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                assert!(remote.is_paused());
                remote.stop();
            });
            let summary = sim.run(&mut NoopObserver).unwrap();
            // The first tick commits, then the run blocks until stopped.
            assert_eq!(summary.ticks, 1);
            assert_eq!(summary.reason, HaltReason::Stopped);
        });
    }

    fn paused_run_resumes_to_cap(substrate: Substrate) {
        let control = RunControl::new();
        control.pause();
        let mut sim = SimBuilder::new(test_config(4, 5, 2), Stationary)
            .substrate(substrate)
            .control(control.clone())
            .build()
            .unwrap();

        let t0 = std::time::Instant::now();
        std::thread::scope(|s| {
            let remote = control.clone();
            s.spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                assert!(remote.is_paused());
                remote.resume();
            });
            let mut rec = Recorder::default();
            let summary = sim.run(&mut rec).unwrap();
            assert_eq!(summary.ticks, 5);
            assert_eq!(summary.reason, HaltReason::TickCap);
            assert_eq!(rec.ticks, vec![1, 2, 3, 4, 5]);
        });
        assert!(t0.elapsed() >= Duration::from_millis(50));
        assert!(!control.is_paused());
        assert_eq!(sim.tick(), Tick(5));
    }

    #[test]
    fn resumed_thread_run_reaches_cap() {
        paused_run_resumes_to_cap(Substrate::Threads);
    }

    #[cfg(unix)]
    #[test]
    fn resumed_process_run_reaches_cap() {
        paused_run_resumes_to_cap(Substrate::Processes);
    }

    /// Panics for the last agent once the first tick has committed.
    fn fails_on_second_tick(agent: AgentId, ctx: &SenseContext<'_>) -> Speed {
        if agent == AgentId(5) && ctx.tick >= Tick(1) {
            panic!("controller failed for {agent}");
        }
        Speed::ZERO
    }

    #[test]
    fn panicking_thread_worker_fails_the_run() {
        let mut sim = SimBuilder::new(test_config(6, 50, 3), fails_on_second_tick).build().unwrap();
        let err = sim.run(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::WorkerPanicked { rank: 2 }), "{err}");
        assert!(sim.world().is_halted());
        assert_eq!(sim.tick(), Tick(1));
        assert!(matches!(sim.step(), Err(SimError::Halted)));
    }

    #[cfg(unix)]
    #[test]
    fn panicking_child_process_fails_the_run() {
        let mut sim = SimBuilder::new(test_config(6, 50, 3), fails_on_second_tick)
            .substrate(Substrate::Processes)
            .build()
            .unwrap();
        let err = sim.run(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::WorkerFailed { rank: 2, .. }), "{err}");
        assert!(sim.world().is_halted());
        assert_eq!(sim.tick(), Tick(1));
    }

    /// Kills the calling process from inside the compute phase, so the
    /// worker never reaches the barrier.
    #[cfg(unix)]
    fn exits_on_second_tick(agent: AgentId, ctx: &SenseContext<'_>) -> Speed {
        if agent == AgentId(5) && ctx.tick >= Tick(1) {
            // SAFETY: only reached in a forked child of the process substrate.
            unsafe { libc::_exit(3) }
        }
        Speed::ZERO
    }

    #[cfg(unix)]
    #[test]
    fn child_dying_before_the_barrier_fails_the_run() {
        let mut sim = SimBuilder::new(test_config(6, 50, 3), exits_on_second_tick)
            .substrate(Substrate::Processes)
            .build()
            .unwrap();
        match sim.run(&mut NoopObserver) {
            Err(SimError::WorkerFailed { rank, status }) => {
                assert_eq!(rank, 2);
                assert!(libc::WIFEXITED(status));
                assert_eq!(libc::WEXITSTATUS(status), 3);
            }
            other => panic!("expected a failed worker, got {other:?}"),
        }
        assert!(sim.world().is_halted());
        assert_eq!(sim.tick(), Tick(1));
    }

    #[test]
    fn pacing_delays_ticks() {
        let mut config = test_config(2, 3, 1);
        config.pacing_ms = 10;
        let mut sim = SimBuilder::new(config, Stationary).build().unwrap();
        let t0 = std::time::Instant::now();
        sim.run(&mut NoopObserver).unwrap();
        assert!(t0.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn paired_observers_both_see_hooks() {
        let mut sim = SimBuilder::new(test_config(3, 2, 1), Stationary).build().unwrap();
        let mut pair = (Recorder::default(), Recorder::default());
        sim.run(&mut pair).unwrap();
        assert_eq!(pair.0.ticks, vec![1, 2]);
        assert_eq!(pair.1.ticks, vec![1, 2]);
    }
}
