//! The `Sim` struct and its run loop.

use std::fmt;
use std::ops::Range;
use std::time::Duration;

use tracing::info;
use uni_agent::WorldState;
use uni_behavior::Controller;
use uni_core::{Tick, UniConfig};

use crate::worker::Coordinator;
use crate::{HaltReason, RunControl, SimError, SimObserver, SimResult};

/// How workers share the world.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Substrate {
    /// Threads of the calling process; counter + condvar barrier.
    #[default]
    Threads,
    /// Forked child processes over a `MAP_SHARED` region; semaphore-pair
    /// barrier.  Unix only.  The controller runs in the children; see
    /// [`Controller`] for what it may do there.
    Processes,
}

impl fmt::Display for Substrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Substrate::Threads   => f.write_str("threads"),
            Substrate::Processes => f.write_str("processes"),
        }
    }
}

/// What a finished run did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks committed by this run.
    pub ticks:  u64,
    pub reason: HaltReason,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<C>` owns the world and drives the barrier-synchronized tick loop:
///
/// 1. **Compute** (parallel, one worker per fixed partition): for each agent,
///    sense, call the [`Controller`], move into the next buffer.
/// 2. **Serial** (one coordinator): swap buffers, rebuild the grid, advance
///    the tick, notify the observer, pace, then halt on the tick cap or a
///    stop request, or block while paused.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<C: Controller> {
    /// Run parameters (tick cap, pacing, worker count, …).
    pub config: UniConfig,

    pub(crate) world:      WorldState,
    pub(crate) controller: C,
    pub(crate) control:    RunControl,
    pub(crate) substrate:  Substrate,
    pub(crate) partitions: Vec<Range<usize>>,
}

impl<C: Controller> Sim<C> {
    // ── Accessors ─────────────────────────────────────────────────────────

    /// Committed state.
    #[inline]
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    #[inline]
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// A handle for pausing, resuming or stopping [`run`](Self::run) from
    /// another thread.
    #[inline]
    pub fn control(&self) -> RunControl {
        self.control.clone()
    }

    #[inline]
    pub fn substrate(&self) -> Substrate {
        self.substrate
    }

    /// The fixed agent range of each worker, by rank.
    #[inline]
    pub fn partitions(&self) -> &[Range<usize>] {
        &self.partitions
    }

    /// Ticks committed so far.
    #[inline]
    pub fn tick(&self) -> Tick {
        self.world.tick()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run one full tick on the calling thread and return the new tick
    /// count.
    ///
    /// Ignores the tick cap, pacing, run control and observers.  With the
    /// `parallel` Cargo feature the compute phase runs on Rayon's pool.
    ///
    /// Like [`run`](Self::run), returns [`SimError::Halted`] once the world
    /// has halted.
    pub fn step(&mut self) -> SimResult<Tick> {
        if self.world.is_halted() {
            return Err(SimError::Halted);
        }

        let part = self.world.split_mut();

        #[cfg(not(feature = "parallel"))]
        crate::worker::compute_partition(part, &self.controller);

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            use uni_core::AgentId;

            let uni_agent::Partition { view, agents, next, pixels } = part;
            let pc = view.params.pixel_count;
            let controller = &self.controller;
            next.par_iter_mut()
                .zip(pixels.par_chunks_mut(pc))
                .enumerate()
                .for_each(|(i, (slot, row))| {
                    let agent = AgentId((agents.start + i) as u32);
                    crate::worker::compute_agent(agent, &view, controller, row, slot);
                });
        }

        Ok(self.world.commit_mut())
    }

    /// Run until the tick cap is reached or [`RunControl::stop`] is called.
    ///
    /// Spawns `config.workers` workers on the configured [`Substrate`] and
    /// calls observer hooks from whichever worker coordinates each tick.
    /// Use [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    ///
    /// A run that halts leaves the world halted; calling `run` again returns
    /// [`SimError::Halted`].
    pub fn run<O: SimObserver + Send>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        if self.world.is_halted() {
            return Err(SimError::Halted);
        }

        let start = self.world.tick();
        info!(
            substrate  = %self.substrate,
            workers    = self.partitions.len(),
            population = self.world.population(),
            tick_cap   = self.config.tick_cap,
            "run starting"
        );
        observer.on_run_start(&self.world);

        if self.config.cap_reached(start.0) {
            observer.on_sim_end(start, HaltReason::TickCap, &self.world);
            self.world.halt();
            return Ok(RunSummary { ticks: 0, reason: HaltReason::TickCap });
        }

        let world = &self.world;
        let coordinator = Coordinator::new(
            world,
            observer,
            &self.control,
            self.config.tick_cap,
            Duration::from_millis(self.config.pacing_ms),
        );

        let result = match self.substrate {
            Substrate::Threads => {
                crate::threads::run(world, &self.controller, &self.partitions, &coordinator)
            }
            #[cfg(unix)]
            Substrate::Processes => {
                crate::process::run(world, &self.controller, &self.partitions, &coordinator)
            }
            #[cfg(not(unix))]
            Substrate::Processes => Err(SimError::Unsupported("the process substrate")),
        };
        let outcome = coordinator.outcome();
        result?;

        let reason = outcome.ok_or(SimError::WorkerPanicked { rank: 0 })?;
        let ticks = self.world.tick() - start;
        info!(ticks, %reason, "run finished");
        Ok(RunSummary { ticks, reason })
    }
}
