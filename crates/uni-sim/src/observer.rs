//! Simulation observer trait for progress reporting and data collection.

use std::fmt;

use uni_agent::WorldState;
use uni_core::Tick;

/// Why a run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HaltReason {
    /// The configured tick cap was reached.
    TickCap,
    /// [`RunControl::stop`](crate::RunControl::stop) was called.
    Stopped,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::TickCap => f.write_str("tick cap reached"),
            HaltReason::Stopped => f.write_str("stopped"),
        }
    }
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// Every hook runs inside the serial phase (or before the first tick), on
/// whichever participant is coordinating, while all other workers are parked
/// at the barrier.  `world` therefore always shows committed state.  Hooks
/// must not block for long: the whole population waits on them.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, _world: &WorldState) {
///         if tick.is_multiple_of(self.interval) {
///             eprintln!("{tick}");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once before the first tick of a run.
    fn on_run_start(&mut self, _world: &WorldState) {}

    /// Called after every serial phase.  `tick` is the number of committed
    /// ticks, starting at 1.
    fn on_tick_end(&mut self, _tick: Tick, _world: &WorldState) {}

    /// Called once when the run halts, after the final `on_tick_end`.
    fn on_sim_end(&mut self, _tick: Tick, _reason: HaltReason, _world: &WorldState) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

impl<O: SimObserver + ?Sized> SimObserver for &mut O {
    fn on_run_start(&mut self, world: &WorldState) {
        (**self).on_run_start(world);
    }

    fn on_tick_end(&mut self, tick: Tick, world: &WorldState) {
        (**self).on_tick_end(tick, world);
    }

    fn on_sim_end(&mut self, tick: Tick, reason: HaltReason, world: &WorldState) {
        (**self).on_sim_end(tick, reason, world);
    }
}

/// Observers compose as pairs; hooks run left to right.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn on_run_start(&mut self, world: &WorldState) {
        self.0.on_run_start(world);
        self.1.on_run_start(world);
    }

    fn on_tick_end(&mut self, tick: Tick, world: &WorldState) {
        self.0.on_tick_end(tick, world);
        self.1.on_tick_end(tick, world);
    }

    fn on_sim_end(&mut self, tick: Tick, reason: HaltReason, world: &WorldState) {
        self.0.on_sim_end(tick, reason, world);
        self.1.on_sim_end(tick, reason, world);
    }
}
