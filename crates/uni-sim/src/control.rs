//! Pause, resume and stop requests from outside the tick loop.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct ControlState {
    paused:  bool,
    stopped: bool,
}

/// A cloneable handle for steering a running simulation.
///
/// Requests take effect at the next tick boundary: the coordinator checks the
/// handle at the end of every serial phase and, while paused, blocks there
/// with every other worker parked at the barrier.  A handle can be armed
/// before the run starts (e.g. `pause()` to stop after the first tick).
///
/// The handle lives in the coordinating process.  With the process
/// substrate only rank 0 coordinates, so the handle is fully functional
/// there too.
#[derive(Clone, Debug, Default)]
pub struct RunControl {
    inner: Arc<(Mutex<ControlState>, Condvar)>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.update(|s| s.paused = true);
    }

    pub fn resume(&self) {
        self.update(|s| s.paused = false);
    }

    /// Flip the pause state, as a viewer's mouse click does.
    /// Returns the new state.
    pub fn toggle_pause(&self) -> bool {
        let mut paused = false;
        self.update(|s| {
            s.paused = !s.paused;
            paused = s.paused;
        });
        paused
    }

    /// Ask the run to end at the next tick boundary.  Also releases a paused
    /// run.  Irreversible.
    pub fn stop(&self) {
        self.update(|s| s.stopped = true);
    }

    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Tick-boundary check run by the coordinator: block while paused, then
    /// report whether a stop was requested.
    pub(crate) fn checkpoint(&self) -> bool {
        let cvar = &self.inner.1;
        let mut state = self.lock();
        while state.paused && !state.stopped {
            state = cvar.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        state.stopped
    }

    fn update(&self, f: impl FnOnce(&mut ControlState)) {
        f(&mut self.lock());
        self.inner.1.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, ControlState> {
        self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
