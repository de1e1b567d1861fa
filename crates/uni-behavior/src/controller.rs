//! The `Controller` trait — the main extension point for user code.

use uni_core::AgentId;

use crate::{SenseContext, Speed};

/// Pluggable per-agent decision policy.
///
/// Called exactly once per agent per tick, after the agent's pixels have been
/// recomputed and before its pose is advanced.
///
/// # Thread safety
///
/// Workers call `control` for disjoint agents in parallel, so
/// implementations must be `Send + Sync`.  Per-agent memory belongs in the
/// implementation behind interior mutability indexed by `AgentId`, or is
/// simply not kept.
///
/// # Process substrate
///
/// Under `Substrate::Processes` every worker except rank 0 is a child forked
/// from a possibly multithreaded parent, and `control` runs inside that
/// child.  Only async-signal-safe work is sound there: avoid heap
/// allocation, locks (including `tracing` and `println!`), and any state
/// that another parent thread might have held at fork time.  Writes to
/// interior state stay in the child and are never seen by the parent.
///
/// Any `Fn(AgentId, &SenseContext) -> Speed` is a controller, including
/// plain functions:
///
/// ```rust
/// use uni_behavior::{Controller, SenseContext, Speed};
/// use uni_core::AgentId;
///
/// fn cruise(_: AgentId, ctx: &SenseContext<'_>) -> Speed {
///     if ctx.nearest().is_some() { Speed::new(0.0, 0.1) } else { Speed::new(0.005, 0.0) }
/// }
///
/// fn assert_controller<C: Controller>(_: &C) {}
/// assert_controller(&cruise);
/// ```
pub trait Controller: Send + Sync + 'static {
    fn control(&self, agent: AgentId, ctx: &SenseContext<'_>) -> Speed;
}

impl<F> Controller for F
where
    F: Fn(AgentId, &SenseContext<'_>) -> Speed + Send + Sync + 'static,
{
    #[inline]
    fn control(&self, agent: AgentId, ctx: &SenseContext<'_>) -> Speed {
        self(agent, ctx)
    }
}

/// Commands zero speed to every agent.  Useful in tests and benchmarks that
/// exercise sensing and scheduling only.
#[derive(Copy, Clone, Debug, Default)]
pub struct Stationary;

impl Controller for Stationary {
    #[inline]
    fn control(&self, _agent: AgentId, _ctx: &SenseContext<'_>) -> Speed {
        Speed::ZERO
    }
}
