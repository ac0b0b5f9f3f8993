//! Step callback that dumps the world as ASCII at `trace` level.
//!
//! Run with `RUST_LOG=sweep_engine=trace` to watch every episode unfold
//! frame by frame. At any coarser level nothing is rendered.

use sweep_core::runner::{StepCallback, StepRecord};
use sweep_world::GridEnvironment;
use tracing::trace;

/// Renders the world after every step.
#[derive(Debug, Default)]
pub struct TraceCallback {
    steps_seen: u64,
}

impl TraceCallback {
    /// Create a callback that has seen no steps yet.
    pub const fn new() -> Self {
        Self { steps_seen: 0 }
    }

    /// Total steps observed across all episodes.
    pub const fn steps_seen(&self) -> u64 {
        self.steps_seen
    }
}

impl StepCallback for TraceCallback {
    fn on_step(&mut self, record: &StepRecord, env: &GridEnvironment) {
        self.steps_seen = self.steps_seen.saturating_add(1);
        trace!(
            step = record.step,
            action = %record.action,
            outcome = ?record.outcome,
            "world after step\n{}",
            env.render()
        );
    }
}
