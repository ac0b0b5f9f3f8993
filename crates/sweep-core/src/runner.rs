//! Episode loop runner.
//!
//! This module provides [`run_episode`], the async function that drives
//! one agent through one world until an end condition is met:
//!
//! - **Returned home**: the agent left the start cell and came back
//! - **All clean**: no dirt remains (only with `stop_when_clean`)
//! - **Step limit**: `max_steps` actions have been executed
//!
//! Each step reads the percept, asks the agent for an action, executes
//! it, reports the true position back to the agent, and updates the
//! performance measures.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sweep_agents::CleaningAgent;
use sweep_types::{Action, ActionOutcome, AgentKind, Position, RunId};
use sweep_world::{GridEnvironment, WorldError};
use tracing::{debug, info, warn};

use crate::config::SimulationBoundsConfig;
use crate::measures::{CleanCount, CleanMoveBalance, PerformanceMeasure};

/// Errors that can occur during an episode.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The world cannot host an episode.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Why an episode stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeEndReason {
    /// The agent left the start cell and is back on it.
    ReturnedHome,
    /// No dirt remains and `stop_when_clean` is set.
    AllClean,
    /// The step limit was hit.
    MaxStepsReached,
}

impl fmt::Display for EpisodeEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReturnedHome => "returned_home",
            Self::AllClean => "all_clean",
            Self::MaxStepsReached => "max_steps_reached",
        })
    }
}

/// What happened in a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based step number.
    pub step: u64,
    /// The action the agent chose.
    pub action: Action,
    /// What the world did with it.
    pub outcome: ActionOutcome,
    /// Agent position before the action.
    pub from: Position,
    /// Agent position after the action.
    pub to: Position,
}

/// Result of an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeResult {
    /// Unique identifier of this episode.
    pub run_id: RunId,
    /// Which policy ran.
    pub agent_kind: AgentKind,
    /// Why the episode stopped.
    pub end_reason: EpisodeEndReason,
    /// Whether the agent had finished exploring when the episode stopped.
    pub exploration_complete: bool,
    /// Actions executed.
    pub steps: u64,
    /// Units of dirt removed.
    pub cleaned: u64,
    /// Successful moves.
    pub moves: u64,
    /// Moves refused by a wall or the grid edge.
    pub bumps: u64,
    /// Final [`CleanCount`] score.
    pub clean_count_score: u64,
    /// Final [`CleanMoveBalance`] score.
    pub balance_score: u64,
    /// Dirty cells left when the episode stopped.
    pub dirt_remaining: usize,
    /// Wall-clock start.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end.
    pub finished_at: DateTime<Utc>,
}

impl EpisodeResult {
    /// Back home with nothing left to explore.
    ///
    /// A return to the start in the middle of exploration ends the episode
    /// as [`EpisodeEndReason::ReturnedHome`] too, but is not a full tour.
    pub fn completed_tour(&self) -> bool {
        self.end_reason == EpisodeEndReason::ReturnedHome && self.exploration_complete
    }
}

/// Callback invoked after each executed step.
///
/// Implementations can use this to render the world, record traces, and
/// so on. The callback receives the step record and the world as it is
/// after the step.
pub trait StepCallback: Send {
    /// Called after a step completes.
    fn on_step(&mut self, record: &StepRecord, env: &GridEnvironment);
}

/// A no-op step callback.
pub struct NoOpCallback;

impl StepCallback for NoOpCallback {
    fn on_step(&mut self, _record: &StepRecord, _env: &GridEnvironment) {}
}

/// Run one episode until a termination condition is met.
///
/// The start cell is wherever the agent stands when the episode begins.
///
/// # Arguments
///
/// * `env` - The world, mutated in place (dirt removed, agent moved)
/// * `agent` - The policy under test
/// * `bounds` - Step limit, pacing, and the `stop_when_clean` switch
/// * `callback` - Called after each step
///
/// # Errors
///
/// Returns [`RunnerError::World`] if the agent does not start on a
/// passable cell.
pub async fn run_episode(
    env: &mut GridEnvironment,
    agent: &mut dyn CleaningAgent,
    bounds: &SimulationBoundsConfig,
    callback: &mut dyn StepCallback,
) -> Result<EpisodeResult, RunnerError> {
    let origin = env.agent_position();
    if !env.is_passable(origin) {
        return Err(WorldError::StartBlocked(origin).into());
    }

    let run_id = RunId::new();
    let agent_kind = agent.kind();
    let started_at = Utc::now();
    let mut clean_count = CleanCount::new();
    let mut balance = CleanMoveBalance::new();
    let mut bumps: u64 = 0;
    let mut steps: u64 = 0;
    let mut left_origin = false;

    info!(
        %run_id,
        agent = %agent_kind,
        width = env.width(),
        height = env.height(),
        dirt = env.dirt_count(),
        max_steps = bounds.max_steps,
        "Episode starting"
    );

    let end_reason = loop {
        // --- Check end conditions (before step) ---
        if left_origin && env.agent_position() == origin {
            break EpisodeEndReason::ReturnedHome;
        }
        if bounds.stop_when_clean && env.is_clean() {
            break EpisodeEndReason::AllClean;
        }
        if steps >= bounds.max_steps {
            break EpisodeEndReason::MaxStepsReached;
        }

        // --- Decide and act ---
        let percept = env.percept();
        let action = agent.select_action(&percept);
        let from = env.agent_position();
        let outcome = env.execute(action);
        let to = env.agent_position();
        agent.sync_position(to);

        steps = steps.saturating_add(1);
        clean_count.update(outcome);
        balance.update(outcome);
        if outcome == ActionOutcome::Bumped {
            bumps = bumps.saturating_add(1);
        }
        if to != origin {
            left_origin = true;
        }

        debug!(step = steps, %action, ?outcome, %from, %to, "step");

        // --- Notify callback ---
        let record = StepRecord {
            step: steps,
            action,
            outcome,
            from,
            to,
        };
        callback.on_step(&record, env);

        // --- Sleep for step interval ---
        if bounds.step_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(bounds.step_interval_ms)).await;
        }
    };

    for measure in [&clean_count as &dyn PerformanceMeasure, &balance] {
        debug!(%run_id, measure = measure.name(), score = measure.score(), "final score");
    }

    Ok(EpisodeResult {
        run_id,
        agent_kind,
        end_reason,
        exploration_complete: agent.exploration_complete(),
        steps,
        cleaned: balance.cleaned(),
        moves: balance.moves(),
        bumps,
        clean_count_score: clean_count.score(),
        balance_score: balance.score(),
        dirt_remaining: env.dirt_count(),
        started_at,
        finished_at: Utc::now(),
    })
}

/// Log the end of an episode.
pub fn log_episode_end(result: &EpisodeResult) {
    info!(
        run_id = %result.run_id,
        agent = %result.agent_kind,
        reason = %result.end_reason,
        completed_tour = result.completed_tour(),
        steps = result.steps,
        cleaned = result.cleaned,
        moves = result.moves,
        bumps = result.bumps,
        clean_count_score = result.clean_count_score,
        balance_score = result.balance_score,
        dirt_remaining = result.dirt_remaining,
        elapsed_ms = result
            .finished_at
            .signed_duration_since(result.started_at)
            .num_milliseconds(),
        "Episode ended"
    );

    if result.end_reason == EpisodeEndReason::ReturnedHome && !result.exploration_complete {
        info!(run_id = %result.run_id, "Returned to the start before exploration finished");
    }
    if result.steps == 0 {
        warn!(run_id = %result.run_id, "Episode ended with no steps executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sweep_agents::{ModelBasedAgent, ReactiveAgent};
    use sweep_types::{Move, Percept};

    use super::*;

    fn bounds(max_steps: u64) -> SimulationBoundsConfig {
        SimulationBoundsConfig {
            max_steps,
            step_interval_ms: 0,
            stop_when_clean: false,
        }
    }

    #[tokio::test]
    async fn model_based_returns_home() {
        let mut env = GridEnvironment::from_layout("*.*\n.#.\n*..").unwrap();
        let mut agent = ModelBasedAgent::seeded(Position::ORIGIN, 3);
        let mut cb = NoOpCallback;

        let result = run_episode(&mut env, &mut agent, &bounds(500), &mut cb)
            .await
            .unwrap();

        assert_eq!(result.end_reason, EpisodeEndReason::ReturnedHome);
        assert_eq!(result.agent_kind, AgentKind::ModelBased);
        assert_eq!(result.cleaned, 3);
        assert_eq!(result.dirt_remaining, 0);
        assert_eq!(result.clean_count_score, 3);
        assert_eq!(result.bumps, 0);
        assert_eq!(result.steps, result.cleaned.saturating_add(result.moves));
        assert_eq!(env.agent_position(), Position::ORIGIN);
        assert!(result.exploration_complete);
        assert!(result.completed_tour());
    }

    /// Steps right once, then straight back, without ever finishing.
    struct StepOutAndBack {
        stepped_out: bool,
    }

    impl CleaningAgent for StepOutAndBack {
        fn kind(&self) -> AgentKind {
            AgentKind::ModelBased
        }

        fn select_action(&mut self, _percept: &Percept) -> Action {
            let mv = if self.stepped_out { Move::Left } else { Move::Right };
            self.stepped_out = true;
            Action::Move(mv)
        }

        fn exploration_complete(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn early_return_home_is_not_a_completed_tour() {
        let mut env = GridEnvironment::from_layout("...").unwrap();
        let mut agent = StepOutAndBack { stepped_out: false };

        let result = run_episode(&mut env, &mut agent, &bounds(50), &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, EpisodeEndReason::ReturnedHome);
        assert_eq!(result.steps, 2);
        assert!(!result.exploration_complete);
        assert!(!result.completed_tour());
    }

    #[tokio::test]
    async fn bounded_by_max_steps() {
        let mut env = GridEnvironment::from_layout(".#\n#.").unwrap();
        let mut agent = ModelBasedAgent::seeded(Position::ORIGIN, 0);
        let mut cb = NoOpCallback;

        let result = run_episode(&mut env, &mut agent, &bounds(5), &mut cb)
            .await
            .unwrap();

        assert_eq!(result.end_reason, EpisodeEndReason::MaxStepsReached);
        assert_eq!(result.steps, 5);
        assert_eq!(result.cleaned, 0);
        assert_eq!(result.clean_count_score, 0);
    }

    #[tokio::test]
    async fn stop_when_clean() {
        let mut env = GridEnvironment::from_layout("*..\n...").unwrap();
        let mut agent = ReactiveAgent::seeded(1);
        let mut cb = NoOpCallback;
        let bounds = SimulationBoundsConfig {
            stop_when_clean: true,
            ..bounds(100)
        };

        let result = run_episode(&mut env, &mut agent, &bounds, &mut cb)
            .await
            .unwrap();

        assert_eq!(result.end_reason, EpisodeEndReason::AllClean);
        assert_eq!(result.steps, 1);
        assert_eq!(result.cleaned, 1);
    }

    #[tokio::test]
    async fn clean_world_with_stop_when_clean_runs_no_steps() {
        let mut env = GridEnvironment::empty(3, 3).unwrap();
        let mut agent = ReactiveAgent::seeded(1);
        let mut cb = NoOpCallback;
        let bounds = SimulationBoundsConfig {
            stop_when_clean: true,
            ..bounds(100)
        };

        let result = run_episode(&mut env, &mut agent, &bounds, &mut cb)
            .await
            .unwrap();

        assert_eq!(result.end_reason, EpisodeEndReason::AllClean);
        assert_eq!(result.steps, 0);
    }

    #[tokio::test]
    async fn step_callback_is_called() {
        struct CountCallback {
            count: u64,
            last: Option<StepRecord>,
        }
        impl StepCallback for CountCallback {
            fn on_step(&mut self, record: &StepRecord, env: &GridEnvironment) {
                self.count = self.count.saturating_add(1);
                assert_eq!(record.to, env.agent_position());
                self.last = Some(*record);
            }
        }

        let mut env = GridEnvironment::from_layout(".#\n#.").unwrap();
        let mut agent = ModelBasedAgent::seeded(Position::ORIGIN, 0);
        let mut cb = CountCallback {
            count: 0,
            last: None,
        };

        let _ = run_episode(&mut env, &mut agent, &bounds(3), &mut cb)
            .await
            .unwrap();

        assert_eq!(cb.count, 3);
        assert_eq!(cb.last.map(|r| r.step), Some(3));
    }

    #[tokio::test]
    async fn reactive_agent_bumps_are_counted() {
        let mut env = GridEnvironment::empty(1, 1).unwrap();
        let mut agent = ReactiveAgent::seeded(8);
        let mut cb = NoOpCallback;

        let result = run_episode(&mut env, &mut agent, &bounds(20), &mut cb)
            .await
            .unwrap();

        assert_eq!(result.end_reason, EpisodeEndReason::MaxStepsReached);
        assert_eq!(result.bumps, 20);
        assert_eq!(result.moves, 0);
    }

    #[tokio::test]
    async fn result_serializes_with_snake_case_reason() {
        let mut env = GridEnvironment::from_layout("*").unwrap();
        let mut agent = ReactiveAgent::seeded(0);
        let result = run_episode(&mut env, &mut agent, &bounds(1), &mut NoOpCallback)
            .await
            .unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["end_reason"], "max_steps_reached");
        assert_eq!(json["agent_kind"], "reactive");
        assert_eq!(json["cleaned"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn step_interval_paces_the_loop() {
        let mut env = GridEnvironment::empty(1, 1).unwrap();
        let mut agent = ReactiveAgent::seeded(2);
        let mut cb = NoOpCallback;
        let bounds = SimulationBoundsConfig {
            step_interval_ms: 1000,
            ..bounds(3)
        };

        let before = tokio::time::Instant::now();
        let result = run_episode(&mut env, &mut agent, &bounds, &mut cb)
            .await
            .unwrap();

        assert_eq!(result.steps, 3);
        assert!(before.elapsed() >= tokio::time::Duration::from_secs(3));
    }
}
