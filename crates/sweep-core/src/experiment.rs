//! Experiment framework for comparing agent kinds.
//!
//! An experiment runs `trials` trials. Trial `i` builds one world from
//! seed `world.seed + i` and runs every configured agent kind on its own
//! clone of that world, so all agents face identical conditions. Agent
//! randomness comes from [`agent_seed`], a salted trial seed, so it is
//! reproducible without replaying the world generator's stream.
//!
//! Aggregates are exact [`Decimal`] means rather than floats, so reports
//! compare cleanly across runs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sweep_agents::build_agent;
use sweep_types::AgentKind;
use sweep_world::WorldError;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::runner::{
    EpisodeEndReason, EpisodeResult, RunnerError, StepCallback, log_episode_end, run_episode,
};

/// Mixed into the trial seed to give agents their own random stream.
const AGENT_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed for the agents' random sources in the trial seeded with `trial_seed`.
///
/// The world of that trial is generated from `trial_seed` itself.
pub const fn agent_seed(trial_seed: u64) -> u64 {
    trial_seed ^ AGENT_STREAM_SALT
}

/// Error type for experiment operations.
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    /// A trial world could not be built.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// An episode failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: RunnerError,
    },
}

/// Aggregated results for one agent kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    /// The policy summarized.
    pub agent_kind: AgentKind,
    /// Number of episodes aggregated.
    pub episodes: u32,
    /// Mean steps per episode.
    pub mean_steps: Decimal,
    /// Mean units of dirt removed per episode.
    pub mean_cleaned: Decimal,
    /// Mean [`CleanMoveBalance`](crate::measures::CleanMoveBalance) score.
    pub mean_balance: Decimal,
    /// Share of episodes that ended with the agent back home.
    pub returned_home_rate: Decimal,
    /// Share of episodes that ended back home with exploration finished.
    pub completed_tour_rate: Decimal,
    /// Dirt removed over dirt present, summed across trials.
    pub dirt_removed_fraction: Decimal,
}

/// Full outcome of an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// Number of trials run.
    pub trials: u32,
    /// Seed of trial 0.
    pub base_seed: u64,
    /// One summary per agent kind, in configuration order.
    pub summaries: Vec<AgentSummary>,
    /// Every episode, trial-major.
    pub episodes: Vec<EpisodeResult>,
}

impl ExperimentReport {
    /// Summary for a given agent kind, if it was part of the experiment.
    pub fn summary(&self, kind: AgentKind) -> Option<&AgentSummary> {
        self.summaries.iter().find(|s| s.agent_kind == kind)
    }
}

/// Running totals for one agent kind.
#[derive(Debug, Clone, Copy)]
struct Totals {
    kind: AgentKind,
    episodes: u32,
    steps: u64,
    cleaned: u64,
    balance: u64,
    returned_home: u32,
    completed_tours: u32,
    dirt_initial: u64,
    dirt_removed: u64,
}

impl Totals {
    const fn new(kind: AgentKind) -> Self {
        Self {
            kind,
            episodes: 0,
            steps: 0,
            cleaned: 0,
            balance: 0,
            returned_home: 0,
            completed_tours: 0,
            dirt_initial: 0,
            dirt_removed: 0,
        }
    }

    fn record(&mut self, result: &EpisodeResult, initial_dirt: usize) {
        let initial = u64::try_from(initial_dirt).unwrap_or(u64::MAX);
        let remaining = u64::try_from(result.dirt_remaining).unwrap_or(u64::MAX);
        self.episodes = self.episodes.saturating_add(1);
        self.steps = self.steps.saturating_add(result.steps);
        self.cleaned = self.cleaned.saturating_add(result.cleaned);
        self.balance = self.balance.saturating_add(result.balance_score);
        if result.end_reason == EpisodeEndReason::ReturnedHome {
            self.returned_home = self.returned_home.saturating_add(1);
        }
        if result.completed_tour() {
            self.completed_tours = self.completed_tours.saturating_add(1);
        }
        self.dirt_initial = self.dirt_initial.saturating_add(initial);
        self.dirt_removed = self
            .dirt_removed
            .saturating_add(initial.saturating_sub(remaining));
    }

    fn summarize(&self) -> AgentSummary {
        let episodes = Decimal::from(self.episodes);
        AgentSummary {
            agent_kind: self.kind,
            episodes: self.episodes,
            mean_steps: ratio(Decimal::from(self.steps), episodes),
            mean_cleaned: ratio(Decimal::from(self.cleaned), episodes),
            mean_balance: ratio(Decimal::from(self.balance), episodes),
            returned_home_rate: ratio(Decimal::from(self.returned_home), episodes),
            completed_tour_rate: ratio(Decimal::from(self.completed_tours), episodes),
            dirt_removed_fraction: if self.dirt_initial == 0 {
                Decimal::ONE
            } else {
                ratio(
                    Decimal::from(self.dirt_removed),
                    Decimal::from(self.dirt_initial),
                )
            },
        }
    }
}

/// `num / den` rounded to four places, or zero when `den` is zero.
fn ratio(num: Decimal, den: Decimal) -> Decimal {
    num.checked_div(den).unwrap_or(Decimal::ZERO).round_dp(4)
}

/// Run every configured agent kind on every trial world.
///
/// The configuration is assumed validated. `callback` sees every step of
/// every episode.
///
/// # Errors
///
/// Returns [`ExperimentError::World`] if a trial world cannot be built,
/// or [`ExperimentError::Runner`] if an episode fails.
pub async fn run_experiment(
    config: &SimulationConfig,
    callback: &mut dyn StepCallback,
) -> Result<ExperimentReport, ExperimentError> {
    let kinds = &config.experiment.agents;
    let mut totals: Vec<Totals> = kinds.iter().copied().map(Totals::new).collect();
    let mut episodes = Vec::new();

    info!(
        trials = config.experiment.trials,
        agents = ?kinds,
        base_seed = config.world.seed,
        "Experiment starting"
    );

    for trial in 0..config.experiment.trials {
        let seed = config.world.seed.wrapping_add(u64::from(trial));
        let world = config.world.build(seed)?;
        let initial_dirt = world.dirt_count();
        debug!(trial, seed, dirt = initial_dirt, obstacles = world.obstacle_count(), "trial world built");

        for tally in &mut totals {
            let mut env = world.clone();
            let mut agent = build_agent(tally.kind, env.agent_position(), agent_seed(seed));
            let result =
                run_episode(&mut env, agent.as_mut(), &config.simulation, callback).await?;
            log_episode_end(&result);
            tally.record(&result, initial_dirt);
            episodes.push(result);
        }
    }

    let report = ExperimentReport {
        trials: config.experiment.trials,
        base_seed: config.world.seed,
        summaries: totals.iter().map(Totals::summarize).collect(),
        episodes,
    };
    log_report(&report);
    Ok(report)
}

/// Log one line per agent kind with its aggregates.
pub fn log_report(report: &ExperimentReport) {
    if report.summaries.is_empty() {
        warn!("Experiment produced no summaries");
        return;
    }
    for s in &report.summaries {
        info!(
            agent = %s.agent_kind,
            episodes = s.episodes,
            mean_steps = %s.mean_steps,
            mean_cleaned = %s.mean_cleaned,
            mean_balance = %s.mean_balance,
            returned_home_rate = %s.returned_home_rate,
            completed_tour_rate = %s.completed_tour_rate,
            dirt_removed_fraction = %s.dirt_removed_fraction,
            "Agent summary"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{RngCore, SeedableRng};
    use sweep_types::Position;

    use super::*;
    use crate::runner::NoOpCallback;

    fn small_config(trials: u32) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.experiment.trials = trials;
        config.simulation.max_steps = 200;
        config
    }

    #[tokio::test]
    async fn every_agent_runs_every_trial() {
        let config = small_config(3);
        let report = run_experiment(&config, &mut NoOpCallback).await.unwrap();

        assert_eq!(report.trials, 3);
        assert_eq!(report.episodes.len(), 6);
        assert_eq!(report.summaries.len(), 2);
        for s in &report.summaries {
            assert_eq!(s.episodes, 3);
            assert!(s.dirt_removed_fraction <= Decimal::ONE);
            assert!(s.returned_home_rate <= Decimal::ONE);
            assert!(s.completed_tour_rate <= s.returned_home_rate);
        }
    }

    #[tokio::test]
    async fn agents_share_the_trial_world() {
        let config = small_config(4);
        let report = run_experiment(&config, &mut NoOpCallback).await.unwrap();

        for pair in report.episodes.chunks(2) {
            if let [reactive, model_based] = pair {
                assert_eq!(reactive.agent_kind, AgentKind::Reactive);
                assert_eq!(model_based.agent_kind, AgentKind::ModelBased);
                let initial_a = reactive.cleaned.saturating_add(u64::try_from(reactive.dirt_remaining).unwrap());
                let initial_b =
                    model_based.cleaned.saturating_add(u64::try_from(model_based.dirt_remaining).unwrap());
                assert_eq!(initial_a, initial_b);
            }
        }
    }

    #[tokio::test]
    async fn model_based_cleans_everything_and_returns_home() {
        // The start is a dead end, so the only way back is the final homing.
        let mut config = small_config(5);
        config.world.layout = Some(String::from("*#..\n....\n.*..\n...*"));
        config.experiment.agents = vec![AgentKind::ModelBased];
        let report = run_experiment(&config, &mut NoOpCallback).await.unwrap();

        let summary = report.summary(AgentKind::ModelBased).unwrap();
        assert_eq!(summary.returned_home_rate, Decimal::ONE);
        assert_eq!(summary.completed_tour_rate, Decimal::ONE);
        assert!(report.episodes.iter().all(EpisodeResult::completed_tour));
        assert_eq!(summary.dirt_removed_fraction, Decimal::ONE);
        assert_eq!(summary.mean_cleaned, Decimal::from(3));
        assert!(report.summary(AgentKind::Reactive).is_none());
    }

    #[tokio::test]
    async fn same_config_same_report() {
        let config = small_config(2);
        let a = run_experiment(&config, &mut NoOpCallback).await.unwrap();
        let b = run_experiment(&config, &mut NoOpCallback).await.unwrap();
        assert_eq!(a.summaries, b.summaries);
    }

    #[tokio::test]
    async fn bad_extra_obstacle_is_world_error() {
        let mut config = small_config(1);
        config.world.obstacles = vec![Position::new(10, 10)];
        let result = run_experiment(&config, &mut NoOpCallback).await;
        assert!(matches!(result, Err(ExperimentError::World { .. })));
    }

    #[test]
    fn agent_stream_is_separate_from_world_stream() {
        for seed in [0, 1, 42, u64::MAX] {
            let mut world_rng = SmallRng::seed_from_u64(seed);
            let mut agent_rng = SmallRng::seed_from_u64(agent_seed(seed));
            let world_draws: Vec<u64> = (0..8).map(|_| world_rng.next_u64()).collect();
            let agent_draws: Vec<u64> = (0..8).map(|_| agent_rng.next_u64()).collect();
            assert_ne!(world_draws, agent_draws, "seed {seed}");
        }
    }

    #[test]
    fn agent_seeds_stay_distinct_across_trials() {
        let seeds: std::collections::BTreeSet<u64> = (0..100).map(agent_seed).collect();
        assert_eq!(seeds.len(), 100);
        assert!((0..100).all(|s| agent_seed(s) != s));
    }

    #[test]
    fn ratio_handles_zero_denominator() {
        assert_eq!(ratio(Decimal::from(5), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(ratio(Decimal::from(1), Decimal::from(4)), Decimal::new(25, 2));
    }
}
