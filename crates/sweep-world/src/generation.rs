//! Random world generation.
//!
//! Every cell independently becomes dirty with probability
//! `dirt_probability` and blocked with probability `obstacle_probability`.
//! Two guarantees are then enforced so an episode can start at all:
//!
//! 1. The start cell is never an obstacle.
//! 2. At least one in-grid neighbor of the start cell is free. If all of
//!    them were blocked, one is chosen at random and cleared.
//!
//! The generator takes any [`Rng`], so the same seed always yields the
//! same world. The experiment driver relies on this to give every agent
//! an identical world per trial.

use rand::Rng;
use rand::seq::IndexedRandom;
use sweep_types::{Move, Position};
use tracing::debug;

use crate::environment::GridEnvironment;
use crate::error::WorldError;

impl GridEnvironment {
    /// Generate a random world.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] for a zero-sized grid and
    /// [`WorldError::InvalidProbability`] if either probability is outside
    /// `[0, 1]`.
    pub fn generate(
        width: u32,
        height: u32,
        dirt_probability: f64,
        obstacle_probability: f64,
        rng: &mut impl Rng,
    ) -> Result<Self, WorldError> {
        validate_probability("dirt_probability", dirt_probability)?;
        validate_probability("obstacle_probability", obstacle_probability)?;

        let mut env = Self::empty(width, height)?;
        let positions: Vec<Position> = env.positions().collect();

        // Dirt layer first, then obstacle layer.
        for &pos in &positions {
            if rng.random_bool(dirt_probability) {
                env.set_dirty(pos, true)?;
            }
        }
        for &pos in &positions {
            if pos != Self::START && rng.random_bool(obstacle_probability) {
                env.set_obstacle(pos, true)?;
            }
        }

        ensure_start_not_blocked(&mut env, rng)?;

        debug!(
            width,
            height,
            dirt = env.dirt_count(),
            obstacles = env.obstacle_count(),
            "world generated"
        );
        Ok(env)
    }
}

/// Reject probabilities outside `[0, 1]`, including NaN.
///
/// # Errors
///
/// Returns [`WorldError::InvalidProbability`] naming the offending value.
pub fn validate_probability(name: &'static str, value: f64) -> Result<(), WorldError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(WorldError::InvalidProbability { name, value })
    }
}

/// Free one random in-grid neighbor of the start cell if all are blocked.
fn ensure_start_not_blocked(env: &mut GridEnvironment, rng: &mut impl Rng) -> Result<(), WorldError> {
    let neighbors: Vec<Position> = Move::ALL
        .into_iter()
        .map(|mv| GridEnvironment::START.apply(mv))
        .filter(|&p| env.in_bounds(p))
        .collect();

    if neighbors.iter().any(|&p| !env.is_obstacle(p)) {
        return Ok(());
    }
    if let Some(&freed) = neighbors.choose(rng) {
        env.set_obstacle(freed, false)?;
        debug!(%freed, "start was enclosed, neighbor cleared");
    }
    Ok(())
}
