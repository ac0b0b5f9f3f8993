//! Behavioral scenarios for the cleaning agents, driven against a real
//! `GridEnvironment`.
//!
//! Each test plays the same loop the episode runner uses: read the
//! percept, ask the agent, execute, and report the true position back.

#![allow(clippy::unwrap_used)]

use rand::RngCore;
use sweep_agents::{CleaningAgent, ModelBasedAgent, Phase, ReactiveAgent};
use sweep_types::{Action, ActionOutcome, Position};
use sweep_world::GridEnvironment;

/// Always yields zero, so every random choice picks the first candidate.
struct FirstChoice;

impl RngCore for FirstChoice {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}

/// One turn of the driver loop.
fn step(env: &mut GridEnvironment, agent: &mut dyn CleaningAgent) -> (Action, ActionOutcome) {
    let percept = env.percept();
    let action = agent.select_action(&percept);
    let outcome = env.execute(action);
    agent.sync_position(env.agent_position());
    (action, outcome)
}

/// Drive a model-based agent until it is homing and back at the origin.
fn run_until_home<R: rand::Rng + Send>(
    env: &mut GridEnvironment,
    agent: &mut ModelBasedAgent<R>,
    limit: usize,
) -> Vec<Position> {
    let mut trace = vec![env.agent_position()];
    for _ in 0..limit {
        step(env, agent);
        trace.push(env.agent_position());
        if agent.phase() == Phase::Homing && env.agent_position() == GridEnvironment::START {
            break;
        }
    }
    trace
}

fn open_grid(n: u32) -> GridEnvironment {
    GridEnvironment::empty(n, n).unwrap()
}

#[test]
fn three_by_three_visits_each_cell_once_then_returns() {
    let mut env = open_grid(3);
    let mut agent = ModelBasedAgent::new(Position::ORIGIN, FirstChoice);
    let trace = run_until_home(&mut env, &mut agent, 100);

    let expected_tour = [
        Position::new(0, 0),
        Position::new(1, 0),
        Position::new(2, 0),
        Position::new(2, 1),
        Position::new(1, 1),
        Position::new(0, 1),
        Position::new(0, 2),
        Position::new(1, 2),
        Position::new(2, 2),
    ];
    assert_eq!(trace.get(..9), Some(&expected_tour[..]));
    assert_eq!(trace.last(), Some(&Position::ORIGIN));
    // Nine tour positions, then four homing moves from (2,2).
    assert_eq!(trace.len(), 13);
    assert_eq!(agent.knowledge().visited_count(), 9);
    assert!(agent.home_path().is_empty());
}

#[test]
fn home_at_origin_only_moves_via_fallback() {
    let mut env = open_grid(3);
    let mut agent = ModelBasedAgent::new(Position::ORIGIN, FirstChoice);
    run_until_home(&mut env, &mut agent, 100);

    let (action, outcome) = step(&mut env, &mut agent);
    assert!(action.as_move().is_some());
    assert_eq!(outcome, ActionOutcome::Moved);
    assert_eq!(agent.phase(), Phase::Homing);
    // Away from the origin again, the next turn replans straight home.
    step(&mut env, &mut agent);
    assert_eq!(env.agent_position(), Position::ORIGIN);
}

#[test]
fn seeded_runs_cover_the_grid_and_home_within_diameter() {
    for seed in 0..30 {
        let mut env = open_grid(5);
        let mut agent = ModelBasedAgent::seeded(Position::ORIGIN, seed);
        let mut homing_started = None;
        for turn in 0..500_usize {
            step(&mut env, &mut agent);
            if homing_started.is_none() && agent.phase() == Phase::Homing {
                homing_started = Some((turn, env.agent_position()));
            }
            if agent.phase() == Phase::Homing && env.agent_position() == Position::ORIGIN {
                let (start_turn, from) = homing_started.unwrap();
                let taken = turn.saturating_sub(start_turn);
                let distance = usize::try_from(from.manhattan_distance(Position::ORIGIN)).unwrap();
                assert!(taken <= 8, "seed {seed}: homing took {taken} steps");
                assert!(taken <= distance, "seed {seed}: homing was not shortest");
                break;
            }
        }
        assert_eq!(agent.knowledge().visited_count(), 25, "seed {seed}");
        assert_eq!(env.agent_position(), Position::ORIGIN, "seed {seed}");
    }
}

#[test]
fn cleans_every_dirty_cell_on_the_way() {
    let mut env = GridEnvironment::from_layout(
        "
        *.*
        .#*
        *..
        ",
    )
    .unwrap();
    let mut agent = ModelBasedAgent::seeded(Position::ORIGIN, 17);
    run_until_home(&mut env, &mut agent, 200);
    assert!(env.is_clean());
    assert_eq!(agent.knowledge().visited_count(), 8);
    assert!(agent.knowledge().is_obstacle(Position::new(1, 1)));
}

#[test]
fn dirty_start_is_cleaned_and_recorded() {
    let mut env = GridEnvironment::from_layout("*.\n..").unwrap();
    let mut agent = ModelBasedAgent::seeded(Position::ORIGIN, 2);
    let (action, outcome) = step(&mut env, &mut agent);
    assert_eq!(action, Action::Clean);
    assert_eq!(outcome, ActionOutcome::Cleaned);
    assert!(agent.knowledge().is_visited(Position::ORIGIN));
    assert_eq!(agent.phase(), Phase::Exploring);
}

#[test]
fn enclosed_origin_cleans_forever() {
    let mut env = GridEnvironment::from_layout(".#\n#.").unwrap();
    let mut agent = ModelBasedAgent::seeded(Position::ORIGIN, 8);
    for _ in 0..25 {
        let (action, outcome) = step(&mut env, &mut agent);
        assert_eq!(action, Action::Clean);
        assert_eq!(outcome, ActionOutcome::NothingToClean);
    }
    assert_eq!(env.agent_position(), Position::ORIGIN);
}

#[test]
fn knowledge_is_monotonic_and_consistent() {
    let mut env = GridEnvironment::from_layout(
        "
        ..#..
        .#...
        ...#.
        #....
        ",
    )
    .unwrap();
    let mut agent = ModelBasedAgent::seeded(Position::ORIGIN, 41);
    let mut previous = agent.knowledge().clone();
    for _ in 0..120 {
        step(&mut env, &mut agent);
        let current = agent.knowledge();
        for (pos, before) in previous.iter() {
            let after = current.record(pos).unwrap();
            assert!(!before.visited || after.visited, "{pos} lost visited");
            assert!(!before.obstacle || after.obstacle, "{pos} lost obstacle");
        }
        for (pos, record) in current.iter() {
            assert!(!record.visited || !record.obstacle, "{pos} is contradictory");
            if record.visited {
                assert!(!env.is_obstacle(pos), "{pos} visited but blocked in the world");
            }
        }
        previous = current.clone();
    }
}

#[test]
fn frontier_moves_are_preferred_while_exploring() {
    let mut env = open_grid(4);
    let mut agent = ModelBasedAgent::seeded(Position::ORIGIN, 6);
    for _ in 0..60 {
        let percept = env.percept();
        let here = env.agent_position();
        let exploring = agent.phase() == Phase::Exploring;
        let action = agent.select_action(&percept);
        // Destinations are only marked visited on arrival, so the frontier
        // read after the call is the one the decision saw.
        let frontier: Vec<_> = percept
            .possible_moves
            .iter()
            .copied()
            .filter(|&mv| agent.knowledge().is_free_and_unvisited(here.apply(mv)))
            .collect();
        if exploring && !frontier.is_empty() {
            let mv = action.as_move().unwrap();
            assert!(frontier.contains(&mv), "{mv} from {here} skipped the frontier");
        }
        env.execute(action);
        agent.sync_position(env.agent_position());
    }
}

#[test]
fn dirty_percept_always_cleans() {
    let mut env = GridEnvironment::from_layout("...\n...\n...").unwrap();
    let mut agent = ModelBasedAgent::seeded(Position::ORIGIN, 12);
    for _ in 0..40 {
        let here = env.agent_position();
        env.set_dirty(here, true).unwrap();
        let (action, outcome) = step(&mut env, &mut agent);
        assert_eq!(action, Action::Clean);
        assert_eq!(outcome, ActionOutcome::Cleaned);
        // Move on so the dirty cell changes.
        step(&mut env, &mut agent);
    }
}

#[test]
fn reactive_agent_stays_in_bounds() {
    let mut env = GridEnvironment::from_layout("*#.\n..*\n#..").unwrap();
    let mut agent = ReactiveAgent::seeded(99);
    let mut bumps = 0_u32;
    for _ in 0..300 {
        let (_, outcome) = step(&mut env, &mut agent);
        if outcome == ActionOutcome::Bumped {
            bumps = bumps.saturating_add(1);
        }
        let pos = env.agent_position();
        assert!(env.in_bounds(pos));
        assert!(!env.is_obstacle(pos));
    }
    assert!(bumps > 0, "a random walker on a small grid must bump");
    assert!(env.is_clean());
}
