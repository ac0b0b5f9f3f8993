//! Configuration, scoring, episode runner, and experiments for the Sweep
//! simulation.
//!
//! This crate wires worlds and agents together: it loads the
//! configuration, drives single episodes step by step, scores them, and
//! compares agent kinds across many seeded trials.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `sweep-config.yaml` into
//!   strongly-typed structs.
//! - [`measures`] -- Performance measures ([`CleanCount`],
//!   [`CleanMoveBalance`]).
//! - [`runner`] -- The async episode loop ([`run_episode`]) and its
//!   [`StepCallback`] hook.
//! - [`experiment`] -- Multi-trial comparison of agent kinds on identical
//!   worlds ([`run_experiment`]).
//!
//! [`CleanCount`]: measures::CleanCount
//! [`CleanMoveBalance`]: measures::CleanMoveBalance
//! [`run_episode`]: runner::run_episode
//! [`StepCallback`]: runner::StepCallback
//! [`run_experiment`]: experiment::run_experiment

pub mod config;
pub mod experiment;
pub mod measures;
pub mod runner;
