//! Headless runtime for the horde tactical layer.
//!
//! `horde-core` decides what agents do but owns no world. This crate supplies
//! one: reference collaborators ([`oracle`]), scenario files ([`scenario`])
//! and the [`Simulation`] driver that steps them together with the engine.
//! The CLI client and integration tests run sessions through it.
pub mod error;
pub mod oracle;
pub mod scenario;
pub mod simulation;

pub use error::{Result, RuntimeError};
pub use oracle::{
    BodyPool, KinematicNavigator, Obstacle, ObstacleField, ScriptedTarget, Shape, TargetAttack,
    TargetScript,
};
pub use scenario::{Scenario, SpawnSpec};
pub use simulation::{SessionTotals, Simulation, SimulationBuilder, SimulationReport};
