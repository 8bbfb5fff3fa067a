//! Reference collaborators for headless sessions.
//!
//! `horde-core` reaches the world only through its collaborator traits. These
//! implementations back them with plain data so a [`crate::Simulation`] can
//! run without a game engine: static obstacle shapes, straight-line
//! navigation, a bounded body pool and a waypoint-scripted target.
mod navigator;
mod obstacles;
mod pool;
mod target;

pub use navigator::KinematicNavigator;
pub use obstacles::{Obstacle, ObstacleField, Shape};
pub use pool::BodyPool;
pub use target::{ScriptedTarget, TargetAttack, TargetScript};
