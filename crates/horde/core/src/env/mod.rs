//! Interfaces to the systems around the tactical layer.
//!
//! Read-only collaborators (obstacle queries, the target proxy, RNG, policy
//! configuration) are bundled in [`HordeEnv`]. Collaborators the tick writes
//! to (navigation, the target's damage intake, the body pool) travel in
//! [`Collaborators`]. Both are passed explicitly to every update.
mod navigation;
mod obstacles;
mod pool;
mod rng;
mod target;

pub use navigation::{Kinematics, MoveRequest, Navigator};
pub use obstacles::{Collider, LayerMask, ObstacleOracle, OpenField, RayHit};
pub use pool::AgentPool;
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};
pub use target::{DamageSink, TargetOracle, TargetSample};

use crate::config::HordeConfig;
use crate::state::{AgentId, Tick};

/// Aggregates read-only oracles required by the tactical passes.
#[derive(Clone, Copy)]
pub struct HordeEnv<'a> {
    pub obstacles: &'a dyn ObstacleOracle,
    pub target: &'a dyn TargetOracle,
    pub rng: &'a dyn RngOracle,
    pub config: &'a HordeConfig,
}

impl<'a> HordeEnv<'a> {
    pub fn new(
        obstacles: &'a dyn ObstacleOracle,
        target: &'a dyn TargetOracle,
        rng: &'a dyn RngOracle,
        config: &'a HordeConfig,
    ) -> Self {
        Self {
            obstacles,
            target,
            rng,
            config,
        }
    }

    /// Uniform `[0, 1)` roll for `agent` on `tick`.
    pub fn roll(&self, tick: Tick, agent: AgentId, context: RollContext) -> f32 {
        self.rng
            .unit(compute_seed(self.config.rng_seed, tick, agent, context))
    }

    /// `true` with `probability` for `agent` on `tick`.
    pub fn chance(&self, tick: Tick, agent: AgentId, context: RollContext, probability: f32) -> bool {
        self.rng
            .chance(compute_seed(self.config.rng_seed, tick, agent, context), probability)
    }

    pub fn roll_disc(&self, tick: Tick, agent: AgentId, context: RollContext) -> crate::Vec2 {
        self.rng
            .unit_disc(compute_seed(self.config.rng_seed, tick, agent, context))
    }
}

/// Collaborators mutated during a tick.
pub struct Collaborators<'a> {
    pub navigator: &'a mut dyn Navigator,
    pub damage: &'a mut dyn DamageSink,
    pub pool: &'a mut dyn AgentPool,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        navigator: &'a mut dyn Navigator,
        damage: &'a mut dyn DamageSink,
        pool: &'a mut dyn AgentPool,
    ) -> Self {
        Self {
            navigator,
            damage,
            pool,
        }
    }
}
