//! The evading target as seen by the tactical layer.

use crate::geometry::Vec2;
use crate::state::AgentId;

/// Observation of the target for the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSample {
    pub position: Vec2,
    /// Velocity reported by the host. Perception estimates its own.
    pub velocity: Vec2,
}

/// Read-only proxy of the evading target.
pub trait TargetOracle {
    /// Current target observation, or `None` while no target exists.
    fn target(&self) -> Option<TargetSample>;
}

/// Receives agent attacks on the target.
pub trait DamageSink {
    fn apply_damage(&mut self, amount: f32, attacker: AgentId);

    fn is_alive(&self) -> bool;
}
