use crate::geometry::Vec2;
use crate::state::{AgentArchetype, BodyHandle};

/// Object pool that owns agent bodies outside the tactical layer.
pub trait AgentPool {
    /// Hands out a body at `spawn`, or `None` when the pool is exhausted.
    fn acquire(&mut self, archetype: &AgentArchetype, spawn: Vec2) -> Option<BodyHandle>;

    /// Returns a body. Called exactly once per acquired handle.
    fn release(&mut self, body: BodyHandle);
}
