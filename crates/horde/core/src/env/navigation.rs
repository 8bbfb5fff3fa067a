//! Navigation provider interface.
//!
//! Path planning and steering live outside the tactical layer: it only asks
//! for a destination and reads back where the agent went.

use crate::geometry::Vec2;
use crate::state::AgentId;

/// Destination handed to navigation along with the speed to travel at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveRequest {
    pub destination: Vec2,
    pub speed: f32,
}

/// Realized motion of an agent body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
}

pub trait Navigator {
    /// Requests movement towards a destination and returns the current velocity.
    fn request_move(&mut self, agent: AgentId, request: MoveRequest) -> Vec2;

    /// Realized position and velocity, or `None` if navigation does not know
    /// the agent.
    fn kinematics(&self, agent: AgentId) -> Option<Kinematics>;
}
