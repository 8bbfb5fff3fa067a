//! Per-agent perception: line of sight, target velocity and aim prediction.

use crate::env::{LayerMask, ObstacleOracle};
use crate::geometry::Vec2;
use crate::state::{AgentArchetype, AgentRecord};

/// Target positions and frame time available to perception this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetObservation {
    pub current: Vec2,
    /// Target position one tick ago, if it was observed.
    pub previous: Option<Vec2>,
    pub dt: f32,
}

/// True when no sight-blocking geometry lies strictly between `from` and `to`.
pub fn line_of_sight(obstacles: &dyn ObstacleOracle, from: Vec2, to: Vec2) -> bool {
    obstacles.is_clear(from, to, LayerMask::SIGHT_BLOCKERS)
}

/// Finite-difference velocity, or `None` when it cannot be computed this tick.
pub fn estimate_velocity(current: Vec2, previous: Option<Vec2>, dt: f32) -> Option<Vec2> {
    let previous = previous?;
    if dt <= f32::EPSILON || !dt.is_finite() {
        return None;
    }
    let velocity = (current - previous) / dt;
    velocity.is_finite().then_some(velocity)
}

/// Extrapolated aim point.
///
/// Lead time is `prediction_time × intelligence_level`, so a zero-intelligence
/// agent always aims at the current position.
pub fn predict_position(current: Vec2, velocity: Vec2, archetype: &AgentArchetype) -> Vec2 {
    let lead = archetype.prediction_time.max(0.0) * archetype.intelligence_level.clamp(0.0, 1.0);
    current + velocity * lead
}

/// Refreshes the perception fields of `record`.
///
/// Velocity keeps its previous estimate when it cannot be recomputed. The
/// last known position only advances while the target is in sight.
pub fn refresh(
    record: &mut AgentRecord,
    observation: &TargetObservation,
    obstacles: &dyn ObstacleOracle,
) {
    record.has_line_of_sight = line_of_sight(obstacles, record.position, observation.current);

    if let Some(velocity) =
        estimate_velocity(observation.current, observation.previous, observation.dt)
    {
        record.estimated_target_velocity = velocity;
    }

    record.predicted_target = Some(predict_position(
        observation.current,
        record.estimated_target_velocity,
        &record.archetype,
    ));

    if record.has_line_of_sight {
        record.last_known_target = Some(observation.current);
    }
}
