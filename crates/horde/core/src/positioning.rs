//! Destination selection per tactical state.
//!
//! Each state maps to one positioning function. Every function degrades to
//! the predicted target position when the data it needs is missing.

use crate::env::{HordeEnv, LayerMask, ObstacleOracle, RollContext};
use crate::geometry::Vec2;
use crate::state::{AgentId, AgentRecord, HordeState, TacticalState};

/// Where `id` should head this pathing tick, or `None` to stay put.
///
/// `target` is the target's current exact position.
pub fn destination(
    state: &HordeState,
    env: &HordeEnv<'_>,
    id: AgentId,
    target: Vec2,
) -> Option<Vec2> {
    let record = state.agent(id)?;
    let predicted = record.predicted_target.unwrap_or(target);

    let point = match record.state {
        TacticalState::Idle => return None,
        TacticalState::Pursuing => predicted,
        TacticalState::Attacking => target,
        TacticalState::Searching => record.last_known_target.unwrap_or(predicted),
        TacticalState::Flanking => flanking_position(state, env, record, target),
        TacticalState::Surrounding => surrounding_position(state, record, predicted),
        TacticalState::Blocking => blocking_position(state, record, predicted),
        TacticalState::Ambushing => ambush_position(env, record, predicted),
    };
    Some(point)
}

/// Which way a flanker swings around the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlankSide {
    CounterClockwise,
    Clockwise,
}

impl FlankSide {
    fn sign(self) -> f32 {
        match self {
            Self::CounterClockwise => 1.0,
            Self::Clockwise => -1.0,
        }
    }
}

/// Side chosen from the squad's centroid, so mates on opposite sides of the
/// squad axis swing opposite ways.
///
/// Agents collinear with the axis split by id parity. Unsquadded agents roll.
pub fn flank_side(
    state: &HordeState,
    env: &HordeEnv<'_>,
    record: &AgentRecord,
    target: Vec2,
    to_target: Vec2,
) -> FlankSide {
    let centroid = state.squad_leader_of(record.id).and_then(|leader| {
        let roster = state.squad_roster(leader);
        if roster.len() < 2 {
            return None;
        }
        Vec2::centroid(
            roster
                .iter()
                .filter_map(|id| state.agent(*id).map(|mate| mate.position)),
        )
    });

    if let Some(centroid) = centroid {
        let axis = (target - centroid).normalize_or_zero();
        let cross = axis.cross(to_target);
        if cross.abs() > 1e-4 {
            return if cross > 0.0 {
                FlankSide::CounterClockwise
            } else {
                FlankSide::Clockwise
            };
        }
        return if record.id.index % 2 == 0 {
            FlankSide::CounterClockwise
        } else {
            FlankSide::Clockwise
        };
    }

    if env.roll(state.clock.tick, record.id, RollContext::FlankSide) > 0.5 {
        FlankSide::CounterClockwise
    } else {
        FlankSide::Clockwise
    }
}

fn flanking_position(
    state: &HordeState,
    env: &HordeEnv<'_>,
    record: &AgentRecord,
    target: Vec2,
) -> Vec2 {
    let Some(to_target) = record.position.direction_to(target) else {
        return target;
    };
    let side = flank_side(state, env, record, target, to_target);
    let swing = to_target.rotated_degrees(record.archetype.flanking_angle * side.sign());
    target + swing * record.archetype.surround_distance
}

/// Formation slot on a circle around the predicted target. The leader holds
/// slot 0; members follow in squad order.
fn surrounding_position(state: &HordeState, record: &AgentRecord, predicted: Vec2) -> Vec2 {
    let Some(leader) = state.squad_leader_of(record.id) else {
        return predicted;
    };
    let roster = state.squad_roster(leader);
    // Need at least two members besides the leader to form a ring.
    if roster.len() < 3 {
        return predicted;
    }
    let Some(slot) = roster.iter().position(|id| *id == record.id) else {
        return predicted;
    };

    let angle = slot as f32 * (360.0 / roster.len() as f32);
    predicted + Vec2::RIGHT.rotated_degrees(angle) * record.archetype.surround_distance
}

/// Nearest escape point no squad-mate is already blocking.
fn blocking_position(state: &HordeState, record: &AgentRecord, predicted: Vec2) -> Vec2 {
    let Some(leader) = state.squad_leader_of(record.id) else {
        return predicted;
    };
    let Some(routes) = state.agent(leader).map(|leader| &leader.escape_routes) else {
        return predicted;
    };

    let claimed: Vec<Vec2> = state
        .squad_roster(leader)
        .into_iter()
        .filter(|id| *id != record.id)
        .filter_map(|id| state.agent(id))
        .filter(|mate| mate.state == TacticalState::Blocking)
        .filter_map(|mate| mate.destination)
        .collect();

    routes
        .iter()
        .copied()
        .filter(|route| !claimed.contains(route))
        .min_by(|a, b| {
            record
                .position
                .distance(*a)
                .total_cmp(&record.position.distance(*b))
        })
        .unwrap_or(predicted)
}

/// Point ahead of the target's path, tucked behind nearby cover if any.
fn ambush_position(env: &HordeEnv<'_>, record: &AgentRecord, predicted: Vec2) -> Vec2 {
    let config = env.config;
    let heading = record.estimated_target_velocity.normalize_or_zero();
    let ambush = predicted + heading * config.ambush_lead_distance;
    hide_behind_cover(env.obstacles, ambush, config.ambush_cover_radius, config.ambush_cover_offset)
}

/// Moves `point` just short of the nearest cover collider within `radius`.
pub fn hide_behind_cover(
    obstacles: &dyn ObstacleOracle,
    point: Vec2,
    radius: f32,
    offset: f32,
) -> Vec2 {
    let nearest = obstacles
        .overlap_circle(point, radius, LayerMask::COVER)
        .into_iter()
        .map(|collider| collider.position)
        .min_by(|a, b| point.distance(*a).total_cmp(&point.distance(*b)));

    let Some(cover) = nearest else {
        return point;
    };
    match point.direction_to(cover) {
        Some(hide) => cover - hide * offset,
        None => point,
    }
}
