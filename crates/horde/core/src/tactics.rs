//! Tactical state machine.
//!
//! Evaluated at each agent's tactical cadence. Attack range overrides the
//! role; otherwise the role and the agent's perception pick the state.

use crate::config::HordeConfig;
use crate::geometry::Vec2;
use crate::state::{AgentId, AgentRecord, HordeState, TacticalRole, TacticalState};

/// True when an ambusher should lie in wait.
///
/// The target must move faster than the ambush threshold, head towards the
/// agent (alignment of its velocity with the target→agent direction above
/// the configured dot product), and the agent must be out of sight.
pub fn should_ambush(record: &AgentRecord, target: Vec2, config: &HordeConfig) -> bool {
    if record.has_line_of_sight {
        return false;
    }
    let velocity = record.estimated_target_velocity;
    if velocity.length() < config.ambush_speed_threshold {
        return false;
    }
    let (Some(heading), Some(towards_agent)) =
        (velocity.normalized(), (record.position - target).normalized())
    else {
        return false;
    };
    heading.dot(towards_agent) > config.ambush_alignment
}

/// Computes the next state for `id` without mutating anything.
///
/// Returns `None` for a stale handle.
pub fn evaluate(
    state: &HordeState,
    id: AgentId,
    target: Vec2,
    config: &HordeConfig,
) -> Option<TacticalState> {
    let record = state.agent(id)?;

    if record.position.distance(target) <= record.archetype.attack_range {
        return Some(TacticalState::Attacking);
    }

    let role = effective_role(record);
    let next = match role {
        TacticalRole::Chaser => {
            if record.has_line_of_sight {
                TacticalState::Pursuing
            } else {
                TacticalState::Searching
            }
        }
        TacticalRole::Flanker => {
            if state.squad_size_of(id) >= 2 {
                TacticalState::Flanking
            } else {
                TacticalState::Pursuing
            }
        }
        TacticalRole::Blocker => {
            let has_routes = state
                .squad_leader_of(id)
                .and_then(|leader| state.agent(leader))
                .is_some_and(|leader| !leader.escape_routes.is_empty());
            if has_routes {
                TacticalState::Blocking
            } else {
                TacticalState::Pursuing
            }
        }
        TacticalRole::Ambusher => {
            if should_ambush(record, target, config) {
                TacticalState::Ambushing
            } else {
                TacticalState::Searching
            }
        }
        TacticalRole::Leader => TacticalState::Surrounding,
    };
    Some(next)
}

/// Leader role on a non-leader is a bookkeeping error; treat it as a chaser.
fn effective_role(record: &AgentRecord) -> TacticalRole {
    if record.role == TacticalRole::Leader && !record.is_leader {
        debug_assert!(record.is_leader, "agent {} holds the leader role without leading", record.id);
        return TacticalRole::Chaser;
    }
    record.role
}

/// Evaluates and stores the next state. Returns the new state.
pub fn update(
    state: &mut HordeState,
    id: AgentId,
    target: Vec2,
    config: &HordeConfig,
) -> Option<TacticalState> {
    let next = evaluate(state, id, target, config)?;
    let record = state.agent_mut(id)?;
    if record.state != next {
        tracing::debug!("agent {} {} -> {}", id, record.state, next);
        record.state = next;
    }
    Some(next)
}
