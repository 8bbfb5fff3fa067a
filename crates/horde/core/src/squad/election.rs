//! Leader election and squad formation.

use crate::env::{HordeEnv, RollContext};
use crate::state::{AgentId, HordeState};

/// Rolls leadership for a freshly spawned agent.
///
/// Only leader-capable archetypes roll; each succeeds with the configured
/// probability. Returns `true` if the agent became a leader.
pub fn roll_leadership(state: &mut HordeState, env: &HordeEnv<'_>, id: AgentId) -> bool {
    let tick = state.clock.tick;
    let Some(record) = state.agent_mut(id) else {
        return false;
    };
    if !record.archetype.can_be_leader {
        return false;
    }
    if !env.chance(tick, id, RollContext::LeaderElection, env.config.leader_probability) {
        return false;
    }
    record.become_leader();
    tracing::info!("agent {} ({}) became a squad leader", id, record.archetype.name);
    true
}

/// Attaches every unsquadded non-leader to the first leader in range.
///
/// Leaders are considered in table order and the first one whose
/// communication range covers the agent wins. Squads never merge, and a
/// joined agent is not re-evaluated until its leader dies.
pub fn form_squads(state: &mut HordeState) -> usize {
    let leaders: Vec<_> = state
        .agents
        .iter()
        .filter(|record| record.is_leader)
        .map(|record| (record.id, record.position, record.archetype.communication_range))
        .collect();
    if leaders.is_empty() {
        return 0;
    }

    let recruits: Vec<_> = state
        .agents
        .iter()
        .filter(|record| !record.is_squadded())
        .map(|record| (record.id, record.position))
        .collect();

    let mut joined = 0;
    for (recruit, position) in recruits {
        let leader = leaders
            .iter()
            .find(|(_, leader_position, range)| position.distance(*leader_position) <= *range)
            .map(|(leader, _, _)| *leader);
        if let Some(leader) = leader {
            if state.join_squad(recruit, leader) {
                joined += 1;
            }
        }
    }
    joined
}
