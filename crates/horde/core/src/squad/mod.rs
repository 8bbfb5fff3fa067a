//! Squad coordination: election, escape analysis, roles and information flow.
//!
//! Only a squad's leader mutates the squad's member list and escape routes;
//! members read them. Everything here runs synchronously inside one tick.

mod election;
mod escape;
mod roles;
mod sharing;

pub use election::{form_squads, roll_leadership};
pub use escape::{analyze_escape_routes, find_escape_routes};
pub use roles::{Candidate, SquadSituation, assign_roles, survey_squad};
pub use sharing::{communicate, listen, share_with_squad};

use crate::config::HordeConfig;
use crate::geometry::Vec2;
use crate::state::{AgentId, HordeState, TacticalRole};

/// Outcome of one coordination pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Coordination {
    pub situation: SquadSituation,
    pub assignments: Vec<(AgentId, TacticalRole)>,
    /// Members that received the leader's target knowledge.
    pub shared: usize,
}

/// Drops member handles that no longer resolve to a live agent.
pub fn prune_members(state: &mut HordeState, leader: AgentId) -> usize {
    let live: Vec<AgentId> = state.squad_roster(leader).into_iter().skip(1).collect();
    let Some(record) = state.agent_mut(leader) else {
        return 0;
    };
    let before = record.squad_members.len();
    record.squad_members = live;
    let pruned = before - record.squad_members.len();
    if pruned > 0 {
        tracing::warn!("leader {} dropped {} stale squad member(s)", leader, pruned);
    }
    pruned
}

/// Runs role assignment and information sharing for `leader`'s squad.
///
/// Returns `None` when `leader` is not a live leader or has no live members.
pub fn coordinate(
    state: &mut HordeState,
    leader: AgentId,
    target: Vec2,
    config: &HordeConfig,
) -> Option<Coordination> {
    prune_members(state, leader);
    let (pool, situation) = survey_squad(state, leader, target)?;
    if pool.is_empty() {
        return None;
    }

    let assignments = assign_roles(&pool, &situation, config);
    debug_assert_eq!(assignments.len(), pool.len(), "every member needs one role");

    for (member, role) in &assignments {
        if let Some(record) = state.agent_mut(*member) {
            record.role = *role;
        }
    }
    tracing::debug!(
        "leader {} assigned {} roles ({} with sight, avg distance {:.2})",
        leader,
        assignments.len(),
        situation.with_line_of_sight,
        situation.average_distance
    );

    let shared = share_with_squad(state, leader);
    Some(Coordination {
        situation,
        assignments,
        shared,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::state::{AgentArchetype, AgentRecord, BodyHandle};

    fn spawn(state: &mut HordeState, position: Vec2, sees: bool) -> AgentId {
        let archetype = Arc::new(AgentArchetype::default());
        let id = state.agents.insert_with(|id| {
            AgentRecord::spawn(id, BodyHandle(id.index), archetype, position, 0.0)
        });
        state.agent_mut(id).unwrap().has_line_of_sight = sees;
        id
    }

    #[test]
    fn stale_members_are_pruned_before_assignment() {
        let mut state = HordeState::new();
        let leader = spawn(&mut state, Vec2::ZERO, true);
        let alive = spawn(&mut state, Vec2::new(1.0, 0.0), true);
        let doomed = spawn(&mut state, Vec2::new(2.0, 0.0), true);
        state.agent_mut(leader).unwrap().become_leader();
        state.join_squad(alive, leader);
        state.join_squad(doomed, leader);
        state.agents.remove(doomed);

        let outcome = coordinate(&mut state, leader, Vec2::new(10.0, 0.0), &HordeConfig::default())
            .expect("squad has a live member");
        assert_eq!(outcome.assignments, vec![(alive, TacticalRole::Chaser)]);
        assert_eq!(state.agent(leader).unwrap().squad_members, vec![alive]);
        assert_eq!(state.agent(leader).unwrap().role, TacticalRole::Leader);
        assert!(state.audit().is_empty());
    }

    #[test]
    fn lone_leader_has_nothing_to_coordinate() {
        let mut state = HordeState::new();
        let leader = spawn(&mut state, Vec2::ZERO, true);
        state.agent_mut(leader).unwrap().become_leader();
        assert!(coordinate(&mut state, leader, Vec2::ZERO, &HordeConfig::default()).is_none());
    }
}
