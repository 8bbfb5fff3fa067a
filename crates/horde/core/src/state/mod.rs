//! Canonical simulation state owned by the host session.
//!
//! [`HordeState`] is the explicit context object: it owns every agent record,
//! the simulation clock and the target observation history. Components
//! receive it by reference instead of looking each other up.

mod agent;
mod archetype;
mod table;
mod types;

pub use agent::{AgentRecord, EscapeRoutes, StallMonitor, TacticalRole, TacticalState};
pub use archetype::{AgentArchetype, AgentArchetypeBuilder};
pub use table::AgentTable;
pub use types::{AgentId, BodyHandle, SimClock, Tick};

use crate::error::InvariantViolation;
use crate::geometry::Vec2;

/// Target positions observed on the current and previous tick.
///
/// `previous` is only set when the target was observed on the tick right
/// before `current`, so a gap never turns into a velocity sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TargetTrack {
    pub current: Option<Vec2>,
    pub previous: Option<Vec2>,
}

impl TargetTrack {
    /// Shifts the history and records this tick's observation.
    pub fn observe(&mut self, position: Option<Vec2>) {
        self.previous = self.current;
        self.current = position;
    }
}

/// All mutable state of the tactical layer.
#[derive(Clone, Debug, Default)]
pub struct HordeState {
    pub agents: AgentTable,
    pub clock: SimClock,
    pub target: TargetTrack,
}

impl HordeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentRecord> {
        self.agents.get(id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut AgentRecord> {
        self.agents.get_mut(id)
    }

    /// Leader of the squad `id` belongs to (itself for a leader).
    pub fn squad_leader_of(&self, id: AgentId) -> Option<AgentId> {
        let record = self.agents.get(id)?;
        if record.is_leader {
            return Some(id);
        }
        record
            .squad_leader
            .filter(|leader| self.agents.get(*leader).is_some_and(|l| l.is_leader))
    }

    /// Live members of the squad led by `leader`, leader first, in squad order.
    ///
    /// Stale member handles are skipped.
    pub fn squad_roster(&self, leader: AgentId) -> Vec<AgentId> {
        let Some(record) = self.agents.get(leader) else {
            return Vec::new();
        };
        let mut roster = Vec::with_capacity(record.squad_members.len() + 1);
        roster.push(leader);
        roster.extend(
            record
                .squad_members
                .iter()
                .copied()
                .filter(|member| self.agents.contains(*member)),
        );
        roster
    }

    /// Number of agents in the squad `id` belongs to, including the leader.
    ///
    /// Returns 1 for an unsquadded agent.
    pub fn squad_size_of(&self, id: AgentId) -> usize {
        match self.squad_leader_of(id) {
            Some(leader) => self.squad_roster(leader).len(),
            None => 1,
        }
    }

    /// Adds `member` to `leader`'s squad.
    ///
    /// Returns `false` (and changes nothing) when the join would break the
    /// depth-1 squad structure.
    pub fn join_squad(&mut self, member: AgentId, leader: AgentId) -> bool {
        if member == leader {
            return false;
        }
        let leader_ok = self.agents.get(leader).is_some_and(|l| l.is_leader);
        let member_ok = self
            .agents
            .get(member)
            .is_some_and(|m| !m.is_leader && m.squad_leader.is_none());
        if !leader_ok || !member_ok {
            return false;
        }

        if let Some(record) = self.agents.get_mut(member) {
            record.squad_leader = Some(leader);
        }
        if let Some(record) = self.agents.get_mut(leader) {
            if !record.squad_members.contains(&member) {
                record.squad_members.push(member);
            }
        }
        tracing::debug!("agent {} joined squad of {}", member, leader);
        true
    }

    /// Drops `member` from whichever squad it belongs to.
    pub fn leave_squad(&mut self, member: AgentId) {
        let leader = self.agents.get(member).and_then(|m| m.squad_leader);
        if let Some(leader) = leader {
            if let Some(record) = self.agents.get_mut(leader) {
                record.squad_members.retain(|id| *id != member);
            }
        }
        if let Some(record) = self.agents.get_mut(member) {
            record.squad_leader = None;
        }
    }

    /// Checks every squad invariant and reports each violation found.
    pub fn audit(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        let mut owners: Vec<(AgentId, AgentId)> = Vec::new();

        for record in self.agents.iter() {
            if !record.is_leader && !record.squad_members.is_empty() {
                violations.push(InvariantViolation::MembersWithoutLeadership(record.id));
            }
            for &member in &record.squad_members {
                if member == record.id {
                    violations.push(InvariantViolation::SelfMembership(record.id));
                    continue;
                }
                if let Some(&(_, first)) = owners.iter().find(|(m, _)| *m == member) {
                    violations.push(InvariantViolation::DuplicateMembership {
                        member,
                        first,
                        second: record.id,
                    });
                    continue;
                }
                owners.push((member, record.id));

                match self.agents.get(member) {
                    None => violations.push(InvariantViolation::DanglingMember {
                        leader: record.id,
                        member,
                    }),
                    Some(m) if m.is_leader && !m.squad_members.is_empty() => {
                        violations.push(InvariantViolation::NestedSquad {
                            leader: record.id,
                            member,
                        })
                    }
                    Some(m) if m.squad_leader != Some(record.id) => {
                        violations.push(InvariantViolation::AsymmetricMembership {
                            leader: record.id,
                            member,
                            actual: m.squad_leader,
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn spawn(state: &mut HordeState, leader: bool) -> AgentId {
        let archetype = Arc::new(AgentArchetype::default());
        let id = state
            .agents
            .insert_with(|id| AgentRecord::spawn(id, BodyHandle(id.index), archetype, Vec2::ZERO, 0.0));
        if leader {
            state.agent_mut(id).unwrap().become_leader();
        }
        id
    }

    #[test]
    fn join_rejects_nesting_and_double_membership() {
        let mut state = HordeState::new();
        let leader = spawn(&mut state, true);
        let other_leader = spawn(&mut state, true);
        let member = spawn(&mut state, false);

        assert!(state.join_squad(member, leader));
        assert!(!state.join_squad(member, other_leader));
        assert!(!state.join_squad(other_leader, leader));
        assert!(!state.join_squad(leader, leader));

        assert_eq!(state.squad_roster(leader), vec![leader, member]);
        assert_eq!(state.squad_size_of(member), 2);
        assert_eq!(state.squad_size_of(other_leader), 1);
        assert!(state.audit().is_empty());
    }

    #[test]
    fn audit_reports_broken_bookkeeping() {
        let mut state = HordeState::new();
        let leader = spawn(&mut state, true);
        let member = spawn(&mut state, false);
        state.agent_mut(leader).unwrap().squad_members.push(member);
        state.agent_mut(leader).unwrap().squad_members.push(leader);

        let violations = state.audit();
        assert!(violations.contains(&InvariantViolation::AsymmetricMembership {
            leader,
            member,
            actual: None,
        }));
        assert!(violations.contains(&InvariantViolation::SelfMembership(leader)));
    }

    #[test]
    fn leaving_clears_both_sides() {
        let mut state = HordeState::new();
        let leader = spawn(&mut state, true);
        let member = spawn(&mut state, false);
        state.join_squad(member, leader);

        state.leave_squad(member);
        assert!(state.agent(leader).unwrap().squad_members.is_empty());
        assert_eq!(state.agent(member).unwrap().squad_leader, None);
    }

    #[test]
    fn target_track_forgets_history_across_gaps() {
        let mut track = TargetTrack::default();
        track.observe(Some(Vec2::new(1.0, 0.0)));
        track.observe(Some(Vec2::new(1.5, 0.0)));
        assert_eq!(track.previous, Some(Vec2::new(1.0, 0.0)));

        track.observe(None);
        track.observe(Some(Vec2::new(2.0, 0.0)));
        assert_eq!(track.previous, None);
        assert_eq!(track.current, Some(Vec2::new(2.0, 0.0)));

        track.observe(Some(Vec2::new(2.5, 0.0)));
        assert_eq!(track.previous, Some(Vec2::new(2.0, 0.0)));
    }
}
