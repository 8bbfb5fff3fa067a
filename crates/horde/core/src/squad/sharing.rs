//! Target information flowing between agents.

use crate::state::{AgentId, HordeState};

/// Copies the leader's target knowledge onto every member lacking sight.
///
/// Nothing is shared unless the leader currently sees the target. Returns the
/// number of members updated.
pub fn share_with_squad(state: &mut HordeState, leader: AgentId) -> usize {
    let Some(source) = state
        .agent(leader)
        .filter(|record| record.is_leader && record.has_line_of_sight)
    else {
        return 0;
    };
    let last_known = source.last_known_target;
    let velocity = source.estimated_target_velocity;
    let predicted = source.predicted_target;
    let members = source.squad_members.clone();

    let mut updated = 0;
    for member in members {
        let Some(record) = state.agent_mut(member) else {
            continue;
        };
        if record.has_line_of_sight {
            continue;
        }
        record.last_known_target = last_known;
        record.estimated_target_velocity = velocity;
        record.predicted_target = predicted;
        updated += 1;
    }
    updated
}

/// Peer-to-peer exchange from `from` to `to`.
///
/// Succeeds only when `from` sees the target, `to` does not, and `to` lies
/// within `from`'s communication range.
pub fn communicate(state: &mut HordeState, from: AgentId, to: AgentId) -> bool {
    if from == to {
        return false;
    }
    let Some(source) = state.agent(from).filter(|record| record.has_line_of_sight) else {
        return false;
    };
    let (origin, range) = (source.position, source.archetype.communication_range);
    let (last_known, predicted) = (source.last_known_target, source.predicted_target);

    let Some(receiver) = state.agent_mut(to) else {
        return false;
    };
    if receiver.has_line_of_sight || receiver.position.distance(origin) > range {
        return false;
    }
    receiver.last_known_target = last_known;
    receiver.predicted_target = predicted;
    true
}

/// Lets `listener` hear from every peer in range that sees the target.
///
/// The first peer in table order wins. Returns `true` if anything was heard.
pub fn listen(state: &mut HordeState, listener: AgentId) -> bool {
    let speaking: Vec<AgentId> = state
        .agents
        .iter()
        .filter(|record| record.id != listener && record.has_line_of_sight)
        .map(|record| record.id)
        .collect();
    speaking
        .into_iter()
        .any(|peer| communicate(state, peer, listener))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geometry::Vec2;
    use crate::state::{AgentArchetype, AgentRecord, BodyHandle};

    fn spawn(state: &mut HordeState, position: Vec2, sees: bool) -> AgentId {
        let archetype = Arc::new(AgentArchetype::builder("z").communication_range(10.0).build());
        let id = state.agents.insert_with(|id| {
            AgentRecord::spawn(id, BodyHandle(id.index), archetype, position, 0.0)
        });
        let record = state.agent_mut(id).unwrap();
        record.has_line_of_sight = sees;
        if sees {
            record.last_known_target = Some(Vec2::new(20.0, 0.0));
            record.predicted_target = Some(Vec2::new(21.0, 0.0));
            record.estimated_target_velocity = Vec2::new(1.0, 0.0);
        }
        id
    }

    #[test]
    fn leader_shares_only_with_blind_members() {
        let mut state = HordeState::new();
        let leader = spawn(&mut state, Vec2::ZERO, true);
        let blind = spawn(&mut state, Vec2::new(1.0, 0.0), false);
        let seeing = spawn(&mut state, Vec2::new(2.0, 0.0), true);
        state.agent_mut(leader).unwrap().become_leader();
        assert!(state.join_squad(blind, leader));
        assert!(state.join_squad(seeing, leader));
        state.agent_mut(seeing).unwrap().last_known_target = Some(Vec2::new(5.0, 5.0));

        assert_eq!(share_with_squad(&mut state, leader), 1);
        let blind = state.agent(blind).unwrap();
        assert_eq!(blind.last_known_target, Some(Vec2::new(20.0, 0.0)));
        assert_eq!(blind.estimated_target_velocity, Vec2::new(1.0, 0.0));
        assert_eq!(
            state.agent(seeing).unwrap().last_known_target,
            Some(Vec2::new(5.0, 5.0))
        );
    }

    #[test]
    fn blind_leader_shares_nothing() {
        let mut state = HordeState::new();
        let leader = spawn(&mut state, Vec2::ZERO, false);
        let member = spawn(&mut state, Vec2::new(1.0, 0.0), false);
        state.agent_mut(leader).unwrap().become_leader();
        state.join_squad(member, leader);

        assert_eq!(share_with_squad(&mut state, leader), 0);
        assert_eq!(state.agent(member).unwrap().last_known_target, None);
    }

    #[test]
    fn peers_exchange_within_range_only() {
        let mut state = HordeState::new();
        let speaker = spawn(&mut state, Vec2::ZERO, true);
        let near = spawn(&mut state, Vec2::new(5.0, 0.0), false);
        let far = spawn(&mut state, Vec2::new(50.0, 0.0), false);

        assert!(communicate(&mut state, speaker, near));
        assert!(!communicate(&mut state, speaker, far));
        assert!(!communicate(&mut state, near, speaker));
        assert_eq!(
            state.agent(near).unwrap().predicted_target,
            Some(Vec2::new(21.0, 0.0))
        );

        assert!(!listen(&mut state, far));
        assert!(listen(&mut state, near));
    }
}
