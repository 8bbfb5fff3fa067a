//! Role assignment over a squad.
//!
//! Members start in an unassigned pool (squad order). Each step takes the
//! best candidates for one role and removes them from the pool:
//!
//! 1. Chasers: up to `min(max_chasers, squad members with line of sight)`,
//!    nearest first.
//! 2. Flankers: up to `min(max_flankers, remaining)`, fastest first.
//! 3. Blockers: one per open escape route while members remain, nearest first.
//! 4. Everyone left ambushes if the archetype allows it, else chases.
//!
//! All orderings are stable, so equal keys keep squad order. The leader is
//! not part of the pool and keeps [`TacticalRole::Leader`].

use core::cmp::Ordering;

use crate::config::HordeConfig;
use crate::geometry::Vec2;
use crate::state::{AgentId, HordeState, TacticalRole};

/// Squad member as seen by role assignment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub id: AgentId,
    pub distance: f32,
    pub move_speed: f32,
    pub can_set_ambush: bool,
}

/// Situation summary computed before assignment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquadSituation {
    /// Squad agents, leader included, that currently see the target.
    pub with_line_of_sight: usize,
    pub average_distance: f32,
    pub escape_routes: usize,
}

/// Computes roles for `pool`. Every candidate receives exactly one role.
pub fn assign_roles(
    pool: &[Candidate],
    situation: &SquadSituation,
    config: &HordeConfig,
) -> Vec<(AgentId, TacticalRole)> {
    let mut unassigned: Vec<Candidate> = pool.to_vec();
    let mut assignments = Vec::with_capacity(pool.len());

    let chasers = config.max_chasers.min(situation.with_line_of_sight);
    take_best(&mut unassigned, chasers, by_distance, TacticalRole::Chaser, &mut assignments);

    let flankers = config.max_flankers.min(unassigned.len());
    take_best(&mut unassigned, flankers, by_speed_desc, TacticalRole::Flanker, &mut assignments);

    if situation.escape_routes > 0 {
        let blockers = situation.escape_routes.min(unassigned.len());
        take_best(&mut unassigned, blockers, by_distance, TacticalRole::Blocker, &mut assignments);
    }

    for candidate in unassigned {
        let role = if candidate.can_set_ambush {
            TacticalRole::Ambusher
        } else {
            TacticalRole::Chaser
        };
        assignments.push((candidate.id, role));
    }

    assignments
}

fn by_distance(a: &Candidate, b: &Candidate) -> Ordering {
    a.distance.total_cmp(&b.distance)
}

fn by_speed_desc(a: &Candidate, b: &Candidate) -> Ordering {
    b.move_speed.total_cmp(&a.move_speed)
}

/// Moves the first `count` candidates under `order` out of `pool`.
fn take_best(
    pool: &mut Vec<Candidate>,
    count: usize,
    order: fn(&Candidate, &Candidate) -> Ordering,
    role: TacticalRole,
    assignments: &mut Vec<(AgentId, TacticalRole)>,
) {
    if count == 0 {
        return;
    }
    let mut ranked = pool.clone();
    // `sort_by` is stable: ties keep squad order.
    ranked.sort_by(order);
    for chosen in ranked.iter().take(count) {
        assignments.push((chosen.id, role));
        pool.retain(|candidate| candidate.id != chosen.id);
    }
}

/// Builds the assignment inputs for `leader`'s squad.
pub fn survey_squad(
    state: &HordeState,
    leader: AgentId,
    target: Vec2,
) -> Option<(Vec<Candidate>, SquadSituation)> {
    let leader_record = state.agent(leader).filter(|record| record.is_leader)?;
    let roster = state.squad_roster(leader);

    let mut with_line_of_sight = 0;
    let mut total_distance = 0.0;
    let mut pool = Vec::with_capacity(roster.len().saturating_sub(1));

    for id in &roster {
        let Some(record) = state.agent(*id) else {
            continue;
        };
        let distance = record.position.distance(target);
        total_distance += distance;
        if record.has_line_of_sight {
            with_line_of_sight += 1;
        }
        if *id != leader {
            pool.push(Candidate {
                id: *id,
                distance,
                move_speed: record.archetype.move_speed,
                can_set_ambush: record.archetype.can_set_ambush,
            });
        }
    }

    let situation = SquadSituation {
        with_line_of_sight,
        average_distance: total_distance / roster.len().max(1) as f32,
        escape_routes: leader_record.escape_routes.len(),
    };
    Some((pool, situation))
}
