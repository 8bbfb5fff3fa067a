//! Damage intake, death and leadership succession, alerts and agent attacks.

use crate::config::HordeConfig;
use crate::env::{AgentPool, DamageSink};
use crate::geometry::Vec2;
use crate::state::{AgentId, HordeState, TacticalState};

/// Result of applying damage to an agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageOutcome {
    /// Stale handle or non-positive amount; nothing changed.
    Ignored,
    /// Agent survived. `alerted` nearby agents were warned.
    Wounded { remaining: f32, alerted: usize },
    /// Agent died and was released to the pool.
    Killed { successor: Option<AgentId> },
}

/// Applies `amount` damage dealt from `source` to `victim`.
///
/// A killed agent is removed from the table before this returns, so further
/// damage to the same handle is [`DamageOutcome::Ignored`] and the body is
/// released exactly once.
pub fn apply_damage(
    state: &mut HordeState,
    pool: &mut dyn AgentPool,
    victim: AgentId,
    amount: f32,
    source: Vec2,
) -> DamageOutcome {
    if !amount.is_finite() || amount <= 0.0 {
        return DamageOutcome::Ignored;
    }
    let Some(record) = state.agent_mut(victim) else {
        tracing::warn!("damage to stale agent handle {}", victim);
        return DamageOutcome::Ignored;
    };

    record.health -= amount;
    if record.is_alive() {
        let remaining = record.health;
        let alerted = alert_nearby(state, victim, source);
        return DamageOutcome::Wounded { remaining, alerted };
    }

    let successor = kill(state, pool, victim);
    DamageOutcome::Killed { successor }
}

/// Warns agents within `victim`'s communication range that cannot see the
/// target.
///
/// Each warned agent learns `source` as the last known target position and
/// is forced into `Searching` unless its current state outranks the alert.
pub fn alert_nearby(state: &mut HordeState, victim: AgentId, source: Vec2) -> usize {
    let Some((origin, range)) = state
        .agent(victim)
        .map(|record| (record.position, record.archetype.communication_range))
    else {
        return 0;
    };

    let mut alerted = 0;
    for record in state.agents.iter_mut() {
        if record.id == victim
            || record.has_line_of_sight
            || record.position.distance(origin) > range
        {
            continue;
        }
        record.last_known_target = Some(source);
        if !record.state.outranks_alert() {
            record.state = TacticalState::Searching;
        }
        alerted += 1;
    }
    if alerted > 0 {
        tracing::debug!("agent {} alerted {} nearby agents", victim, alerted);
    }
    alerted
}

/// Removes `victim` from the simulation, handing over its squad first.
///
/// A dying leader passes its members to the first member (squad order)
/// whose archetype may lead. With no eligible member the squad dissolves.
/// Returns the new leader, if any.
pub fn kill(state: &mut HordeState, pool: &mut dyn AgentPool, victim: AgentId) -> Option<AgentId> {
    let record = state.agent(victim)?;
    let mut successor = None;

    if record.is_leader {
        let members: Vec<AgentId> = state.squad_roster(victim).into_iter().skip(1).collect();
        let routes = record.escape_routes.clone();
        successor = members.iter().copied().find(|member| {
            state
                .agent(*member)
                .is_some_and(|m| m.archetype.can_be_leader)
        });

        match successor {
            Some(heir) => {
                let remaining: Vec<AgentId> =
                    members.iter().copied().filter(|m| *m != heir).collect();
                for member in &remaining {
                    if let Some(m) = state.agent_mut(*member) {
                        m.squad_leader = Some(heir);
                    }
                }
                if let Some(h) = state.agent_mut(heir) {
                    h.become_leader();
                    h.squad_members = remaining;
                    h.escape_routes = routes;
                }
                tracing::info!("agent {} took over the squad of {}", heir, victim);
            }
            None => {
                for member in &members {
                    if let Some(m) = state.agent_mut(*member) {
                        m.squad_leader = None;
                    }
                }
                if !members.is_empty() {
                    tracing::info!(
                        "squad of {} dissolved: no member can lead {} agents",
                        victim,
                        members.len()
                    );
                }
            }
        }
        if let Some(dead) = state.agent_mut(victim) {
            dead.squad_members.clear();
        }
    } else {
        state.leave_squad(victim);
    }

    if let Some(dead) = state.agents.remove(victim) {
        pool.release(dead.body);
        tracing::info!("agent {} ({}) died", victim, dead.archetype.name);
    }
    successor
}

/// Effective attack damage of `archetype_damage` under the session difficulty.
pub fn attack_damage(archetype_damage: f32, config: &HordeConfig) -> f32 {
    archetype_damage * config.difficulty.damage_multiplier()
}

/// True when `to_target` lies inside the cone of full width `angle_degrees`
/// around `facing`.
pub fn within_cone(facing: Vec2, to_target: Vec2, angle_degrees: f32) -> bool {
    let (Some(facing), Some(to_target)) = (facing.normalized(), to_target.normalized()) else {
        // Target at the agent's feet.
        return true;
    };
    let angle = facing.dot(to_target).clamp(-1.0, 1.0).acos().to_degrees();
    angle <= angle_degrees * 0.5
}

/// Resolves `id`'s attack on the target at `target` if every precondition holds.
///
/// Requires a live target within attack range, an elapsed cooldown and the
/// target inside the attack cone. A hit forces `Attacking` and makes the
/// tactical cadence due so the state is reassessed next tick.
pub fn try_attack(
    state: &mut HordeState,
    sink: &mut dyn DamageSink,
    config: &HordeConfig,
    id: AgentId,
    target: Vec2,
) -> bool {
    if !sink.is_alive() {
        return false;
    }
    let now = state.clock.time;
    let Some(record) = state.agent_mut(id) else {
        return false;
    };
    let archetype = &record.archetype;

    if record.position.distance(target) > archetype.attack_range {
        return false;
    }
    if record
        .last_attack_at
        .is_some_and(|last| now - last < archetype.attack_cooldown)
    {
        return false;
    }
    let to_target = target - record.position;
    let facing = record.velocity.normalized().unwrap_or(to_target);
    if !within_cone(facing, to_target, archetype.attack_angle) {
        return false;
    }

    let amount = attack_damage(archetype.attack_damage, config);
    sink.apply_damage(amount, id);
    record.last_attack_at = Some(now);
    record.state = TacticalState::Attacking;
    record.next_tactical_at = now;
    tracing::debug!("agent {} hit the target for {:.1}", id, amount);
    true
}
