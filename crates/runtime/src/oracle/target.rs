//! Scripted evading target.

use horde_core::{AgentId, DamageSink, TargetOracle, TargetSample, Vec2};
use serde::{Deserialize, Serialize};

/// Strike the target lands on the nearest agent in range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetAttack {
    pub damage: f32,
    pub range: f32,
    /// Seconds between strikes.
    pub cooldown: f32,
}

/// Declarative description of how the target moves and fights back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetScript {
    pub start: Vec2,
    #[serde(default)]
    pub waypoints: Vec<Vec2>,
    #[serde(default)]
    pub speed: f32,
    /// Restart from the first waypoint after the last one.
    #[serde(default)]
    pub looping: bool,
    #[serde(default = "default_health")]
    pub health: f32,
    #[serde(default)]
    pub attack: Option<TargetAttack>,
}

fn default_health() -> f32 {
    100.0
}

impl TargetScript {
    /// A target that stands still at `position`.
    pub fn stationary(position: Vec2) -> Self {
        Self {
            start: position,
            waypoints: Vec::new(),
            speed: 0.0,
            looping: false,
            health: default_health(),
            attack: None,
        }
    }

    pub fn with_waypoints(mut self, waypoints: Vec<Vec2>, speed: f32, looping: bool) -> Self {
        self.waypoints = waypoints;
        self.speed = speed;
        self.looping = looping;
        self
    }

    pub fn with_health(mut self, health: f32) -> Self {
        self.health = health;
        self
    }

    pub fn with_attack(mut self, attack: TargetAttack) -> Self {
        self.attack = Some(attack);
        self
    }
}

/// Target that follows a waypoint script, absorbs agent attacks and
/// optionally strikes back.
#[derive(Clone, Debug)]
pub struct ScriptedTarget {
    script: TargetScript,
    position: Vec2,
    velocity: Vec2,
    next_waypoint: usize,
    health: f32,
    present: bool,
    last_strike_at: Option<f32>,
    hits: u64,
    damage_taken: f32,
}

impl ScriptedTarget {
    pub fn new(script: TargetScript) -> Self {
        Self {
            position: script.start,
            velocity: Vec2::ZERO,
            next_waypoint: 0,
            health: script.health,
            present: true,
            last_strike_at: None,
            hits: 0,
            damage_taken: 0.0,
            script,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn damage_taken(&self) -> f32 {
        self.damage_taken
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Removes the target from (or returns it to) the world.
    pub fn set_present(&mut self, present: bool) {
        self.present = present;
        if !present {
            self.velocity = Vec2::ZERO;
        }
    }

    /// Moves along the waypoint script for `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        let start = self.position;
        if self.present && self.is_alive() {
            let mut reach = self.script.speed.max(0.0) * dt;
            let mut hops = self.script.waypoints.len() + 1;
            while reach > 0.0 && hops > 0 {
                hops -= 1;
                let Some(&waypoint) = self.script.waypoints.get(self.next_waypoint) else {
                    break;
                };
                let remaining = self.position.distance(waypoint);
                if remaining <= reach {
                    self.position = waypoint;
                    reach -= remaining;
                    self.next_waypoint += 1;
                    if self.next_waypoint == self.script.waypoints.len() && self.script.looping {
                        self.next_waypoint = 0;
                    }
                } else {
                    self.position = self.position + (waypoint - self.position) * (reach / remaining);
                    reach = 0.0;
                }
            }
        }
        self.velocity = (self.position - start) / dt;
    }

    /// Strike the target may land at `now`, if its cooldown has elapsed.
    pub fn ready_attack(&self, now: f32) -> Option<TargetAttack> {
        if !self.present || !self.is_alive() {
            return None;
        }
        let attack = self.script.attack?;
        match self.last_strike_at {
            Some(last) if now - last < attack.cooldown => None,
            _ => Some(attack),
        }
    }

    pub fn record_strike(&mut self, now: f32) {
        self.last_strike_at = Some(now);
    }
}

impl TargetOracle for ScriptedTarget {
    fn target(&self) -> Option<TargetSample> {
        (self.present && self.is_alive()).then_some(TargetSample {
            position: self.position,
            velocity: self.velocity,
        })
    }
}

impl DamageSink for ScriptedTarget {
    fn apply_damage(&mut self, amount: f32, attacker: AgentId) {
        if !self.is_alive() {
            return;
        }
        self.health -= amount;
        self.hits += 1;
        self.damage_taken += amount;
        tracing::debug!("target hit by {} for {:.1}, health {:.1}", attacker, amount, self.health);
        if !self.is_alive() {
            tracing::info!("target killed by {}", attacker);
        }
    }

    fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_waypoints_and_loops() {
        let script = TargetScript::stationary(Vec2::ZERO).with_waypoints(
            vec![Vec2::new(2.0, 0.0), Vec2::ZERO],
            1.0,
            true,
        );
        let mut target = ScriptedTarget::new(script);

        target.advance(1.0);
        assert_eq!(target.position(), Vec2::new(1.0, 0.0));
        assert_eq!(target.velocity(), Vec2::new(1.0, 0.0));

        target.advance(3.0);
        assert_eq!(target.position(), Vec2::ZERO);

        target.advance(1.0);
        assert_eq!(target.position(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn stops_at_last_waypoint_without_looping() {
        let script = TargetScript::stationary(Vec2::ZERO).with_waypoints(
            vec![Vec2::new(1.0, 0.0)],
            5.0,
            false,
        );
        let mut target = ScriptedTarget::new(script);
        target.advance(1.0);
        target.advance(1.0);
        assert_eq!(target.position(), Vec2::new(1.0, 0.0));
        assert_eq!(target.velocity(), Vec2::ZERO);
    }

    #[test]
    fn dead_or_absent_target_is_not_observed() {
        let mut target = ScriptedTarget::new(TargetScript::stationary(Vec2::ZERO).with_health(10.0));
        assert!(target.target().is_some());

        target.set_present(false);
        assert!(target.target().is_none());
        target.set_present(true);

        let attacker = AgentId::new(0, 0);
        target.apply_damage(6.0, attacker);
        target.apply_damage(6.0, attacker);
        target.apply_damage(6.0, attacker);
        assert!(!target.is_alive());
        assert!(target.target().is_none());
        assert_eq!(target.hits(), 2);
    }

    #[test]
    fn strikes_respect_cooldown() {
        let attack = TargetAttack {
            damage: 10.0,
            range: 2.0,
            cooldown: 1.0,
        };
        let mut target = ScriptedTarget::new(TargetScript::stationary(Vec2::ZERO).with_attack(attack));
        assert_eq!(target.ready_attack(0.0), Some(attack));
        target.record_strike(0.0);
        assert!(target.ready_attack(0.5).is_none());
        assert!(target.ready_attack(1.0).is_some());
    }
}
