//! Per-agent tactical record.

use std::sync::Arc;

use arrayvec::ArrayVec;

use super::{AgentArchetype, AgentId, BodyHandle};
use crate::config::HordeConfig;
use crate::geometry::Vec2;

/// Squad role assigned by the leader's coordinator.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TacticalRole {
    /// Direct pursuit.
    #[default]
    Chaser,
    /// Approach from the sides.
    Flanker,
    /// Wait hidden ahead of the target.
    Ambusher,
    /// Cut off escape routes.
    Blocker,
    /// Coordinate the squad.
    Leader,
}

/// Tactical state recomputed at the tactical cadence.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TacticalState {
    #[default]
    Idle,
    Searching,
    Pursuing,
    Flanking,
    Surrounding,
    Blocking,
    Ambushing,
    Attacking,
}

impl TacticalState {
    /// States an alert must not interrupt.
    ///
    /// An attacking agent is already engaged, and an ambusher depends on
    /// staying out of sight.
    pub const fn outranks_alert(self) -> bool {
        matches!(self, Self::Attacking | Self::Ambushing)
    }

    /// States in which the agent is expected to hold position.
    pub const fn is_stationary(self) -> bool {
        matches!(self, Self::Ambushing)
    }
}

/// Escape points found by a leader's analysis pass.
pub type EscapeRoutes = ArrayVec<Vec2, { HordeConfig::ESCAPE_DIRECTIONS }>;

/// Tracks how long realized movement has stalled.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StallMonitor {
    /// Seconds spent below the stall threshold in the current episode.
    pub timer: f32,
    /// Set once a nudge fired in the current episode.
    pub recovered: bool,
}

/// Mutable state of one live agent.
#[derive(Clone, Debug)]
pub struct AgentRecord {
    pub id: AgentId,
    pub body: BodyHandle,
    pub archetype: Arc<AgentArchetype>,

    pub position: Vec2,
    /// Realized velocity as last reported by navigation.
    pub velocity: Vec2,
    pub health: f32,

    pub state: TacticalState,
    pub role: TacticalRole,

    pub is_leader: bool,
    pub squad_leader: Option<AgentId>,
    /// Only meaningful while `is_leader`.
    pub squad_members: Vec<AgentId>,
    /// Only meaningful while `is_leader`.
    pub escape_routes: EscapeRoutes,

    pub has_line_of_sight: bool,
    pub last_known_target: Option<Vec2>,
    pub estimated_target_velocity: Vec2,
    pub predicted_target: Option<Vec2>,

    /// Destination most recently handed to navigation.
    pub destination: Option<Vec2>,

    pub next_tactical_at: f32,
    pub next_path_at: f32,
    pub last_attack_at: Option<f32>,
    pub stall: StallMonitor,
}

impl AgentRecord {
    /// Fresh record for a spawned agent: `Idle`, preferred role, full health.
    ///
    /// Both cadences are due immediately so the first tick evaluates the agent.
    pub fn spawn(
        id: AgentId,
        body: BodyHandle,
        archetype: Arc<AgentArchetype>,
        position: Vec2,
        now: f32,
    ) -> Self {
        Self {
            id,
            body,
            health: archetype.health,
            role: archetype.preferred_role,
            archetype,
            position,
            velocity: Vec2::ZERO,
            state: TacticalState::Idle,
            is_leader: false,
            squad_leader: None,
            squad_members: Vec::new(),
            escape_routes: EscapeRoutes::new(),
            has_line_of_sight: false,
            last_known_target: None,
            estimated_target_velocity: Vec2::ZERO,
            predicted_target: None,
            destination: None,
            next_tactical_at: now,
            next_path_at: now,
            last_attack_at: None,
            stall: StallMonitor::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_squadded(&self) -> bool {
        self.is_leader || self.squad_leader.is_some()
    }

    pub fn become_leader(&mut self) {
        self.is_leader = true;
        self.role = TacticalRole::Leader;
        self.squad_leader = None;
    }

    pub fn tactical_due(&self, now: f32) -> bool {
        now >= self.next_tactical_at
    }

    pub fn path_due(&self, now: f32) -> bool {
        now >= self.next_path_at
    }

    pub fn schedule_tactical(&mut self, now: f32) {
        self.next_tactical_at = now + self.archetype.tactical_update_interval.max(0.0);
    }

    pub fn schedule_path(&mut self, now: f32) {
        self.next_path_at = now + self.archetype.path_update_interval.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_uses_archetype_defaults() {
        let archetype = Arc::new(
            AgentArchetype::builder("stalker")
                .health(40.0)
                .preferred_role(TacticalRole::Ambusher)
                .build(),
        );
        let record = AgentRecord::spawn(
            AgentId::new(0, 0),
            BodyHandle(7),
            archetype,
            Vec2::new(1.0, 2.0),
            3.0,
        );

        assert_eq!(record.state, TacticalState::Idle);
        assert_eq!(record.role, TacticalRole::Ambusher);
        assert_eq!(record.health, 40.0);
        assert!(record.tactical_due(3.0));
        assert!(record.path_due(3.0));
        assert!(!record.is_squadded());
    }

    #[test]
    fn roles_parse_from_snake_case() {
        assert_eq!("blocker".parse::<TacticalRole>(), Ok(TacticalRole::Blocker));
        assert_eq!(TacticalState::Ambushing.to_string(), "ambushing");
    }
}
