//! Immutable per-kind agent stats.

use super::TacticalRole;

/// Stat block shared (via `Arc`) by every agent of one kind.
///
/// Loaded once from content and never mutated afterwards. Angles are in
/// degrees, distances in world units, intervals in seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentArchetype {
    pub name: String,
    pub health: f32,
    pub move_speed: f32,
    pub detection_range: f32,

    pub attack_range: f32,
    /// Full width of the attack cone.
    pub attack_angle: f32,
    pub attack_damage: f32,
    pub attack_cooldown: f32,

    /// 0 = aims at the current target position, 1 = extrapolates the full
    /// `prediction_time`.
    pub intelligence_level: f32,
    pub prediction_time: f32,
    pub communication_range: f32,
    pub can_be_leader: bool,
    pub can_set_ambush: bool,
    pub preferred_role: TacticalRole,
    pub flanking_angle: f32,
    pub surround_distance: f32,
    /// Speed multiplier while in a large squad.
    pub coordination_bonus: f32,

    pub tactical_update_interval: f32,
    pub path_update_interval: f32,
    pub stuck_detection_time: f32,
}

impl AgentArchetype {
    pub fn builder(name: impl Into<String>) -> AgentArchetypeBuilder {
        AgentArchetypeBuilder::new(name)
    }
}

impl Default for AgentArchetype {
    fn default() -> Self {
        Self {
            name: "basic".to_owned(),
            health: 100.0,
            move_speed: 2.0,
            detection_range: 10.0,
            attack_range: 1.5,
            attack_angle: 60.0,
            attack_damage: 10.0,
            attack_cooldown: 1.0,
            intelligence_level: 1.0,
            prediction_time: 1.0,
            communication_range: 8.0,
            can_be_leader: false,
            can_set_ambush: false,
            preferred_role: TacticalRole::Chaser,
            flanking_angle: 45.0,
            surround_distance: 3.0,
            coordination_bonus: 1.2,
            tactical_update_interval: 0.5,
            path_update_interval: 0.25,
            stuck_detection_time: 2.0,
        }
    }
}

/// Builder for [`AgentArchetype`], starting from the default stat block.
#[derive(Clone, Debug)]
pub struct AgentArchetypeBuilder {
    archetype: AgentArchetype,
}

impl AgentArchetypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            archetype: AgentArchetype {
                name: name.into(),
                ..AgentArchetype::default()
            },
        }
    }

    pub fn health(mut self, health: f32) -> Self {
        self.archetype.health = health;
        self
    }

    pub fn move_speed(mut self, move_speed: f32) -> Self {
        self.archetype.move_speed = move_speed;
        self
    }

    pub fn detection_range(mut self, range: f32) -> Self {
        self.archetype.detection_range = range;
        self
    }

    pub fn attack(mut self, range: f32, angle: f32, damage: f32, cooldown: f32) -> Self {
        self.archetype.attack_range = range;
        self.archetype.attack_angle = angle;
        self.archetype.attack_damage = damage;
        self.archetype.attack_cooldown = cooldown;
        self
    }

    pub fn attack_range(mut self, range: f32) -> Self {
        self.archetype.attack_range = range;
        self
    }

    pub fn intelligence(mut self, level: f32, prediction_time: f32) -> Self {
        self.archetype.intelligence_level = level.clamp(0.0, 1.0);
        self.archetype.prediction_time = prediction_time;
        self
    }

    pub fn communication_range(mut self, range: f32) -> Self {
        self.archetype.communication_range = range;
        self
    }

    pub fn can_be_leader(mut self, can_be_leader: bool) -> Self {
        self.archetype.can_be_leader = can_be_leader;
        self
    }

    pub fn can_set_ambush(mut self, can_set_ambush: bool) -> Self {
        self.archetype.can_set_ambush = can_set_ambush;
        self
    }

    pub fn preferred_role(mut self, role: TacticalRole) -> Self {
        self.archetype.preferred_role = role;
        self
    }

    pub fn formation(mut self, flanking_angle: f32, surround_distance: f32) -> Self {
        self.archetype.flanking_angle = flanking_angle;
        self.archetype.surround_distance = surround_distance;
        self
    }

    pub fn coordination_bonus(mut self, bonus: f32) -> Self {
        self.archetype.coordination_bonus = bonus;
        self
    }

    pub fn intervals(mut self, tactical: f32, path: f32, stuck_detection: f32) -> Self {
        self.archetype.tactical_update_interval = tactical;
        self.archetype.path_update_interval = path;
        self.archetype.stuck_detection_time = stuck_detection;
        self
    }

    pub fn build(self) -> AgentArchetype {
        self.archetype
    }
}
