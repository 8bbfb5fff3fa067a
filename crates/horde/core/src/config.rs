/// Difficulty scaling applied on top of archetype stats.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Difficulty {
    /// 0 = easy, 1 = medium, 2 = hard, 3 = expert.
    pub level: u8,
}

impl Difficulty {
    pub const MAX_LEVEL: u8 = 3;

    pub const fn new(level: u8) -> Self {
        Self { level }
    }

    fn clamped_level(self) -> f32 {
        self.level.min(Self::MAX_LEVEL) as f32
    }

    /// Multiplier applied to every archetype move speed.
    pub fn speed_multiplier(self) -> f32 {
        1.0 + self.clamped_level() * 0.5
    }

    /// Multiplier applied to every archetype attack damage.
    pub fn damage_multiplier(self) -> f32 {
        1.0 + self.clamped_level() * 0.25
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Tactical policy constants and tunable parameters.
///
/// Archetype stats describe a single agent; everything here is a squad-wide
/// policy shared by all agents in a session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HordeConfig {
    /// Base seed for every deterministic roll (leader election, flank side, nudges).
    pub rng_seed: u64,
    /// Chance that a leader-capable agent becomes a leader on spawn.
    pub leader_probability: f32,

    /// Length of the ray probed from the target along each escape direction.
    pub escape_probe_length: f32,
    /// A sampled escape point within this radius of a squad member is covered.
    pub escape_proximity_radius: f32,
    /// Escape routes are re-analyzed every this many ticks.
    pub escape_analysis_period: u64,

    pub max_chasers: usize,
    pub max_flankers: usize,

    /// Squads with more members than this get the coordination speed bonus.
    pub coordination_squad_threshold: usize,

    /// Realized speed below this counts as stalled.
    pub stall_speed_threshold: f32,
    /// Radius of the randomized destination issued to break a stall.
    pub stuck_nudge_radius: f32,

    /// Minimum target speed for an ambush to trigger.
    pub ambush_speed_threshold: f32,
    /// Minimum alignment between target heading and target→agent direction.
    pub ambush_alignment: f32,
    /// Distance ahead of the predicted position where ambushers wait.
    pub ambush_lead_distance: f32,
    /// Radius searched around the ambush point for cover.
    pub ambush_cover_radius: f32,
    /// Stand-off from the cover obstacle towards the ambush point.
    pub ambush_cover_offset: f32,

    pub difficulty: Difficulty,
}

impl HordeConfig {
    // ===== compile-time constants used as type parameters =====
    /// Escape analysis samples this many directions at even angular steps.
    pub const ESCAPE_DIRECTIONS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_RNG_SEED: u64 = 0x5EED_0F_DEAD;
    pub const DEFAULT_LEADER_PROBABILITY: f32 = 0.2;
    pub const DEFAULT_ESCAPE_PROBE_LENGTH: f32 = 5.0;
    pub const DEFAULT_ESCAPE_PROXIMITY_RADIUS: f32 = 2.0;
    pub const DEFAULT_ESCAPE_ANALYSIS_PERIOD: u64 = 30;
    pub const DEFAULT_MAX_CHASERS: usize = 2;
    pub const DEFAULT_MAX_FLANKERS: usize = 2;
    pub const DEFAULT_COORDINATION_SQUAD_THRESHOLD: usize = 2;
    pub const DEFAULT_STALL_SPEED_THRESHOLD: f32 = 0.1;
    pub const DEFAULT_STUCK_NUDGE_RADIUS: f32 = 2.0;
    pub const DEFAULT_AMBUSH_SPEED_THRESHOLD: f32 = 0.5;
    pub const DEFAULT_AMBUSH_ALIGNMENT: f32 = 0.5;
    pub const DEFAULT_AMBUSH_LEAD_DISTANCE: f32 = 5.0;
    pub const DEFAULT_AMBUSH_COVER_RADIUS: f32 = 3.0;
    pub const DEFAULT_AMBUSH_COVER_OFFSET: f32 = 1.5;

    pub fn new() -> Self {
        Self {
            rng_seed: Self::DEFAULT_RNG_SEED,
            leader_probability: Self::DEFAULT_LEADER_PROBABILITY,
            escape_probe_length: Self::DEFAULT_ESCAPE_PROBE_LENGTH,
            escape_proximity_radius: Self::DEFAULT_ESCAPE_PROXIMITY_RADIUS,
            escape_analysis_period: Self::DEFAULT_ESCAPE_ANALYSIS_PERIOD,
            max_chasers: Self::DEFAULT_MAX_CHASERS,
            max_flankers: Self::DEFAULT_MAX_FLANKERS,
            coordination_squad_threshold: Self::DEFAULT_COORDINATION_SQUAD_THRESHOLD,
            stall_speed_threshold: Self::DEFAULT_STALL_SPEED_THRESHOLD,
            stuck_nudge_radius: Self::DEFAULT_STUCK_NUDGE_RADIUS,
            ambush_speed_threshold: Self::DEFAULT_AMBUSH_SPEED_THRESHOLD,
            ambush_alignment: Self::DEFAULT_AMBUSH_ALIGNMENT,
            ambush_lead_distance: Self::DEFAULT_AMBUSH_LEAD_DISTANCE,
            ambush_cover_radius: Self::DEFAULT_AMBUSH_COVER_RADIUS,
            ambush_cover_offset: Self::DEFAULT_AMBUSH_COVER_OFFSET,
            difficulty: Difficulty::default(),
        }
    }

    pub fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_leader_probability(mut self, leader_probability: f32) -> Self {
        self.leader_probability = leader_probability.clamp(0.0, 1.0);
        self
    }
}

impl Default for HordeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_multipliers_scale_with_level() {
        assert_eq!(Difficulty::new(0).speed_multiplier(), 1.0);
        assert_eq!(Difficulty::new(2).speed_multiplier(), 2.0);
        assert_eq!(Difficulty::new(3).damage_multiplier(), 1.75);
        // Out-of-range levels clamp to expert.
        assert_eq!(Difficulty::new(9).speed_multiplier(), 2.5);
    }

    #[test]
    fn leader_probability_is_clamped() {
        let config = HordeConfig::new().with_leader_probability(4.0);
        assert_eq!(config.leader_probability, 1.0);
    }
}
