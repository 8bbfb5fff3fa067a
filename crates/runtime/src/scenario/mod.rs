//! Scenario files describing a headless session.
//!
//! A scenario names the world a session runs in: the obstacle layout, how the
//! target moves and fights back, how many bodies the pool holds, and which
//! archetypes spawn where. Archetypes and tactical policy come from content;
//! a scenario only references archetypes by name.

use std::path::Path;

use horde_core::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};
use crate::oracle::{Obstacle, TargetScript};

const DEMO: &str = include_str!("../../scenarios/demo.ron");

/// One agent placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub archetype: String,
    pub position: Vec2,
}

impl SpawnSpec {
    pub fn new(archetype: impl Into<String>, position: Vec2) -> Self {
        Self {
            archetype: archetype.into(),
            position,
        }
    }
}

/// Session layout loaded from RON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Overrides the configured RNG seed when set.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: u32,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    pub target: TargetScript,
    #[serde(default)]
    pub spawns: Vec<SpawnSpec>,
}

fn default_pool_capacity() -> u32 {
    64
}

impl Scenario {
    /// Built-in demo: two squads hunting a patrolling target around a few
    /// walls.
    pub fn demo() -> Result<Self> {
        Self::parse(DEMO)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| RuntimeError::Scenario(format!("failed to parse RON: {}", e)))?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RuntimeError::Scenario("scenario name is empty".into()));
        }
        if self.pool_capacity == 0 {
            return Err(RuntimeError::Scenario(format!(
                "'{}' has a zero pool capacity",
                self.name
            )));
        }
        if !self.target.start.is_finite() || self.target.waypoints.iter().any(|w| !w.is_finite()) {
            return Err(RuntimeError::Scenario(format!(
                "'{}' has a non-finite target waypoint",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_parses() {
        let demo = Scenario::demo().unwrap();
        assert_eq!(demo.name, "demo");
        assert!(!demo.spawns.is_empty());
        assert!(demo.target.attack.is_some());
    }

    #[test]
    fn minimal_scenario_takes_defaults() {
        let scenario = Scenario::parse(
            r#"(
                name: "minimal",
                target: (start: (x: 1.0, y: 2.0)),
            )"#,
        )
        .unwrap();
        assert_eq!(scenario.pool_capacity, 64);
        assert_eq!(scenario.seed, None);
        assert_eq!(scenario.target.health, 100.0);
        assert!(scenario.obstacles.is_empty());
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = Scenario::parse(
            r#"(name: "empty", pool_capacity: 0, target: (start: (x: 0.0, y: 0.0)))"#,
        )
        .unwrap_err();
        assert!(matches!(err, RuntimeError::Scenario(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Scenario::load(Path::new("/nonexistent/horde.ron")).unwrap_err();
        assert!(matches!(err, RuntimeError::Io { .. }));
    }
}
