//! Headless session driver.
//!
//! A [`Simulation`] owns one [`HordeState`] together with the reference
//! collaborators from [`crate::oracle`] and advances them in lockstep: the
//! target and navigation integrate first, then the tactical layer observes
//! the result and issues new orders, then the target strikes back.

use std::collections::BTreeMap;

use horde_content::{ArchetypeCatalog, builtin_archetypes, builtin_config};
use horde_core::{
    AgentId, Collaborators, DamageOutcome, DamageSink, HordeConfig, HordeEngine, HordeEnv,
    HordeState, PcgRng, TargetOracle, TargetSample, TickReport, Vec2,
};
use serde::Serialize;

use crate::error::{Result, RuntimeError};
use crate::oracle::{
    BodyPool, KinematicNavigator, Obstacle, ObstacleField, ScriptedTarget, TargetScript,
};
use crate::scenario::{Scenario, SpawnSpec};

const DEFAULT_POOL_CAPACITY: u32 = 64;

/// Target observation frozen for one tick.
///
/// The scripted target is also the damage sink the engine writes to, so the
/// engine reads it through this copy instead.
struct TargetSnapshot(Option<TargetSample>);

impl TargetOracle for TargetSnapshot {
    fn target(&self) -> Option<TargetSample> {
        self.0
    }
}

/// Running totals over a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionTotals {
    pub ticks: u64,
    pub spawned: u64,
    pub deaths: u64,
    pub successions: u64,
    pub attacks: u64,
    pub nudges: u64,
    pub target_strikes: u64,
}

/// Summary of a session, suitable for JSON output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationReport {
    pub scenario: String,
    pub seed: u64,
    pub elapsed: f32,
    pub totals: SessionTotals,
    pub agents_alive: usize,
    pub leaders: usize,
    pub target_position: Vec2,
    pub target_health: f32,
    pub target_alive: bool,
    pub target_hits: u64,
    pub bodies_in_use: usize,
    pub bodies_acquired: u64,
    pub double_releases: u64,
    pub states: BTreeMap<String, usize>,
    pub roles: BTreeMap<String, usize>,
}

/// One headless session.
pub struct Simulation {
    name: String,
    config: HordeConfig,
    catalog: ArchetypeCatalog,
    obstacles: ObstacleField,
    target: ScriptedTarget,
    navigator: KinematicNavigator,
    pool: BodyPool,
    rng: PcgRng,
    state: HordeState,
    totals: SessionTotals,
}

impl Simulation {
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &HordeState {
        &self.state
    }

    pub fn config(&self) -> &HordeConfig {
        &self.config
    }

    /// Policy used from the next step on.
    pub fn config_mut(&mut self) -> &mut HordeConfig {
        &mut self.config
    }

    pub fn catalog(&self) -> &ArchetypeCatalog {
        &self.catalog
    }

    pub fn target(&self) -> &ScriptedTarget {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut ScriptedTarget {
        &mut self.target
    }

    pub fn navigator(&self) -> &KinematicNavigator {
        &self.navigator
    }

    pub fn pool(&self) -> &BodyPool {
        &self.pool
    }

    pub fn totals(&self) -> SessionTotals {
        self.totals
    }

    /// Spawns an agent of the named archetype at `position`.
    pub fn spawn(&mut self, archetype: &str, position: Vec2) -> Result<AgentId> {
        let archetype = self
            .catalog
            .get(archetype)
            .ok_or_else(|| RuntimeError::UnknownArchetype {
                name: archetype.to_owned(),
            })?;

        let snapshot = TargetSnapshot(self.target.target());
        let env = HordeEnv::new(&self.obstacles, &snapshot, &self.rng, &self.config);
        let id = HordeEngine::new(&mut self.state).spawn(&env, &mut self.pool, archetype, position)?;
        self.navigator.insert(id, position);
        self.totals.spawned += 1;
        Ok(id)
    }

    /// Applies external damage to `victim`, as if dealt from `source`.
    pub fn damage(&mut self, victim: AgentId, amount: f32, source: Vec2) -> DamageOutcome {
        let outcome =
            HordeEngine::new(&mut self.state).damage(&mut self.pool, victim, amount, source);
        if let DamageOutcome::Killed { successor } = outcome {
            self.navigator.remove(victim);
            self.totals.deaths += 1;
            if successor.is_some() {
                self.totals.successions += 1;
            }
        }
        outcome
    }

    /// Advances the whole session by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> TickReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.target.advance(dt);
        self.navigator.advance(dt, &self.obstacles);

        let snapshot = TargetSnapshot(self.target.target());
        let env = HordeEnv::new(&self.obstacles, &snapshot, &self.rng, &self.config);
        let mut collaborators =
            Collaborators::new(&mut self.navigator, &mut self.target, &mut self.pool);
        let report = HordeEngine::new(&mut self.state).step(&env, &mut collaborators, dt);

        self.totals.ticks += 1;
        self.totals.attacks += report.attacks as u64;
        self.totals.nudges += report.nudges as u64;
        self.strike_back();

        tracing::trace!(
            "tick {}: {} agents, {} path updates, {} attacks",
            report.tick,
            report.agents,
            report.path_updates,
            report.attacks
        );
        report
    }

    /// Runs `ticks` steps of `dt` seconds and summarizes the session.
    pub fn run(&mut self, ticks: u64, dt: f32) -> SimulationReport {
        for _ in 0..ticks {
            self.step(dt);
        }
        self.report()
    }

    pub fn report(&self) -> SimulationReport {
        let mut states = BTreeMap::new();
        let mut roles = BTreeMap::new();
        let mut leaders = 0;
        for record in self.state.agents.iter() {
            *states.entry(record.state.as_ref().to_owned()).or_insert(0) += 1;
            *roles.entry(record.role.as_ref().to_owned()).or_insert(0) += 1;
            if record.is_leader {
                leaders += 1;
            }
        }

        SimulationReport {
            scenario: self.name.clone(),
            seed: self.config.rng_seed,
            elapsed: self.state.clock.time,
            totals: self.totals,
            agents_alive: self.state.agents.len(),
            leaders,
            target_position: self.target.position(),
            target_health: self.target.health(),
            target_alive: self.target.is_alive(),
            target_hits: self.target.hits(),
            bodies_in_use: self.pool.in_use(),
            bodies_acquired: self.pool.acquired(),
            double_releases: self.pool.double_releases(),
            states,
            roles,
        }
    }

    /// Lets the target hit the nearest agent in reach once its cooldown allows.
    fn strike_back(&mut self) {
        let now = self.state.clock.time;
        let Some(attack) = self.target.ready_attack(now) else {
            return;
        };
        let origin = self.target.position();
        let victim = self
            .state
            .agents
            .iter()
            .map(|record| (record.id, record.position.distance(origin)))
            .filter(|(_, distance)| *distance <= attack.range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id);
        let Some(victim) = victim else {
            return;
        };

        self.target.record_strike(now);
        self.totals.target_strikes += 1;
        tracing::debug!("target strikes {} for {:.1}", victim, attack.damage);
        self.damage(victim, attack.damage, origin);
    }
}

/// Assembles a [`Simulation`] from content, a world layout and spawns.
///
/// Configuration and archetypes default to the built-in content.
#[derive(Default)]
pub struct SimulationBuilder {
    name: Option<String>,
    config: Option<HordeConfig>,
    seed: Option<u64>,
    catalog: Option<ArchetypeCatalog>,
    obstacles: Vec<Obstacle>,
    target: Option<TargetScript>,
    pool_capacity: Option<u32>,
    spawns: Vec<SpawnSpec>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn config(mut self, config: HordeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the RNG seed of whichever configuration is used.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn catalog(mut self, catalog: ArchetypeCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn target(mut self, target: TargetScript) -> Self {
        self.target = Some(target);
        self
    }

    pub fn pool_capacity(mut self, capacity: u32) -> Self {
        self.pool_capacity = Some(capacity);
        self
    }

    pub fn spawn(mut self, archetype: impl Into<String>, position: Vec2) -> Self {
        self.spawns.push(SpawnSpec::new(archetype, position));
        self
    }

    /// Takes the world layout and spawns from `scenario`. A seed set on the
    /// builder wins over the scenario's.
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.name = Some(scenario.name);
        self.seed = self.seed.or(scenario.seed);
        self.pool_capacity = Some(scenario.pool_capacity);
        self.obstacles.extend(scenario.obstacles);
        self.target = Some(scenario.target);
        self.spawns.extend(scenario.spawns);
        self
    }

    pub fn build(self) -> Result<Simulation> {
        let mut config = match self.config {
            Some(config) => config,
            None => builtin_config().map_err(RuntimeError::content)?,
        };
        if let Some(seed) = self.seed {
            config.rng_seed = seed;
        }
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => builtin_archetypes().map_err(RuntimeError::content)?,
        };
        let target = self
            .target
            .unwrap_or_else(|| TargetScript::stationary(Vec2::ZERO));

        let mut simulation = Simulation {
            name: self.name.unwrap_or_else(|| "custom".to_owned()),
            config,
            catalog,
            obstacles: ObstacleField::new(self.obstacles),
            target: ScriptedTarget::new(target),
            navigator: KinematicNavigator::new(),
            pool: BodyPool::new(self.pool_capacity.unwrap_or(DEFAULT_POOL_CAPACITY)),
            rng: PcgRng,
            state: HordeState::new(),
            totals: SessionTotals::default(),
        };

        for spawn in &self.spawns {
            simulation.spawn(&spawn.archetype, spawn.position)?;
        }
        tracing::info!(
            "session '{}' ready: {} agents, seed {}",
            simulation.name,
            simulation.state.agents.len(),
            simulation.config.rng_seed
        );
        Ok(simulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_builtin_content() {
        let simulation = Simulation::builder().build().unwrap();
        assert_eq!(simulation.catalog().len(), 5);
        assert_eq!(simulation.name(), "custom");
        assert_eq!(simulation.pool().capacity(), DEFAULT_POOL_CAPACITY);
    }

    #[test]
    fn unknown_archetype_is_rejected() {
        let err = Simulation::builder()
            .spawn("ghoul", Vec2::ZERO)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, RuntimeError::UnknownArchetype { name } if name == "ghoul"));
    }

    #[test]
    fn builder_seed_wins_over_scenario() {
        let scenario = Scenario::demo().unwrap();
        let simulation = Simulation::builder()
            .seed(99)
            .scenario(scenario)
            .build()
            .unwrap();
        assert_eq!(simulation.config().rng_seed, 99);
        assert_eq!(simulation.name(), "demo");
    }

    #[test]
    fn exhausted_pool_surfaces_as_spawn_error() {
        let err = Simulation::builder()
            .pool_capacity(1)
            .spawn("walker", Vec2::ZERO)
            .spawn("walker", Vec2::new(1.0, 0.0))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, RuntimeError::Spawn(_)));
    }

    #[test]
    fn demo_runs_without_losing_bodies() {
        let mut simulation = Simulation::builder()
            .scenario(Scenario::demo().unwrap())
            .build()
            .unwrap();
        let spawned = simulation.state().agents.len();
        let report = simulation.run(600, 1.0 / 30.0);

        assert_eq!(report.totals.ticks, 600);
        assert_eq!(report.double_releases, 0);
        assert_eq!(report.agents_alive + report.totals.deaths as usize, spawned);
        assert_eq!(report.bodies_in_use, report.agents_alive);
        assert_eq!(report.bodies_acquired, spawned as u64);
        assert_eq!(simulation.navigator().len(), report.agents_alive);
    }
}
