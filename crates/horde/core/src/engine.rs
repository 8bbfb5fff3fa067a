//! Per-tick orchestration of the tactical layer.
//!
//! The [`HordeEngine`] is the only entry point that mutates [`HordeState`]
//! during a session. One call to [`HordeEngine::step`] runs the whole
//! pipeline in a fixed order:
//!
//! 1. advance the clock and read back realized kinematics
//! 2. observe the target and refresh every agent's perception
//! 3. form squads and, every `escape_analysis_period` ticks, re-analyze
//!    escape routes
//! 4. for agents whose tactical cadence is due: listen to peers, then let
//!    the due leaders coordinate their squads, then re-evaluate every due
//!    agent's tactical state against the fresh roles
//! 5. for agents whose pathing cadence is due: compute and request a
//!    destination
//! 6. stall monitoring and recovery nudges
//! 7. agent attacks on the target
//!
//! Agents are always visited in table order, which makes every pass
//! deterministic for a given seed and input stream.

use std::sync::Arc;

use crate::combat::{self, DamageOutcome};
use crate::env::{AgentPool, Collaborators, HordeEnv, MoveRequest};
use crate::error::SpawnError;
use crate::geometry::Vec2;
use crate::perception::{self, TargetObservation};
use crate::squad;
use crate::state::{AgentArchetype, AgentId, AgentRecord, HordeState, TacticalRole, Tick};
use crate::{positioning, stuck, tactics};

/// Counters describing what one tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub tick: Tick,
    pub agents: usize,
    pub target_present: bool,
    pub joined_squads: usize,
    pub escape_analyses: usize,
    pub tactical_updates: usize,
    pub path_updates: usize,
    pub nudges: usize,
    pub attacks: usize,
}

/// Speed requested from navigation for `id`.
///
/// Archetype speed scaled by difficulty, and by the archetype's coordination
/// bonus while its squad has more members than the configured threshold.
pub fn effective_speed(state: &HordeState, env: &HordeEnv<'_>, id: AgentId) -> f32 {
    let Some(record) = state.agent(id) else {
        return 0.0;
    };
    let mut speed =
        record.archetype.move_speed * env.config.difficulty.speed_multiplier();
    let members = state.squad_size_of(id).saturating_sub(1);
    if members > env.config.coordination_squad_threshold {
        speed *= record.archetype.coordination_bonus;
    }
    speed
}

/// Drives one session's [`HordeState`].
pub struct HordeEngine<'a> {
    state: &'a mut HordeState,
}

impl<'a> HordeEngine<'a> {
    pub fn new(state: &'a mut HordeState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &HordeState {
        self.state
    }

    /// Brings a new agent into the simulation.
    ///
    /// Acquires a body from the pool, creates the record (state `Idle`, role
    /// from the archetype) and rolls leadership.
    pub fn spawn(
        &mut self,
        env: &HordeEnv<'_>,
        pool: &mut dyn AgentPool,
        archetype: Arc<AgentArchetype>,
        position: Vec2,
    ) -> Result<AgentId, SpawnError> {
        if !position.is_finite() {
            return Err(SpawnError::InvalidPosition {
                x: position.x,
                y: position.y,
            });
        }
        let Some(body) = pool.acquire(&archetype, position) else {
            tracing::warn!("pool exhausted, dropping spawn of '{}'", archetype.name);
            return Err(SpawnError::PoolExhausted {
                archetype: archetype.name.clone(),
            });
        };

        let now = self.state.clock.time;
        let name = archetype.name.clone();
        let id = self.state.agents.insert_with(|id| {
            let mut record = AgentRecord::spawn(id, body, archetype, position, now);
            // Leadership comes from election only.
            if record.role == TacticalRole::Leader {
                record.role = TacticalRole::Chaser;
            }
            record
        });
        squad::roll_leadership(self.state, env, id);
        tracing::info!("spawned agent {} ({}) at {}", id, name, position);
        Ok(id)
    }

    /// Applies damage from `source` to `victim`. See [`combat::apply_damage`].
    pub fn damage(
        &mut self,
        pool: &mut dyn AgentPool,
        victim: AgentId,
        amount: f32,
        source: Vec2,
    ) -> DamageOutcome {
        combat::apply_damage(self.state, pool, victim, amount, source)
    }

    /// Advances the simulation by `dt` seconds.
    pub fn step(
        &mut self,
        env: &HordeEnv<'_>,
        collaborators: &mut Collaborators<'_>,
        dt: f32,
    ) -> TickReport {
        self.state.clock.advance(dt);
        let tick = self.state.clock.tick;
        let now = self.state.clock.time;
        let dt = self.state.clock.dt;
        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };

        self.sync_kinematics(collaborators);

        let sample = env.target.target();
        self.state.target.observe(sample.map(|s| s.position));
        report.target_present = sample.is_some();

        if let Some(current) = self.state.target.current {
            let observation = TargetObservation {
                current,
                previous: self.state.target.previous,
                dt,
            };
            for record in self.state.agents.iter_mut() {
                perception::refresh(record, &observation, env.obstacles);
            }
        }

        report.joined_squads = squad::form_squads(self.state);

        if tick.is_multiple_of(env.config.escape_analysis_period) {
            for leader in self.leaders() {
                squad::analyze_escape_routes(self.state, leader, env.obstacles, env.config);
                report.escape_analyses += 1;
            }
        }

        let ids = self.state.agents.ids();

        if let Some(target) = self.state.target.current {
            report.tactical_updates = self.tactical_pass(env, &ids, target, now);
            for &id in &ids {
                if self.pathing_pass(env, collaborators, id, target, now) {
                    report.path_updates += 1;
                }
            }
        }

        for &id in &ids {
            if self.stall_pass(env, collaborators, id, tick, dt) {
                report.nudges += 1;
            }
        }

        if let Some(target) = self.state.target.current {
            for &id in &ids {
                if combat::try_attack(self.state, collaborators.damage, env.config, id, target) {
                    report.attacks += 1;
                }
            }
        }

        debug_assert!(
            self.state.audit().is_empty(),
            "squad invariants broken: {:?}",
            self.state.audit()
        );

        report.agents = self.state.agents.len();
        report
    }

    fn leaders(&self) -> Vec<AgentId> {
        self.state
            .agents
            .iter()
            .filter(|record| record.is_leader)
            .map(|record| record.id)
            .collect()
    }

    fn sync_kinematics(&mut self, collaborators: &Collaborators<'_>) {
        for record in self.state.agents.iter_mut() {
            match collaborators.navigator.kinematics(record.id) {
                Some(kinematics) => {
                    record.position = kinematics.position;
                    record.velocity = kinematics.velocity;
                }
                None => tracing::trace!("navigation has no body for {}", record.id),
            }
        }
    }

    /// Runs the tactical cadence for every due agent in `ids`.
    ///
    /// Roles are settled by all due leaders before any state is evaluated,
    /// so table order between a leader and its members does not matter.
    fn tactical_pass(
        &mut self,
        env: &HordeEnv<'_>,
        ids: &[AgentId],
        target: Vec2,
        now: f32,
    ) -> usize {
        let mut due = Vec::new();
        for &id in ids {
            let Some(record) = self.state.agent_mut(id) else {
                continue;
            };
            if record.tactical_due(now) {
                record.schedule_tactical(now);
                due.push(id);
            }
        }

        for &id in &due {
            squad::listen(self.state, id);
        }

        for &id in &due {
            let coordinates = self.state.agent(id).is_some_and(|record| {
                record.is_leader && record.position.distance(target) > record.archetype.attack_range
            });
            if coordinates {
                squad::coordinate(self.state, id, target, env.config);
            }
        }

        let mut updated = 0;
        for &id in &due {
            if tactics::update(self.state, id, target, env.config).is_some() {
                updated += 1;
            }
        }
        updated
    }

    fn pathing_pass(
        &mut self,
        env: &HordeEnv<'_>,
        collaborators: &mut Collaborators<'_>,
        id: AgentId,
        target: Vec2,
        now: f32,
    ) -> bool {
        let Some(record) = self.state.agent_mut(id) else {
            return false;
        };
        if !record.path_due(now) {
            return false;
        }
        record.schedule_path(now);

        let Some(destination) = positioning::destination(self.state, env, id, target) else {
            return false;
        };
        let speed = effective_speed(self.state, env, id);
        let velocity = collaborators
            .navigator
            .request_move(id, MoveRequest { destination, speed });
        if let Some(record) = self.state.agent_mut(id) {
            record.destination = Some(destination);
            record.velocity = velocity;
        }
        true
    }

    fn stall_pass(
        &mut self,
        env: &HordeEnv<'_>,
        collaborators: &mut Collaborators<'_>,
        id: AgentId,
        tick: Tick,
        dt: f32,
    ) -> bool {
        let Some(record) = self.state.agent_mut(id) else {
            return false;
        };
        // Agents that were never sent anywhere cannot be stuck on a path.
        if record.destination.is_none() || !stuck::monitor(record, dt, env.config) {
            return false;
        }

        let nudge = stuck::nudge_destination(env, record, tick);
        tracing::debug!("agent {} stalled at {}, nudging to {}", id, record.position, nudge);
        let speed = effective_speed(self.state, env, id);
        collaborators.navigator.request_move(
            id,
            MoveRequest {
                destination: nudge,
                speed,
            },
        );
        if let Some(record) = self.state.agent_mut(id) {
            record.destination = Some(nudge);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HordeConfig;
    use crate::env::{
        DamageSink, Kinematics, Navigator, OpenField, PcgRng, TargetOracle, TargetSample,
    };
    use crate::state::{BodyHandle, TacticalState};

    struct Fixed(Option<Vec2>);
    impl TargetOracle for Fixed {
        fn target(&self) -> Option<TargetSample> {
            self.0.map(|position| TargetSample {
                position,
                velocity: Vec2::ZERO,
            })
        }
    }

    /// Navigation that never moves anything.
    #[derive(Default)]
    struct Frozen {
        requests: Vec<(AgentId, MoveRequest)>,
    }
    impl Navigator for Frozen {
        fn request_move(&mut self, agent: AgentId, request: MoveRequest) -> Vec2 {
            self.requests.push((agent, request));
            Vec2::ZERO
        }

        fn kinematics(&self, _: AgentId) -> Option<Kinematics> {
            None
        }
    }

    struct Immortal;
    impl DamageSink for Immortal {
        fn apply_damage(&mut self, _: f32, _: AgentId) {}

        fn is_alive(&self) -> bool {
            true
        }
    }

    struct Bodies {
        free: u32,
        next: u32,
    }
    impl AgentPool for Bodies {
        fn acquire(&mut self, _: &AgentArchetype, _: Vec2) -> Option<BodyHandle> {
            if self.free == 0 {
                return None;
            }
            self.free -= 1;
            self.next += 1;
            Some(BodyHandle(self.next))
        }

        fn release(&mut self, _: BodyHandle) {
            self.free += 1;
        }
    }

    #[test]
    fn spawn_reports_pool_exhaustion() {
        let config = HordeConfig::default();
        let target = Fixed(None);
        let env = HordeEnv::new(&OpenField, &target, &PcgRng, &config);
        let mut pool = Bodies { free: 1, next: 0 };
        let mut state = HordeState::new();
        let mut engine = HordeEngine::new(&mut state);
        let archetype = Arc::new(AgentArchetype::default());

        assert!(engine.spawn(&env, &mut pool, Arc::clone(&archetype), Vec2::ZERO).is_ok());
        assert_eq!(
            engine.spawn(&env, &mut pool, Arc::clone(&archetype), Vec2::ZERO),
            Err(SpawnError::PoolExhausted {
                archetype: "basic".to_owned()
            })
        );
        assert!(matches!(
            engine.spawn(&env, &mut pool, archetype, Vec2::new(f32::NAN, 0.0)),
            Err(SpawnError::InvalidPosition { .. })
        ));
        assert_eq!(state.agents.len(), 1);
    }

    #[test]
    fn preferred_leader_role_is_not_leadership() {
        let config = HordeConfig::default().with_leader_probability(0.0);
        let target = Fixed(None);
        let env = HordeEnv::new(&OpenField, &target, &PcgRng, &config);
        let mut pool = Bodies { free: 4, next: 0 };
        let mut state = HordeState::new();
        let archetype = Arc::new(
            AgentArchetype::builder("alpha")
                .can_be_leader(true)
                .preferred_role(TacticalRole::Leader)
                .build(),
        );
        let id = HordeEngine::new(&mut state)
            .spawn(&env, &mut pool, archetype, Vec2::ZERO)
            .unwrap();
        let record = state.agent(id).unwrap();
        assert!(!record.is_leader);
        assert_eq!(record.role, TacticalRole::Chaser);
    }

    #[test]
    fn absent_target_keeps_agents_in_place() {
        let config = HordeConfig::default();
        let target = Fixed(None);
        let env = HordeEnv::new(&OpenField, &target, &PcgRng, &config);
        let mut pool = Bodies { free: 4, next: 0 };
        let mut navigator = Frozen::default();
        let mut sink = Immortal;
        let mut state = HordeState::new();
        let mut engine = HordeEngine::new(&mut state);
        let id = engine
            .spawn(&env, &mut pool, Arc::new(AgentArchetype::default()), Vec2::ZERO)
            .unwrap();

        let mut collaborators = Collaborators::new(&mut navigator, &mut sink, &mut pool);
        for _ in 0..200 {
            let report = engine.step(&env, &mut collaborators, 0.1);
            assert!(!report.target_present);
            assert_eq!(report.nudges, 0);
        }
        assert_eq!(state.agent(id).unwrap().state, TacticalState::Idle);
        assert!(navigator.requests.is_empty());
    }

    fn insert(state: &mut HordeState, position: Vec2) -> AgentId {
        let archetype = Arc::new(AgentArchetype::default());
        state
            .agents
            .insert_with(|id| AgentRecord::spawn(id, BodyHandle(id.index), archetype, position, 0.0))
    }

    fn step_with(
        engine: &mut HordeEngine<'_>,
        collaborators: &mut Collaborators<'_>,
        config: &HordeConfig,
        target: Option<Vec2>,
    ) -> TickReport {
        let target = Fixed(target);
        let env = HordeEnv::new(&OpenField, &target, &PcgRng, config);
        engine.step(&env, collaborators, 0.1)
    }

    #[test]
    fn reacquired_target_keeps_the_last_velocity_estimate() {
        let config = HordeConfig::default().with_leader_probability(0.0);
        let mut pool = Bodies { free: 4, next: 0 };
        let mut navigator = Frozen::default();
        let mut sink = Immortal;
        let mut state = HordeState::new();
        let id = insert(&mut state, Vec2::ZERO);

        let mut engine = HordeEngine::new(&mut state);
        let mut collaborators = Collaborators::new(&mut navigator, &mut sink, &mut pool);

        step_with(&mut engine, &mut collaborators, &config, Some(Vec2::new(0.0, 10.0)));
        step_with(&mut engine, &mut collaborators, &config, Some(Vec2::new(0.2, 10.0)));
        let velocity = engine.state().agent(id).unwrap().estimated_target_velocity;
        assert!((velocity - Vec2::new(2.0, 0.0)).length() < 1e-3);

        for _ in 3..=50 {
            step_with(&mut engine, &mut collaborators, &config, None);
        }
        let report = step_with(&mut engine, &mut collaborators, &config, Some(Vec2::new(10.0, 10.0)));
        assert_eq!(report.tick, Tick(51));

        let record = engine.state().agent(id).unwrap();
        assert!((record.estimated_target_velocity - Vec2::new(2.0, 0.0)).length() < 1e-3);
        let predicted = record.predicted_target.unwrap();
        assert!((predicted - Vec2::new(12.0, 10.0)).length() < 1e-2);
    }

    #[test]
    fn members_before_their_leader_act_on_this_ticks_roles() {
        let mut config = HordeConfig::default().with_leader_probability(0.0);
        config.max_chasers = 0;
        let mut pool = Bodies { free: 4, next: 0 };
        let mut navigator = Frozen::default();
        let mut sink = Immortal;
        let mut state = HordeState::new();
        let member = insert(&mut state, Vec2::new(0.0, 1.0));
        let leader = insert(&mut state, Vec2::ZERO);
        state.agent_mut(leader).unwrap().become_leader();
        assert!(state.join_squad(member, leader));

        let mut engine = HordeEngine::new(&mut state);
        let mut collaborators = Collaborators::new(&mut navigator, &mut sink, &mut pool);
        let report = step_with(&mut engine, &mut collaborators, &config, Some(Vec2::new(20.0, 0.0)));
        assert_eq!(report.tactical_updates, 2);

        let record = state.agent(member).unwrap();
        assert_eq!(record.role, TacticalRole::Flanker);
        assert_eq!(record.state, TacticalState::Flanking);
        assert_eq!(state.agent(leader).unwrap().state, TacticalState::Surrounding);
    }

    #[test]
    fn coordination_bonus_needs_a_large_squad() {
        let config = HordeConfig::default();
        let target = Fixed(None);
        let env = HordeEnv::new(&OpenField, &target, &PcgRng, &config);
        let mut state = HordeState::new();
        let archetype = Arc::new(
            AgentArchetype::builder("z")
                .move_speed(2.0)
                .coordination_bonus(1.5)
                .build(),
        );
        let ids: Vec<AgentId> = (0..4)
            .map(|_| {
                let archetype = Arc::clone(&archetype);
                state.agents.insert_with(|id| {
                    AgentRecord::spawn(id, BodyHandle(id.index), archetype, Vec2::ZERO, 0.0)
                })
            })
            .collect();
        let base = 2.0 * config.difficulty.speed_multiplier();
        assert_eq!(effective_speed(&state, &env, ids[1]), base);

        state.agent_mut(ids[0]).unwrap().become_leader();
        state.join_squad(ids[1], ids[0]);
        state.join_squad(ids[2], ids[0]);
        assert_eq!(effective_speed(&state, &env, ids[1]), base);

        state.join_squad(ids[3], ids[0]);
        assert_eq!(effective_speed(&state, &env, ids[1]), base * 1.5);
        assert_eq!(effective_speed(&state, &env, ids[0]), base * 1.5);
    }
}
