//! Tactical decision layer for squads of pursuit agents.
//!
//! `horde-core` decides, every simulation tick, where each agent moves, which
//! role it plays in its squad and when it attacks the evading target. It is
//! pure and synchronous: navigation, obstacle queries, body pooling and the
//! target itself are reached through the collaborator traits in [`env`], and
//! all mutable state lives in [`HordeState`], driven by [`HordeEngine`].
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod geometry;
pub mod perception;
pub mod positioning;
pub mod squad;
pub mod state;
pub mod stuck;
pub mod tactics;

pub use combat::DamageOutcome;
pub use config::{Difficulty, HordeConfig};
pub use engine::{HordeEngine, TickReport, effective_speed};
pub use env::{
    AgentPool, Collaborators, Collider, DamageSink, HordeEnv, Kinematics, LayerMask, MoveRequest,
    Navigator, ObstacleOracle, OpenField, PcgRng, RayHit, RngOracle, RollContext, TargetOracle,
    TargetSample,
};
pub use error::{ErrorSeverity, HordeError, InvariantViolation, SpawnError};
pub use geometry::Vec2;
pub use state::{
    AgentArchetype, AgentArchetypeBuilder, AgentId, AgentRecord, AgentTable, BodyHandle,
    EscapeRoutes, HordeState, SimClock, StallMonitor, TacticalRole, TacticalState, Tick,
    TargetTrack,
};
