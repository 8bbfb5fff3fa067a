//! Common error infrastructure for horde-core.
//!
//! Tick processing never fails: missing references and degenerate geometry
//! degrade to fallback state the state machine already handles. The error
//! types here cover the two surfaces that do report to a caller:
//!
//! - **Spawn requests** ([`SpawnError`]): the pool may be exhausted.
//! - **Invariant audits** ([`InvariantViolation`]): programming errors in
//!   squad bookkeeping, asserted in debug builds.

use crate::state::AgentId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the caller may retry later.
    ///
    /// Examples: pool exhausted on spawn
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    ///
    /// Examples: non-finite spawn position
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    ///
    /// Examples: squad nested two levels deep, agent listed in two squads
    Internal,

    /// State is corrupted and the session cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all horde-core errors.
pub trait HordeError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Failure to bring a new agent into the simulation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SpawnError {
    #[error("agent pool exhausted while spawning '{archetype}'")]
    PoolExhausted { archetype: String },

    #[error("spawn position ({x}, {y}) is not finite")]
    InvalidPosition { x: f32, y: f32 },
}

impl HordeError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PoolExhausted { .. } => ErrorSeverity::Recoverable,
            Self::InvalidPosition { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PoolExhausted { .. } => "SPAWN_POOL_EXHAUSTED",
            Self::InvalidPosition { .. } => "SPAWN_INVALID_POSITION",
        }
    }
}

/// Broken squad bookkeeping detected by [`crate::HordeState::audit`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("agent {0} lists itself as a squad member")]
    SelfMembership(AgentId),

    #[error("leader {leader} lists {member}, which is itself a leader with members")]
    NestedSquad { leader: AgentId, member: AgentId },

    #[error("agent {member} is listed by both {first} and {second}")]
    DuplicateMembership {
        member: AgentId,
        first: AgentId,
        second: AgentId,
    },

    #[error("leader {leader} lists {member}, whose leader reference is {actual:?}")]
    AsymmetricMembership {
        leader: AgentId,
        member: AgentId,
        actual: Option<AgentId>,
    },

    #[error("leader {leader} lists {member}, which no longer exists")]
    DanglingMember { leader: AgentId, member: AgentId },

    #[error("non-leader {0} owns a member list")]
    MembersWithoutLeadership(AgentId),
}

impl HordeError for InvariantViolation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SelfMembership(_) => "SQUAD_SELF_MEMBERSHIP",
            Self::NestedSquad { .. } => "SQUAD_NESTED",
            Self::DuplicateMembership { .. } => "SQUAD_DUPLICATE_MEMBERSHIP",
            Self::AsymmetricMembership { .. } => "SQUAD_ASYMMETRIC_MEMBERSHIP",
            Self::DanglingMember { .. } => "SQUAD_DANGLING_MEMBER",
            Self::MembersWithoutLeadership(_) => "SQUAD_MEMBERS_WITHOUT_LEADERSHIP",
        }
    }
}
