//! Data-driven content for the horde simulation.
//!
//! This crate houses the archetype catalog and tactical policy and provides
//! loaders for RON/TOML data files:
//! - Agent archetypes (data-driven via RON)
//! - Squad policy configuration (data-driven via TOML)
//!
//! A built-in copy of both files is embedded in the binary, so sessions can
//! start without a data directory.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ArchetypeCatalog, ArchetypeLoader, ConfigLoader, ContentFactory, LoadResult,
    builtin_archetypes, builtin_config,
};
