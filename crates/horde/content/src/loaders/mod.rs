//! Content loaders for reading horde data from files.

pub mod archetypes;
pub mod config;
pub mod factory;

pub use archetypes::{ArchetypeCatalog, ArchetypeLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

const BUILTIN_ARCHETYPES: &str = include_str!("../../data/archetypes.ron");
const BUILTIN_CONFIG: &str = include_str!("../../data/config.toml");

/// Archetype catalog embedded at build time.
pub fn builtin_archetypes() -> LoadResult<ArchetypeCatalog> {
    ArchetypeLoader::parse(BUILTIN_ARCHETYPES)
}

/// Policy configuration embedded at build time.
pub fn builtin_config() -> LoadResult<horde_core::HordeConfig> {
    ConfigLoader::parse(BUILTIN_CONFIG)
}

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_content_parses() {
        let catalog = builtin_archetypes().unwrap();
        assert_eq!(catalog.len(), 5);
        assert!(catalog.get("alpha").unwrap().can_be_leader);

        let config = builtin_config().unwrap();
        assert_eq!(config, horde_core::HordeConfig::default());
    }
}
