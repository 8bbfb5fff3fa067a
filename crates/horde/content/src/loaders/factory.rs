//! Content factory for loading a data directory.

use std::path::{Path, PathBuf};

use horde_core::HordeConfig;

use crate::loaders::{ArchetypeCatalog, ArchetypeLoader, ConfigLoader, LoadResult};

/// Content factory that loads all horde content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── archetypes.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load squad policy from `config.toml`.
    pub fn load_config(&self) -> LoadResult<HordeConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load the archetype catalog from `archetypes.ron`.
    pub fn load_archetypes(&self) -> LoadResult<ArchetypeCatalog> {
        let path = self.data_dir.join("archetypes.ron");
        ArchetypeLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
