//! Squad policy configuration loader.

use std::path::Path;

use horde_core::HordeConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`HordeConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> LoadResult<HordeConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<HordeConfig> {
        let config: HordeConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(0.0..=1.0).contains(&config.leader_probability) {
            anyhow::bail!(
                "leader_probability must be within [0, 1], got {}",
                config.leader_probability
            );
        }
        if config.escape_probe_length <= 0.0 {
            anyhow::bail!("escape_probe_length must be positive");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("max_chasers = 3\n[difficulty]\nlevel = 2\n").unwrap();
        assert_eq!(config.max_chasers, 3);
        assert_eq!(config.difficulty.level, 2);
        assert_eq!(config.max_flankers, HordeConfig::DEFAULT_MAX_FLANKERS);
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        assert!(ConfigLoader::parse("leader_probability = 1.5").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "rng_seed = 42\n").unwrap();
        assert_eq!(ConfigLoader::load(&path).unwrap().rng_seed, 42);
        assert!(ConfigLoader::load(&dir.path().join("missing.toml")).is_err());
    }
}
