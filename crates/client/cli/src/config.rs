//! Headless runner configuration.
use std::env;
use std::path::PathBuf;

/// Settings for one CLI session.
#[derive(Clone, Debug, PartialEq)]
pub struct CliConfig {
    /// Directory holding `config.toml` and `archetypes.ron`. Built-in content
    /// is used when unset.
    pub data_dir: Option<PathBuf>,
    /// Scenario RON file. The built-in demo is used when unset.
    pub scenario: Option<PathBuf>,
    pub ticks: u64,
    /// Seconds per tick.
    pub dt: f32,
    pub seed: Option<u64>,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            scenario: None,
            ticks: 600,
            dt: 1.0 / 60.0,
            seed: None,
            session_id: None,
            log_dir: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `HORDE_DATA_DIR` - Content directory (default: built-in content)
    /// - `HORDE_SCENARIO` - Scenario file (default: built-in demo)
    /// - `HORDE_TICKS` - Number of ticks to run (default: 600)
    /// - `HORDE_DT` - Seconds per tick (default: 1/60)
    /// - `HORDE_SEED` - RNG seed override
    /// - `HORDE_SESSION_ID` - Session identifier for logs (default: timestamp)
    /// - `HORDE_LOG_DIR` - Log directory (default: platform cache directory)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let parse = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        config.data_dir = parse("HORDE_DATA_DIR").map(PathBuf::from);
        config.scenario = parse("HORDE_SCENARIO").map(PathBuf::from);

        if let Some(ticks) = parse("HORDE_TICKS").and_then(|v| v.trim().parse().ok()) {
            config.ticks = ticks;
        }
        if let Some(dt) = parse("HORDE_DT")
            .and_then(|v| v.trim().parse::<f32>().ok())
            .filter(|dt| dt.is_finite() && *dt > 0.0)
        {
            config.dt = dt;
        }

        config.seed = parse("HORDE_SEED").and_then(|v| v.trim().parse().ok());
        config.session_id = parse("HORDE_SESSION_ID");
        config.log_dir = parse("HORDE_LOG_DIR").map(PathBuf::from);

        config
    }
}
