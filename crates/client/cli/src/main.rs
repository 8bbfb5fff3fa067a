//! Headless horde runner.
//!
//! Loads content and a scenario, runs the session for a fixed number of ticks
//! and prints the final report as JSON on stdout. Logs go to stderr and to a
//! per-session log file.
mod config;
mod logging;

use anyhow::{Context, Result};
use config::CliConfig;
use horde_content::ContentFactory;
use horde_runtime::{Scenario, Simulation};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    logging::setup_logging(config.session_id.as_deref(), config.log_dir.clone())?;

    let report = run(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run(config: &CliConfig) -> Result<horde_runtime::SimulationReport> {
    let scenario = match &config.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario::demo()?,
    };
    tracing::info!(
        "scenario '{}': {} spawns, {} obstacles",
        scenario.name,
        scenario.spawns.len(),
        scenario.obstacles.len()
    );

    let mut builder = Simulation::builder();
    if let Some(dir) = &config.data_dir {
        let factory = ContentFactory::new(dir.clone());
        builder = builder
            .config(factory.load_config()?)
            .catalog(factory.load_archetypes()?);
        tracing::info!("content loaded from {}", dir.display());
    }
    if let Some(seed) = config.seed {
        builder = builder.seed(seed);
    }
    let mut simulation = builder.scenario(scenario).build()?;

    tracing::info!("running {} ticks at dt={:.4}", config.ticks, config.dt);
    let report = simulation.run(config.ticks, config.dt);
    tracing::info!(
        "finished: {} agents alive, {} deaths, target health {:.1}",
        report.agents_alive,
        report.totals.deaths,
        report.target_health
    );
    Ok(report)
}
