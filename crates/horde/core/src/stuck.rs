//! Stall detection and the recovery nudge.

use crate::config::HordeConfig;
use crate::env::{HordeEnv, RollContext};
use crate::geometry::Vec2;
use crate::state::{AgentRecord, Tick};

/// Advances the stall timer with this tick's realized speed.
///
/// Returns `true` exactly once per continuous stall longer than the
/// archetype's `stuck_detection_time`. Moving again, or holding an ambush,
/// ends the episode.
pub fn monitor(record: &mut AgentRecord, dt: f32, config: &HordeConfig) -> bool {
    let stalled = record.velocity.length() < config.stall_speed_threshold;
    if !stalled || record.state.is_stationary() {
        record.stall = Default::default();
        return false;
    }

    record.stall.timer += dt.max(0.0);
    if record.stall.recovered || record.stall.timer <= record.archetype.stuck_detection_time {
        return false;
    }
    record.stall.timer = 0.0;
    record.stall.recovered = true;
    true
}

/// Random point near `record` to break a pathing deadlock.
pub fn nudge_destination(env: &HordeEnv<'_>, record: &AgentRecord, tick: Tick) -> Vec2 {
    let offset = env.roll_disc(tick, record.id, RollContext::StuckNudge);
    record.position + offset * env.config.stuck_nudge_radius
}
