//! Escape-route analysis run by squad leaders.

use crate::config::HordeConfig;
use crate::env::{LayerMask, ObstacleOracle};
use crate::geometry::Vec2;
use crate::state::{AgentId, EscapeRoutes, HordeState};

/// Samples the compass around `center` and returns the uncovered escape points.
///
/// A direction qualifies when a probe of `escape_probe_length` from `center`
/// hits no cover and no position in `guards` lies within
/// `escape_proximity_radius` of the probe's end point.
pub fn find_escape_routes(
    center: Vec2,
    guards: &[Vec2],
    obstacles: &dyn ObstacleOracle,
    config: &HordeConfig,
) -> EscapeRoutes {
    let step = 360.0 / HordeConfig::ESCAPE_DIRECTIONS as f32;
    let mut routes = EscapeRoutes::new();

    for i in 0..HordeConfig::ESCAPE_DIRECTIONS {
        let direction = Vec2::from_angle_degrees(step * i as f32);
        if obstacles
            .raycast(center, direction, config.escape_probe_length, LayerMask::COVER)
            .is_some()
        {
            continue;
        }

        let point = center + direction * config.escape_probe_length;
        let covered = guards
            .iter()
            .any(|guard| guard.distance(point) <= config.escape_proximity_radius);
        if !covered {
            routes.push(point);
        }
    }

    routes
}

/// Replaces `leader`'s escape-route list with a fresh analysis.
///
/// The probe is centred on the leader's predicted target position; leaders
/// that have never perceived the target keep an empty list.
pub fn analyze_escape_routes(
    state: &mut HordeState,
    leader: AgentId,
    obstacles: &dyn ObstacleOracle,
    config: &HordeConfig,
) -> usize {
    let Some(center) = state
        .agent(leader)
        .filter(|record| record.is_leader)
        .and_then(|record| record.predicted_target.or(state.target.current))
    else {
        return 0;
    };

    let guards: Vec<Vec2> = state
        .squad_roster(leader)
        .into_iter()
        .filter_map(|id| state.agent(id).map(|record| record.position))
        .collect();

    let routes = find_escape_routes(center, &guards, obstacles, config);
    let count = routes.len();
    if let Some(record) = state.agent_mut(leader) {
        record.escape_routes = routes;
    }
    tracing::debug!("leader {} found {} open escape routes", leader, count);
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Collider, OpenField, RayHit};

    /// Blocks every probe that heads into the +x half plane.
    struct EastWall;

    impl ObstacleOracle for EastWall {
        fn raycast(&self, origin: Vec2, direction: Vec2, _: f32, _: LayerMask) -> Option<RayHit> {
            (direction.x > 0.1).then(|| RayHit {
                point: origin + direction,
                distance: 1.0,
                layer: LayerMask::OBSTACLES,
            })
        }

        fn overlap_circle(&self, _: Vec2, _: f32, _: LayerMask) -> Vec<Collider> {
            Vec::new()
        }
    }

    #[test]
    fn open_field_yields_all_directions() {
        let routes = find_escape_routes(Vec2::ZERO, &[], &OpenField, &HordeConfig::default());
        assert_eq!(routes.len(), HordeConfig::ESCAPE_DIRECTIONS);
        assert!(routes.iter().all(|p| (p.length() - 5.0).abs() < 1e-4));
    }

    #[test]
    fn blocked_directions_are_dropped() {
        let routes = find_escape_routes(Vec2::ZERO, &[], &EastWall, &HordeConfig::default());
        // 0°, 45° and 315° point east.
        assert_eq!(routes.len(), 5);
        assert!(routes.iter().all(|p| p.x <= 1e-3));
    }

    #[test]
    fn guarded_points_are_never_reported() {
        let config = HordeConfig::default();
        // Deterministic pseudo-random guard placements.
        let mut seed = 0x1234_5678u32;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            (seed % 2000) as f32 / 100.0 - 10.0
        };

        for _ in 0..200 {
            let guards: Vec<Vec2> = (0..4).map(|_| Vec2::new(next(), next())).collect();
            let routes = find_escape_routes(Vec2::ZERO, &guards, &OpenField, &config);
            for route in &routes {
                assert!(
                    guards
                        .iter()
                        .all(|g| g.distance(*route) > config.escape_proximity_radius),
                    "route {route} is within reach of a guard"
                );
            }
        }
    }
}
