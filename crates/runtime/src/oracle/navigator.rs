//! Straight-line navigation used by headless sessions.

use std::collections::BTreeMap;

use horde_core::{AgentId, Kinematics, LayerMask, MoveRequest, Navigator, ObstacleOracle, Vec2};

/// Clearance kept between a body and the obstacle it runs into.
const BODY_RADIUS: f32 = 0.3;

#[derive(Clone, Copy, Debug, Default)]
struct Body {
    kinematics: Kinematics,
    request: Option<MoveRequest>,
}

/// Moves each body straight at its requested destination.
///
/// There is no path planning: a body that runs into an obstacle stops in
/// front of it until a different destination is requested.
#[derive(Clone, Debug, Default)]
pub struct KinematicNavigator {
    bodies: BTreeMap<AgentId, Body>,
}

impl KinematicNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a body at `position`, at rest.
    pub fn insert(&mut self, agent: AgentId, position: Vec2) {
        self.bodies.insert(
            agent,
            Body {
                kinematics: Kinematics {
                    position,
                    velocity: Vec2::ZERO,
                },
                request: None,
            },
        );
    }

    pub fn remove(&mut self, agent: AgentId) -> bool {
        self.bodies.remove(&agent).is_some()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Integrates every body over `dt` seconds.
    pub fn advance(&mut self, dt: f32, obstacles: &dyn ObstacleOracle) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        for body in self.bodies.values_mut() {
            let start = body.kinematics.position;
            let end = match body.request {
                Some(request) => step_towards(start, request, dt, obstacles),
                None => start,
            };
            body.kinematics.position = end;
            body.kinematics.velocity = (end - start) / dt;
        }
    }
}

fn step_towards(start: Vec2, request: MoveRequest, dt: f32, obstacles: &dyn ObstacleOracle) -> Vec2 {
    let Some(direction) = start.direction_to(request.destination) else {
        return start;
    };
    let travel = (request.speed.max(0.0) * dt).min(start.distance(request.destination));
    if travel <= 0.0 {
        return start;
    }

    match obstacles.raycast(start, direction, travel + BODY_RADIUS, LayerMask::COVER) {
        Some(hit) => start + direction * (hit.distance - BODY_RADIUS).clamp(0.0, travel),
        None => start + direction * travel,
    }
}

impl Navigator for KinematicNavigator {
    fn request_move(&mut self, agent: AgentId, request: MoveRequest) -> Vec2 {
        match self.bodies.get_mut(&agent) {
            Some(body) => {
                body.request = Some(request);
                body.kinematics.velocity
            }
            None => {
                tracing::warn!("move requested for unknown body {}", agent);
                Vec2::ZERO
            }
        }
    }

    fn kinematics(&self, agent: AgentId) -> Option<Kinematics> {
        self.bodies.get(&agent).map(|body| body.kinematics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{Obstacle, ObstacleField};

    const AGENT: AgentId = AgentId::new(0, 0);

    #[test]
    fn moves_at_requested_speed_and_stops_on_arrival() {
        let mut navigator = KinematicNavigator::new();
        navigator.insert(AGENT, Vec2::ZERO);
        navigator.request_move(
            AGENT,
            MoveRequest {
                destination: Vec2::new(3.0, 0.0),
                speed: 2.0,
            },
        );

        let field = ObstacleField::default();
        navigator.advance(1.0, &field);
        let k = navigator.kinematics(AGENT).unwrap();
        assert_eq!(k.position, Vec2::new(2.0, 0.0));
        assert_eq!(k.velocity, Vec2::new(2.0, 0.0));

        navigator.advance(1.0, &field);
        navigator.advance(1.0, &field);
        let k = navigator.kinematics(AGENT).unwrap();
        assert_eq!(k.position, Vec2::new(3.0, 0.0));
        assert_eq!(k.velocity, Vec2::ZERO);
    }

    #[test]
    fn obstacles_stop_the_body() {
        let mut navigator = KinematicNavigator::new();
        navigator.insert(AGENT, Vec2::ZERO);
        navigator.request_move(
            AGENT,
            MoveRequest {
                destination: Vec2::new(10.0, 0.0),
                speed: 5.0,
            },
        );
        let field = ObstacleField::new(vec![Obstacle::rect(
            Vec2::new(2.0, -1.0),
            Vec2::new(3.0, 1.0),
        )]);

        for _ in 0..5 {
            navigator.advance(1.0, &field);
        }
        let k = navigator.kinematics(AGENT).unwrap();
        assert!((k.position.x - 1.7).abs() < 1e-4);
        assert_eq!(k.velocity, Vec2::ZERO);
    }

    #[test]
    fn unknown_bodies_are_ignored() {
        let mut navigator = KinematicNavigator::new();
        let request = MoveRequest {
            destination: Vec2::ZERO,
            speed: 1.0,
        };
        assert_eq!(navigator.request_move(AGENT, request), Vec2::ZERO);
        assert!(navigator.kinematics(AGENT).is_none());
    }
}
