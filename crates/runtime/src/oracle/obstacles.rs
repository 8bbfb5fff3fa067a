//! Static obstacle geometry served through [`horde_core::ObstacleOracle`].

use horde_core::{Collider, LayerMask, ObstacleOracle, RayHit, Vec2};
use serde::{Deserialize, Serialize};

/// Shape of one static obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    /// Axis-aligned box.
    Rect { min: Vec2, max: Vec2 },
}

impl Shape {
    fn center(&self) -> Vec2 {
        match *self {
            Shape::Circle { center, .. } => center,
            Shape::Rect { min, max } => (min + max) * 0.5,
        }
    }

    /// Entry distance of the ray into the shape, `0` if `origin` is inside.
    fn ray_entry(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<f32> {
        let t = match *self {
            Shape::Circle { center, radius } => {
                let m = origin - center;
                let b = m.dot(direction);
                let c = m.length_squared() - radius * radius;
                if c > 0.0 && b > 0.0 {
                    return None;
                }
                let discriminant = b * b - c;
                if discriminant < 0.0 {
                    return None;
                }
                (-b - discriminant.sqrt()).max(0.0)
            }
            Shape::Rect { min, max } => {
                let mut t_min = 0.0f32;
                let mut t_max = max_distance;
                for (o, d, lo, hi) in [
                    (origin.x, direction.x, min.x, max.x),
                    (origin.y, direction.y, min.y, max.y),
                ] {
                    if d.abs() <= f32::EPSILON {
                        if o < lo || o > hi {
                            return None;
                        }
                        continue;
                    }
                    let (mut t1, mut t2) = ((lo - o) / d, (hi - o) / d);
                    if t1 > t2 {
                        core::mem::swap(&mut t1, &mut t2);
                    }
                    t_min = t_min.max(t1);
                    t_max = t_max.min(t2);
                    if t_min > t_max {
                        return None;
                    }
                }
                t_min
            }
        };
        (t <= max_distance).then_some(t)
    }

    fn overlaps_circle(&self, point: Vec2, radius: f32) -> bool {
        match *self {
            Shape::Circle { center, radius: r } => center.distance(point) <= r + radius,
            Shape::Rect { min, max } => {
                let closest = Vec2::new(point.x.clamp(min.x, max.x), point.y.clamp(min.y, max.y));
                closest.distance(point) <= radius
            }
        }
    }
}

/// One obstacle placed in the world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub shape: Shape,
    /// Cover obstacles block movement and hide ambushers. Others only block
    /// sight.
    #[serde(default = "default_cover")]
    pub cover: bool,
}

fn default_cover() -> bool {
    true
}

impl Obstacle {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self {
            shape: Shape::Circle { center, radius },
            cover: true,
        }
    }

    pub fn rect(min: Vec2, max: Vec2) -> Self {
        Self {
            shape: Shape::Rect { min, max },
            cover: true,
        }
    }

    fn layer(&self) -> LayerMask {
        if self.cover {
            LayerMask::OBSTACLES
        } else {
            LayerMask::DEFAULT
        }
    }
}

/// Obstacle set queried by perception, escape analysis and navigation.
#[derive(Clone, Debug, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }
}

impl ObstacleOracle for ObstacleField {
    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        self.obstacles
            .iter()
            .filter(|obstacle| mask.intersects(obstacle.layer()))
            .filter_map(|obstacle| {
                let distance = obstacle.shape.ray_entry(origin, direction, max_distance)?;
                Some(RayHit {
                    point: origin + direction * distance,
                    distance,
                    layer: obstacle.layer(),
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<Collider> {
        self.obstacles
            .iter()
            .filter(|obstacle| mask.intersects(obstacle.layer()))
            .filter(|obstacle| obstacle.shape.overlaps_circle(center, radius))
            .map(|obstacle| Collider {
                position: obstacle.shape.center(),
                layer: obstacle.layer(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> ObstacleField {
        ObstacleField::new(vec![
            Obstacle::circle(Vec2::new(5.0, 0.0), 1.0),
            Obstacle::rect(Vec2::new(-4.0, -1.0), Vec2::new(-3.0, 1.0)),
            Obstacle {
                shape: Shape::Circle {
                    center: Vec2::new(0.0, 5.0),
                    radius: 1.0,
                },
                cover: false,
            },
        ])
    }

    #[test]
    fn ray_hits_nearest_surface() {
        let field = field();
        let hit = field
            .raycast(Vec2::ZERO, Vec2::RIGHT, 10.0, LayerMask::SIGHT_BLOCKERS)
            .unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-4);

        let hit = field
            .raycast(Vec2::ZERO, Vec2::new(-1.0, 0.0), 10.0, LayerMask::COVER)
            .unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-4);

        assert!(field.raycast(Vec2::ZERO, Vec2::RIGHT, 3.5, LayerMask::COVER).is_none());
    }

    #[test]
    fn sight_only_obstacles_are_not_cover() {
        let field = field();
        let up = Vec2::new(0.0, 1.0);
        assert!(field.raycast(Vec2::ZERO, up, 10.0, LayerMask::COVER).is_none());
        assert!(field.raycast(Vec2::ZERO, up, 10.0, LayerMask::SIGHT_BLOCKERS).is_some());
        assert!(!field.is_clear(Vec2::ZERO, Vec2::new(0.0, 10.0), LayerMask::SIGHT_BLOCKERS));
    }

    #[test]
    fn overlap_reports_collider_centres() {
        let field = field();
        let hits = field.overlap_circle(Vec2::new(-2.0, 0.0), 1.5, LayerMask::COVER);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, Vec2::new(-3.5, 0.0));
        assert!(field.overlap_circle(Vec2::new(20.0, 20.0), 1.0, LayerMask::all()).is_empty());
    }
}
