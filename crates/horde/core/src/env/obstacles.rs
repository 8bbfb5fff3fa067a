//! Obstacle queries used for line of sight, escape routes and cover.

use crate::geometry::Vec2;

bitflags::bitflags! {
    /// Collision layers a query may hit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LayerMask: u8 {
        const DEFAULT = 0b0001;
        const OBSTACLES = 0b0010;
        const AGENTS = 0b0100;
        const TARGET = 0b1000;
    }
}

impl LayerMask {
    /// Geometry that blocks vision.
    pub const SIGHT_BLOCKERS: Self = Self::DEFAULT.union(Self::OBSTACLES);
    /// Geometry that blocks movement and provides cover.
    pub const COVER: Self = Self::OBSTACLES;
}

/// Nearest intersection reported by a raycast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
    pub layer: LayerMask,
}

/// Geometry found by an overlap query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    /// Centre of the collider.
    pub position: Vec2,
    pub layer: LayerMask,
}

/// Read-only physics queries against static world geometry.
pub trait ObstacleOracle {
    /// Casts a ray and returns the nearest hit on `mask` within `max_distance`.
    ///
    /// `direction` must be a unit vector.
    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;

    /// Returns every collider on `mask` overlapping the circle.
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<Collider>;

    /// True when nothing on `mask` lies strictly between `from` and `to`.
    fn is_clear(&self, from: Vec2, to: Vec2, mask: LayerMask) -> bool {
        let Some(direction) = from.direction_to(to) else {
            return true;
        };
        let distance = from.distance(to);
        match self.raycast(from, direction, distance, mask) {
            Some(hit) => hit.distance >= distance,
            None => true,
        }
    }
}

/// World with no obstacles at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenField;

impl ObstacleOracle for OpenField {
    fn raycast(&self, _: Vec2, _: Vec2, _: f32, _: LayerMask) -> Option<RayHit> {
        None
    }

    fn overlap_circle(&self, _: Vec2, _: f32, _: LayerMask) -> Vec<Collider> {
        Vec::new()
    }
}
