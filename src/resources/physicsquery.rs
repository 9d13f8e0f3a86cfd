//! Shape-cast and ray-cast queries against box colliders.
//!
//! Locomotion only talks to the world through the [`PhysicsQuery`] trait.
//! [`ColliderSnapshot`] is the in-crate implementation: a flat copy of every
//! collider's bounds and layer taken at the start of a fixed tick. Tests can
//! substitute their own implementation.
//!
//! Both queries return the nearest hit along the cast; ties go to the
//! collider seen first.

use bevy_ecs::prelude::Entity;
use glam::Vec2;

use crate::components::boxcollider::Aabb;
use crate::components::collisionlayer::LayerMask;

/// Result of a successful cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Collider that was hit.
    pub entity: Entity,
    /// For rays, the contact point. For shape casts, the shape center at contact.
    pub point: Vec2,
    /// Distance travelled along the cast direction (0 when already overlapping).
    pub distance: f32,
}

pub trait PhysicsQuery {
    /// Sweeps a box of `size` centered at `origin` along `direction` for `distance`.
    /// A zero distance is a plain overlap test.
    fn shape_cast(
        &self,
        origin: Vec2,
        size: Vec2,
        direction: Vec2,
        distance: f32,
        mask: LayerMask,
    ) -> Option<Hit>;

    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<Hit>;
}

#[derive(Debug, Clone, Copy)]
struct SnapshotCollider {
    entity: Entity,
    bounds: Aabb,
    layer: LayerMask,
}

/// Bounds and layers of all colliders at one instant.
#[derive(Debug, Clone, Default)]
pub struct ColliderSnapshot {
    colliders: Vec<SnapshotCollider>,
}

impl ColliderSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Entity, bounds: Aabb, layer: LayerMask) {
        self.colliders.push(SnapshotCollider {
            entity,
            bounds,
            layer,
        });
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// View that never reports `entity`, so a character does not sense itself.
    pub fn without(&self, entity: Entity) -> SnapshotView<'_> {
        SnapshotView {
            snapshot: self,
            skip: Some(entity),
        }
    }

    fn candidates(
        &self,
        mask: LayerMask,
        skip: Option<Entity>,
    ) -> impl Iterator<Item = &SnapshotCollider> {
        self.colliders
            .iter()
            .filter(move |c| mask.contains(c.layer) && Some(c.entity) != skip)
    }

    fn shape_cast_filtered(
        &self,
        origin: Vec2,
        size: Vec2,
        direction: Vec2,
        distance: f32,
        mask: LayerMask,
        skip: Option<Entity>,
    ) -> Option<Hit> {
        let shape = Aabb::from_center(origin, size);
        let half = shape.extents();
        let dir = direction.normalize_or_zero();
        let mut best: Option<Hit> = None;
        for collider in self.candidates(mask, skip) {
            let t = if shape.overlaps(&collider.bounds) {
                Some(0.0)
            } else if distance > 0.0 && dir != Vec2::ZERO {
                // sweeping a box is a ray against the Minkowski-grown target
                ray_vs_aabb(origin, dir, &collider.bounds.expanded(half))
                    .filter(|t| *t > 0.0 && *t <= distance)
            } else {
                None
            };
            if let Some(t) = t
                && best.is_none_or(|b| t < b.distance)
            {
                best = Some(Hit {
                    entity: collider.entity,
                    point: origin + dir * t,
                    distance: t,
                });
            }
        }
        best
    }

    fn ray_cast_filtered(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
        skip: Option<Entity>,
    ) -> Option<Hit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec2::ZERO {
            return None;
        }
        let mut best: Option<Hit> = None;
        for collider in self.candidates(mask, skip) {
            if let Some(t) = ray_vs_aabb(origin, dir, &collider.bounds)
                && t <= max_distance
                && best.is_none_or(|b| t < b.distance)
            {
                best = Some(Hit {
                    entity: collider.entity,
                    point: origin + dir * t,
                    distance: t,
                });
            }
        }
        best
    }
}

impl PhysicsQuery for ColliderSnapshot {
    fn shape_cast(
        &self,
        origin: Vec2,
        size: Vec2,
        direction: Vec2,
        distance: f32,
        mask: LayerMask,
    ) -> Option<Hit> {
        self.shape_cast_filtered(origin, size, direction, distance, mask, None)
    }

    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<Hit> {
        self.ray_cast_filtered(origin, direction, max_distance, mask, None)
    }
}

/// Borrowed snapshot that skips one entity.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotView<'a> {
    snapshot: &'a ColliderSnapshot,
    skip: Option<Entity>,
}

impl PhysicsQuery for SnapshotView<'_> {
    fn shape_cast(
        &self,
        origin: Vec2,
        size: Vec2,
        direction: Vec2,
        distance: f32,
        mask: LayerMask,
    ) -> Option<Hit> {
        self.snapshot
            .shape_cast_filtered(origin, size, direction, distance, mask, self.skip)
    }

    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<Hit> {
        self.snapshot
            .ray_cast_filtered(origin, direction, max_distance, mask, self.skip)
    }
}

/// Slab test. Returns the entry distance along a normalized `dir`, or 0 when
/// the origin is inside. Rays running parallel to a face only count when
/// strictly between the slabs, so grazing an edge is not a hit.
fn ray_vs_aabb(origin: Vec2, dir: Vec2, bounds: &Aabb) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..2 {
        let (o, d, lo, hi) = (origin[axis], dir[axis], bounds.min[axis], bounds.max[axis]);
        if d == 0.0 {
            if o <= lo || o >= hi {
                return None;
            }
            continue;
        }
        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
    }
    if t_min > t_max || t_max < 0.0 {
        return None;
    }
    Some(t_min.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    fn floor_and_wall() -> (ColliderSnapshot, Entity, Entity) {
        let ids = entities(2);
        let mut snapshot = ColliderSnapshot::new();
        // floor: top at y = 0
        snapshot.push(
            ids[0],
            Aabb::from_corners(Vec2::new(-10.0, -1.0), Vec2::new(10.0, 0.0)),
            LayerMask::GROUND,
        );
        // wall: left face at x = 3
        snapshot.push(
            ids[1],
            Aabb::from_corners(Vec2::new(3.0, 0.0), Vec2::new(4.0, 2.0)),
            LayerMask::OBSTACLE,
        );
        (snapshot, ids[0], ids[1])
    }

    #[test]
    fn overlap_cast_detects_floor_under_edge() {
        let (snapshot, floor, _) = floor_and_wall();
        let hit = snapshot
            .shape_cast(Vec2::ZERO, Vec2::new(0.75, 0.05), Vec2::NEG_Y, 0.0, LayerMask::ALL)
            .unwrap();
        assert_eq!(hit.entity, floor);
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn overlap_cast_misses_when_hovering() {
        let (snapshot, _, _) = floor_and_wall();
        let hit = snapshot.shape_cast(
            Vec2::new(0.0, 0.1),
            Vec2::new(0.75, 0.05),
            Vec2::NEG_Y,
            0.0,
            LayerMask::ALL,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn swept_cast_reports_travel_distance() {
        let (snapshot, floor, _) = floor_and_wall();
        let hit = snapshot
            .shape_cast(Vec2::new(0.0, 2.0), Vec2::new(1.0, 1.0), Vec2::NEG_Y, 5.0, LayerMask::ALL)
            .unwrap();
        assert_eq!(hit.entity, floor);
        assert!(approx_eq(hit.distance, 1.5));
        assert!(approx_eq(hit.point.y, 0.5));
    }

    #[test]
    fn ray_hits_wall_within_distance() {
        let (snapshot, _, wall) = floor_and_wall();
        let hit = snapshot
            .ray_cast(Vec2::new(2.95, 1.0), Vec2::X, 0.1, LayerMask::OBSTACLE)
            .unwrap();
        assert_eq!(hit.entity, wall);
        assert!(approx_eq(hit.distance, 0.05));
        assert!(approx_eq(hit.point.x, 3.0));

        assert!(snapshot
            .ray_cast(Vec2::new(2.5, 1.0), Vec2::X, 0.1, LayerMask::OBSTACLE)
            .is_none());
    }

    #[test]
    fn ray_from_touching_face_hits_at_zero() {
        let (snapshot, _, wall) = floor_and_wall();
        let hit = snapshot
            .ray_cast(Vec2::new(3.0, 1.0), Vec2::X, 0.1, LayerMask::ALL)
            .unwrap();
        assert_eq!(hit.entity, wall);
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn mask_filters_layers() {
        let (snapshot, _, _) = floor_and_wall();
        assert!(snapshot
            .ray_cast(Vec2::new(2.95, 1.0), Vec2::X, 0.1, LayerMask::GROUND)
            .is_none());
        assert!(snapshot
            .shape_cast(Vec2::ZERO, Vec2::new(0.75, 0.05), Vec2::NEG_Y, 0.0, !LayerMask::GROUND)
            .is_none());
    }

    #[test]
    fn nearest_hit_wins() {
        let ids = entities(2);
        let mut snapshot = ColliderSnapshot::new();
        snapshot.push(
            ids[0],
            Aabb::from_corners(Vec2::new(5.0, -1.0), Vec2::new(6.0, 1.0)),
            LayerMask::DEFAULT,
        );
        snapshot.push(
            ids[1],
            Aabb::from_corners(Vec2::new(2.0, -1.0), Vec2::new(3.0, 1.0)),
            LayerMask::DEFAULT,
        );
        let hit = snapshot
            .ray_cast(Vec2::ZERO, Vec2::X, 10.0, LayerMask::ALL)
            .unwrap();
        assert_eq!(hit.entity, ids[1]);
    }

    #[test]
    fn view_skips_own_collider() {
        let ids = entities(1);
        let mut snapshot = ColliderSnapshot::new();
        snapshot.push(
            ids[0],
            Aabb::from_center(Vec2::ZERO, Vec2::ONE),
            LayerMask::PLAYER,
        );
        let view = snapshot.without(ids[0]);
        assert!(view
            .shape_cast(Vec2::ZERO, Vec2::ONE, Vec2::NEG_Y, 0.0, LayerMask::ALL)
            .is_none());
        assert!(snapshot
            .shape_cast(Vec2::ZERO, Vec2::ONE, Vec2::NEG_Y, 0.0, LayerMask::ALL)
            .is_some());
    }

    #[test]
    fn grazing_ray_along_surface_is_not_a_hit() {
        let (snapshot, _, _) = floor_and_wall();
        assert!(snapshot
            .ray_cast(Vec2::new(-5.0, 0.0), Vec2::X, 20.0, LayerMask::GROUND)
            .is_none());
    }
}
