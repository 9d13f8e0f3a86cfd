//! Static collision resolution.
//!
//! Dynamic bodies (entities with a [`RigidBody`]) are pushed out of static
//! colliders (entities with a [`BoxCollider`] but no `RigidBody`) along the
//! axis of least penetration. The velocity component pointing into the surface
//! is zeroed so the body rests on it. Dynamic bodies never collide with each
//! other.
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::boxcollider::{Aabb, BoxCollider};
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;

/// Smallest translation that moves `moving` out of `fixed`, if they overlap.
pub fn penetration(moving: &Aabb, fixed: &Aabb) -> Option<Vec2> {
    if !moving.overlaps(fixed) {
        return None;
    }
    let push_right = fixed.max.x - moving.min.x;
    let push_left = moving.max.x - fixed.min.x;
    let push_up = fixed.max.y - moving.min.y;
    let push_down = moving.max.y - fixed.min.y;

    let x = if push_right < push_left {
        push_right
    } else {
        -push_left
    };
    let y = if push_up < push_down {
        push_up
    } else {
        -push_down
    };

    if x.abs() < y.abs() {
        Some(Vec2::new(x, 0.0))
    } else {
        Some(Vec2::new(0.0, y))
    }
}

pub fn collision_resolver(
    mut bodies: Query<(&mut MapPosition, &mut RigidBody, &BoxCollider)>,
    statics: Query<(&MapPosition, &BoxCollider), Without<RigidBody>>,
) {
    for (mut position, mut rigidbody, collider) in bodies.iter_mut() {
        if rigidbody.frozen {
            continue;
        }
        for (static_position, static_collider) in statics.iter() {
            let fixed = static_collider.bounds(static_position.pos);
            let Some(push) = penetration(&collider.bounds(position.pos), &fixed) else {
                continue;
            };
            position.pos += push;
            // only cancel velocity that still points into the surface
            if push.x != 0.0 && rigidbody.velocity.x * push.x < 0.0 {
                rigidbody.velocity.x = 0.0;
            }
            if push.y != 0.0 && rigidbody.velocity.y * push.y < 0.0 {
                rigidbody.velocity.y = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn run(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(collision_resolver);
        schedule.run(world);
    }

    #[test]
    fn test_penetration_none_when_apart() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::from_center(Vec2::new(3.0, 0.0), Vec2::ONE);
        assert_eq!(penetration(&a, &b), None);
    }

    #[test]
    fn test_penetration_picks_shallow_axis() {
        let floor = Aabb::from_corners(Vec2::new(-10.0, -1.0), Vec2::new(10.0, 0.0));
        let body = Aabb::from_corners(Vec2::new(0.0, -0.1), Vec2::new(1.0, 1.9));
        let push = penetration(&body, &floor).unwrap();
        assert!(approx_eq(push.x, 0.0));
        assert!(approx_eq(push.y, 0.1));

        let wall = Aabb::from_corners(Vec2::new(2.0, -5.0), Vec2::new(3.0, 5.0));
        let body = Aabb::from_corners(Vec2::new(1.2, 0.0), Vec2::new(2.2, 2.0));
        let push = penetration(&body, &wall).unwrap();
        assert!(approx_eq(push.x, -0.2));
        assert!(approx_eq(push.y, 0.0));
    }

    #[test]
    fn test_body_rests_on_floor() {
        let mut world = World::new();
        world.spawn((
            MapPosition::new(0.0, -0.5),
            BoxCollider::centered(20.0, 1.0),
        ));
        let mut rb = RigidBody::new();
        rb.set_velocity(Vec2::new(2.0, -3.0));
        let body = world
            .spawn((MapPosition::new(0.0, 0.9), rb, BoxCollider::centered(1.0, 2.0)))
            .id();
        run(&mut world);
        let pos = world.get::<MapPosition>(body).unwrap().pos;
        assert!(approx_eq(pos.y, 1.0));
        let velocity = world.get::<RigidBody>(body).unwrap().velocity;
        assert_eq!(velocity, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_outward_velocity_is_kept() {
        let mut world = World::new();
        world.spawn((MapPosition::new(0.0, 3.5), BoxCollider::centered(20.0, 1.0)));
        let mut rb = RigidBody::new();
        rb.set_velocity(Vec2::new(0.0, -1.0));
        let body = world
            .spawn((MapPosition::new(0.0, 2.1), rb, BoxCollider::centered(1.0, 2.0)))
            .id();
        run(&mut world);
        assert!(approx_eq(world.get::<MapPosition>(body).unwrap().pos.y, 2.0));
        assert_eq!(world.get::<RigidBody>(body).unwrap().velocity.y, -1.0);
    }
}
