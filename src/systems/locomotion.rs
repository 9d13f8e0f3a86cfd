//! Fixed-tick locomotion.
//!
//! Takes a [`ColliderSnapshot`] of every box collider, then runs
//! [`LocomotionController::fixed_update`] for each character against that
//! snapshot (minus the character itself). Velocity is written back to the
//! character's [`RigidBody`] and the controller's notices are triggered as
//! events.
use bevy_ecs::prelude::*;

use crate::components::boxcollider::BoxCollider;
use crate::components::collisionlayer::CollisionLayer;
use crate::components::locomotion::{CharacterBody, LocomotionController};
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::events::locomotion::trigger_notice;
use crate::resources::gravity::GravityDirector;
use crate::resources::physicsquery::ColliderSnapshot;
use crate::resources::worldtime::FixedTime;

pub fn locomotion_system(
    mut characters: Query<(
        Entity,
        &mut LocomotionController,
        &mut RigidBody,
        &MapPosition,
        &BoxCollider,
    )>,
    colliders: Query<(Entity, &MapPosition, &BoxCollider, Option<&CollisionLayer>)>,
    gravity: Res<GravityDirector>,
    fixed: Res<FixedTime>,
    mut commands: Commands,
) {
    let mut snapshot = ColliderSnapshot::new();
    for (entity, position, collider, layer) in colliders.iter() {
        snapshot.push(
            entity,
            collider.bounds(position.pos),
            layer.copied().unwrap_or_default().0,
        );
    }

    for (entity, mut controller, mut rigidbody, position, collider) in characters.iter_mut() {
        if rigidbody.frozen {
            continue;
        }
        let mut body = CharacterBody {
            position: position.pos,
            bounds: collider.bounds(position.pos),
            velocity: rigidbody.velocity,
            gravity: gravity.magnitude() * rigidbody.gravity_scale,
        };
        let notices = controller.fixed_update(&mut body, &snapshot.without(entity), fixed.step);
        rigidbody.velocity = body.velocity;
        for notice in notices {
            trigger_notice(&mut commands, entity, notice);
        }
    }
}
