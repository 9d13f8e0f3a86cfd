//! Rigid body integration.
//!
//! Runs once per fixed tick: world gravity (scaled per body) is added to the
//! velocity, then the position advances by the new velocity (semi-implicit
//! Euler). Frozen bodies are skipped.
use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::gravity::GravityDirector;
use crate::resources::worldtime::FixedTime;

pub fn movement_system(
    mut query: Query<(&mut MapPosition, &mut RigidBody)>,
    gravity: Res<GravityDirector>,
    fixed: Res<FixedTime>,
) {
    let dt = fixed.step;
    let g = gravity.vector();
    for (mut position, mut rigidbody) in query.iter_mut() {
        if rigidbody.frozen {
            continue;
        }
        let scale = rigidbody.gravity_scale;
        rigidbody.velocity += g * scale * dt;
        position.pos += rigidbody.velocity * dt;
    }
}
