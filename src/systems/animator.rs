//! Animator parameter publishing.
//!
//! Runs in the presentation phase, after the fixed ticks of the frame, and
//! copies locomotion state into each character's
//! [`AnimatorParams`](crate::components::animatorparams::AnimatorParams).
use bevy_ecs::prelude::*;

use crate::components::animatorparams::{
    AnimatorParams, GRAVITY_DIRECTION, IS_GROUNDED, IS_OBSTACLE_IN_FRONT, IS_RUNNING, SPEED,
    Y_VELOCITY,
};
use crate::components::locomotion::LocomotionController;
use crate::components::rigidbody::RigidBody;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gravity::{GravityDirection, GravityDirector};

/// `YVelocity` is measured along the character's own up axis, so a rising
/// character reports a positive value in every gravity direction.
pub fn animator_params_system(
    mut query: Query<(&LocomotionController, &RigidBody, &mut AnimatorParams)>,
    gravity: Res<GravityDirector>,
    config: Res<GameConfig>,
) {
    let gravity_param = if gravity.direction() == GravityDirection::Down {
        -1.0
    } else {
        1.0
    };

    for (controller, rigidbody, mut params) in query.iter_mut() {
        let frame = controller.frame();
        let v = rigidbody.velocity;
        params.set_float(Y_VELOCITY, frame.vertical(v) * frame.orientation);
        params.set_float(SPEED, frame.lateral(v).abs());
        params.set_bool(IS_GROUNDED, controller.is_grounded());
        params.set_bool(IS_OBSTACLE_IN_FRONT, controller.is_obstacle_in_front());
        params.set_bool(IS_RUNNING, controller.is_running());
        params.set_float(GRAVITY_DIRECTION, gravity_param);
        params.speed = if controller.is_running() && controller.is_obstacle_in_front() {
            config.push_run_speed
        } else {
            1.0
        };
    }
}
