//! Gravity change events and observers.
//!
//! [`GravityDirectionChangedEvent`] is triggered by
//! [`change_gravity`](crate::systems::gravity::change_gravity) every time the
//! direction is applied, including re-applying the current one.
//! [`ChangeGravityEvent`] is a request that systems can trigger through
//! `Commands` when they have no `&mut World` at hand.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use crate::components::locomotion::LocomotionController;
use crate::components::scale::Scale;
use crate::resources::gravity::GravityDirection;
use crate::systems::gravity::change_gravity;

/// Gravity now points in `direction`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GravityDirectionChangedEvent {
    pub direction: GravityDirection,
}

/// Request to switch gravity.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeGravityEvent {
    pub direction: GravityDirection,
}

/// Applies a [`ChangeGravityEvent`] once the observer's commands are flushed.
pub fn change_gravity_observer(trigger: On<ChangeGravityEvent>, mut commands: Commands) {
    let direction = trigger.event().direction;
    commands.queue(move |world: &mut World| {
        change_gravity(world, direction);
    });
}

/// Re-orients every character to the new gravity and mirrors its sprite.
pub fn gravity_orientation_observer(
    trigger: On<GravityDirectionChangedEvent>,
    mut characters: Query<(&mut LocomotionController, Option<&mut Scale>)>,
) {
    let direction = trigger.event().direction;
    for (mut controller, scale) in characters.iter_mut() {
        controller.apply_gravity_direction(direction);
        if let Some(mut scale) = scale {
            scale.scale = controller.scale();
        }
    }
}
