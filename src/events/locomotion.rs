//! Character locomotion events.
//!
//! Inbound: [`LocomotionIntentEvent`] carries an intent from the input side to
//! one character and is handled by [`locomotion_intent_observer`].
//!
//! Outbound: the remaining events are notifications for animation, audio or UI
//! observers. They are triggered from
//! [`locomotion_system`](crate::systems::locomotion::locomotion_system) (fixed
//! tick) and from the intent observer (run state).
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use crate::components::locomotion::{LocomotionController, LocomotionIntent, LocomotionNotice};
use crate::components::scale::Scale;

/// Intent for the character `entity`.
#[derive(Event, Debug, Clone, Copy)]
pub struct LocomotionIntentEvent {
    pub entity: Entity,
    pub intent: LocomotionIntent,
}

/// The character left the ground with a jump.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpStartedEvent {
    pub entity: Entity,
}

/// The character touched ground after being airborne.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandedEvent {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStateChangedEvent {
    pub entity: Entity,
    pub running: bool,
}

/// An obstacle appeared in front of the character.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleTouchedEvent {
    pub entity: Entity,
    pub obstacle: Entity,
}

/// The obstacle in front of the character is gone.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleReleasedEvent {
    pub entity: Entity,
    pub obstacle: Entity,
}

/// Turn a controller notice into its event.
pub fn trigger_notice(commands: &mut Commands, entity: Entity, notice: LocomotionNotice) {
    match notice {
        LocomotionNotice::JumpStarted => {
            log::debug!("{:?} jumped", entity);
            commands.trigger(JumpStartedEvent { entity });
        }
        LocomotionNotice::Landed => {
            log::debug!("{:?} landed", entity);
            commands.trigger(LandedEvent { entity });
        }
        LocomotionNotice::RunStateChanged(running) => {
            commands.trigger(RunStateChangedEvent { entity, running });
        }
        LocomotionNotice::ObstacleTouched(obstacle) => {
            log::debug!("{:?} touched obstacle {:?}", entity, obstacle);
            commands.trigger(ObstacleTouchedEvent { entity, obstacle });
        }
        LocomotionNotice::ObstacleReleased(obstacle) => {
            log::debug!("{:?} released obstacle {:?}", entity, obstacle);
            commands.trigger(ObstacleReleasedEvent { entity, obstacle });
        }
    }
}

/// Apply an intent to the targeted controller.
///
/// Intents for entities without a [`LocomotionController`] are dropped with a
/// warning.
pub fn locomotion_intent_observer(
    trigger: On<LocomotionIntentEvent>,
    mut controllers: Query<(&mut LocomotionController, Option<&mut Scale>)>,
    mut commands: Commands,
) {
    let LocomotionIntentEvent { entity, intent } = *trigger.event();
    let Ok((mut controller, scale)) = controllers.get_mut(entity) else {
        log::warn!("Intent {:?} for {:?} which has no LocomotionController", intent, entity);
        return;
    };

    if let Some(notice) = controller.apply_intent(intent) {
        trigger_notice(&mut commands, entity, notice);
    }
    if let Some(mut scale) = scale {
        scale.scale = controller.scale();
    }
}
