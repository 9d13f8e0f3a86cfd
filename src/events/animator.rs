//! Presentation-side observers of locomotion events.
//!
//! - [`jump_trigger_observer`] sets the one-shot `Jump` trigger on the
//!   character's [`AnimatorParams`].
//! - [`push_collider_touch_observer`] and [`push_collider_release_observer`]
//!   swap the character's [`BoxCollider`] while it pushes an obstacle.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use crate::components::animatorparams::{AnimatorParams, JUMP};
use crate::components::boxcollider::BoxCollider;
use crate::components::pushcollider::PushCollider;
use crate::events::locomotion::{JumpStartedEvent, ObstacleReleasedEvent, ObstacleTouchedEvent};

pub fn jump_trigger_observer(trigger: On<JumpStartedEvent>, mut params: Query<&mut AnimatorParams>) {
    if let Ok(mut params) = params.get_mut(trigger.event().entity) {
        params.set_trigger(JUMP);
    }
}

pub fn push_collider_touch_observer(
    trigger: On<ObstacleTouchedEvent>,
    mut query: Query<(&mut PushCollider, &mut BoxCollider)>,
) {
    let entity = trigger.event().entity;
    if let Ok((mut push, mut collider)) = query.get_mut(entity)
        && let Some(shape) = push.engage(*collider)
    {
        log::debug!("{:?} switched to push collider", entity);
        *collider = shape;
    }
}

pub fn push_collider_release_observer(
    trigger: On<ObstacleReleasedEvent>,
    mut query: Query<(&mut PushCollider, &mut BoxCollider)>,
) {
    let entity = trigger.event().entity;
    if let Ok((mut push, mut collider)) = query.get_mut(entity)
        && let Some(shape) = push.release()
    {
        log::debug!("{:?} restored its collider", entity);
        *collider = shape;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_sets_trigger() {
        let mut world = World::new();
        world.add_observer(jump_trigger_observer);
        let e = world.spawn(AnimatorParams::default()).id();
        world.trigger(JumpStartedEvent { entity: e });
        world.flush();
        assert!(world.get::<AnimatorParams>(e).unwrap().has_trigger(JUMP));
    }

    #[test]
    fn test_push_collider_swaps_and_restores() {
        let mut world = World::new();
        world.add_observer(push_collider_touch_observer);
        world.add_observer(push_collider_release_observer);
        let normal = BoxCollider::centered(1.0, 2.0);
        let push = BoxCollider::centered(1.4, 2.0);
        let e = world.spawn((normal, PushCollider::new(push))).id();
        let wall = world.spawn_empty().id();

        world.trigger(ObstacleTouchedEvent {
            entity: e,
            obstacle: wall,
        });
        world.flush();
        assert_eq!(*world.get::<BoxCollider>(e).unwrap(), push);

        world.trigger(ObstacleReleasedEvent {
            entity: e,
            obstacle: wall,
        });
        world.flush();
        assert_eq!(*world.get::<BoxCollider>(e).unwrap(), normal);
    }

    #[test]
    fn test_entities_without_push_collider_are_untouched() {
        let mut world = World::new();
        world.add_observer(push_collider_touch_observer);
        let normal = BoxCollider::centered(1.0, 2.0);
        let e = world.spawn(normal).id();
        let wall = world.spawn_empty().id();
        world.trigger(ObstacleTouchedEvent {
            entity: e,
            obstacle: wall,
        });
        world.flush();
        assert_eq!(*world.get::<BoxCollider>(e).unwrap(), normal);
    }
}
