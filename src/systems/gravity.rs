//! Gravity direction changes.
//!
//! [`change_gravity`] is the only way the direction changes at runtime. It
//! updates the [`GravityDirector`] resource and then notifies observers
//! synchronously, so every character has re-oriented before the call returns.
use bevy_ecs::prelude::*;

use crate::events::gravity::GravityDirectionChangedEvent;
use crate::resources::gravity::{GravityDirection, GravityDirector};

/// Switch world gravity and notify observers.
///
/// Returns false when the request was dropped because it came from inside an
/// observer of the previous change.
pub fn change_gravity(world: &mut World, direction: GravityDirection) -> bool {
    {
        let Some(mut director) = world.get_resource_mut::<GravityDirector>() else {
            log::error!("change_gravity called without a GravityDirector resource");
            return false;
        };
        if director.is_notifying() {
            log::warn!(
                "Ignoring gravity change to {} requested while notifying a previous change",
                direction
            );
            return false;
        }
        let vector = director.change_gravity(direction);
        director.set_notifying(true);
        log::debug!("Gravity changed to {} ({:?})", direction, vector);
    }

    world.trigger(GravityDirectionChangedEvent { direction });
    world.flush();

    world.resource_mut::<GravityDirector>().set_notifying(false);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::observer::On;
    use glam::Vec2;

    use crate::components::locomotion::LocomotionController;
    use crate::components::scale::Scale;
    use crate::events::gravity::{
        ChangeGravityEvent, change_gravity_observer, gravity_orientation_observer,
    };

    #[derive(Resource, Default)]
    struct Notified(Vec<GravityDirection>);

    fn world() -> World {
        let mut world = World::new();
        world.insert_resource(GravityDirector::default());
        world.insert_resource(Notified::default());
        world.add_observer(
            |t: On<GravityDirectionChangedEvent>, mut seen: ResMut<Notified>| {
                seen.0.push(t.event().direction);
            },
        );
        world.add_observer(gravity_orientation_observer);
        world
    }

    #[test]
    fn test_change_notifies_once_per_call() {
        let mut world = world();
        assert!(change_gravity(&mut world, GravityDirection::Up));
        assert!(change_gravity(&mut world, GravityDirection::Up));
        assert_eq!(
            world.resource::<Notified>().0,
            vec![GravityDirection::Up, GravityDirection::Up]
        );
        let director = world.resource::<GravityDirector>();
        assert_eq!(director.vector(), Vec2::new(0.0, 9.81));
        assert!(!director.is_notifying());
    }

    #[test]
    fn test_characters_reorient_before_return() {
        let mut world = world();
        let e = world
            .spawn((LocomotionController::default(), Scale::default()))
            .id();
        change_gravity(&mut world, GravityDirection::Right);
        let controller = world.get::<LocomotionController>(e).unwrap();
        assert_eq!(controller.vertical_orientation(), -1.0);
        assert!(!controller.frame().vertical_is_y);
        assert_eq!(world.get::<Scale>(e).unwrap().scale, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_change_while_notifying_is_rejected() {
        let mut world = world();
        world.resource_mut::<GravityDirector>().set_notifying(true);
        assert!(!change_gravity(&mut world, GravityDirection::Left));
        assert!(world.resource::<Notified>().0.is_empty());
        assert_eq!(
            world.resource::<GravityDirector>().direction(),
            GravityDirection::Down
        );
    }

    #[test]
    fn test_change_requested_from_an_observer_is_dropped() {
        let mut world = world();
        world.add_observer(change_gravity_observer);
        world.add_observer(
            |_t: On<GravityDirectionChangedEvent>, mut commands: Commands| {
                commands.trigger(ChangeGravityEvent {
                    direction: GravityDirection::Left,
                });
            },
        );
        world.flush();

        assert!(change_gravity(&mut world, GravityDirection::Up));
        assert_eq!(world.resource::<Notified>().0, vec![GravityDirection::Up]);
        let director = world.resource::<GravityDirector>();
        assert_eq!(director.direction(), GravityDirection::Up);
        assert!(!director.is_notifying());

        // the guard is released, so the next outside request goes through
        assert!(change_gravity(&mut world, GravityDirection::Down));
        assert_eq!(
            world.resource::<Notified>().0,
            vec![GravityDirection::Up, GravityDirection::Down]
        );
        assert_eq!(
            world.resource::<GravityDirector>().direction(),
            GravityDirection::Down
        );
    }

    #[test]
    fn test_missing_director_is_reported() {
        let mut world = World::new();
        assert!(!change_gravity(&mut world, GravityDirection::Up));
    }
}
