//! Input systems.
//!
//! - [`player_input_system`] turns the edges recorded in
//!   [`InputState`](crate::resources::input::InputState) into locomotion
//!   intents for every [`PlayerControlled`] entity, then clears the edges.
//! - [`set_input_inverted`] mirrors horizontal input and announces it.
use bevy_ecs::prelude::*;

use crate::components::locomotion::LocomotionIntent;
use crate::components::playercontrolled::PlayerControlled;
use crate::events::gravity::ChangeGravityEvent;
use crate::events::input::{InputAction, InputEvent, InputInvertedEvent};
use crate::events::locomotion::LocomotionIntentEvent;
use crate::resources::gravity::GravityDirector;
use crate::resources::input::InputState;

/// Map this frame's input edges to intents.
///
/// Intents are triggered through `Commands`, so controllers see them once this
/// system's commands are applied, before the next fixed tick.
pub fn player_input_system(
    mut input: ResMut<InputState>,
    players: Query<(Entity, &PlayerControlled)>,
    gravity: Res<GravityDirector>,
    mut commands: Commands,
) {
    for action in InputAction::ALL {
        let state = input.state(action);
        if state.just_pressed {
            commands.trigger(InputEvent {
                action,
                pressed: true,
            });
        }
        if state.just_released {
            commands.trigger(InputEvent {
                action,
                pressed: false,
            });
        }
    }

    let movement = input.movement_changed().then(|| input.movement_axis());
    let running = if input.run.just_pressed {
        Some(true)
    } else if input.run.just_released {
        Some(false)
    } else {
        None
    };

    for (entity, _) in players.iter() {
        let mut send = |intent: LocomotionIntent| {
            commands.trigger(LocomotionIntentEvent { entity, intent });
        };
        if let Some(axis) = movement {
            send(LocomotionIntent::Move(axis));
        }
        if let Some(running) = running {
            send(LocomotionIntent::SetRunning(running));
        }
        if input.jump.just_pressed {
            send(LocomotionIntent::StartJump);
        }
        if input.jump.just_released {
            send(LocomotionIntent::StopJump);
        }
    }

    // gravity is global: one request per press, using the first player's target
    if input.gravity_toggle.just_pressed
        && let Some((_, player)) = players.iter().next()
    {
        let direction = player.toggle_target(gravity.direction());
        log::debug!("Gravity toggle: {} -> {}", gravity.direction(), direction);
        commands.trigger(ChangeGravityEvent { direction });
    }

    input.clear_edges();
}

/// Mirror horizontal input (or stop mirroring) and trigger [`InputInvertedEvent`].
///
/// The new scale applies to the next movement change.
pub fn set_input_inverted(world: &mut World, inverted: bool) {
    let Some(mut input) = world.get_resource_mut::<InputState>() else {
        log::error!("set_input_inverted called without an InputState resource");
        return;
    };
    input.set_inverted(inverted);
    log::debug!("Input inverted: {}", inverted);
    world.trigger(InputInvertedEvent { inverted });
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::observer::On;
    use crate::components::locomotion::LocomotionController;
    use crate::events::locomotion::locomotion_intent_observer;
    use crate::resources::gravity::GravityDirection;

    #[derive(Resource, Default)]
    struct Seen(Vec<LocomotionIntent>, Vec<GravityDirection>, Vec<bool>);

    fn world() -> (World, Entity) {
        let mut world = World::new();
        world.insert_resource(InputState::default());
        world.insert_resource(GravityDirector::default());
        world.insert_resource(Seen::default());
        world.add_observer(|t: On<LocomotionIntentEvent>, mut seen: ResMut<Seen>| {
            seen.0.push(t.event().intent);
        });
        world.add_observer(|t: On<ChangeGravityEvent>, mut seen: ResMut<Seen>| {
            seen.1.push(t.event().direction);
        });
        world.add_observer(|t: On<InputInvertedEvent>, mut seen: ResMut<Seen>| {
            seen.2.push(t.event().inverted);
        });
        let player = world
            .spawn((PlayerControlled::new(GravityDirection::Up), LocomotionController::default()))
            .id();
        (world, player)
    }

    fn run(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(player_input_system);
        schedule.run(world);
    }

    #[test]
    fn test_edges_become_intents_once() {
        let (mut world, _) = world();
        {
            let mut input = world.resource_mut::<InputState>();
            input.press(InputAction::MoveRight);
            input.press(InputAction::Run);
            input.press(InputAction::Jump);
        }
        run(&mut world);
        assert_eq!(
            world.resource::<Seen>().0,
            vec![
                LocomotionIntent::Move(1.0),
                LocomotionIntent::SetRunning(true),
                LocomotionIntent::StartJump
            ]
        );

        // held keys without new edges send nothing
        run(&mut world);
        assert_eq!(world.resource::<Seen>().0.len(), 3);

        {
            let mut input = world.resource_mut::<InputState>();
            input.release(InputAction::Jump);
            input.release(InputAction::MoveRight);
        }
        run(&mut world);
        assert_eq!(
            &world.resource::<Seen>().0[3..],
            &[LocomotionIntent::Move(0.0), LocomotionIntent::StopJump]
        );
    }

    #[test]
    fn test_inverted_input_flips_move() {
        let (mut world, _) = world();
        set_input_inverted(&mut world, true);
        assert_eq!(world.resource::<Seen>().2, vec![true]);
        world.resource_mut::<InputState>().press(InputAction::MoveRight);
        run(&mut world);
        assert_eq!(world.resource::<Seen>().0, vec![LocomotionIntent::Move(-1.0)]);
    }

    #[test]
    fn test_gravity_toggle_requests_change() {
        let (mut world, _) = world();
        world.resource_mut::<InputState>().press(InputAction::GravityToggle);
        run(&mut world);
        assert_eq!(world.resource::<Seen>().1, vec![GravityDirection::Up]);
    }

    #[test]
    fn test_gravity_toggle_requests_one_change_for_all_players() {
        let (mut world, _) = world();
        world.spawn((
            PlayerControlled::new(GravityDirection::Up),
            LocomotionController::default(),
        ));
        world.resource_mut::<InputState>().press(InputAction::GravityToggle);
        run(&mut world);
        assert_eq!(world.resource::<Seen>().1, vec![GravityDirection::Up]);
    }

    #[test]
    fn test_gravity_toggle_without_players_does_nothing() {
        let mut world = World::new();
        world.insert_resource(InputState::default());
        world.insert_resource(GravityDirector::default());
        world.insert_resource(Seen::default());
        world.add_observer(|t: On<ChangeGravityEvent>, mut seen: ResMut<Seen>| {
            seen.1.push(t.event().direction);
        });
        world.resource_mut::<InputState>().press(InputAction::GravityToggle);
        run(&mut world);
        assert!(world.resource::<Seen>().1.is_empty());
    }

    #[test]
    fn test_intents_reach_the_controller() {
        let (mut world, player) = world();
        world.add_observer(locomotion_intent_observer);
        world.resource_mut::<InputState>().press(InputAction::MoveLeft);
        world.resource_mut::<InputState>().press(InputAction::Run);
        run(&mut world);
        let controller = world.get::<LocomotionController>(player).unwrap();
        assert_eq!(controller.movement_input(), -1.0);
        assert_eq!(controller.facing_direction(), -1.0);
        assert!(controller.is_running());
    }
}
