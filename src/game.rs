//! World construction and the simulation loop.
//!
//! [`build_world`] inserts the resources and observers the locomotion core
//! needs. [`Simulation`] owns that world together with its three schedules:
//!
//! - **frame**: runs once per [`Simulation::advance`] call (input adapter)
//! - **fixed**: runs zero or more times per frame at `FixedTime::step`
//!   (locomotion, integration, collision resolution)
//! - **presentation**: runs once after the fixed ticks (animator parameters)
use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::Vec2;
use serde::Serialize;

use crate::components::animatorparams::AnimatorParams;
use crate::components::boxcollider::BoxCollider;
use crate::components::collisionlayer::{CollisionLayer, LayerMask};
use crate::components::locomotion::{LocomotionController, LocomotionIntent};
use crate::components::mapposition::MapPosition;
use crate::components::playercontrolled::PlayerControlled;
use crate::components::rigidbody::RigidBody;
use crate::components::scale::Scale;
use crate::events::animator::{
    jump_trigger_observer, push_collider_release_observer, push_collider_touch_observer,
};
use crate::events::gravity::{change_gravity_observer, gravity_orientation_observer};
use crate::events::locomotion::{LocomotionIntentEvent, locomotion_intent_observer};
use crate::resources::gameconfig::GameConfig;
use crate::resources::gravity::{GravityDirection, GravityDirector};
use crate::resources::input::InputState;
use crate::resources::worldtime::{FixedTime, WorldTime};
use crate::systems::animator::animator_params_system;
use crate::systems::collision::collision_resolver;
use crate::systems::gravity::change_gravity;
use crate::systems::input::{player_input_system, set_input_inverted};
use crate::systems::locomotion::locomotion_system;
use crate::systems::movement::movement_system;
use crate::systems::time::{accumulate_fixed_time, update_world_time};

/// Create a world with every resource and observer the simulation uses.
pub fn build_world(config: &GameConfig) -> Result<World, String> {
    config.validate()?;

    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(
        FixedTime::new(config.fixed_step).with_max_steps_per_frame(config.max_steps_per_frame),
    );
    world.insert_resource(
        GravityDirector::new(config.gravity_magnitude)?.with_direction(config.gravity_direction),
    );
    world.insert_resource(InputState::default());
    world.insert_resource(config.clone());

    world.spawn(Observer::new(locomotion_intent_observer));
    world.spawn(Observer::new(change_gravity_observer));
    world.spawn(Observer::new(gravity_orientation_observer));
    world.spawn(Observer::new(jump_trigger_observer));
    world.spawn(Observer::new(push_collider_touch_observer));
    world.spawn(Observer::new(push_collider_release_observer));
    // observers must exist before any system triggers
    world.flush();

    Ok(world)
}

/// Check that `entity` has everything a locomotion character needs.
pub fn verify_character_setup(world: &World, entity: Entity) -> Result<(), String> {
    let Ok(entity_ref) = world.get_entity(entity) else {
        return Err(format!("Character {:?} does not exist", entity));
    };
    if !entity_ref.contains::<LocomotionController>() {
        return Err(format!("{:?} has no LocomotionController", entity));
    }
    if !entity_ref.contains::<RigidBody>() {
        return Err(format!("Character {:?} has no RigidBody", entity));
    }
    if !entity_ref.contains::<MapPosition>() {
        return Err(format!("Character {:?} has no MapPosition", entity));
    }
    let Some(collider) = entity_ref.get::<BoxCollider>() else {
        return Err(format!("Character {:?} has no BoxCollider", entity));
    };
    if collider.size.x <= 0.0 || collider.size.y <= 0.0 {
        return Err(format!(
            "Character {:?} has a degenerate collider {:?}",
            entity, collider.size
        ));
    }
    Ok(())
}

/// Headless simulation driver.
pub struct Simulation {
    world: World,
    frame: Schedule,
    fixed: Schedule,
    presentation: Schedule,
}

impl Simulation {
    pub fn new(config: &GameConfig) -> Result<Self, String> {
        let world = build_world(config)?;

        let mut frame = Schedule::default();
        frame.add_systems(player_input_system);

        let mut fixed = Schedule::default();
        fixed.add_systems((locomotion_system, movement_system, collision_resolver).chain());

        let mut presentation = Schedule::default();
        presentation.add_systems(animator_params_system);

        Ok(Self {
            world,
            frame,
            fixed,
            presentation,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn input_mut(&mut self) -> Mut<'_, InputState> {
        self.world.resource_mut::<InputState>()
    }

    /// Spawn a player character centered at `position`, oriented to the current gravity.
    pub fn spawn_character(&mut self, position: Vec2, size: Vec2) -> Result<Entity, String> {
        let config = self.world.resource::<GameConfig>();
        let mut controller = LocomotionController::new(config.locomotion)?;
        let toggle = config.gravity_toggle;
        controller.apply_gravity_direction(self.world.resource::<GravityDirector>().direction());
        let scale = Scale {
            scale: controller.scale(),
        };

        let entity = self
            .world
            .spawn((
                controller,
                RigidBody::new(),
                MapPosition { pos: position },
                BoxCollider::centered(size.x, size.y),
                CollisionLayer(LayerMask::PLAYER),
                scale,
                AnimatorParams::default(),
                PlayerControlled::new(toggle),
            ))
            .id();
        verify_character_setup(&self.world, entity)?;
        log::debug!("Spawned character {:?} at {:?}", entity, position);
        Ok(entity)
    }

    /// Spawn a static box collider centered at `center`.
    pub fn spawn_block(&mut self, center: Vec2, size: Vec2, layer: LayerMask) -> Entity {
        self.world
            .spawn((
                MapPosition { pos: center },
                BoxCollider::centered(size.x, size.y),
                CollisionLayer(layer),
            ))
            .id()
    }

    /// Verify every entity that carries a [`LocomotionController`].
    pub fn verify(&mut self) -> Result<(), String> {
        let mut query = self
            .world
            .query_filtered::<Entity, With<LocomotionController>>();
        let characters: Vec<Entity> = query.iter(&self.world).collect();
        for entity in characters {
            verify_character_setup(&self.world, entity)?;
        }
        Ok(())
    }

    /// Advance one frame of `dt` seconds. Returns the number of fixed ticks run.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.advance_with(dt, |_, _| {})
    }

    /// Like [`Simulation::advance`], calling `on_tick` after every fixed tick.
    pub fn advance_with(&mut self, dt: f32, mut on_tick: impl FnMut(&World, u64)) -> u32 {
        let scaled = update_world_time(&mut self.world, dt);
        self.frame.run(&mut self.world);

        let due = accumulate_fixed_time(&mut self.world, scaled);
        for _ in 0..due {
            let tick = self.step_fixed();
            on_tick(&self.world, tick);
        }

        self.presentation.run(&mut self.world);
        due
    }

    /// Run exactly one fixed tick and return its number.
    pub fn step_fixed(&mut self) -> u64 {
        self.fixed.run(&mut self.world);
        let mut fixed = self.world.resource_mut::<FixedTime>();
        fixed.ticks += 1;
        fixed.ticks
    }

    /// Deliver an intent to one character right away.
    pub fn intent(&mut self, entity: Entity, intent: LocomotionIntent) {
        self.world
            .trigger(LocomotionIntentEvent { entity, intent });
        self.world.flush();
    }

    /// See [`change_gravity`].
    pub fn change_gravity(&mut self, direction: GravityDirection) -> bool {
        change_gravity(&mut self.world, direction)
    }

    pub fn set_input_inverted(&mut self, inverted: bool) {
        set_input_inverted(&mut self.world, inverted);
    }

    pub fn report(&self, entity: Entity) -> Option<TickReport> {
        TickReport::capture(&self.world, entity)
    }
}

/// Snapshot of one character after a fixed tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub time: f32,
    pub gravity: GravityDirection,
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: f32,
    pub grounded: bool,
    pub jumping: bool,
    pub running: bool,
    pub obstacle_in_front: bool,
}

impl TickReport {
    pub fn capture(world: &World, entity: Entity) -> Option<Self> {
        let controller = world.get::<LocomotionController>(entity)?;
        let position = world.get::<MapPosition>(entity)?;
        let rigidbody = world.get::<RigidBody>(entity)?;
        let fixed = world.get_resource::<FixedTime>()?;
        let gravity = world.get_resource::<GravityDirector>()?;
        Some(Self {
            tick: fixed.ticks,
            time: fixed.elapsed(),
            gravity: gravity.direction(),
            position: position.pos,
            velocity: rigidbody.velocity,
            facing: controller.facing_direction(),
            grounded: controller.is_grounded(),
            jumping: controller.is_jumping(),
            running: controller.is_running(),
            obstacle_in_front: controller.is_obstacle_in_front(),
        })
    }
}
