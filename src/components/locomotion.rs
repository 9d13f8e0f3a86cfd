//! Platformer locomotion state machine.
//!
//! [`LocomotionController`] owns one character's movement state: walking or
//! running, grounded or airborne, jumping, touching an obstacle. It is driven
//! from two places:
//!
//! - **Intents** ([`LocomotionIntent`]) arrive at any time from the input
//!   adapter. They only change controller state; velocity is written on the
//!   next fixed tick.
//! - **Fixed ticks** ([`LocomotionController::fixed_update`]) sense ground and
//!   obstacles through a [`PhysicsQuery`], then write lateral and jump velocity.
//!
//! Everything is expressed in the character's gravity frame (see
//! [`GravityFrame`]), so the same code works for all four gravity directions.
//! A fixed tick runs, in order:
//!
//! 1. ground check (landing, coyote window)
//! 2. obstacle check (edge-triggered touch/release)
//! 3. lateral velocity write
//! 4. pending jump launch
//! 5. jump update (min height, jump cut, apex)
//!
//! Side effects that observers care about are returned as
//! [`LocomotionNotice`]s; [`locomotion_system`](crate::systems::locomotion::locomotion_system)
//! turns them into events.

use bevy_ecs::prelude::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::str::FromStr;

use crate::components::boxcollider::Aabb;
use crate::components::collisionlayer::LayerMask;
use crate::resources::gravity::{GravityDirection, GravityFrame};
use crate::resources::physicsquery::PhysicsQuery;

/// How the jump-end multiplier is applied once the jump button is released
/// above the minimum jump height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpCutMode {
    /// Scale vertical velocity once per jump.
    #[default]
    OneShot,
    /// Scale vertical velocity on every tick until the apex.
    Decay,
}

impl FromStr for JumpCutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one_shot" | "oneshot" | "once" => Ok(JumpCutMode::OneShot),
            "decay" => Ok(JumpCutMode::Decay),
            other => Err(format!("Unknown jump cut mode '{}'", other)),
        }
    }
}

/// Tuning values for a character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub min_jump_height: f32,
    pub max_jump_height: f32,
    /// Factor in [0.01, 1]. 1 disables the cut; lower values land closer to `min_jump_height`.
    pub jump_end_gravity_multiplier: f32,
    pub jump_cut_mode: JumpCutMode,
    /// Grace window after leaving ground during which a jump is still accepted.
    pub coyote_time: f32,
    /// Thickness of the ground probe.
    pub ground_check_height: f32,
    /// Subtracted from the collider width so wall tiles next to the feet don't count as ground.
    pub ground_check_inset: f32,
    pub excluded_ground_layers: LayerMask,
    pub obstacle_layers: LayerMask,
    pub obstacle_check_distance: f32,
    /// Fraction of the collider height, from the feet, where the obstacle ray starts.
    pub obstacle_check_height: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 3.0,
            run_speed: 6.0,
            min_jump_height: 1.0,
            max_jump_height: 3.5,
            jump_end_gravity_multiplier: 0.8,
            jump_cut_mode: JumpCutMode::OneShot,
            coyote_time: 0.1,
            ground_check_height: 0.05,
            ground_check_inset: 0.05,
            excluded_ground_layers: LayerMask::PLAYER,
            obstacle_layers: LayerMask::OBSTACLE,
            obstacle_check_distance: 0.1,
            obstacle_check_height: 0.8,
        }
    }
}

impl LocomotionConfig {
    /// Reject values the state machine cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        fn positive(name: &str, v: f32) -> Result<(), String> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(format!("{} must be positive, got {}", name, v))
            }
        }
        fn non_negative(name: &str, v: f32) -> Result<(), String> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(format!("{} must not be negative, got {}", name, v))
            }
        }
        fn fraction(name: &str, v: f32) -> Result<(), String> {
            if (0.01..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(format!("{} must be within [0.01, 1], got {}", name, v))
            }
        }

        positive("walk_speed", self.walk_speed)?;
        positive("run_speed", self.run_speed)?;
        non_negative("min_jump_height", self.min_jump_height)?;
        positive("max_jump_height", self.max_jump_height)?;
        if self.min_jump_height > self.max_jump_height {
            return Err(format!(
                "min_jump_height ({}) is greater than max_jump_height ({})",
                self.min_jump_height, self.max_jump_height
            ));
        }
        fraction("jump_end_gravity_multiplier", self.jump_end_gravity_multiplier)?;
        non_negative("coyote_time", self.coyote_time)?;
        positive("ground_check_height", self.ground_check_height)?;
        non_negative("ground_check_inset", self.ground_check_inset)?;
        non_negative("obstacle_check_distance", self.obstacle_check_distance)?;
        fraction("obstacle_check_height", self.obstacle_check_height)?;
        Ok(())
    }
}

/// Requests coming from the input side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocomotionIntent {
    /// Digital movement; only the sign of the axis is used.
    Move(f32),
    SetRunning(bool),
    StartJump,
    StopJump,
}

/// State changes observers get told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocomotionNotice {
    JumpStarted,
    Landed,
    RunStateChanged(bool),
    ObstacleTouched(Entity),
    ObstacleReleased(Entity),
}

pub type Notices = SmallVec<[LocomotionNotice; 4]>;

/// Physical state of a character for one fixed tick. `velocity` is written back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterBody {
    /// Pivot position.
    pub position: Vec2,
    /// World bounds of the collider.
    pub bounds: Aabb,
    pub velocity: Vec2,
    /// Gravity magnitude acting on this body.
    pub gravity: f32,
}

#[derive(Component, Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    frame: GravityFrame,
    facing_direction: f32,
    is_running: bool,
    is_grounded: bool,
    is_obstacle_in_front: bool,
    movement_input: f32,
    movement_speed: f32,
    is_jumping: bool,
    jump_held: bool,
    jump_start_height: f32,
    coyote_timer: f32,
    obstacle: Option<Entity>,
    jump_cut_applied: bool,
    /// Jump accepted, velocity not written yet.
    pending_launch: bool,
}

impl Default for LocomotionController {
    fn default() -> Self {
        Self::with_config(LocomotionConfig::default())
    }
}

impl LocomotionController {
    /// Controller with validated tuning.
    pub fn new(config: LocomotionConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: LocomotionConfig) -> Self {
        Self {
            config,
            frame: GravityFrame::default(),
            facing_direction: 1.0,
            is_running: false,
            is_grounded: false,
            is_obstacle_in_front: false,
            movement_input: 0.0,
            movement_speed: config.walk_speed,
            is_jumping: false,
            jump_held: false,
            jump_start_height: 0.0,
            coyote_timer: 0.0,
            obstacle: None,
            jump_cut_applied: false,
            pending_launch: false,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }
    pub fn frame(&self) -> GravityFrame {
        self.frame
    }
    pub fn facing_direction(&self) -> f32 {
        self.facing_direction
    }
    pub fn vertical_orientation(&self) -> f32 {
        self.frame.orientation
    }
    pub fn is_running(&self) -> bool {
        self.is_running
    }
    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }
    pub fn is_obstacle_in_front(&self) -> bool {
        self.is_obstacle_in_front
    }
    pub fn movement_input(&self) -> f32 {
        self.movement_input
    }
    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }
    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }
    pub fn jump_held(&self) -> bool {
        self.jump_held
    }
    pub fn jump_start_height(&self) -> f32 {
        self.jump_start_height
    }
    pub fn coyote_timer(&self) -> f32 {
        self.coyote_timer
    }
    pub fn obstacle(&self) -> Option<Entity> {
        self.obstacle
    }

    /// Local sprite scale: mirrored laterally by facing, vertically by gravity.
    pub fn scale(&self) -> Vec2 {
        Vec2::new(self.facing_direction, self.frame.orientation)
    }

    // ==================== INTENTS ====================

    pub fn apply_intent(&mut self, intent: LocomotionIntent) -> Option<LocomotionNotice> {
        match intent {
            LocomotionIntent::Move(axis) => {
                self.move_axis(axis);
                None
            }
            LocomotionIntent::SetRunning(running) => Some(self.set_running(running)),
            LocomotionIntent::StartJump => {
                self.start_jump();
                None
            }
            LocomotionIntent::StopJump => {
                self.stop_jump();
                None
            }
        }
    }

    pub fn move_axis(&mut self, axis: f32) {
        if axis != 0.0 {
            self.movement_input = axis.signum();
            self.facing_direction = self.movement_input;
            return;
        }
        self.movement_input = 0.0;
    }

    /// Always reports the new state, even if unchanged.
    pub fn set_running(&mut self, running: bool) -> LocomotionNotice {
        self.is_running = running;
        self.movement_speed = if running {
            self.config.run_speed
        } else {
            self.config.walk_speed
        };
        LocomotionNotice::RunStateChanged(running)
    }

    /// Returns false (and changes nothing) when airborne or already jumping.
    pub fn start_jump(&mut self) -> bool {
        if self.is_jumping || !self.is_grounded {
            return false;
        }
        self.is_jumping = true;
        self.jump_held = true;
        self.jump_cut_applied = false;
        self.pending_launch = true;
        true
    }

    pub fn stop_jump(&mut self) {
        self.jump_held = false;
    }

    /// Adopt a new gravity direction; sensing uses it from the next tick on.
    pub fn apply_gravity_direction(&mut self, direction: GravityDirection) {
        self.frame = direction.frame();
    }

    // ==================== FIXED TICK ====================

    pub fn fixed_update<Q: PhysicsQuery + ?Sized>(
        &mut self,
        body: &mut CharacterBody,
        query: &Q,
        dt: f32,
    ) -> Notices {
        let mut notices = Notices::new();
        self.update_ground_check(body, query, dt, &mut notices);
        self.update_obstacle_check(body, query, &mut notices);
        self.update_movement(body);
        self.launch_pending_jump(body, &mut notices);
        self.update_jump(body);
        notices
    }

    /// Probe box centered on the feet edge: (center, size).
    pub fn ground_probe(&self, bounds: &Aabb) -> (Vec2, Vec2) {
        let f = self.frame;
        let size = bounds.size();
        let origin = f.compose(f.lateral(bounds.center()), self.base_edge(bounds));
        let probe_size = f.compose(
            (f.lateral(size) - self.config.ground_check_inset).max(0.0),
            self.config.ground_check_height,
        );
        (origin, probe_size)
    }

    /// Obstacle ray: (origin, direction).
    pub fn obstacle_probe(&self, bounds: &Aabb) -> (Vec2, Vec2) {
        let f = self.frame;
        let vertical = self.base_edge(bounds)
            + f.vertical(bounds.size()) * self.config.obstacle_check_height * f.orientation;
        let lateral =
            f.lateral(bounds.center()) + f.lateral(bounds.extents()) * self.facing_direction;
        (
            f.compose(lateral, vertical),
            f.lateral_unit() * self.facing_direction,
        )
    }

    /// Position of the feet edge along the gravity axis.
    fn base_edge(&self, bounds: &Aabb) -> f32 {
        let f = self.frame;
        f.vertical(bounds.center()) - f.vertical(bounds.extents()) * f.orientation
    }

    fn update_ground_check<Q: PhysicsQuery + ?Sized>(
        &mut self,
        body: &CharacterBody,
        query: &Q,
        dt: f32,
        notices: &mut Notices,
    ) {
        let (origin, size) = self.ground_probe(&body.bounds);
        let hit = query.shape_cast(
            origin,
            size,
            -self.frame.up(),
            0.0,
            !self.config.excluded_ground_layers,
        );
        // the probe still touches the floor on the first ticks of a jump
        let rising = self.is_jumping
            && !self.pending_launch
            && self.frame.vertical(body.velocity) * self.frame.orientation > 0.0;

        if hit.is_none() || rising {
            self.coyote_timer += dt;
            if self.coyote_timer >= self.config.coyote_time {
                self.is_grounded = false;
            }
            return;
        }

        // coyote_timer is only reset by land()
        if !self.is_grounded {
            self.land(notices);
        }
        self.is_grounded = true;
    }

    fn land(&mut self, notices: &mut Notices) {
        self.is_jumping = false;
        self.jump_cut_applied = false;
        self.coyote_timer = 0.0;
        notices.push(LocomotionNotice::Landed);
    }

    fn update_obstacle_check<Q: PhysicsQuery + ?Sized>(
        &mut self,
        body: &CharacterBody,
        query: &Q,
        notices: &mut Notices,
    ) {
        let (origin, direction) = self.obstacle_probe(&body.bounds);
        let hit = query.ray_cast(
            origin,
            direction,
            self.config.obstacle_check_distance,
            self.config.obstacle_layers,
        );

        match (self.obstacle, hit) {
            (None, Some(hit)) => {
                self.obstacle = Some(hit.entity);
                self.is_obstacle_in_front = true;
                notices.push(LocomotionNotice::ObstacleTouched(hit.entity));
            }
            (Some(obstacle), None) => {
                self.is_obstacle_in_front = false;
                self.obstacle = None;
                notices.push(LocomotionNotice::ObstacleReleased(obstacle));
            }
            // contact is kept with the first obstacle until the ray comes back clear
            _ => {}
        }
    }

    fn update_movement(&self, body: &mut CharacterBody) {
        let f = self.frame;
        body.velocity = f.compose(
            self.movement_input * self.movement_speed,
            f.vertical(body.velocity),
        );
    }

    fn launch_pending_jump(&mut self, body: &mut CharacterBody, notices: &mut Notices) {
        if !self.pending_launch {
            return;
        }
        self.pending_launch = false;

        let f = self.frame;
        let speed = (2.0 * body.gravity * self.config.max_jump_height).sqrt();
        body.velocity = f.compose(f.lateral(body.velocity), speed * f.orientation);
        self.jump_start_height = f.vertical(body.position);
        // a jump uses up the coyote window
        self.is_grounded = false;
        self.coyote_timer = self.config.coyote_time;
        notices.push(LocomotionNotice::JumpStarted);
    }

    fn update_jump(&mut self, body: &mut CharacterBody) {
        if !self.is_jumping || self.pending_launch {
            return;
        }

        let f = self.frame;
        let height = f.vertical(body.position) - self.jump_start_height;
        if height.abs() < self.config.min_jump_height {
            return;
        }

        if !self.jump_held {
            let cut = match self.config.jump_cut_mode {
                JumpCutMode::OneShot => !self.jump_cut_applied,
                JumpCutMode::Decay => true,
            };
            if cut {
                let vertical = f.vertical(body.velocity) * self.config.jump_end_gravity_multiplier;
                body.velocity = f.compose(f.lateral(body.velocity), vertical);
                self.jump_cut_applied = true;
            }
        }

        // past the apex
        if f.vertical(body.velocity) * f.orientation <= 0.0 {
            self.is_jumping = false;
        }
    }
}
