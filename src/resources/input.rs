//! Per-frame action input resource.
//!
//! Captures the state of the actions the player controller cares about and
//! exposes it to systems via the [`InputState`] resource. Hardware polling is
//! not part of this crate: something outside (a window backend, a replay, a
//! test) calls [`InputState::press`] and [`InputState::release`], and
//! [`player_input_system`](crate::systems::input::player_input_system)
//! consumes the edges once per frame.
use bevy_ecs::prelude::*;

use crate::events::input::InputAction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Boolean action state with edge flags.
pub struct BoolState {
    /// Whether the action is currently held.
    pub active: bool,
    /// Whether the action was pressed since the last frame.
    pub just_pressed: bool,
    /// Whether the action was released since the last frame.
    pub just_released: bool,
}

impl BoolState {
    fn press(&mut self) {
        if !self.active {
            self.active = true;
            self.just_pressed = true;
        }
    }

    fn release(&mut self) {
        if self.active {
            self.active = false;
            self.just_released = true;
        }
    }

    fn changed(&self) -> bool {
        self.just_pressed || self.just_released
    }
}

/// Resource capturing the action state relevant to gameplay.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub move_left: BoolState,
    pub move_right: BoolState,
    pub run: BoolState,
    pub jump: BoolState,
    pub gravity_toggle: BoolState,
    /// Horizontal input is mirrored when set.
    inverted: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            move_left: BoolState::default(),
            move_right: BoolState::default(),
            run: BoolState::default(),
            jump: BoolState::default(),
            gravity_toggle: BoolState::default(),
            inverted: false,
        }
    }
}

impl InputState {
    pub fn state(&self, action: InputAction) -> &BoolState {
        match action {
            InputAction::MoveLeft => &self.move_left,
            InputAction::MoveRight => &self.move_right,
            InputAction::Run => &self.run,
            InputAction::Jump => &self.jump,
            InputAction::GravityToggle => &self.gravity_toggle,
        }
    }

    fn state_mut(&mut self, action: InputAction) -> &mut BoolState {
        match action {
            InputAction::MoveLeft => &mut self.move_left,
            InputAction::MoveRight => &mut self.move_right,
            InputAction::Run => &mut self.run,
            InputAction::Jump => &mut self.jump,
            InputAction::GravityToggle => &mut self.gravity_toggle,
        }
    }

    /// Mark an action as held. Pressing a held action is ignored.
    pub fn press(&mut self, action: InputAction) {
        self.state_mut(action).press();
    }

    /// Mark an action as released. Releasing an idle action is ignored.
    pub fn release(&mut self, action: InputAction) {
        self.state_mut(action).release();
    }

    pub fn set(&mut self, action: InputAction, pressed: bool) {
        if pressed {
            self.press(action);
        } else {
            self.release(action);
        }
    }

    /// True if either movement action changed since the last frame.
    pub fn movement_changed(&self) -> bool {
        self.move_left.changed() || self.move_right.changed()
    }

    /// -1, 0 or +1, already scaled by inversion.
    pub fn movement_axis(&self) -> f32 {
        let raw = (self.move_right.active as i32 - self.move_left.active as i32) as f32;
        raw * self.input_scale()
    }

    pub fn input_scale(&self) -> f32 {
        if self.inverted { -1.0 } else { 1.0 }
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    /// Forget this frame's edges.
    pub fn clear_edges(&mut self) {
        for action in InputAction::ALL {
            let state = self.state_mut(action);
            state.just_pressed = false;
            state.just_released = false;
        }
    }
}
