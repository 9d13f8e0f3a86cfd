//! Input action events.
//!
//! This module defines [`InputEvent`] which is triggered when gameplay-relevant
//! input actions occur (press or release). The [`InputAction`] enum lists all
//! recognized actions.
//!
//! [`InputInvertedEvent`] is triggered whenever horizontal input inversion is
//! switched on or off.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Enumeration of logical input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move towards negative lateral axis.
    MoveLeft,
    /// Move towards positive lateral axis.
    MoveRight,
    /// Hold to run.
    Run,
    /// Press to jump, release early for a shorter jump.
    Jump,
    /// Debug: switch gravity direction.
    GravityToggle,
}

impl InputAction {
    pub const ALL: [InputAction; 5] = [
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Run,
        InputAction::Jump,
        InputAction::GravityToggle,
    ];
}

/// Event emitted when an input action is pressed or released.
#[derive(Event, Debug, Clone, Copy)]
pub struct InputEvent {
    /// The input action that triggered this event.
    pub action: InputAction,
    /// Whether the action was pressed (true) or released (false).
    pub pressed: bool,
}

/// Horizontal input inversion was switched.
#[derive(Event, Debug, Clone, Copy)]
pub struct InputInvertedEvent {
    pub inverted: bool,
}
