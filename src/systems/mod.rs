//! Simulation systems.
//!
//! This module groups all ECS systems that advance input, locomotion, physics
//! and presentation.
//!
//! Submodules overview
//! - [`animator`] – publish locomotion state as animator parameters
//! - [`collision`] – push dynamic bodies out of static colliders
//! - [`gravity`] – apply gravity direction changes and notify observers
//! - [`input`] – turn [`crate::resources::input::InputState`] edges into locomotion intents
//! - [`locomotion`] – run each character's locomotion controller on the fixed tick
//! - [`movement`] – integrate gravity and velocity into positions
//! - [`time`] – update frame time and the fixed-step accumulator

pub mod animator;
pub mod collision;
pub mod gravity;
pub mod input;
pub mod locomotion;
pub mod movement;
pub mod time;
