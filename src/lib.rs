//! Flipfall library.
//!
//! This module exposes the platformer locomotion core (gravity director and
//! locomotion controller) together with the ECS components, resources,
//! systems, and events around it, for use in integration tests and as a
//! reusable library.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
