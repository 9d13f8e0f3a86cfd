//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the simulation. Components define data such as position, collision shape,
//! body velocity, locomotion state, and animation parameters.
//!
//! Submodules overview:
//! - [`animatorparams`] – named floats, bools and triggers for an animation state machine
//! - [`boxcollider`] – axis-aligned rectangular collider and the [`boxcollider::Aabb`] type
//! - [`collisionlayer`] – layer bits used to filter sensing queries
//! - [`locomotion`] – the platformer locomotion state machine
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`playercontrolled`] – routes player input to a character
//! - [`pushcollider`] – alternate collider used while pushing an obstacle
//! - [`rigidbody`] – simple kinematic body storing velocity and gravity scale
//! - [`scale`] – 2D scale factor used to mirror sprites

pub mod animatorparams;
pub mod boxcollider;
pub mod collisionlayer;
pub mod locomotion;
pub mod mapposition;
pub mod playercontrolled;
pub mod pushcollider;
pub mod rigidbody;
pub mod scale;
