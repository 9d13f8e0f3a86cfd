//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: configuration, gravity, input state,
//! timing, and the collider queries used for sensing. Each submodule documents
//! the semantics and intended usage of its resource(s).
//!
//! Overview
//! - `gameconfig` – INI-backed simulation and character tuning
//! - `gravity` – current gravity direction and magnitude
//! - `input` – per-frame action state of the player controls
//! - `physicsquery` – shape and ray casts against box colliders
//! - `worldtime` – frame time and the fixed-step clock
pub mod gameconfig;
pub mod gravity;
pub mod input;
pub mod physicsquery;
pub mod worldtime;
