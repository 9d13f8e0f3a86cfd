//! Kinematic body component driven by the fixed-step physics phase.
//!
//! The [`RigidBody`] component stores velocity and how strongly the world's
//! gravity (see [`GravityDirector`](crate::resources::gravity::GravityDirector))
//! pulls on the entity. Locomotion writes velocity components, the
//! [`movement_system`](crate::systems::movement::movement_system) integrates them.
//!
//! The `frozen` flag allows temporarily disabling all movement calculations,
//! useful when an entity's position is controlled externally.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Kinematic body storing velocity and a gravity scale.
///
/// # Fields
/// - `velocity` - Current velocity in world units per second
/// - `gravity_scale` - Multiplier applied to the world gravity vector (0.0 = floating)
/// - `frozen` - When true, physics systems skip this entity
#[derive(Component, Clone, Copy, Debug)]
pub struct RigidBody {
    /// Current velocity in world units per second.
    pub velocity: Vec2,
    /// Multiplier applied to world gravity.
    pub gravity_scale: f32,
    /// When true, movement and locomotion skip this entity.
    pub frozen: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    /// Create a RigidBody with zero velocity affected by gravity at scale 1.
    pub fn new() -> Self {
        Self {
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            frozen: false,
        }
    }

    /// Builder: set the gravity scale.
    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    /// Set the velocity of the RigidBody.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Freeze the rigid body, preventing physics systems from updating it.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Unfreeze the rigid body.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rigidbody_new() {
        let rb = RigidBody::new();
        assert_eq!(rb.velocity, Vec2::ZERO);
        assert_eq!(rb.gravity_scale, 1.0);
        assert!(!rb.frozen);
    }

    #[test]
    fn test_with_gravity_scale() {
        let rb = RigidBody::new().with_gravity_scale(2.5);
        assert_eq!(rb.gravity_scale, 2.5);
    }

    #[test]
    fn test_freeze_unfreeze() {
        let mut rb = RigidBody::default();
        rb.freeze();
        assert!(rb.frozen);
        rb.unfreeze();
        assert!(!rb.frozen);
    }
}
