// Animation parameters published by locomotion for the presentation side

use bevy_ecs::prelude::Component;
use rustc_hash::{FxHashMap, FxHashSet};

pub const Y_VELOCITY: &str = "YVelocity";
pub const SPEED: &str = "Speed";
pub const IS_GROUNDED: &str = "IsGrounded";
pub const IS_OBSTACLE_IN_FRONT: &str = "IsObstacleInFront";
pub const IS_RUNNING: &str = "IsRunning";
pub const GRAVITY_DIRECTION: &str = "GravityDirection";
pub const JUMP: &str = "Jump";

/// Named parameters an animation state machine reads.
///
/// Floats and bools are overwritten every frame by
/// [`animator_params_system`](crate::systems::animator::animator_params_system).
/// Triggers stay set until the consumer calls [`AnimatorParams::consume_trigger`].
#[derive(Debug, Clone, Component)]
pub struct AnimatorParams {
    pub floats: FxHashMap<String, f32>,
    pub bools: FxHashMap<String, bool>,
    pub triggers: FxHashSet<String>,
    /// Playback speed multiplier.
    pub speed: f32,
}

impl Default for AnimatorParams {
    fn default() -> Self {
        Self {
            floats: FxHashMap::default(),
            bools: FxHashMap::default(),
            triggers: FxHashSet::default(),
            speed: 1.0,
        }
    }
}

impl AnimatorParams {
    pub fn set_float(&mut self, key: impl Into<String>, value: f32) {
        self.floats.insert(key.into(), value);
    }
    pub fn get_float(&self, key: &str) -> Option<f32> {
        self.floats.get(key).copied()
    }
    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.bools.insert(key.into(), value);
    }
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.bools.get(key).copied()
    }
    pub fn set_trigger(&mut self, key: impl Into<String>) {
        self.triggers.insert(key.into());
    }
    pub fn has_trigger(&self, key: &str) -> bool {
        self.triggers.contains(key)
    }
    /// Returns whether the trigger was set, clearing it.
    pub fn consume_trigger(&mut self, key: &str) -> bool {
        self.triggers.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_overwrite() {
        let mut params = AnimatorParams::default();
        params.set_float(SPEED, 3.0);
        params.set_float(SPEED, 6.0);
        params.set_bool(IS_GROUNDED, true);
        assert_eq!(params.get_float(SPEED), Some(6.0));
        assert_eq!(params.get_bool(IS_GROUNDED), Some(true));
        assert_eq!(params.get_bool(IS_RUNNING), None);
        assert_eq!(params.speed, 1.0);
    }

    #[test]
    fn test_trigger_is_consumed_once() {
        let mut params = AnimatorParams::default();
        params.set_trigger(JUMP);
        params.set_trigger(JUMP);
        assert!(params.has_trigger(JUMP));
        assert!(params.consume_trigger(JUMP));
        assert!(!params.consume_trigger(JUMP));
    }
}
