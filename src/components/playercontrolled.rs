//! Player-controlled marker component.
//!
//! Entities carrying [`PlayerControlled`] receive locomotion intents from the
//! shared [`InputState`](crate::resources::input::InputState) through
//! [`player_input_system`](crate::systems::input::player_input_system).

use bevy_ecs::prelude::Component;

use crate::resources::gravity::GravityDirection;

/// Routes player input to this entity's locomotion controller.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerControlled {
    /// Direction the debug gravity toggle switches to. Toggling while gravity
    /// already points this way switches back to Down.
    pub gravity_toggle: GravityDirection,
}

impl Default for PlayerControlled {
    fn default() -> Self {
        Self {
            gravity_toggle: GravityDirection::Up,
        }
    }
}

impl PlayerControlled {
    pub fn new(gravity_toggle: GravityDirection) -> Self {
        Self { gravity_toggle }
    }

    /// Where the toggle goes from `current`.
    pub fn toggle_target(&self, current: GravityDirection) -> GravityDirection {
        if current == self.gravity_toggle {
            GravityDirection::Down
        } else {
            self.gravity_toggle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_goes_to_configured_direction() {
        let pc = PlayerControlled::new(GravityDirection::Left);
        assert_eq!(pc.toggle_target(GravityDirection::Down), GravityDirection::Left);
        assert_eq!(pc.toggle_target(GravityDirection::Up), GravityDirection::Left);
    }

    #[test]
    fn test_toggle_returns_to_down() {
        let pc = PlayerControlled::default();
        assert_eq!(pc.toggle_target(GravityDirection::Up), GravityDirection::Down);
    }

    #[test]
    fn test_toggle_to_down_stays_down() {
        let pc = PlayerControlled::new(GravityDirection::Down);
        assert_eq!(pc.toggle_target(GravityDirection::Down), GravityDirection::Down);
    }
}
