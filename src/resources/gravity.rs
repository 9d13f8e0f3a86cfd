//! World gravity state.
//!
//! [`GravityDirector`] is the single writer of the world's gravity direction.
//! The world is y-up; the gravity vector is always `direction.unit() *
//! magnitude` with a positive magnitude, for all four directions.
//!
//! Changing the direction from ECS code goes through
//! [`change_gravity`](crate::systems::gravity::change_gravity), which also
//! notifies observers of
//! [`GravityDirectionChangedEvent`](crate::events::gravity::GravityDirectionChangedEvent).

use bevy_ecs::prelude::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_GRAVITY_MAGNITUDE: f32 = 9.81;

/// Direction gravity pulls towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GravityDirection {
    Up,
    Right,
    #[default]
    Down,
    Left,
}

impl GravityDirection {
    pub const ALL: [GravityDirection; 4] = [
        GravityDirection::Up,
        GravityDirection::Right,
        GravityDirection::Down,
        GravityDirection::Left,
    ];

    /// Unit vector pointing where gravity pulls.
    pub fn unit(self) -> Vec2 {
        match self {
            GravityDirection::Up => Vec2::Y,
            GravityDirection::Right => Vec2::X,
            GravityDirection::Down => Vec2::NEG_Y,
            GravityDirection::Left => Vec2::NEG_X,
        }
    }

    pub fn frame(self) -> GravityFrame {
        GravityFrame::from(self)
    }
}

impl fmt::Display for GravityDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GravityDirection::Up => "up",
            GravityDirection::Right => "right",
            GravityDirection::Down => "down",
            GravityDirection::Left => "left",
        };
        f.write_str(name)
    }
}

impl FromStr for GravityDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "top" => Ok(GravityDirection::Up),
            "right" => Ok(GravityDirection::Right),
            "down" | "bottom" => Ok(GravityDirection::Down),
            "left" => Ok(GravityDirection::Left),
            other => Err(format!("Unknown gravity direction '{}'", other)),
        }
    }
}

/// Character-relative axes for a gravity direction.
///
/// "Vertical" is the world axis gravity acts along (Y for Up/Down, X for
/// Left/Right), "lateral" is the other one. `orientation` is +1 when the
/// character's up points along the positive vertical axis (Down, Left) and -1
/// when inverted (Up, Right).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityFrame {
    pub vertical_is_y: bool,
    pub orientation: f32,
}

impl From<GravityDirection> for GravityFrame {
    fn from(direction: GravityDirection) -> Self {
        match direction {
            GravityDirection::Down => GravityFrame {
                vertical_is_y: true,
                orientation: 1.0,
            },
            GravityDirection::Up => GravityFrame {
                vertical_is_y: true,
                orientation: -1.0,
            },
            GravityDirection::Left => GravityFrame {
                vertical_is_y: false,
                orientation: 1.0,
            },
            GravityDirection::Right => GravityFrame {
                vertical_is_y: false,
                orientation: -1.0,
            },
        }
    }
}

impl Default for GravityFrame {
    fn default() -> Self {
        GravityDirection::default().frame()
    }
}

impl GravityFrame {
    /// Raw component of `v` along the gravity axis.
    pub fn vertical(&self, v: Vec2) -> f32 {
        if self.vertical_is_y { v.y } else { v.x }
    }

    /// Raw component of `v` along the lateral axis.
    pub fn lateral(&self, v: Vec2) -> f32 {
        if self.vertical_is_y { v.x } else { v.y }
    }

    /// Builds a world vector from raw lateral and vertical components.
    pub fn compose(&self, lateral: f32, vertical: f32) -> Vec2 {
        if self.vertical_is_y {
            Vec2::new(lateral, vertical)
        } else {
            Vec2::new(vertical, lateral)
        }
    }

    /// Positive lateral world direction.
    pub fn lateral_unit(&self) -> Vec2 {
        self.compose(1.0, 0.0)
    }

    /// Character "up" in world space.
    pub fn up(&self) -> Vec2 {
        self.compose(0.0, self.orientation)
    }
}

/// Resource holding the current gravity direction and magnitude.
#[derive(Resource, Debug, Clone)]
pub struct GravityDirector {
    current: GravityDirection,
    magnitude: f32,
    /// Set while observers are being notified of a change.
    notifying: bool,
}

impl Default for GravityDirector {
    fn default() -> Self {
        Self {
            current: GravityDirection::Down,
            magnitude: DEFAULT_GRAVITY_MAGNITUDE,
            notifying: false,
        }
    }
}

impl GravityDirector {
    /// Create a director pulling down with the given magnitude.
    pub fn new(magnitude: f32) -> Result<Self, String> {
        if !magnitude.is_finite() || magnitude <= 0.0 {
            return Err(format!(
                "Gravity magnitude must be a positive number, got {}",
                magnitude
            ));
        }
        Ok(Self {
            magnitude,
            ..Self::default()
        })
    }

    /// Builder: start with a direction other than Down.
    pub fn with_direction(mut self, direction: GravityDirection) -> Self {
        self.current = direction;
        self
    }

    pub fn direction(&self) -> GravityDirection {
        self.current
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Gravity acceleration applied to bodies.
    pub fn vector(&self) -> Vec2 {
        self.current.unit() * self.magnitude
    }

    pub fn frame(&self) -> GravityFrame {
        self.current.frame()
    }

    pub fn is_notifying(&self) -> bool {
        self.notifying
    }

    pub(crate) fn set_notifying(&mut self, notifying: bool) {
        self.notifying = notifying;
    }

    /// Apply a new direction. Same-direction calls are applied again, not skipped.
    pub fn change_gravity(&mut self, direction: GravityDirection) -> Vec2 {
        self.current = direction;
        self.vector()
    }

    /// Back to the start-of-simulation direction.
    pub fn reset(&mut self) {
        self.current = GravityDirection::Down;
        self.notifying = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn vector_matches_direction_for_all_directions() {
        let mut director = GravityDirector::default();
        for direction in GravityDirection::ALL {
            let v = director.change_gravity(direction);
            assert_eq!(director.direction(), direction);
            assert!(approx_eq(v.length(), DEFAULT_GRAVITY_MAGNITUDE));
            assert!(approx_eq(v.normalize().dot(direction.unit()), 1.0));
        }
    }

    #[test]
    fn default_pulls_down() {
        let director = GravityDirector::default();
        assert_eq!(director.direction(), GravityDirection::Down);
        assert!(approx_eq(director.vector().y, -9.81));
        assert!(approx_eq(director.vector().x, 0.0));
    }

    #[test]
    fn rejects_non_positive_magnitude() {
        assert!(GravityDirector::new(0.0).is_err());
        assert!(GravityDirector::new(-9.81).is_err());
        assert!(GravityDirector::new(f32::NAN).is_err());
        assert!(GravityDirector::new(20.0).is_ok());
    }

    #[test]
    fn reset_restores_down() {
        let mut director = GravityDirector::default().with_direction(GravityDirection::Left);
        director.reset();
        assert_eq!(director.direction(), GravityDirection::Down);
    }

    #[test]
    fn frame_orientation_per_direction() {
        assert_eq!(GravityDirection::Down.frame().orientation, 1.0);
        assert_eq!(GravityDirection::Up.frame().orientation, -1.0);
        assert_eq!(GravityDirection::Left.frame().orientation, 1.0);
        assert_eq!(GravityDirection::Right.frame().orientation, -1.0);
        for direction in GravityDirection::ALL {
            // up is always opposite to gravity
            assert_eq!(direction.frame().up(), -direction.unit());
        }
    }

    #[test]
    fn frame_components_round_trip_for_sideways_gravity() {
        let frame = GravityDirection::Right.frame();
        let v = Vec2::new(3.0, -2.0);
        assert_eq!(frame.vertical(v), 3.0);
        assert_eq!(frame.lateral(v), -2.0);
        assert_eq!(frame.compose(frame.lateral(v), frame.vertical(v)), v);
        assert_eq!(frame.lateral_unit(), Vec2::Y);
    }

    #[test]
    fn parse_direction_names() {
        assert_eq!("Top".parse::<GravityDirection>(), Ok(GravityDirection::Up));
        assert_eq!(" left ".parse::<GravityDirection>(), Ok(GravityDirection::Left));
        assert!("sideways".parse::<GravityDirection>().is_err());
    }
}
