//! Collision layers and layer masks.
//!
//! Every collider lives on exactly one layer (a single bit). Sensing queries
//! take a [`LayerMask`] and only report colliders whose layer is in the mask.

use bevy_ecs::prelude::Component;
use std::ops::{BitOr, Not};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub const DEFAULT: LayerMask = LayerMask(1 << 0);
    pub const GROUND: LayerMask = LayerMask(1 << 1);
    pub const PLAYER: LayerMask = LayerMask(1 << 2);
    pub const OBSTACLE: LayerMask = LayerMask(1 << 3);

    /// True if any bit of `layer` is in this mask.
    pub fn contains(self, layer: LayerMask) -> bool {
        self.0 & layer.0 != 0
    }

    /// Parses a comma separated list of layer names (`ground, obstacle`).
    pub fn parse(list: &str) -> Result<LayerMask, String> {
        let mut mask = LayerMask::NONE;
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            mask = mask
                | match name.to_ascii_lowercase().as_str() {
                    "default" => LayerMask::DEFAULT,
                    "ground" => LayerMask::GROUND,
                    "player" => LayerMask::PLAYER,
                    "obstacle" => LayerMask::OBSTACLE,
                    "all" => LayerMask::ALL,
                    "none" => LayerMask::NONE,
                    other => return Err(format!("Unknown collision layer '{}'", other)),
                };
        }
        Ok(mask)
    }
}

impl FromStr for LayerMask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerMask::parse(s)
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;
    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}

impl Not for LayerMask {
    type Output = LayerMask;
    fn not(self) -> LayerMask {
        LayerMask(!self.0)
    }
}

/// Layer a collider belongs to. Colliders without it count as [`LayerMask::DEFAULT`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionLayer(pub LayerMask);

impl Default for CollisionLayer {
    fn default() -> Self {
        Self(LayerMask::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_mask_excludes_layer() {
        let mask = !LayerMask::PLAYER;
        assert!(mask.contains(LayerMask::GROUND));
        assert!(!mask.contains(LayerMask::PLAYER));
    }

    #[test]
    fn parse_layer_list() {
        let mask = LayerMask::parse("ground, Obstacle").unwrap();
        assert_eq!(mask, LayerMask::GROUND | LayerMask::OBSTACLE);
        assert_eq!(LayerMask::parse("").unwrap(), LayerMask::NONE);
        assert!(LayerMask::parse("lava").is_err());
    }
}
