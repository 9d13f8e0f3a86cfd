use bevy_ecs::prelude::Component;

use crate::components::boxcollider::BoxCollider;

/// Alternate collider shape used while the character pushes against an obstacle.
///
/// On [`ObstacleTouchedEvent`](crate::events::locomotion::ObstacleTouchedEvent)
/// the entity's [`BoxCollider`] is swapped for `push`; the original is kept in
/// `normal` and restored on release.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct PushCollider {
    pub push: BoxCollider,
    pub normal: Option<BoxCollider>,
}

impl PushCollider {
    pub fn new(push: BoxCollider) -> Self {
        Self { push, normal: None }
    }

    pub fn is_pushing(&self) -> bool {
        self.normal.is_some()
    }

    /// Swap in the push shape. Returns the collider to install, or None when already pushing.
    pub fn engage(&mut self, current: BoxCollider) -> Option<BoxCollider> {
        if self.normal.is_some() {
            return None;
        }
        self.normal = Some(current);
        Some(self.push)
    }

    /// Collider to restore, or None when not pushing.
    pub fn release(&mut self) -> Option<BoxCollider> {
        self.normal.take()
    }
}
