//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame, applying `time_scale` to the provided delta, and
//! tells the caller how many fixed ticks the
//! [`FixedTime`](crate::resources::worldtime::FixedTime) clock owes.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::{FixedTime, WorldTime};

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled frame delta in seconds. The system
/// applies the current `time_scale` and writes both `elapsed` and `delta`.
/// Returns the scaled delta.
pub fn update_world_time(world: &mut World, dt: f32) -> f32 {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt.max(0.0) * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
    scaled_dt
}

/// Feed scaled frame time to the fixed clock and return the ticks due.
pub fn accumulate_fixed_time(world: &mut World, scaled_dt: f32) -> u32 {
    world.resource_mut::<FixedTime>().accumulate(scaled_dt)
}
