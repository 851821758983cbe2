//! Time update system.
//!
//! Advances the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per tick by the fixed tick length.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance the clock by one tick of `dt` seconds.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    wt.elapsed += dt;
    wt.frame_count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_world_time_accumulates_and_counts() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        update_world_time(&mut world, 0.2);
        update_world_time(&mut world, 0.2);
        let wt = world.resource::<WorldTime>();
        assert!((wt.elapsed - 0.4).abs() < 1e-6);
        assert_eq!(wt.frame_count, 2);
    }
}
