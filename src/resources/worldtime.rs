use bevy_ecs::prelude::Resource;

/// Simulation clock, advanced once per tick.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct WorldTime {
    /// Simulated seconds since the session started.
    pub elapsed: f32,
    /// Ticks simulated since the session started, in every phase.
    pub frame_count: u64,
}
