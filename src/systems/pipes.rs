use bevy_ecs::prelude::*;

use crate::resources::pipes::PipeStream;

/// Scroll the pipe stream one step, spawning and retiring pairs as needed.
pub fn pipe_stream_system(mut pipes: ResMut<PipeStream>) {
    pipes.tick();
}
