//! Score and distance counters.

use bevy_ecs::prelude::Resource;

/// Pipes passed in the current flight.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score(pub u32);

/// Active ticks survived in the current flight.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Distance(pub u64);
