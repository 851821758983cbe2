use bevy_ecs::prelude::Component;

/// Inserted on a bird when it hits a pipe or the ground.
///
/// Crashed birds no longer take part in flight, scoring or piloting.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crashed {
    /// Active ticks survived before the crash.
    pub distance: u64,
}
