use bevy_ecs::prelude::Component;

use crate::autopilot::Brain;

/// Marks a bird flown by a [`Brain`] instead of the keyboard.
#[derive(Component)]
pub struct Pilot {
    /// Position of the brain in the list handed to the session.
    pub index: usize,
    pub brain: Box<dyn Brain>,
}

impl Pilot {
    pub fn new(index: usize, brain: Box<dyn Brain>) -> Self {
        Self { index, brain }
    }
}
