use bevy_ecs::prelude::Component;

/// Marks the keyboard-controlled bird. Its crash ends the flight.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
