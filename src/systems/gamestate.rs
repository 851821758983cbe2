//! Phase bookkeeping systems and run conditions.
use bevy_ecs::prelude::*;

use crate::components::bird::Bird;
use crate::components::crashed::Crashed;
use crate::events::gamestate::GameStateChangedEvent;
use crate::resources::gamestate::{NextGameState, NextGameStates, Paused};
use crate::resources::input::TickInput;

/// Emit [`GameStateChangedEvent`] when a transition has been requested.
pub fn check_pending_state(mut commands: Commands, next_state: Res<NextGameState>) {
    if let NextGameStates::Pending(_new_state) = next_state.get() {
        commands.trigger(GameStateChangedEvent {});
    }
}

/// Flip the pause flag when the pause key was pressed this tick.
pub fn toggle_pause_system(input: Res<TickInput>, mut paused: ResMut<Paused>) {
    if input.pause {
        paused.toggle();
    }
}

pub fn not_paused(paused: Res<Paused>) -> bool {
    !paused.0
}

/// True while at least one bird has not crashed.
pub fn any_bird_flying(birds: Query<(), (With<Bird>, Without<Crashed>)>) -> bool {
    !birds.is_empty()
}
