//! Phase transition event and observer.
//!
//! Systems request a change of [`GameStates`] by updating [`NextGameState`].
//! Emitting a [`GameStateChangedEvent`] then triggers the observer in this
//! module, which applies the transition to [`GameState`] and runs the enter
//! hook registered for the new phase in
//! [`crate::resources::systemsstore::SystemsStore`].
use crate::resources::gamestate::NextGameStates::{Pending, Unchanged};
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::systemsstore::SystemsStore;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

/// Event used to indicate that a pending phase transition should be applied.
#[derive(Event, Debug, Clone, Copy)]
pub struct GameStateChangedEvent {}

/// Observer that applies a pending phase transition.
///
/// Contract
/// - Reads the intention from [`NextGameState`].
/// - If pending, copies the new value into [`GameState`], clears the request
///   and queues the enter hook of the new phase.
/// - If nothing is pending the event is ignored.
pub fn observe_gamestate_change_event(
    _trigger: On<GameStateChangedEvent>,
    mut commands: Commands,
    mut next_game_state: Option<ResMut<NextGameState>>,
    mut game_state: Option<ResMut<GameState>>,
    systems_store: Res<SystemsStore>,
) {
    debug!("GameStateChangedEvent triggered");

    let (Some(next_game_state), Some(game_state)) =
        (next_game_state.as_deref_mut(), game_state.as_deref_mut())
    else {
        warn!(
            "One or more resources missing in observe_gamestate_change_event. next_state: {:?}, game_state: {:?}",
            next_game_state.is_some(),
            game_state.is_some()
        );
        return;
    };

    match next_game_state.get().clone() {
        Pending(new_state) => {
            info!("Transitioning from {:?} to {:?}", game_state.get(), new_state);
            game_state.set(new_state);
            next_game_state.reset();
            on_state_enter(new_state, &mut commands, &systems_store);
        }
        Unchanged => {
            debug!("No state change pending.");
        }
    }
}

/// Internal: queue the enter hook registered for `state`.
fn on_state_enter(state: GameStates, commands: &mut Commands, systems_store: &SystemsStore) {
    let Some(name) = SystemsStore::enter_hook_name(state) else {
        debug!("Entered {:?}", state);
        return;
    };
    match systems_store.get(name) {
        Some(id) => commands.run_system(*id),
        None => warn!("No '{}' hook registered in SystemsStore", name),
    }
}
