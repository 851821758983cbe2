//! High-level game phase resources.
//!
//! These resources track the authoritative current phase of the game and any
//! pending transition requested by systems. See
//! `crate::events::gamestate::observe_gamestate_change_event` for how a
//! transition is applied and enter hooks are invoked.

use bevy_ecs::prelude::Resource;

/// Discrete phases the game can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStates {
    /// Before the first transition has been applied.
    #[default]
    None,
    /// Welcome screen: the bird bobs and the ground scrolls.
    Idle,
    /// Flight in progress.
    Active,
    /// The bird crashed and is falling, waiting for acknowledgement.
    Terminal,
}

/// Representation of a requested next phase.
///
/// Use [`NextGameState::set`] to mark a transition as pending; an observer
/// will later apply it and reset the value to [`NextGameStates::Unchanged`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NextGameStates {
    #[default]
    Unchanged,
    Pending(GameStates),
}

/// Authoritative current phase.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    current: GameStates,
}

impl GameState {
    /// Create a new state initialized to [`GameStates::None`].
    pub fn new() -> Self {
        GameState {
            current: GameStates::None,
        }
    }
    /// Read-only access to the current phase.
    pub fn get(&self) -> GameStates {
        self.current
    }
    /// Update the current phase immediately.
    ///
    /// Prefer requesting transitions via [`NextGameState`] so the enter hooks run.
    pub fn set(&mut self, state: GameStates) {
        self.current = state;
    }
}

/// Intent to change to a new phase.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NextGameState {
    next: NextGameStates,
}

impl NextGameState {
    /// Create a new value initialized to [`NextGameStates::Unchanged`].
    pub fn new() -> Self {
        NextGameState {
            next: NextGameStates::Unchanged,
        }
    }

    /// Get the current transition request.
    pub fn get(&self) -> &NextGameStates {
        &self.next
    }

    /// Request a transition to `next` by marking it as pending.
    ///
    /// `check_pending_state` emits the change event at the end of the tick.
    pub fn set(&mut self, next: GameStates) {
        self.next = NextGameStates::Pending(next);
    }

    /// Reset to [`NextGameStates::Unchanged`].
    pub fn reset(&mut self) {
        self.next = NextGameStates::Unchanged;
    }
}

/// Pause sub-state of [`GameStates::Active`].
///
/// While set, the bird, pipes and ground are frozen; input, collision checks
/// and wing animation keep running.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Paused(pub bool);

impl Paused {
    pub fn toggle(&mut self) {
        self.0 = !self.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_state_pending_and_reset() {
        let mut next = NextGameState::new();
        assert_eq!(next.get(), &NextGameStates::Unchanged);
        next.set(GameStates::Active);
        assert_eq!(next.get(), &NextGameStates::Pending(GameStates::Active));
        next.reset();
        assert_eq!(next.get(), &NextGameStates::Unchanged);
    }

    #[test]
    fn test_pause_toggle() {
        let mut paused = Paused::default();
        paused.toggle();
        assert!(paused.0);
        paused.toggle();
        assert!(!paused.0);
    }
}
