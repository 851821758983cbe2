//! Per-frame keyboard input resources.
//!
//! [`InputState`] captures the keys the game cares about, polled from Raylib
//! once per frame. The simulation itself only sees the distilled
//! [`TickInput`] actions, which tests and headless runs can build directly.
use bevy_ecs::prelude::*;
use raylib::prelude::KeyboardKey;

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is currently held down this frame.
    pub active: bool,
    /// Whether the key was just pressed this frame.
    pub just_pressed: bool,
    /// Whether the key was just released this frame.
    pub just_released: bool,

    /// The key bound to this action.
    pub key_binding: KeyboardKey,
}

impl BoolState {
    pub fn bound_to(key_binding: KeyboardKey) -> Self {
        Self {
            key_binding,
            ..Self::default()
        }
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding: KeyboardKey::KEY_NULL,
        }
    }
}

/// Resource capturing the per-frame keyboard state relevant to gameplay.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub flap: BoolState,
    pub flap_alt: BoolState,
    pub pause: BoolState,
    pub quit: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            flap: BoolState::bound_to(KeyboardKey::KEY_SPACE),
            flap_alt: BoolState::bound_to(KeyboardKey::KEY_UP),
            pause: BoolState::bound_to(KeyboardKey::KEY_P),
            quit: BoolState::bound_to(KeyboardKey::KEY_ESCAPE),
        }
    }
}

impl InputState {
    /// Actions requested this frame. Only fresh presses count.
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            flap: self.flap.just_pressed || self.flap_alt.just_pressed,
            pause: self.pause.just_pressed,
            quit: self.quit.just_pressed,
        }
    }
}

/// Actions consumed by one simulation tick.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickInput {
    /// Flap, start a flight, or acknowledge a crash depending on the phase.
    pub flap: bool,
    /// Toggle pause while flying.
    pub pause: bool,
    /// Leave the game. Handled by the frame loop, not the simulation.
    pub quit: bool,
}

impl TickInput {
    pub fn flap() -> Self {
        Self {
            flap: true,
            ..Self::default()
        }
    }
}
