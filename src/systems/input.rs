//! Input polling.
//!
//! [`update_input_state`] reads the keyboard from Raylib once per frame and
//! writes the result into [`crate::resources::input::InputState`].
use bevy_ecs::prelude::*;
use raylib::RaylibHandle;

use crate::resources::input::{BoolState, InputState};

fn poll(state: &mut BoolState, rl: &RaylibHandle) {
    state.active = rl.is_key_down(state.key_binding);
    state.just_pressed = rl.is_key_pressed(state.key_binding);
    state.just_released = rl.is_key_released(state.key_binding);
}

/// Poll Raylib for keyboard input and update the `InputState` resource.
pub fn update_input_state(world: &mut World, rl: &RaylibHandle) {
    let mut input = world.resource_mut::<InputState>();
    poll(&mut input.flap, rl);
    poll(&mut input.flap_alt, rl);
    poll(&mut input.pause, rl);
    poll(&mut input.quit, rl);
}
