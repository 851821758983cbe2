//! Bird systems.
//!
//! - [`player_flap_system`] latches a flap on the keyboard bird.
//! - [`oscillate_system`] bobs birds on the welcome screen.
//! - [`bird_physics_system`] runs one physics step for every flying bird.
//! - [`falling_bird_system`] lets the crashed keyboard bird fall after a crash.
//! - [`wing_animation_system`] advances the wing frames of flying birds.
use bevy_ecs::prelude::*;

use crate::components::bird::Bird;
use crate::components::crashed::Crashed;
use crate::components::player::Player;
use crate::events::audio::{AudioCmd, FX_WING};
use crate::resources::input::TickInput;

pub fn player_flap_system(
    input: Res<TickInput>,
    mut birds: Query<&mut Bird, (With<Player>, Without<Crashed>)>,
    mut audio: MessageWriter<AudioCmd>,
) {
    if !input.flap {
        return;
    }
    for mut bird in birds.iter_mut() {
        bird.flap();
        audio.write(AudioCmd::play(FX_WING));
    }
}

pub fn oscillate_system(mut birds: Query<&mut Bird, Without<Crashed>>) {
    for mut bird in birds.iter_mut() {
        bird.oscillate();
    }
}

pub fn bird_physics_system(mut birds: Query<&mut Bird, Without<Crashed>>) {
    for mut bird in birds.iter_mut() {
        bird.advance();
    }
}

pub fn falling_bird_system(mut birds: Query<&mut Bird, (With<Player>, With<Crashed>)>) {
    for mut bird in birds.iter_mut() {
        bird.advance();
        bird.advance_wing_animation();
    }
}

pub fn wing_animation_system(mut birds: Query<&mut Bird, Without<Crashed>>) {
    for mut bird in birds.iter_mut() {
        bird.advance_wing_animation();
    }
}
