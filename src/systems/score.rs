//! Scoring systems.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::bird::Bird;
use crate::components::crashed::Crashed;
use crate::events::audio::{AudioCmd, FX_POINT};
use crate::resources::pipes::PipeStream;
use crate::resources::score::{Distance, Score};

/// Count one more survived tick.
pub fn distance_system(mut distance: ResMut<Distance>) {
    distance.0 += 1;
}

/// Credit each pipe pair once, on the tick its midpoint comes within one
/// scroll step of the bird's midpoint.
///
/// All birds share the same horizontal position, so the first flying bird
/// stands in for the flock.
pub fn score_system(
    mut pipes: ResMut<PipeStream>,
    birds: Query<&Bird, Without<Crashed>>,
    mut score: ResMut<Score>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let Some(bird) = birds.iter().next() else {
        return;
    };
    let bird_mid_x2 = bird.midpoint_x2();
    let window_x2 = 2 * pipes.speed();
    for pipe in pipes.iter_mut() {
        let mid_x2 = pipe.midpoint_x2();
        if !pipe.scored && mid_x2 >= bird_mid_x2 && mid_x2 < bird_mid_x2 + window_x2 {
            pipe.scored = true;
            score.0 += 1;
            debug!("Passed pipe at x={}, score {}", pipe.x, score.0);
            audio.write(AudioCmd::play(FX_POINT));
        }
    }
}
