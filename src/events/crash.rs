//! Crash event and observer.
//!
//! The collision detector triggers a [`CrashEvent`] for every bird that hits
//! the ground or a pipe. The observer freezes the bird's survival distance in
//! a [`Crashed`] marker and, for the keyboard bird, requests the Terminal
//! phase.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::crashed::Crashed;
use crate::components::player::Player;
use crate::resources::gamestate::{GameStates, NextGameState};
use crate::resources::score::Distance;

#[derive(Event, Debug, Clone, Copy)]
pub struct CrashEvent {
    pub entity: Entity,
}

pub fn observe_crash(
    trigger: On<CrashEvent>,
    mut commands: Commands,
    players: Query<(), With<Player>>,
    distance: Res<Distance>,
    mut next_state: ResMut<NextGameState>,
) {
    let entity = trigger.event().entity;
    debug!("Bird {:?} crashed at distance {}", entity, distance.0);
    commands.entity(entity).insert(Crashed {
        distance: distance.0,
    });
    if players.contains(entity) {
        next_state.set(GameStates::Terminal);
    }
}
