use bevy_ecs::prelude::*;

use crate::resources::ground::Ground;

pub fn ground_scroll_system(mut ground: ResMut<Ground>) {
    ground.scroll();
}
