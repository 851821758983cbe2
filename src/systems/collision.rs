//! Collision detection between birds, pipes and the ground.
//!
//! Detection is two-stage: bounding boxes are clipped against each other
//! first, and only the overlapping rectangle is checked pixel by pixel
//! against both hitmasks. Sprites are not rectangular (pipe caps, wing
//! poses), so box overlap alone is not a hit.
use bevy_ecs::prelude::*;

use crate::components::bird::Bird;
use crate::components::boxcollider::BoxCollider;
use crate::components::crashed::Crashed;
use crate::components::hitmask::Hitmask;
use crate::events::crash::CrashEvent;
use crate::resources::pipes::{PipePair, PipeStream};

/// Whether any opaque pixel of `mask_a` drawn at `a` lands on an opaque pixel
/// of `mask_b` drawn at `b`.
pub fn pixel_collision(
    a: &BoxCollider,
    b: &BoxCollider,
    mask_a: &Hitmask,
    mask_b: &Hitmask,
) -> bool {
    let Some(rect) = a.clip(b) else {
        return false;
    };

    let (ax, ay) = ((rect.x - a.x) as usize, (rect.y - a.y) as usize);
    let (bx, by) = ((rect.x - b.x) as usize, (rect.y - b.y) as usize);
    for dy in 0..rect.h as usize {
        for dx in 0..rect.w as usize {
            if mask_a.is_opaque(ax + dx, ay + dy) && mask_b.is_opaque(bx + dx, by + dy) {
                return true;
            }
        }
    }
    false
}

/// Whether `bird` touches the ground or any pipe piece.
pub fn collides<'a>(bird: &Bird, pipes: impl IntoIterator<Item = &'a PipePair>) -> bool {
    if bird.is_grounded() {
        return true;
    }

    let bird_box = bird.hitbox();
    let bird_mask = bird.current_mask();
    pipes.into_iter().any(|pipe| {
        pixel_collision(&bird_box, &pipe.upper_box(), bird_mask, pipe.upper_mask())
            || pixel_collision(&bird_box, &pipe.lower_box(), bird_mask, pipe.lower_mask())
    })
}

/// Trigger a [`CrashEvent`] for every flying bird that collides this tick.
pub fn crash_detector(
    mut commands: Commands,
    birds: Query<(Entity, &Bird), Without<Crashed>>,
    pipes: Res<PipeStream>,
) {
    for (entity, bird) in birds.iter() {
        if collides(bird, pipes.iter()) {
            commands.trigger(CrashEvent { entity });
        }
    }
}
