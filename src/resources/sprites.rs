//! Collision geometry of the loaded sprites.
//!
//! The simulation never touches textures; it only needs the hitmasks and the
//! sizes they imply. The binary fills [`Sprites`] from the image files, while
//! tests and headless evaluation use [`Sprites::placeholder`].

use std::sync::Arc;

use bevy_ecs::prelude::Resource;

use crate::components::hitmask::Hitmask;
use crate::resources::pipes::PipeMasks;

pub const PLACEHOLDER_BIRD_SIZE: (usize, usize) = (34, 24);
pub const PLACEHOLDER_PIPE_SIZE: (usize, usize) = (52, 320);
pub const PLACEHOLDER_BASE_WIDTH: i32 = 336;

#[derive(Resource, Debug, Clone)]
pub struct Sprites {
    /// One mask per wing frame: up, mid, down.
    pub bird: Arc<[Hitmask; 3]>,
    pub pipes: Arc<PipeMasks>,
    /// Width of the ground strip sprite.
    pub base_width: i32,
}

impl Sprites {
    pub fn new(bird: [Hitmask; 3], pipe_lower: Hitmask, base_width: i32) -> Self {
        Self {
            bird: Arc::new(bird),
            pipes: Arc::new(PipeMasks::from_lower(pipe_lower)),
            base_width,
        }
    }

    /// Sizes of the classic sprite set: rounded bird frames and solid pipes.
    pub fn placeholder() -> Self {
        let (bw, bh) = PLACEHOLDER_BIRD_SIZE;
        let (pw, ph) = PLACEHOLDER_PIPE_SIZE;
        // transparent 2px corners
        let bird = Hitmask::from_fn(bw, bh, |x, y| {
            let dx = x.min(bw - 1 - x);
            let dy = y.min(bh - 1 - y);
            dx + dy >= 2
        });
        Self::new(
            [bird.clone(), bird.clone(), bird],
            Hitmask::filled(pw, ph),
            PLACEHOLDER_BASE_WIDTH,
        )
    }

    pub fn bird_width(&self) -> i32 {
        self.bird[0].width() as i32
    }

    pub fn bird_height(&self) -> i32 {
        self.bird[0].height() as i32
    }

    pub fn pipe_width(&self) -> i32 {
        self.pipes.lower.width() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_sizes() {
        let sprites = Sprites::placeholder();
        assert_eq!(sprites.bird_width(), 34);
        assert_eq!(sprites.bird_height(), 24);
        assert_eq!(sprites.pipe_width(), 52);
        assert_eq!(sprites.pipes.upper.height(), 320);
    }

    #[test]
    fn test_placeholder_bird_corners_transparent() {
        let sprites = Sprites::placeholder();
        let mask = &sprites.bird[0];
        assert!(!mask.is_opaque(0, 0));
        assert!(!mask.is_opaque(33, 23));
        assert!(!mask.is_opaque(1, 0));
        assert!(mask.is_opaque(1, 1));
        assert!(mask.is_opaque(17, 12));
    }
}
