//! Scrolling ground strip.
//!
//! The base sprite is wider than the viewport; shifting it left by up to the
//! overhang and wrapping back to zero gives the illusion of an endless floor.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ground {
    /// Horizontal draw offset, always in `(-overhang, 0]`.
    pub offset: i32,
    /// Top edge of the strip.
    pub y: i32,
    /// How far the strip can shift before wrapping.
    pub overhang: i32,
    pub speed: i32,
}

impl Ground {
    pub fn new(y: i32, base_width: i32, viewport_width: i32, speed: i32) -> Self {
        Self {
            offset: 0,
            y,
            overhang: (base_width - viewport_width).max(1),
            speed,
        }
    }

    pub fn scroll(&mut self) {
        self.offset = -((-self.offset + self.speed) % self.overhang);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_wraps_within_overhang() {
        let mut ground = Ground::new(404, 336, 288, 4);
        assert_eq!(ground.overhang, 48);
        for i in 1..=11 {
            ground.scroll();
            assert_eq!(ground.offset, -4 * i);
        }
        ground.scroll();
        assert_eq!(ground.offset, 0);
        for _ in 0..500 {
            ground.scroll();
            assert!(ground.offset <= 0 && ground.offset > -ground.overhang);
        }
    }

    #[test]
    fn test_narrow_base_does_not_divide_by_zero() {
        let mut ground = Ground::new(404, 288, 288, 4);
        ground.scroll();
        assert_eq!(ground.offset, 0);
    }
}
