//! Obstacle stream resource.
//!
//! [`PipeStream`] owns the FIFO of [`PipePair`]s on screen. Pipes enter the
//! queue at the back, scroll left together and leave from the front, so
//! queue order always matches left-to-right screen order. A new pair is
//! appended each time the leading pair crosses a trigger window near the
//! left edge; the leading pair is retired once it has fully left the screen.
//!
//! Gap positions are drawn from a seeded [`fastrand::Rng`] so runs are
//! reproducible.

use std::collections::VecDeque;
use std::ops::Range;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::debug;

use crate::components::boxcollider::BoxCollider;
use crate::components::hitmask::Hitmask;
use crate::resources::gameconfig::{ConfigError, CourseTuning};

/// Hitmasks shared by every pipe pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeMasks {
    pub upper: Hitmask,
    pub lower: Hitmask,
}

impl PipeMasks {
    /// Derive both pieces from the lower pipe sprite; the upper piece is its mirror.
    pub fn from_lower(lower: Hitmask) -> Self {
        Self {
            upper: lower.flipped_vertical(),
            lower,
        }
    }
}

/// One obstacle: an upper and a lower piece separated by a vertical gap.
#[derive(Debug, Clone)]
pub struct PipePair {
    pub x: i32,
    /// Top edge of the upper piece (usually negative).
    pub upper_y: i32,
    /// Top edge of the lower piece.
    pub lower_y: i32,
    pub width: i32,
    pub height: i32,
    /// Set once the bird has been credited for passing this pair.
    pub scored: bool,
    masks: Arc<PipeMasks>,
}

impl PipePair {
    pub fn upper_box(&self) -> BoxCollider {
        BoxCollider::new(self.x, self.upper_y, self.width, self.height)
    }

    pub fn lower_box(&self) -> BoxCollider {
        BoxCollider::new(self.x, self.lower_y, self.width, self.height)
    }

    pub fn upper_mask(&self) -> &Hitmask {
        &self.masks.upper
    }

    pub fn lower_mask(&self) -> &Hitmask {
        &self.masks.lower
    }

    /// First open row below the upper piece.
    pub fn gap_top(&self) -> i32 {
        self.upper_y + self.height
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Twice the horizontal midpoint.
    pub fn midpoint_x2(&self) -> i32 {
        2 * self.x + self.width
    }

    pub fn move_left(&mut self, speed: i32) {
        self.x -= speed;
    }
}

#[derive(Resource, Debug)]
pub struct PipeStream {
    pipes: VecDeque<PipePair>,
    rng: fastrand::Rng,
    masks: Arc<PipeMasks>,
    pipe_width: i32,
    pipe_height: i32,
    ground_y: i32,
    gap: i32,
    spacing: i32,
    speed: i32,
    first_x: i32,
}

impl PipeStream {
    /// Create an empty stream.
    ///
    /// `first_x` is where [`PipeStream::reseed`] places the first pair. Fails
    /// when the ground leaves no room to place the gap.
    pub fn new(
        course: &CourseTuning,
        ground_y: i32,
        first_x: i32,
        masks: Arc<PipeMasks>,
        rng: fastrand::Rng,
    ) -> Result<Self, ConfigError> {
        if ground_y * 3 / 5 <= course.pipe_gap {
            return Err(ConfigError::GapBandTooNarrow {
                ground_y,
                gap: course.pipe_gap,
            });
        }
        Ok(Self {
            pipes: VecDeque::with_capacity(3),
            rng,
            pipe_width: masks.lower.width() as i32,
            pipe_height: masks.lower.height() as i32,
            masks,
            ground_y,
            gap: course.pipe_gap,
            spacing: course.pipe_spacing,
            speed: course.scroll_speed,
            first_x,
        })
    }

    /// Range the gap top is drawn from: skips the top fifth of the playfield
    /// and leaves room for the gap above the bottom fifth.
    pub fn gap_band(&self) -> Range<i32> {
        let low = self.ground_y / 5;
        low..low + self.ground_y * 3 / 5 - self.gap
    }

    /// Build a pair at `origin_x` with a random gap position.
    pub fn spawn_at(&mut self, origin_x: i32) -> PipePair {
        let gap_top = self.rng.i32(self.gap_band());
        self.spawn_with_gap_top(origin_x, gap_top)
    }

    /// Build a pair at `origin_x` whose gap starts at `gap_top`.
    pub fn spawn_with_gap_top(&self, origin_x: i32, gap_top: i32) -> PipePair {
        PipePair {
            x: origin_x,
            upper_y: gap_top - self.pipe_height,
            lower_y: gap_top + self.gap,
            width: self.pipe_width,
            height: self.pipe_height,
            scored: false,
            masks: Arc::clone(&self.masks),
        }
    }

    /// Replace the queue with two pairs starting at `first_x`.
    pub fn seed(&mut self, first_x: i32) {
        self.pipes.clear();
        let first = self.spawn_at(first_x);
        let second = self.spawn_at(first_x + self.pipe_width + self.spacing);
        debug!(
            "Seeded pipes at x={} (gap {}) and x={} (gap {})",
            first.x,
            first.gap_top(),
            second.x,
            second.gap_top()
        );
        self.pipes.push_back(first);
        self.pipes.push_back(second);
    }

    /// Seed at the stream's configured start position.
    pub fn reseed(&mut self) {
        self.seed(self.first_x);
    }

    /// Where the next appended pair goes: one spacing step past the last pair.
    fn next_spawn_x(&self) -> i32 {
        let n = self.pipes.len();
        match n {
            0 => self.first_x,
            1 => self.pipes[0].x + self.pipe_width + self.spacing,
            _ => {
                let last = self.pipes[n - 1].x;
                let prev = self.pipes[n - 2].x;
                last + (last - prev)
            }
        }
    }

    /// Scroll every pair, append when the front enters the trigger window
    /// `(0, speed]`, and retire the front once it is fully off screen.
    pub fn tick(&mut self) {
        for pipe in self.pipes.iter_mut() {
            pipe.move_left(self.speed);
        }

        let front_x = match self.pipes.front() {
            Some(front) => front.x,
            None => return,
        };

        if front_x > 0 && front_x <= self.speed {
            let x = self.next_spawn_x();
            let pipe = self.spawn_at(x);
            debug!("Spawned pipe at x={} gap_top={}", pipe.x, pipe.gap_top());
            self.pipes.push_back(pipe);
        }

        if front_x < -self.pipe_width {
            self.pipes.pop_front();
            debug!("Retired pipe, {} left", self.pipes.len());
        }
    }

    pub fn clear(&mut self) {
        self.pipes.clear();
    }

    /// Append an already built pair.
    pub fn push(&mut self, pipe: PipePair) {
        self.pipes.push_back(pipe);
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PipePair> {
        self.pipes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PipePair> {
        self.pipes.iter_mut()
    }

    pub fn front(&self) -> Option<&PipePair> {
        self.pipes.front()
    }

    /// First pair whose right edge is still ahead of `x`.
    pub fn next_ahead_of(&self, x: i32) -> Option<&PipePair> {
        self.pipes.iter().find(|p| p.right() > x)
    }

    pub fn pipe_width(&self) -> i32 {
        self.pipe_width
    }

    pub fn pipe_height(&self) -> i32 {
        self.pipe_height
    }

    pub fn gap(&self) -> i32 {
        self.gap
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_stream(seed: u64) -> PipeStream {
        let masks = Arc::new(PipeMasks::from_lower(Hitmask::filled(52, 320)));
        PipeStream::new(
            &CourseTuning::default(),
            404,
            388,
            masks,
            fastrand::Rng::with_seed(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_gap_band() {
        let stream = make_stream(1);
        assert_eq!(stream.gap_band(), 80..222);
    }

    #[test]
    fn test_spawn_invariant() {
        let mut stream = make_stream(2);
        let band = stream.gap_band();
        for i in 0..500 {
            let pipe = stream.spawn_at(i);
            assert_eq!(pipe.lower_y - pipe.upper_y, 320 + 100);
            assert!(band.contains(&pipe.gap_top()));
            assert_eq!(pipe.x, i);
            assert!(!pipe.scored);
        }
    }

    #[test]
    fn test_seed_places_two_pairs() {
        let mut stream = make_stream(3);
        stream.reseed();
        let xs: Vec<i32> = stream.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![388, 540]);
    }

    #[test]
    fn test_tick_appends_at_constant_spacing() {
        let mut stream = make_stream(4);
        stream.reseed();
        // front reaches x = 4 after 96 ticks
        for _ in 0..96 {
            stream.tick();
        }
        let xs: Vec<i32> = stream.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![4, 156, 308]);
    }

    #[test]
    fn test_tick_retires_front() {
        let mut stream = make_stream(5);
        stream.seed(-48);
        let second_x = stream.iter().nth(1).map(|p| p.x);
        stream.tick();
        assert_eq!(stream.len(), 2);
        stream.tick();
        assert_eq!(stream.len(), 1);
        assert_eq!(stream.front().map(|p| p.x + 8), second_x);
    }

    #[test]
    fn test_narrow_ground_rejected() {
        let masks = Arc::new(PipeMasks::from_lower(Hitmask::filled(52, 320)));
        let result = PipeStream::new(
            &CourseTuning::default(),
            160,
            388,
            masks,
            fastrand::Rng::with_seed(1),
        );
        assert!(matches!(
            result,
            Err(ConfigError::GapBandTooNarrow {
                ground_y: 160,
                gap: 100
            })
        ));
    }

    #[test]
    fn test_tightest_valid_spacing_keeps_queue_populated() {
        let course = CourseTuning {
            pipe_spacing: 9,
            ..CourseTuning::default()
        };
        let masks = Arc::new(PipeMasks::from_lower(Hitmask::filled(52, 320)));
        let mut stream =
            PipeStream::new(&course, 404, 388, masks, fastrand::Rng::with_seed(12)).unwrap();
        stream.reseed();
        for _ in 0..2000 {
            stream.tick();
            assert!((1..=3).contains(&stream.len()));
        }
    }

    #[test]
    fn test_same_seed_same_gaps() {
        let mut a = make_stream(42);
        let mut b = make_stream(42);
        a.reseed();
        b.reseed();
        let ga: Vec<i32> = a.iter().map(|p| p.gap_top()).collect();
        let gb: Vec<i32> = b.iter().map(|p| p.gap_top()).collect();
        assert_eq!(ga, gb);
    }

    #[test]
    fn test_next_ahead_of() {
        let mut stream = make_stream(6);
        stream.seed(0);
        assert_eq!(stream.next_ahead_of(57).map(|p| p.x), Some(152));
        assert_eq!(stream.next_ahead_of(51).map(|p| p.x), Some(0));
    }
}
