//! Flight body component.
//!
//! A [`Bird`] has a fixed horizontal position and moves only vertically. It
//! has two motion modes: idle bobbing on the welcome screen
//! ([`Bird::oscillate`]) and powered flight under gravity ([`Bird::advance`]).
//! Flap requests are latched with [`Bird::flap`] and consumed by the next
//! physics step, so input and physics can run in separate systems.
//!
//! All tunables come from the [`BirdTuning`] value copied in at construction.

use std::sync::Arc;

use bevy_ecs::prelude::Component;

use crate::components::boxcollider::BoxCollider;
use crate::components::hitmask::Hitmask;
use crate::resources::gameconfig::BirdTuning;

/// Wing frames shown in order: up, mid, down, mid.
pub const WING_CYCLE: [usize; 4] = [0, 1, 2, 1];

/// Wing frame drawn for a crashed bird.
pub const MIDFLAP_FRAME: usize = 1;

/// Idle triangle-wave state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Oscillation {
    pub amplitude: i32,
    /// +1 while rising towards the positive peak, -1 otherwise.
    pub direction: i32,
}

impl Default for Oscillation {
    fn default() -> Self {
        Self {
            amplitude: 0,
            direction: 1,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Bird {
    /// Left edge, constant for the session.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Vertical position restored by [`Bird::reset_to_idle`].
    pub start_y: i32,
    /// Pixels per tick, positive is downwards.
    pub velocity: i32,
    /// Degrees, positive is nose up.
    pub rotation: f32,
    pub wing_index: usize,
    wing_step: usize,
    anim_counter: u32,
    flapped: bool,
    pub oscillation: Oscillation,
    pub width: i32,
    pub height: i32,
    pub upper_bound: i32,
    /// Ground contact position (`ground_y - height`).
    pub lower_bound: i32,
    masks: Arc<[Hitmask; 3]>,
    tuning: BirdTuning,
}

impl Bird {
    /// Create a bird whose sprite size is taken from the wing masks.
    pub fn new(
        x: i32,
        start_y: i32,
        ground_y: i32,
        masks: Arc<[Hitmask; 3]>,
        tuning: BirdTuning,
    ) -> Self {
        let width = masks[0].width() as i32;
        let height = masks[0].height() as i32;
        Self {
            x,
            y: start_y,
            start_y,
            velocity: tuning.flap_velocity,
            rotation: 0.0,
            wing_index: 0,
            wing_step: 0,
            anim_counter: 0,
            flapped: false,
            oscillation: Oscillation::default(),
            width,
            height,
            upper_bound: tuning.ceiling,
            lower_bound: ground_y - height,
            masks,
            tuning,
        }
    }

    /// Return to the welcome-screen pose.
    pub fn reset_to_idle(&mut self) {
        self.soft_reset();
        self.rotation = 0.0;
        self.y = self.start_y;
        self.oscillation = Oscillation::default();
    }

    /// Prepare for takeoff without moving the bird.
    pub fn soft_reset(&mut self) {
        self.anim_counter = 0;
        self.wing_step = 0;
        self.wing_index = 0;
        self.velocity = self.tuning.flap_velocity;
        self.rotation = self.tuning.takeoff_rotation;
    }

    /// Idle bobbing: a triangle wave peaking at the configured amplitude.
    pub fn oscillate(&mut self) {
        let osc = &mut self.oscillation;
        if osc.amplitude.abs() == self.tuning.oscillation_amplitude {
            osc.direction = -osc.direction;
        }
        osc.amplitude += osc.direction;
        self.y += osc.amplitude;
    }

    pub fn flap(&mut self) {
        self.flapped = true;
    }

    /// Drop a latched flap that has not been consumed yet.
    pub fn cancel_flap(&mut self) {
        self.flapped = false;
    }

    pub fn has_flapped(&self) -> bool {
        self.flapped
    }

    /// One physics step.
    pub fn advance(&mut self) {
        let t = &self.tuning;
        if self.flapped {
            self.velocity = t.flap_velocity;
            self.rotation = t.takeoff_rotation;
            self.flapped = false;
        } else if self.velocity < t.max_descend_velocity {
            self.velocity += t.gravity;
            if self.velocity > t.max_descend_velocity {
                self.velocity = t.max_descend_velocity;
            }
        }
        if self.velocity < t.min_ascend_velocity {
            self.velocity = t.min_ascend_velocity;
        }

        self.y += self.velocity;
        if self.y < self.upper_bound {
            self.y = self.upper_bound;
        } else if self.y > self.lower_bound {
            self.y = self.lower_bound;
        }

        // no rotation while resting on the ground
        if !self.is_grounded() && self.rotation > t.min_rotation {
            self.rotation = (self.rotation - t.rotation_rate).max(t.min_rotation);
        }
    }

    /// Count a tick; every `wing_period` ticks show the next wing frame.
    pub fn advance_wing_animation(&mut self) {
        self.anim_counter += 1;
        if self.anim_counter >= self.tuning.wing_period {
            self.anim_counter = 0;
            self.wing_step = (self.wing_step + 1) % WING_CYCLE.len();
            self.wing_index = WING_CYCLE[self.wing_step];
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.y >= self.lower_bound
    }

    /// Hitmask of the wing frame currently shown.
    pub fn current_mask(&self) -> &Hitmask {
        &self.masks[self.wing_index]
    }

    pub fn hitbox(&self) -> BoxCollider {
        BoxCollider::new(self.x, self.y, self.width, self.height)
    }

    /// Twice the horizontal midpoint, kept integral for odd widths.
    pub fn midpoint_x2(&self) -> i32 {
        2 * self.x + self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bird() -> Bird {
        let masks = Arc::new([
            Hitmask::filled(34, 24),
            Hitmask::filled(34, 24),
            Hitmask::filled(34, 24),
        ]);
        Bird::new(57, 244, 404, masks, BirdTuning::default())
    }

    #[test]
    fn test_new_derives_bounds_from_sprite() {
        let bird = make_bird();
        assert_eq!(bird.width, 34);
        assert_eq!(bird.height, 24);
        assert_eq!(bird.lower_bound, 380);
        assert_eq!(bird.upper_bound, -24);
        assert_eq!(bird.midpoint_x2(), 148);
    }

    #[test]
    fn test_soft_reset_keeps_position() {
        let mut bird = make_bird();
        bird.y = 100;
        bird.velocity = 7;
        bird.rotation = -40.0;
        bird.soft_reset();
        assert_eq!(bird.y, 100);
        assert_eq!(bird.velocity, -9);
        assert_eq!(bird.rotation, 30.0);
        assert_eq!(bird.wing_index, 0);
    }

    #[test]
    fn test_reset_to_idle() {
        let mut bird = make_bird();
        bird.y = 10;
        bird.oscillation = Oscillation {
            amplitude: -5,
            direction: -1,
        };
        bird.reset_to_idle();
        assert_eq!(bird.y, 244);
        assert_eq!(bird.rotation, 0.0);
        assert_eq!(bird.oscillation, Oscillation::default());
    }

    #[test]
    fn test_oscillate_triangle_wave() {
        let mut bird = make_bird();
        let mut amplitudes = Vec::new();
        for _ in 0..34 {
            bird.oscillate();
            amplitudes.push(bird.oscillation.amplitude);
        }
        assert_eq!(&amplitudes[..9], &[1, 2, 3, 4, 5, 6, 7, 8, 7]);
        assert_eq!(amplitudes[23], -8);
        assert_eq!(amplitudes[24], -7);
        assert!(amplitudes.iter().all(|a| a.abs() <= 8));
    }

    #[test]
    fn test_flap_overrides_descent() {
        let mut bird = make_bird();
        bird.y = 200;
        bird.velocity = 10;
        bird.rotation = -70.0;
        bird.flap();
        bird.advance();
        assert_eq!(bird.velocity, -9);
        assert_eq!(bird.rotation, 27.0);
        assert_eq!(bird.y, 191);
        assert!(!bird.has_flapped());
    }

    #[test]
    fn test_gravity_caps_at_max_descent() {
        let mut bird = make_bird();
        bird.y = 0;
        bird.velocity = 9;
        bird.advance();
        assert_eq!(bird.velocity, 10);
        bird.advance();
        assert_eq!(bird.velocity, 10);
    }

    #[test]
    fn test_rotation_floor() {
        let mut bird = make_bird();
        bird.y = -24;
        bird.velocity = -9;
        bird.rotation = -68.0;
        bird.advance();
        assert_eq!(bird.rotation, -70.0);
        bird.advance();
        assert_eq!(bird.rotation, -70.0);
    }

    #[test]
    fn test_no_rotation_on_ground() {
        let mut bird = make_bird();
        bird.y = 375;
        bird.velocity = 10;
        bird.rotation = 12.0;
        bird.advance();
        assert_eq!(bird.y, 380);
        assert!(bird.is_grounded());
        assert_eq!(bird.rotation, 12.0);
    }

    #[test]
    fn test_position_clamped_to_ceiling() {
        let mut bird = make_bird();
        bird.y = -20;
        bird.flap();
        bird.advance();
        assert_eq!(bird.y, -24);
    }

    #[test]
    fn test_random_flaps_stay_in_bounds() {
        let mut bird = make_bird();
        bird.soft_reset();
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..2000 {
            if rng.u8(..) < 40 {
                bird.flap();
            }
            bird.advance();
            assert!(bird.y >= bird.upper_bound && bird.y <= bird.lower_bound);
            assert!(bird.velocity >= -9 && bird.velocity <= 10);
            assert!(bird.rotation >= -70.0);
        }
    }

    #[test]
    fn test_wing_cycle() {
        let mut bird = make_bird();
        let mut frames = Vec::new();
        for _ in 0..40 {
            bird.advance_wing_animation();
            frames.push(bird.wing_index);
        }
        assert_eq!(frames[8], 0);
        assert_eq!(frames[9], 1);
        assert_eq!(frames[19], 2);
        assert_eq!(frames[29], 1);
        assert_eq!(frames[39], 0);
    }
}
