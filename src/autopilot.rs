//! Autopilot: birds flown by a decision function instead of the keyboard.
//!
//! A [`Brain`] sees two normalised sensor readings each tick and answers
//! whether to flap. The simulation knows nothing else about it, so any
//! controller (hand-written rule, neural network, evolved genome) plugs in
//! the same way.
//!
//! Sensors, measured against the next pipe pair still ahead of the bird:
//! - horizontal: pipe right edge minus bird left edge,
//! - vertical: bird top minus the gap's vertical centre.
//!
//! [`evaluate`] runs a whole flock headless and reports how far each brain
//! got, which is the fitness a training loop would feed back.

use bevy_ecs::prelude::Resource;
use log::info;
use serde::Serialize;

use crate::resources::gameconfig::{ConfigError, GameConfig};
use crate::resources::sprites::Sprites;
use crate::session::Session;

/// Normalised sensor readings for one bird.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrainInputs {
    /// 0 when the next pipe's trailing edge is level with the bird, 1 when a
    /// new pipe has just come into range.
    pub horizontal: f32,
    /// 0 at the ceiling end of the range, 1 at the ground end. Larger means
    /// the bird is further below the gap centre.
    pub vertical: f32,
}

/// Flap decision function attached to a piloted bird.
pub trait Brain: Send + Sync + 'static {
    /// Called once per tick before physics. Returning `true` flaps the bird.
    fn decide(&mut self, inputs: &BrainInputs) -> bool;
}

impl<F> Brain for F
where
    F: FnMut(&BrainInputs) -> bool + Send + Sync + 'static,
{
    fn decide(&mut self, inputs: &BrainInputs) -> bool {
        self(inputs)
    }
}

/// Linear map of `[min, max]` onto `[0, 1]`. Values outside the range map
/// outside `[0, 1]`; nothing is clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    min: f32,
    max: f32,
}

impl Normalizer {
    pub fn new(min: f32, max: f32) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() || min == max {
            return Err(ConfigError::DegenerateRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn apply(&self, value: f32) -> f32 {
        (value - self.min) / (self.max - self.min)
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }
}

/// Sensor normalisation ranges derived from the course geometry.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SensorRanges {
    pub horizontal: Normalizer,
    pub vertical: Normalizer,
}

impl SensorRanges {
    /// Horizontal error spans one pipe spacing plus a pipe width. Vertical
    /// error spans from a bird at the ceiling under the lowest possible gap
    /// to a bird on the ground under the highest one.
    pub fn from_config(config: &GameConfig, sprites: &Sprites) -> Result<Self, ConfigError> {
        let ground_y = config.ground_y() as f32;
        let half_gap = config.course.pipe_gap as f32 / 2.0;
        let lower_bound = config.ground_y() - sprites.bird_height();

        let max_x = config.course.pipe_spacing + sprites.pipe_width();
        let min_y = config.bird.ceiling - (0.8 * ground_y - half_gap) as i32;
        let max_y = lower_bound - (0.2 * ground_y + half_gap) as i32;

        Ok(Self {
            horizontal: Normalizer::new(0.0, max_x as f32)?,
            vertical: Normalizer::new(min_y as f32, max_y as f32)?,
        })
    }

    pub fn inputs(&self, err_x: i32, err_y: i32) -> BrainInputs {
        BrainInputs {
            horizontal: self.horizontal.apply(err_x as f32),
            vertical: self.vertical.apply(err_y as f32),
        }
    }
}

/// Built-in rule: flap whenever the bird has sunk below a fixed level
/// relative to the gap centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapSeeker {
    /// Normalised vertical reading above which the bird flaps.
    pub threshold: f32,
}

impl GapSeeker {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl Brain for GapSeeker {
    fn decide(&mut self, inputs: &BrainInputs) -> bool {
        inputs.vertical > self.threshold
    }
}

/// Outcome of one headless flock run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationReport {
    pub seed: u64,
    /// Active ticks simulated.
    pub distance: u64,
    /// Pipes passed by the longest-lived birds.
    pub score: u32,
    /// Survival distance per brain, in the order the brains were given.
    pub fitness: Vec<u64>,
    /// Birds still flying when the run stopped.
    pub survivors: usize,
}

/// Fly every brain at once on the same course until all have crashed or the
/// distance cap is reached.
///
/// Each bird starts at a random height near mid-screen. Birds that crash get
/// the distance they survived; birds still flying at the cap get the cap.
pub fn evaluate(
    config: &GameConfig,
    sprites: &Sprites,
    seed: u64,
    brains: Vec<Box<dyn Brain>>,
) -> Result<EvaluationReport, ConfigError> {
    let max_distance = config.autopilot.max_distance;
    let mut session = Session::with_pilots(config.clone(), sprites.clone(), seed, brains)?;

    while session.distance() < max_distance {
        if session.advance_active_tick(false, false) {
            break;
        }
    }

    let fitness = session.pilot_fitness();
    let survivors = session.flying_count();
    let report = EvaluationReport {
        seed,
        distance: session.distance(),
        score: session.score(),
        fitness,
        survivors,
    };
    info!(
        "Evaluation finished: distance {}, score {}, {} survivor(s)",
        report.distance, report.score, report.survivors
    );
    Ok(report)
}
