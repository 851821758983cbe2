//! Game configuration resource.
//!
//! Manages game settings loaded from an INI configuration file. Provides
//! defaults matching the classic arcade feel and methods to load, save and
//! validate the configuration. Tunables are grouped into immutable value
//! types ([`CourseTuning`], [`BirdTuning`], [`AutopilotTuning`]) that are
//! copied into the entities that use them at construction time.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 288
//! height = 512
//! tick_rate = 30
//! vsync = true
//!
//! [course]
//! scroll_speed = 4
//! ground_ratio = 0.79
//! pipe_gap = 100
//! pipe_spacing = 100
//! first_pipe_offset = 100
//!
//! [bird]
//! ceiling = -24
//! flap_velocity = -9
//! gravity = 1
//! max_descend_velocity = 10
//! min_ascend_velocity = -9
//! takeoff_rotation = 30
//! rotation_rate = 3
//! min_rotation = -70
//! wing_period = 10
//! oscillation_amplitude = 8
//!
//! [autopilot]
//! first_pipe_offset = 200
//! max_distance = 10000
//! spawn_jitter = 10
//! flap_threshold = 0.55
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_WINDOW_WIDTH: u32 = 288;
const DEFAULT_WINDOW_HEIGHT: u32 = 512;
const DEFAULT_TICK_RATE: u32 = 30;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Fraction of the viewport width where the bird flies.
const BIRD_X_RATIO: f32 = 0.2;

/// Errors raised while loading, saving or validating a [`GameConfig`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("failed to load config file {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("failed to save config file {path:?}: {reason}")]
    Save { path: PathBuf, reason: String },
    #[error("invalid value for [{section}] {key}: {reason}")]
    Parse {
        section: String,
        key: String,
        reason: String,
    },
    #[error("[{section}] {key} must be positive, got {value}")]
    NotPositive {
        section: &'static str,
        key: &'static str,
        value: i64,
    },
    #[error("ground at y={ground_y} leaves no room for a {gap}px pipe gap")]
    GapBandTooNarrow { ground_y: i32, gap: i32 },
    #[error("flap velocity {flap} lies outside the velocity bounds [{min}, {max}]")]
    FlapVelocity { flap: i32, min: i32, max: i32 },
    #[error("pipe spacing {spacing} must exceed twice the scroll speed {speed}")]
    PipeSpacingTooTight { spacing: i32, speed: i32 },
    #[error("[{section}] first pipe would start at x={first_x}, left of the screen")]
    FirstPipeOffscreen { section: &'static str, first_x: i32 },
    #[error("degenerate sensor range [{min}, {max}]")]
    DegenerateRange { min: f32, max: f32 },
}

/// Scrolling course geometry shared by the pipes and the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseTuning {
    /// Pixels every pipe and the ground move left per tick.
    pub scroll_speed: i32,
    /// Ground top as a fraction of the viewport height.
    pub ground_ratio: f32,
    /// Vertical gap between the upper and lower pipe pieces.
    pub pipe_gap: i32,
    /// Horizontal gap between two consecutive pipe pairs.
    pub pipe_spacing: i32,
    /// Distance past the right viewport edge where the first pipe spawns.
    pub first_pipe_offset: i32,
}

impl Default for CourseTuning {
    fn default() -> Self {
        Self {
            scroll_speed: 4,
            ground_ratio: 0.79,
            pipe_gap: 100,
            pipe_spacing: 100,
            first_pipe_offset: 100,
        }
    }
}

/// Flight constants of the bird. Velocities are pixels per tick, angles degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirdTuning {
    /// Highest point the bird can reach (may be above the screen).
    pub ceiling: i32,
    pub flap_velocity: i32,
    pub gravity: i32,
    pub max_descend_velocity: i32,
    pub min_ascend_velocity: i32,
    pub takeoff_rotation: f32,
    pub rotation_rate: f32,
    pub min_rotation: f32,
    /// Ticks between two wing frames.
    pub wing_period: u32,
    /// Peak of the idle bobbing triangle wave.
    pub oscillation_amplitude: i32,
}

impl Default for BirdTuning {
    fn default() -> Self {
        Self {
            ceiling: -24,
            flap_velocity: -9,
            gravity: 1,
            max_descend_velocity: 10,
            min_ascend_velocity: -9,
            takeoff_rotation: 30.0,
            rotation_rate: 3.0,
            min_rotation: -70.0,
            wing_period: 10,
            oscillation_amplitude: 8,
        }
    }
}

/// Settings for piloted birds and headless evaluation runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutopilotTuning {
    /// Distance past the right viewport edge where the first pipe spawns.
    pub first_pipe_offset: i32,
    /// Evaluation stops once the flock has survived this many ticks.
    pub max_distance: u64,
    /// Piloted birds start up to this many pixels above or below mid-screen.
    pub spawn_jitter: i32,
    /// Normalised vertical error above which the built-in brain flaps.
    pub flap_threshold: f32,
}

impl Default for AutopilotTuning {
    fn default() -> Self {
        Self {
            first_pipe_offset: 200,
            max_distance: 10_000,
            spawn_jitter: 10,
            flap_threshold: 0.55,
        }
    }
}

/// Game configuration resource.
///
/// The viewport is fixed at construction; the simulation does not rescale.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Viewport width in pixels.
    pub window_width: u32,
    /// Viewport height in pixels.
    pub window_height: u32,
    /// Simulation ticks per second (also the render frame rate).
    pub tick_rate: u32,
    /// Enable vertical sync.
    pub vsync: bool,
    pub course: CourseTuning,
    pub bird: BirdTuning,
    pub autopilot: AutopilotTuning,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_error(section: &str, key: &str, reason: String) -> ConfigError {
    ConfigError::Parse {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

fn read_int(ini: &Ini, section: &str, key: &str) -> Result<Option<i32>, ConfigError> {
    match ini.getint(section, key) {
        Ok(Some(value)) => i32::try_from(value)
            .map(Some)
            .map_err(|e| parse_error(section, key, e.to_string())),
        Ok(None) => Ok(None),
        Err(reason) => Err(parse_error(section, key, reason)),
    }
}

fn read_uint(ini: &Ini, section: &str, key: &str) -> Result<Option<u64>, ConfigError> {
    ini.getuint(section, key)
        .map_err(|reason| parse_error(section, key, reason))
}

fn read_float(ini: &Ini, section: &str, key: &str) -> Result<Option<f32>, ConfigError> {
    ini.getfloat(section, key)
        .map(|v| v.map(|f| f as f32))
        .map_err(|reason| parse_error(section, key, reason))
}

fn read_bool(ini: &Ini, section: &str, key: &str) -> Result<Option<bool>, ConfigError> {
    ini.getbool(section, key)
        .map_err(|reason| parse_error(section, key, reason))
}

fn positive(section: &'static str, key: &'static str, value: i64) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive {
            section,
            key,
            value,
        })
    }
}

impl GameConfig {
    /// Create a new configuration with the default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            tick_rate: DEFAULT_TICK_RATE,
            vsync: DEFAULT_VSYNC,
            course: CourseTuning::default(),
            bird: BirdTuning::default(),
            autopilot: AutopilotTuning::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. Values that are
    /// present but unparsable are reported as [`ConfigError::Parse`].
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|reason| ConfigError::Load {
                path: self.config_path.clone(),
                reason,
            })?;
        self.apply_ini(&ini)?;

        info!(
            "Loaded config: {}x{} viewport, {} ticks/s, scroll={}, gap={}",
            self.window_width,
            self.window_height,
            self.tick_rate,
            self.course.scroll_speed,
            self.course.pipe_gap
        );
        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|reason| ConfigError::Load {
                path: self.config_path.clone(),
                reason,
            })?;
        self.apply_ini(&ini)
    }

    fn apply_ini(&mut self, ini: &Ini) -> Result<(), ConfigError> {
        // [window] section
        if let Some(width) = read_uint(ini, "window", "width")? {
            self.window_width = width as u32;
        }
        if let Some(height) = read_uint(ini, "window", "height")? {
            self.window_height = height as u32;
        }
        if let Some(rate) = read_uint(ini, "window", "tick_rate")? {
            self.tick_rate = rate as u32;
        }
        if let Some(vsync) = read_bool(ini, "window", "vsync")? {
            self.vsync = vsync;
        }

        // [course] section
        let course = &mut self.course;
        if let Some(v) = read_int(ini, "course", "scroll_speed")? {
            course.scroll_speed = v;
        }
        if let Some(v) = read_float(ini, "course", "ground_ratio")? {
            course.ground_ratio = v;
        }
        if let Some(v) = read_int(ini, "course", "pipe_gap")? {
            course.pipe_gap = v;
        }
        if let Some(v) = read_int(ini, "course", "pipe_spacing")? {
            course.pipe_spacing = v;
        }
        if let Some(v) = read_int(ini, "course", "first_pipe_offset")? {
            course.first_pipe_offset = v;
        }

        // [bird] section
        let bird = &mut self.bird;
        if let Some(v) = read_int(ini, "bird", "ceiling")? {
            bird.ceiling = v;
        }
        if let Some(v) = read_int(ini, "bird", "flap_velocity")? {
            bird.flap_velocity = v;
        }
        if let Some(v) = read_int(ini, "bird", "gravity")? {
            bird.gravity = v;
        }
        if let Some(v) = read_int(ini, "bird", "max_descend_velocity")? {
            bird.max_descend_velocity = v;
        }
        if let Some(v) = read_int(ini, "bird", "min_ascend_velocity")? {
            bird.min_ascend_velocity = v;
        }
        if let Some(v) = read_float(ini, "bird", "takeoff_rotation")? {
            bird.takeoff_rotation = v;
        }
        if let Some(v) = read_float(ini, "bird", "rotation_rate")? {
            bird.rotation_rate = v;
        }
        if let Some(v) = read_float(ini, "bird", "min_rotation")? {
            bird.min_rotation = v;
        }
        if let Some(v) = read_uint(ini, "bird", "wing_period")? {
            bird.wing_period = v as u32;
        }
        if let Some(v) = read_int(ini, "bird", "oscillation_amplitude")? {
            bird.oscillation_amplitude = v;
        }

        // [autopilot] section
        let autopilot = &mut self.autopilot;
        if let Some(v) = read_int(ini, "autopilot", "first_pipe_offset")? {
            autopilot.first_pipe_offset = v;
        }
        if let Some(v) = read_uint(ini, "autopilot", "max_distance")? {
            autopilot.max_distance = v;
        }
        if let Some(v) = read_int(ini, "autopilot", "spawn_jitter")? {
            autopilot.spawn_jitter = v;
        }
        if let Some(v) = read_float(ini, "autopilot", "flap_threshold")? {
            autopilot.flap_threshold = v;
        }

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        let mut set = |section: &str, key: &str, value: String| {
            ini.set(section, key, Some(value));
        };

        set("window", "width", self.window_width.to_string());
        set("window", "height", self.window_height.to_string());
        set("window", "tick_rate", self.tick_rate.to_string());
        set("window", "vsync", self.vsync.to_string());

        let c = &self.course;
        set("course", "scroll_speed", c.scroll_speed.to_string());
        set("course", "ground_ratio", c.ground_ratio.to_string());
        set("course", "pipe_gap", c.pipe_gap.to_string());
        set("course", "pipe_spacing", c.pipe_spacing.to_string());
        set("course", "first_pipe_offset", c.first_pipe_offset.to_string());

        let b = &self.bird;
        set("bird", "ceiling", b.ceiling.to_string());
        set("bird", "flap_velocity", b.flap_velocity.to_string());
        set("bird", "gravity", b.gravity.to_string());
        set("bird", "max_descend_velocity", b.max_descend_velocity.to_string());
        set("bird", "min_ascend_velocity", b.min_ascend_velocity.to_string());
        set("bird", "takeoff_rotation", b.takeoff_rotation.to_string());
        set("bird", "rotation_rate", b.rotation_rate.to_string());
        set("bird", "min_rotation", b.min_rotation.to_string());
        set("bird", "wing_period", b.wing_period.to_string());
        set("bird", "oscillation_amplitude", b.oscillation_amplitude.to_string());

        let a = &self.autopilot;
        set("autopilot", "first_pipe_offset", a.first_pipe_offset.to_string());
        set("autopilot", "max_distance", a.max_distance.to_string());
        set("autopilot", "spawn_jitter", a.spawn_jitter.to_string());
        set("autopilot", "flap_threshold", a.flap_threshold.to_string());

        ini.write(&self.config_path)
            .map_err(|e| ConfigError::Save {
                path: self.config_path.clone(),
                reason: e.to_string(),
            })?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Check that the configuration describes a playable course.
    ///
    /// Pipe spawning draws the gap from `[groundY/5, groundY/5 + 3*groundY/5 - gap)`,
    /// which is empty when `0.6 * groundY <= gap`. The pipe queue only stays
    /// populated when the first pair starts on screen and consecutive pairs
    /// are more than two scroll steps apart.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("window", "width", self.window_width as i64)?;
        positive("window", "height", self.window_height as i64)?;
        positive("window", "tick_rate", self.tick_rate as i64)?;
        positive("course", "scroll_speed", self.course.scroll_speed as i64)?;
        positive("course", "pipe_gap", self.course.pipe_gap as i64)?;
        positive("bird", "wing_period", self.bird.wing_period as i64)?;
        positive(
            "bird",
            "oscillation_amplitude",
            self.bird.oscillation_amplitude as i64,
        )?;
        if self.bird.gravity < 0 {
            return Err(ConfigError::NotPositive {
                section: "bird",
                key: "gravity",
                value: self.bird.gravity as i64,
            });
        }

        let ground_y = self.ground_y();
        if ground_y * 3 / 5 <= self.course.pipe_gap {
            return Err(ConfigError::GapBandTooNarrow {
                ground_y,
                gap: self.course.pipe_gap,
            });
        }

        // a tighter stream lets the next pair cross the spawn window before
        // the front one is retired, and the queue runs dry
        let c = &self.course;
        if c.pipe_spacing <= 2 * c.scroll_speed {
            return Err(ConfigError::PipeSpacingTooTight {
                spacing: c.pipe_spacing,
                speed: c.scroll_speed,
            });
        }
        for (section, offset) in [
            ("course", c.first_pipe_offset),
            ("autopilot", self.autopilot.first_pipe_offset),
        ] {
            let first_x = self.window_width as i32 + offset;
            if first_x <= 0 {
                return Err(ConfigError::FirstPipeOffscreen { section, first_x });
            }
        }

        let b = &self.bird;
        if b.flap_velocity < b.min_ascend_velocity || b.flap_velocity > b.max_descend_velocity {
            return Err(ConfigError::FlapVelocity {
                flap: b.flap_velocity,
                min: b.min_ascend_velocity,
                max: b.max_descend_velocity,
            });
        }
        Ok(())
    }

    /// Top of the ground strip in pixels.
    pub fn ground_y(&self) -> i32 {
        (self.window_height as f32 * self.course.ground_ratio) as i32
    }

    /// Fixed horizontal position of every bird.
    pub fn bird_x(&self) -> i32 {
        (self.window_width as f32 * BIRD_X_RATIO) as i32
    }

    /// Vertical start position for a bird sprite of the given height.
    pub fn bird_start_y(&self, bird_height: i32) -> i32 {
        (self.window_height as i32 - bird_height) / 2
    }

    /// Seconds per simulation tick.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Get the viewport size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::new();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.ground_y(), 404);
        assert_eq!(config.bird_x(), 57);
        assert_eq!(config.bird_start_y(24), 244);
    }

    #[test]
    fn test_gap_band_too_narrow() {
        let mut config = GameConfig::new();
        config.course.pipe_gap = 242;
        assert_eq!(
            config.validate(),
            Err(ConfigError::GapBandTooNarrow {
                ground_y: 404,
                gap: 242
            })
        );
        config.course.pipe_gap = 241;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_flap_velocity_out_of_bounds() {
        let mut config = GameConfig::new();
        config.bird.min_ascend_velocity = -8;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FlapVelocity { flap: -9, .. })
        ));
    }

    #[test]
    fn test_zero_scroll_speed_rejected() {
        let mut config = GameConfig::new();
        config.course.scroll_speed = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                key: "scroll_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_tight_pipe_spacing_rejected() {
        let mut config = GameConfig::new();
        config.course.pipe_spacing = 8;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PipeSpacingTooTight {
                spacing: 8,
                speed: 4
            })
        );
        config.course.pipe_spacing = 0;
        assert!(config.validate().is_err());
        config.course.pipe_spacing = 9;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_first_pipe_left_of_screen_rejected() {
        let mut config = GameConfig::new();
        config.course.first_pipe_offset = -288;
        assert_eq!(
            config.validate(),
            Err(ConfigError::FirstPipeOffscreen {
                section: "course",
                first_x: 0
            })
        );
        config.course.first_pipe_offset = -287;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_autopilot_first_pipe_left_of_screen_rejected() {
        let mut config = GameConfig::new();
        config.autopilot.first_pipe_offset = -300;
        assert_eq!(
            config.validate(),
            Err(ConfigError::FirstPipeOffscreen {
                section: "autopilot",
                first_x: -12
            })
        );
    }

    #[test]
    fn test_load_from_str_overrides_and_keeps_defaults() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[course]\nscroll_speed = 6\n[bird]\ngravity = 2\n")
            .unwrap();
        assert_eq!(config.course.scroll_speed, 6);
        assert_eq!(config.bird.gravity, 2);
        assert_eq!(config.course.pipe_gap, 100);
        assert_eq!(config.window_width, 288);
    }

    #[test]
    fn test_load_from_str_reports_bad_values() {
        let mut config = GameConfig::new();
        let err = config
            .load_from_str("[course]\npipe_gap = wide\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref key, .. } if key == "pipe_gap"));
    }
}
