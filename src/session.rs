//! Game session: one ECS world plus the schedules that advance it.
//!
//! The session is the only entry point the frame loop and the autopilot
//! harness need. Each call advances exactly one tick of the current phase:
//!
//! - Idle: bob the bird, scroll the ground, animate wings.
//! - Active: toggle pause, latch a keyboard flap, check collisions (a crash
//!   ends the tick), then unless paused count distance, score, let pilots
//!   decide, step the birds, scroll the pipes and the ground; animate wings.
//! - Terminal: the crashed bird keeps falling.
//!
//! Phase changes go through [`NextGameState`] and the phase observer, which
//! runs the enter hooks in [`crate::game`].
//!
//! Render state is exposed through [`Session::frame`] and a few accessors;
//! nothing here draws.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::{info, warn};
use smallvec::SmallVec;

use crate::autopilot::{Brain, SensorRanges};
use crate::components::bird::{Bird, MIDFLAP_FRAME};
use crate::components::crashed::Crashed;
use crate::components::pilot::Pilot;
use crate::components::player::Player;
use crate::events::audio::AudioCmd;
use crate::events::crash::observe_crash;
use crate::events::gamestate::{GameStateChangedEvent, observe_gamestate_change_event};
use crate::game::{enter_active, enter_idle, enter_terminal};
use crate::resources::audio::AudioBridge;
use crate::resources::gameconfig::{ConfigError, GameConfig};
use crate::resources::gamestate::{GameState, GameStates, NextGameState, Paused};
use crate::resources::ground::Ground;
use crate::resources::input::{InputState, TickInput};
use crate::resources::pipes::{PipePair, PipeStream};
use crate::resources::score::{Distance, Score};
use crate::resources::sprites::Sprites;
use crate::resources::systemsstore::{ENTER_ACTIVE, ENTER_IDLE, ENTER_TERMINAL, SystemsStore};
use crate::resources::worldtime::WorldTime;
use crate::systems::audio::{forward_audio_cmds, poll_audio_messages, update_bevy_audio_cmds};
use crate::systems::bird::{
    bird_physics_system, falling_bird_system, oscillate_system, player_flap_system,
    wing_animation_system,
};
use crate::systems::collision::crash_detector;
use crate::systems::gamestate::{
    any_bird_flying, check_pending_state, not_paused, toggle_pause_system,
};
use crate::systems::ground::ground_scroll_system;
use crate::systems::pilot::pilot_system;
use crate::systems::pipes::pipe_stream_system;
use crate::systems::score::{distance_system, score_system};
use crate::systems::time::update_world_time;

/// Where and how to draw one bird.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirdPose {
    pub x: i32,
    pub y: i32,
    pub rotation: f32,
    pub wing_index: usize,
    pub crashed: bool,
}

impl BirdPose {
    fn of(bird: &Bird, crashed: bool) -> Self {
        Self {
            x: bird.x,
            y: bird.y,
            rotation: bird.rotation,
            wing_index: if crashed { MIDFLAP_FRAME } else { bird.wing_index },
            crashed,
        }
    }
}

/// Where to draw one pipe pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeView {
    pub x: i32,
    pub upper_y: i32,
    pub lower_y: i32,
}

impl From<&PipePair> for PipeView {
    fn from(pipe: &PipePair) -> Self {
        Self {
            x: pipe.x,
            upper_y: pipe.upper_y,
            lower_y: pipe.lower_y,
        }
    }
}

/// Snapshot of everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub phase: GameStates,
    pub paused: bool,
    pub score: u32,
    pub distance: u64,
    pub birds: SmallVec<[BirdPose; 1]>,
    pub pipes: SmallVec<[PipeView; 3]>,
    pub ground_offset: i32,
    pub ground_y: i32,
}

pub struct Session {
    world: World,
    idle: Schedule,
    active: Schedule,
    terminal: Schedule,
    housekeeping: Schedule,
    /// Bird entities in spawn order.
    birds: Vec<Entity>,
    rng: fastrand::Rng,
    tick_seconds: f32,
}

impl Session {
    /// Keyboard session: one player bird on the welcome screen.
    pub fn new(config: GameConfig, sprites: Sprites, seed: u64) -> Result<Self, ConfigError> {
        let first_pipe_x = config.window_width as i32 + config.course.first_pipe_offset;
        let mut session = Self::build(config, sprites, seed, first_pipe_x)?;

        let bird = session.make_bird(0);
        let entity = session.world.spawn((bird, Player)).id();
        session.birds.push(entity);

        session.request_state(GameStates::Idle);
        Ok(session)
    }

    /// Autopilot session: one jittered bird per brain, already in flight.
    pub fn with_pilots(
        config: GameConfig,
        sprites: Sprites,
        seed: u64,
        brains: Vec<Box<dyn Brain>>,
    ) -> Result<Self, ConfigError> {
        let first_pipe_x = config.window_width as i32 + config.autopilot.first_pipe_offset;
        let mut session = Self::build(config, sprites, seed, first_pipe_x)?;
        for brain in brains {
            session.attach_pilot(brain);
        }
        session.request_state(GameStates::Active);
        Ok(session)
    }

    fn build(
        config: GameConfig,
        sprites: Sprites,
        seed: u64,
        first_pipe_x: i32,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let ranges = SensorRanges::from_config(&config, &sprites)?;
        let mut rng = fastrand::Rng::with_seed(seed);
        let ground_y = config.ground_y();

        let mut world = World::new();
        world.insert_resource(GameState::new());
        world.insert_resource(NextGameState::new());
        world.insert_resource(Paused::default());
        world.insert_resource(TickInput::default());
        world.insert_resource(InputState::default());
        world.insert_resource(WorldTime::default());
        world.insert_resource(Score::default());
        world.insert_resource(Distance::default());
        world.insert_resource(Ground::new(
            ground_y,
            sprites.base_width,
            config.window_width as i32,
            config.course.scroll_speed,
        ));
        world.insert_resource(PipeStream::new(
            &config.course,
            ground_y,
            first_pipe_x,
            sprites.pipes.clone(),
            rng.fork(),
        )?);
        world.insert_resource(ranges);
        world.init_resource::<Messages<AudioCmd>>();

        world.spawn(Observer::new(observe_gamestate_change_event));
        world.spawn(Observer::new(observe_crash));

        let mut systems_store = SystemsStore::new();
        systems_store.insert(ENTER_IDLE, world.register_system(enter_idle));
        systems_store.insert(ENTER_ACTIVE, world.register_system(enter_active));
        systems_store.insert(ENTER_TERMINAL, world.register_system(enter_terminal));
        world.insert_resource(systems_store);

        let tick_seconds = config.tick_seconds();
        world.insert_resource(sprites);
        world.insert_resource(config);
        world.flush();

        let mut idle = Schedule::default();
        idle.add_systems(
            (
                oscillate_system,
                ground_scroll_system,
                wing_animation_system,
                check_pending_state,
            )
                .chain(),
        );

        let mut active = Schedule::default();
        active.add_systems(
            (
                toggle_pause_system,
                player_flap_system,
                crash_detector,
                (
                    distance_system,
                    score_system,
                    pilot_system,
                    bird_physics_system,
                    pipe_stream_system,
                    ground_scroll_system,
                )
                    .chain()
                    .run_if(not_paused.and(any_bird_flying)),
                wing_animation_system,
                check_pending_state,
            )
                .chain(),
        );

        let mut terminal = Schedule::default();
        terminal.add_systems((falling_bird_system, check_pending_state).chain());

        let mut housekeeping = Schedule::default();
        housekeeping.add_systems(
            (poll_audio_messages, forward_audio_cmds, update_bevy_audio_cmds).chain(),
        );

        info!("Session created with seed {}", seed);
        Ok(Self {
            world,
            idle,
            active,
            terminal,
            housekeeping,
            birds: Vec::new(),
            rng,
            tick_seconds,
        })
    }

    /// A bird at the start position shifted down by `dy`.
    fn make_bird(&self, dy: i32) -> Bird {
        let config = self.world.resource::<GameConfig>();
        let sprites = self.world.resource::<Sprites>();
        Bird::new(
            config.bird_x(),
            config.bird_start_y(sprites.bird_height()) + dy,
            config.ground_y(),
            sprites.bird.clone(),
            config.bird,
        )
    }

    /// Add a piloted bird starting at a random height near mid-screen.
    ///
    /// Birds attached mid-flight join with a takeoff impulse.
    pub fn attach_pilot(&mut self, brain: Box<dyn Brain>) -> Entity {
        let jitter = self.world.resource::<GameConfig>().autopilot.spawn_jitter.abs();
        let dy = self.rng.i32(-jitter..=jitter);
        let mut bird = self.make_bird(dy);
        if self.phase() == GameStates::Active {
            bird.soft_reset();
        }
        let index = self
            .birds
            .iter()
            .filter(|e| self.world.get::<Pilot>(**e).is_some())
            .count();
        let entity = self.world.spawn((bird, Pilot::new(index, brain))).id();
        self.birds.push(entity);
        entity
    }

    fn request_state(&mut self, state: GameStates) {
        self.world.resource_mut::<NextGameState>().set(state);
        self.world.trigger(GameStateChangedEvent {});
        self.world.flush();
        self.housekeeping.run(&mut self.world);
    }

    fn run_tick(&mut self, phase: GameStates) {
        update_world_time(&mut self.world, self.tick_seconds);
        match phase {
            GameStates::Idle => self.idle.run(&mut self.world),
            GameStates::Active => self.active.run(&mut self.world),
            GameStates::Terminal => self.terminal.run(&mut self.world),
            GameStates::None => {}
        }
        self.world.flush();
        self.housekeeping.run(&mut self.world);
        self.world.clear_trackers();
    }

    fn expect_phase(&self, phase: GameStates) -> bool {
        let current = self.phase();
        if current != phase {
            warn!("Ignoring {:?} tick while in {:?}", phase, current);
            return false;
        }
        true
    }

    /// Run one tick of whatever the current phase does with `input`.
    ///
    /// A flap starts the flight from Idle and acknowledges a crash in
    /// Terminal; those ticks do nothing else.
    pub fn tick(&mut self, input: TickInput) {
        match self.phase() {
            GameStates::Idle if input.flap => self.start_flight(),
            GameStates::Idle => self.advance_idle_tick(),
            GameStates::Active => {
                self.advance_active_tick(input.flap, input.pause);
            }
            GameStates::Terminal if input.flap => self.acknowledge_crash(),
            GameStates::Terminal => self.advance_terminal_tick(),
            GameStates::None => {}
        }
    }

    /// Idle → Active.
    pub fn start_flight(&mut self) {
        if self.expect_phase(GameStates::Idle) {
            self.request_state(GameStates::Active);
        }
    }

    /// Terminal → Idle.
    pub fn acknowledge_crash(&mut self) {
        if self.expect_phase(GameStates::Terminal) {
            self.request_state(GameStates::Idle);
        }
    }

    pub fn advance_idle_tick(&mut self) {
        if self.expect_phase(GameStates::Idle) {
            self.run_tick(GameStates::Idle);
        }
    }

    /// One flight tick. Returns `true` once the flight is over: the keyboard
    /// bird crashed, or no bird is left flying.
    pub fn advance_active_tick(&mut self, flap: bool, pause_toggled: bool) -> bool {
        if !self.expect_phase(GameStates::Active) {
            return false;
        }
        self.world.insert_resource(TickInput {
            flap,
            pause: pause_toggled,
            quit: false,
        });
        self.run_tick(GameStates::Active);
        self.phase() == GameStates::Terminal || self.flying_count() == 0
    }

    pub fn advance_terminal_tick(&mut self) {
        if self.expect_phase(GameStates::Terminal) {
            self.run_tick(GameStates::Terminal);
        }
    }

    pub fn phase(&self) -> GameStates {
        self.world.resource::<GameState>().get()
    }

    pub fn is_paused(&self) -> bool {
        self.world.resource::<Paused>().0
    }

    pub fn score(&self) -> u32 {
        self.world.resource::<Score>().0
    }

    /// Active ticks survived in the current flight.
    pub fn distance(&self) -> u64 {
        self.world.resource::<Distance>().0
    }

    /// Ticks simulated since the session was created.
    pub fn tick_count(&self) -> u64 {
        self.world.resource::<WorldTime>().frame_count
    }

    /// Simulated seconds since the session was created.
    pub fn elapsed_seconds(&self) -> f32 {
        self.world.resource::<WorldTime>().elapsed
    }

    pub fn ground_offset(&self) -> i32 {
        self.world.resource::<Ground>().offset
    }

    pub fn pipes(&self) -> &PipeStream {
        self.world.resource::<PipeStream>()
    }

    /// Mutable access to the obstacle queue, for scripted courses.
    pub fn pipes_mut(&mut self) -> Mut<'_, PipeStream> {
        self.world.resource_mut::<PipeStream>()
    }

    pub fn bird(&self, entity: Entity) -> Option<&Bird> {
        self.world.get::<Bird>(entity)
    }

    /// Bird entities in spawn order: the keyboard bird first, then pilots.
    pub fn bird_entities(&self) -> &[Entity] {
        &self.birds
    }

    pub fn is_crashed(&self, entity: Entity) -> bool {
        self.world.get::<Crashed>(entity).is_some()
    }

    pub fn flying_count(&self) -> usize {
        self.birds
            .iter()
            .filter(|e| self.world.get::<Bird>(**e).is_some() && !self.is_crashed(**e))
            .count()
    }

    pub fn bird_poses(&self) -> SmallVec<[BirdPose; 1]> {
        self.birds
            .iter()
            .filter_map(|e| {
                self.world
                    .get::<Bird>(*e)
                    .map(|bird| BirdPose::of(bird, self.is_crashed(*e)))
            })
            .collect()
    }

    /// Survival distance of every piloted bird, in brain order. Birds still
    /// flying report the current distance, capped at the configured maximum.
    pub fn pilot_fitness(&self) -> Vec<u64> {
        let cap = self.world.resource::<GameConfig>().autopilot.max_distance;
        let now = self.distance().min(cap);
        let mut fitness: Vec<(usize, u64)> = self
            .birds
            .iter()
            .filter_map(|e| {
                let pilot = self.world.get::<Pilot>(*e)?;
                let distance = self
                    .world
                    .get::<Crashed>(*e)
                    .map_or(now, |crashed| crashed.distance.min(cap));
                Some((pilot.index, distance))
            })
            .collect();
        fitness.sort_by_key(|(index, _)| *index);
        fitness.into_iter().map(|(_, distance)| distance).collect()
    }

    pub fn frame(&self) -> Frame {
        let ground = self.world.resource::<Ground>();
        Frame {
            phase: self.phase(),
            paused: self.is_paused(),
            score: self.score(),
            distance: self.distance(),
            birds: self.bird_poses(),
            pipes: self.pipes().iter().map(PipeView::from).collect(),
            ground_offset: ground.offset,
            ground_y: ground.y,
        }
    }

    /// Detach the audio bridge so it can be moved into a fresh session.
    pub fn take_audio_bridge(&mut self) -> Option<AudioBridge> {
        self.world.remove_resource::<AudioBridge>()
    }

    pub fn config(&self) -> &GameConfig {
        self.world.resource::<GameConfig>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
