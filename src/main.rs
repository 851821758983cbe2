//! Flapengine main entry point.
//!
//! A Flappy Bird style arcade game written in Rust using:
//! - **raylib** for windowing, graphics, input and audio
//! - **bevy_ecs** for the simulation world, schedules and observers
//!
//! The simulation itself lives in the library ([`flapengine::session`]); this
//! binary only opens the window, loads the sprites and sounds, feeds keyboard
//! input into the session once per tick and draws the resulting frame.
//!
//! # Modes
//!
//! - default: the player flaps with SPACE or UP, pauses with P, quits with ESC
//! - `--autopilot`: a built-in brain flies the bird; the run restarts on a crash
//! - `--evaluate N`: fly N autopilot birds headless, print a JSON report, exit
//! - `--write-config [PATH]`: write the default INI file and exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --seed 42
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use flapengine::autopilot::{Brain, GapSeeker, evaluate};
use flapengine::game::{load_assets, queue_sound_effects};
use flapengine::resources::audio::{setup_audio, shutdown_audio};
use flapengine::resources::gameconfig::GameConfig;
use flapengine::resources::input::InputState;
use flapengine::resources::sprites::Sprites;
use flapengine::session::Session;
use flapengine::systems::input::update_input_state;
use flapengine::systems::render::{render_autopilot_stats, render_frame};

/// Flapengine arcade
#[derive(Parser)]
#[command(version, about = "A Flappy Bird style arcade game with an autopilot harness.")]
struct Cli {
    /// INI file with window, course, bird and autopilot settings.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Seed for pipe gaps, spawn jitter and sprite choice. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Let the built-in gap seeker fly the bird.
    #[arg(long)]
    autopilot: bool,

    /// Fly N autopilot birds without a window, print the report and exit.
    #[arg(long, value_name = "N")]
    evaluate: Option<usize>,

    /// Write the default configuration and exit.
    /// Optionally provide a path (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    write_config: Option<Option<PathBuf>>,

    /// Directory holding `sprites/` and `audio/`.
    #[arg(long, value_name = "DIR", default_value = "./assets")]
    assets: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn gap_seekers(config: &GameConfig, count: usize) -> Vec<Box<dyn Brain>> {
    (0..count)
        .map(|_| Box::new(GapSeeker::new(config.autopilot.flap_threshold)) as Box<dyn Brain>)
        .collect()
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    // Early-exit: write the default INI and quit (no window needed)
    if let Some(maybe_path) = cli.write_config {
        let path = maybe_path.unwrap_or_else(|| cli.config.clone());
        GameConfig::with_path(&path).save_to_file()?;
        println!("Default configuration written to {}", path.display());
        return Ok(());
    }

    let mut config = GameConfig::with_path(&cli.config);
    if config.config_path.exists() {
        config.load_from_file()?;
    } else {
        info!("No config at {:?}, using defaults", config.config_path);
    }
    config.validate()?;

    let seed = cli.seed.unwrap_or_else(|| fastrand::u64(..));
    info!("Seed: {seed}");

    // Early-exit: headless evaluation
    if let Some(count) = cli.evaluate {
        let brains = gap_seekers(&config, count);
        let report = evaluate(&config, &Sprites::placeholder(), seed, brains)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // --------------- Raylib window & assets ---------------
    let (width, height) = config.window_size();
    let mut builder = raylib::init();
    builder.size(width as i32, height as i32).title("Flapengine");
    if config.vsync {
        builder.vsync();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(config.tick_rate);
    // ESC is handled as a regular key
    rl.set_exit_key(None);

    let mut rng = fastrand::Rng::with_seed(seed);
    let (sprites, textures) = load_assets(&mut rl, &thread, &cli.assets, &mut rng)?;

    let new_session = |seed: u64| -> Result<Session, Box<dyn Error>> {
        let session = if cli.autopilot {
            let brains = gap_seekers(&config, 1);
            Session::with_pilots(config.clone(), sprites.clone(), seed, brains)?
        } else {
            Session::new(config.clone(), sprites.clone(), seed)?
        };
        Ok(session)
    };

    let mut session = new_session(seed)?;
    setup_audio(session.world_mut());
    queue_sound_effects(session.world_mut(), &cli.assets);
    let mut run_count = 1u32;

    // --------------- Main loop ---------------
    while !rl.window_should_close() {
        update_input_state(session.world_mut(), &rl);
        let tick_input = session.world().resource::<InputState>().tick_input();
        if tick_input.quit {
            break;
        }

        if cli.autopilot {
            if session.advance_active_tick(false, tick_input.pause) {
                info!(
                    "Run {} ended at distance {} with score {} after {:.1}s",
                    run_count,
                    session.distance(),
                    session.score(),
                    session.elapsed_seconds()
                );
                // keep the audio thread alive across runs
                let bridge = session.take_audio_bridge();
                session = new_session(rng.u64(..))?;
                if let Some(bridge) = bridge {
                    session.world_mut().insert_resource(bridge);
                }
                run_count += 1;
            }
        } else {
            session.tick(tick_input);
        }

        let frame = session.frame();
        let mut d = rl.begin_drawing(&thread);
        render_frame(&mut d, &frame, &textures, width as i32, height as i32);
        if cli.autopilot {
            render_autopilot_stats(&mut d, &frame, run_count);
        }
    }

    shutdown_audio(session.world_mut());
    Ok(())
}
