//! Phase enter hooks and asset loading.
//!
//! The hooks are registered as one-shot systems in the
//! [`SystemsStore`](crate::resources::systemsstore::SystemsStore) and run by
//! the phase observer whenever the matching phase is entered. Asset loading
//! is only used by the windowed binary; headless sessions work from
//! [`Sprites::placeholder`].

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::*;
use log::{debug, info};
use raylib::prelude::*;
use thiserror::Error;

use crate::components::bird::Bird;
use crate::components::crashed::Crashed;
use crate::components::hitmask::Hitmask;
use crate::components::player::Player;
use crate::events::audio::{ALL_FX, AudioCmd, FX_DIE, FX_HIT, FX_WING};
use crate::resources::gamestate::Paused;
use crate::resources::ground::Ground;
use crate::resources::pipes::PipeStream;
use crate::resources::score::{Distance, Score};
use crate::resources::sprites::Sprites;
use crate::resources::texturestore::TextureStore;

/// Failure to load a sprite.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load image {path:?}: {reason}")]
    Image { path: PathBuf, reason: String },
    #[error("failed to upload texture '{name}': {reason}")]
    Texture { name: String, reason: String },
}

/// Welcome screen: birds back at the start, empty course, score cleared.
pub fn enter_idle(
    mut commands: Commands,
    mut birds: Query<(Entity, &mut Bird)>,
    mut pipes: ResMut<PipeStream>,
    mut ground: ResMut<Ground>,
    mut score: ResMut<Score>,
    mut distance: ResMut<Distance>,
    mut paused: ResMut<Paused>,
) {
    for (entity, mut bird) in birds.iter_mut() {
        bird.reset_to_idle();
        commands.entity(entity).remove::<Crashed>();
    }
    pipes.clear();
    ground.offset = 0;
    score.0 = 0;
    distance.0 = 0;
    paused.0 = false;
    debug!("Idle: waiting for the first flap");
}

/// Takeoff: seed the course and give every bird its takeoff impulse.
pub fn enter_active(
    mut birds: Query<&mut Bird, Without<Crashed>>,
    mut pipes: ResMut<PipeStream>,
    mut distance: ResMut<Distance>,
    mut paused: ResMut<Paused>,
    mut audio: MessageWriter<AudioCmd>,
) {
    for mut bird in birds.iter_mut() {
        bird.soft_reset();
    }
    pipes.reseed();
    distance.0 = 0;
    paused.0 = false;
    audio.write(AudioCmd::play(FX_WING));
    info!("Flight started with {} bird(s)", birds.iter().count());
}

/// Crash: the keyboard bird drops whatever flap it had queued and falls.
pub fn enter_terminal(
    mut birds: Query<&mut Bird, With<Player>>,
    score: Res<Score>,
    distance: Res<Distance>,
    mut audio: MessageWriter<AudioCmd>,
) {
    for mut bird in birds.iter_mut() {
        bird.cancel_flap();
    }
    audio.write(AudioCmd::play(FX_HIT));
    audio.write(AudioCmd::play(FX_DIE));
    info!("Crashed with score {} after {} ticks", score.0, distance.0);
}

const BIRD_COLORS: [&str; 3] = ["redbird", "bluebird", "yellowbird"];
const WING_FRAMES: [&str; 3] = ["upflap", "midflap", "downflap"];
const BACKGROUNDS: [&str; 2] = ["background-day", "background-night"];
const PIPE_COLORS: [&str; 2] = ["pipe-green", "pipe-red"];

fn sprite_path(dir: &Path, name: &str) -> PathBuf {
    dir.join("sprites").join(format!("{name}.png"))
}

fn load_image(dir: &Path, name: &str) -> Result<Image, AssetError> {
    let path = sprite_path(dir, name);
    let path_str = path.to_string_lossy().into_owned();
    Image::load_image(&path_str).map_err(|e| AssetError::Image {
        path,
        reason: e.to_string(),
    })
}

fn hitmask_of(image: &Image) -> Hitmask {
    let colors = image.get_image_data();
    Hitmask::from_alpha(
        image.width() as usize,
        image.height() as usize,
        colors.iter().map(|c| c.a),
    )
}

fn upload(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    store: &mut TextureStore,
    key: &str,
    image: &Image,
) -> Result<(), AssetError> {
    let texture = rl
        .load_texture_from_image(thread, image)
        .map_err(|e| AssetError::Texture {
            name: key.to_string(),
            reason: e.to_string(),
        })?;
    store.insert(key, texture);
    Ok(())
}

/// Load every sprite under `dir/sprites`, build the hitmasks and upload the
/// textures. Bird colour, background and pipe colour are picked at random.
pub fn load_assets(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    dir: &Path,
    rng: &mut fastrand::Rng,
) -> Result<(Sprites, TextureStore), AssetError> {
    let mut store = TextureStore::new();

    for digit in 0..10 {
        let image = load_image(dir, &digit.to_string())?;
        upload(rl, thread, &mut store, &format!("digit_{digit}"), &image)?;
    }
    for name in ["message", "gameover"] {
        upload(rl, thread, &mut store, name, &load_image(dir, name)?)?;
    }

    let base = load_image(dir, "base")?;
    upload(rl, thread, &mut store, "base", &base)?;

    let background = BACKGROUNDS[rng.usize(..BACKGROUNDS.len())];
    upload(rl, thread, &mut store, "background", &load_image(dir, background)?)?;

    let color = BIRD_COLORS[rng.usize(..BIRD_COLORS.len())];
    let frames = [
        load_image(dir, &format!("{color}-{}", WING_FRAMES[0]))?,
        load_image(dir, &format!("{color}-{}", WING_FRAMES[1]))?,
        load_image(dir, &format!("{color}-{}", WING_FRAMES[2]))?,
    ];
    let bird_masks = [
        hitmask_of(&frames[0]),
        hitmask_of(&frames[1]),
        hitmask_of(&frames[2]),
    ];
    for (i, image) in frames.iter().enumerate() {
        upload(rl, thread, &mut store, &format!("bird_{i}"), image)?;
    }

    let pipe = PIPE_COLORS[rng.usize(..PIPE_COLORS.len())];
    let lower = load_image(dir, pipe)?;
    let lower_mask = hitmask_of(&lower);
    upload(rl, thread, &mut store, "pipe_lower", &lower)?;
    let mut upper = lower.clone();
    upper.flip_vertical();
    upload(rl, thread, &mut store, "pipe_upper", &upper)?;

    info!("Loaded sprites: {} bird, {}, {}", color, background, pipe);

    Ok((Sprites::new(bird_masks, lower_mask, base.width()), store))
}

/// Ask the audio thread to load every sound effect from `dir/audio`.
pub fn queue_sound_effects(world: &mut World, dir: &Path) {
    let mut messages = world.resource_mut::<Messages<AudioCmd>>();
    for id in ALL_FX {
        let path = dir.join("audio").join(format!("{id}.ogg"));
        messages.write(AudioCmd::LoadFx {
            id: id.to_string(),
            path: path.to_string_lossy().into_owned(),
        });
    }
}
