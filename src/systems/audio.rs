//! Audio thread and the systems that feed it.
//!
//! - [`audio_thread`] runs on its own OS thread, owns the Raylib audio device
//!   and every loaded [`Sound`], and processes [`AudioCmd`]s.
//! - [`forward_audio_cmds`] drains the ECS [`AudioCmd`] mailbox into the
//!   channel each tick; [`update_bevy_audio_cmds`] then advances the mailbox.
//! - [`poll_audio_messages`] pulls the thread's replies back into the world.
//!
//! Raylib audio calls stay on one thread; the simulation only sends messages
//! and never waits for them.

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::AudioBridge;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};
use raylib::core::audio::{RaylibAudio, Sound};
use rustc_hash::FxHashMap;

/// Send queued commands to the audio thread, or discard them when no thread runs.
pub fn forward_audio_cmds(bridge: Option<Res<AudioBridge>>, mut reader: MessageReader<AudioCmd>) {
    match bridge {
        Some(bridge) => {
            for cmd in reader.read() {
                // ignore send errors during shutdown
                let _ = bridge.tx_cmd.send(cmd.clone());
            }
        }
        None => {
            reader.clear();
        }
    }
}

/// Advance the ECS message queue for [`AudioCmd`].
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Log replies from the audio thread.
pub fn poll_audio_messages(bridge: Option<Res<AudioBridge>>) {
    let Some(bridge) = bridge else {
        return;
    };
    for msg in bridge.rx_msg.try_iter() {
        match msg {
            AudioMessage::FxLoaded { id } => debug!("Sound '{}' ready", id),
            AudioMessage::FxLoadFailed { id, error } => {
                warn!("Sound '{}' could not be loaded: {}", id, error)
            }
            AudioMessage::FxUnloadedAll => debug!("All sounds unloaded"),
        }
    }
}

/// Entry point of the dedicated audio thread.
///
/// Blocks on the command channel until [`AudioCmd::Shutdown`] arrives or the
/// sender is dropped. If no audio device is available the thread drains and
/// ignores commands so the game still runs silently.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_msg: Sender<AudioMessage>) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            error!("Audio disabled, failed to initialize device: {}", e);
            for cmd in rx_cmd.iter() {
                if matches!(cmd, AudioCmd::Shutdown) {
                    break;
                }
            }
            return;
        }
    };

    info!(
        "Audio thread starting (id={:?})",
        std::thread::current().id()
    );

    let mut sounds: FxHashMap<String, Sound> = FxHashMap::default();

    for cmd in rx_cmd.iter() {
        match cmd {
            AudioCmd::LoadFx { id, path } => match audio.new_sound(&path) {
                Ok(sound) => {
                    debug!("Loaded sound id='{}' path='{}'", id, path);
                    sounds.insert(id.clone(), sound);
                    let _ = tx_msg.send(AudioMessage::FxLoaded { id });
                }
                Err(e) => {
                    let _ = tx_msg.send(AudioMessage::FxLoadFailed {
                        id,
                        error: e.to_string(),
                    });
                }
            },
            AudioCmd::PlayFx { id } => match sounds.get(&id) {
                Some(sound) => sound.play(),
                None => debug!("Sound '{}' not loaded, skipping", id),
            },
            AudioCmd::UnloadAllFx => {
                sounds.clear();
                let _ = tx_msg.send(AudioMessage::FxUnloadedAll);
            }
            AudioCmd::Shutdown => {
                debug!("Audio shutdown requested");
                break;
            }
        }
    }

    // sounds must drop before the device
    sounds.clear();
    info!(
        "Audio thread exiting (id={:?})",
        std::thread::current().id()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::audio::FX_WING;

    #[test]
    fn test_commands_dropped_without_bridge() {
        let mut world = World::new();
        world.init_resource::<Messages<AudioCmd>>();
        world
            .resource_mut::<Messages<AudioCmd>>()
            .write(AudioCmd::play(FX_WING));

        let mut schedule = Schedule::default();
        schedule.add_systems((forward_audio_cmds, update_bevy_audio_cmds).chain());
        schedule.run(&mut world);
        schedule.run(&mut world);

        assert!(world.resource::<Messages<AudioCmd>>().is_empty());
    }
}
