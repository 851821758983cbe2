//! Bridge between a session and the sound thread.
//!
//! Sessions never touch the audio device. Systems write [`AudioCmd`]
//! messages, and the housekeeping schedule forwards them over a channel to a
//! dedicated thread that owns the device. A session without an
//! [`AudioBridge`] (headless runs, tests, evaluation) drops its commands.
//!
//! The bridge is a plain resource, so the binary can move it from one
//! session to the next when an autopilot run restarts.

use std::thread::{self, JoinHandle};

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::warn;

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::systems::audio::audio_thread;

#[derive(Resource)]
pub struct AudioBridge {
    /// Commands towards the sound thread.
    pub tx_cmd: Sender<AudioCmd>,
    /// Replies from the sound thread.
    pub rx_msg: Receiver<AudioMessage>,
    handle: JoinHandle<()>,
}

impl AudioBridge {
    /// Start the sound thread.
    pub fn spawn() -> std::io::Result<Self> {
        let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
        let (tx_msg, rx_msg) = unbounded::<AudioMessage>();
        let handle = thread::Builder::new()
            .name("audio".into())
            .spawn(move || audio_thread(rx_cmd, tx_msg))?;
        Ok(Self {
            tx_cmd,
            rx_msg,
            handle,
        })
    }

    /// Free every sound, stop the thread and wait for it.
    pub fn shutdown(self) {
        // a closed channel means the thread is already gone
        let _ = self.tx_cmd.send(AudioCmd::UnloadAllFx);
        let _ = self.tx_cmd.send(AudioCmd::Shutdown);
        if self.handle.join().is_err() {
            warn!("Audio thread panicked");
        }
    }
}

/// Start the sound thread and attach it to `world`. The game runs silently
/// if the thread cannot be started.
pub fn setup_audio(world: &mut World) {
    match AudioBridge::spawn() {
        Ok(bridge) => world.insert_resource(bridge),
        Err(e) => warn!("Audio disabled, could not start thread: {}", e),
    }
    world.init_resource::<Messages<AudioCmd>>();
}

/// Detach the bridge from `world` and stop the sound thread.
pub fn shutdown_audio(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<AudioBridge>() {
        bridge.shutdown();
    }
}
