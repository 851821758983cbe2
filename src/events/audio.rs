//! Messages exchanged with the audio thread.

use bevy_ecs::message::Message;

/// Sound effects the game plays.
pub const FX_WING: &str = "wing";
pub const FX_POINT: &str = "point";
pub const FX_HIT: &str = "hit";
pub const FX_DIE: &str = "die";

/// Every effect loaded at startup, in load order.
pub const ALL_FX: [&str; 4] = [FX_WING, FX_POINT, FX_HIT, FX_DIE];

/// Commands sent *to* the audio thread.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum AudioCmd {
    LoadFx { id: String, path: String },
    PlayFx { id: String },
    UnloadAllFx,
    Shutdown,
}

impl AudioCmd {
    pub fn play(id: &str) -> Self {
        AudioCmd::PlayFx { id: id.to_string() }
    }
}

/// Replies sent *back* from the audio thread over the bridge channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioMessage {
    FxLoaded { id: String },
    FxLoadFailed { id: String, error: String },
    FxUnloadedAll,
}
