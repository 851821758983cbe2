//! Registry of phase enter hooks.
//!
//! Hooks are one-shot systems registered with [`bevy_ecs::world::World::register_system`]
//! and stored by name, so the phase observer can run them through `Commands`
//! without knowing the concrete functions.

use bevy_ecs::prelude::Resource;
use bevy_ecs::system::SystemId;
use rustc_hash::FxHashMap;

use crate::resources::gamestate::GameStates;

pub const ENTER_IDLE: &str = "enter_idle";
pub const ENTER_ACTIVE: &str = "enter_active";
pub const ENTER_TERMINAL: &str = "enter_terminal";

/// Map of hook names to system IDs.
#[derive(Resource, Default)]
pub struct SystemsStore {
    pub map: FxHashMap<String, SystemId>,
}

impl SystemsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        SystemsStore {
            map: FxHashMap::default(),
        }
    }

    /// Insert a system ID under a human-readable name.
    pub fn insert(&mut self, name: impl Into<String>, id: SystemId) {
        self.map.insert(name.into(), id);
    }

    /// Retrieve a system ID by name, if present.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&SystemId> {
        self.map.get(name.as_ref())
    }

    /// Name of the hook run when `state` is entered.
    pub fn enter_hook_name(state: GameStates) -> Option<&'static str> {
        match state {
            GameStates::None => None,
            GameStates::Idle => Some(ENTER_IDLE),
            GameStates::Active => Some(ENTER_ACTIVE),
            GameStates::Terminal => Some(ENTER_TERMINAL),
        }
    }
}
