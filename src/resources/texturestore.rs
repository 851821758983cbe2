//! Loaded textures keyed by sprite name.
//!
//! Only the windowed binary creates one; the simulation works from hitmasks.

use raylib::prelude::Texture2D;
use rustc_hash::FxHashMap;

#[derive(Default)]
pub struct TextureStore {
    pub map: FxHashMap<String, Texture2D>,
}

impl TextureStore {
    pub fn new() -> Self {
        TextureStore {
            map: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, texture: Texture2D) {
        self.map.insert(key.into(), texture);
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&Texture2D> {
        self.map.get(key.as_ref())
    }

    /// Texture of score digit `digit` (0..=9).
    pub fn digit(&self, digit: u32) -> Option<&Texture2D> {
        self.map.get(&format!("digit_{digit}"))
    }
}
