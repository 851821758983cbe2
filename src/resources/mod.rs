//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during a tick: configuration, phase, the obstacle
//! queue, the ground strip, counters and input. Each submodule documents the
//! semantics and intended usage of its resource(s).
//!
//! Overview
//! - `audio` – bridge and channels for the background audio thread
//! - `gameconfig` – INI-backed configuration and tuning values
//! - `gamestate` – authoritative and pending phase, plus the pause flag
//! - `ground` – horizontally wrapping floor strip
//! - `input` – per-frame keyboard state and the per-tick actions
//! - `pipes` – FIFO stream of pipe pairs
//! - `score` – score and survival distance counters
//! - `sprites` – hitmasks and sizes of the loaded sprites
//! - `systemsstore` – registry of phase enter hooks
//! - `texturestore` – loaded textures keyed by name (windowed binary only)
//! - `worldtime` – simulation clock
pub mod audio;
pub mod gameconfig;
pub mod gamestate;
pub mod ground;
pub mod input;
pub mod pipes;
pub mod score;
pub mod sprites;
pub mod systemsstore;
pub mod texturestore;
pub mod worldtime;
