//! Simulation systems.
//!
//! This module groups the ECS systems that advance a tick, plus the input
//! polling and drawing helpers used by the windowed binary.
//!
//! Submodules overview
//! - [`audio`] – audio thread and the systems that feed it
//! - [`bird`] – flapping, bobbing, physics and wing animation
//! - [`collision`] – bounding-box prefilter plus pixel-exact confirmation
//! - [`gamestate`] – pending transitions, pause toggle and run conditions
//! - [`ground`] – ground strip scrolling
//! - [`input`] – read hardware input into [`crate::resources::input::InputState`]
//! - [`pilot`] – sensor readings and flap decisions for piloted birds
//! - [`pipes`] – pipe stream scrolling, spawning and retiring
//! - [`render`] – draw a frame snapshot with Raylib
//! - [`score`] – score and survival distance
//! - [`time`] – simulation clock

pub mod audio;
pub mod bird;
pub mod collision;
pub mod gamestate;
pub mod ground;
pub mod input;
pub mod pilot;
pub mod pipes;
pub mod render;
pub mod score;
pub mod time;
