//! Flappy arcade simulation library.
//!
//! This module exposes the simulation's ECS components, resources, systems
//! and events, the [`session::Session`] facade and the [`autopilot`] harness
//! for use by the binary, integration tests and training tools.

pub mod autopilot;
pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod session;
pub mod systems;
