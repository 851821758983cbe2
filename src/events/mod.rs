//! Event types and observers.
//!
//! Submodules:
//! - [`audio`] – commands and messages for the background audio thread
//! - [`crash`] – a bird hit the ground or a pipe
//! - [`gamestate`] – phase transition notifications
pub mod audio;
pub mod crash;
pub mod gamestate;
