//! ECS components used by the simulation.
//!
//! Submodules overview
//! - `bird` – the flight body: vertical physics, idle bobbing, wing frames
//! - `boxcollider` – axis-aligned pixel rectangles for the broad phase
//! - `crashed` – marks a bird that has collided, with its survival distance
//! - `hitmask` – per-pixel opacity grids for pixel-exact collision
//! - `pilot` – attaches a decision-making brain to a bird
//! - `player` – marks the keyboard-controlled bird
pub mod bird;
pub mod boxcollider;
pub mod crashed;
pub mod hitmask;
pub mod pilot;
pub mod player;
