//! Core types and definitions for the towergames simulation.
//!
//! This crate defines the vocabulary shared by the simulation engine and its
//! collaborators: components, commands, events, HUD snapshots, balancing
//! configuration, constants and errors. It has no dependency on any runtime,
//! renderer or physics engine.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::GameError;

#[cfg(test)]
mod tests;
