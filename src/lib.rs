//! Quest and objective progression for a cozy village game.
//!
//! The [`quest`] module holds the engine; the other modules provide the
//! collaborators it rewards into, configuration, and a scripted replay
//! driver used by the binary.

pub mod config;
pub mod inventory;
pub mod notify;
pub mod pets;
pub mod player;
pub mod quest;
pub mod replay;
pub mod social;
