//! Command implementations for companion CLI.
//!
//! Each submodule implements the logic for a command group.

pub mod ask;
pub mod events;
pub mod history;
pub mod remind;
