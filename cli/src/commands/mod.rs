//! Command implementations.
//!
//! Each subcommand has its own module with a `run` function.

pub mod layout;
pub mod tags;
pub mod walk;
