//! Command handlers for the pixf CLI.

pub mod config;
pub mod extract;
