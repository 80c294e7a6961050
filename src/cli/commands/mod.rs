//! Subcommand implementations

pub mod config;
pub mod score;
pub mod stages;
