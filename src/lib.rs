//! Anime Tracker binary support: bootstrap, console notices and the CLI.

pub mod bootstrap;
pub mod cli;
pub mod console;
