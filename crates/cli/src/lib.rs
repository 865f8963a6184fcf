//! Command surface of the `vatic` binary.

pub mod cli;
pub mod commands;
pub mod config;
