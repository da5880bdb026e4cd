//! Interlink CLI library
//!
//! Argument definitions live in [`cli`]; each subcommand has an
//! `execute` entry point under [`commands`].

pub mod cli;
pub mod commands;
