//! CLI command handlers

pub mod commands;

pub use commands::{check, plan, push};
