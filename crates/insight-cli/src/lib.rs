//! CLI library components for the analysis pipeline.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
