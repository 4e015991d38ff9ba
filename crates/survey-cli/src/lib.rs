//! CLI library components for the survey cleaner.

pub mod config;
pub mod logging;
pub mod pipeline;
