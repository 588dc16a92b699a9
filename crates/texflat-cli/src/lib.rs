//! CLI library components for texflat.

pub mod compiler;
pub mod config;
pub mod logging;
pub mod pipeline;
