//! Core application primitives (pipeline orchestration)

pub mod pipeline;

pub use pipeline::*;
