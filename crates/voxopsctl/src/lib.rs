//! VoxOps CLI library - exposes modules for testing.

pub mod cli;
pub mod output;
