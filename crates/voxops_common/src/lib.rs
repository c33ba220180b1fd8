//! VoxOps Common - the voice command pipeline shared by the daemon and CLI.
//!
//! Turns a transcribed sentence into one kubectl/docker invocation and a
//! display/spoken summary of what happened.

pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod executor;
pub mod extractor;
pub mod intent;
pub mod normalizer;
pub mod outcome;
pub mod patterns;
pub mod pipeline;
pub mod runner;
pub mod speech;
pub mod summarizer;

pub use classifier::Classifier;
pub use config::Config;
pub use dispatch::{Backend, CommandSpec, DispatchTable, Operation};
pub use executor::{Executor, HealthReport};
pub use extractor::{extract, ParameterBag};
pub use intent::Intent;
pub use normalizer::{normalize, Normalizer};
pub use outcome::{ExecutionResult, Outcome};
pub use patterns::{PatternError, PatternSet};
pub use pipeline::{CommandReport, Pipeline, Resolution};
pub use runner::{Invocation, ProcessRunner, ToolRunner};
pub use speech::{speaker_from_config, Speaker};
pub use summarizer::{summarize, Summary};

/// Version reported by the daemon and CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
