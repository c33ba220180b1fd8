//! Interpretation of tool invocations.
//!
//! Turns raw exit status and output into an `ExecutionResult` whose text
//! starts with a status glyph. Every failure path ends up here as a value;
//! nothing is raised past the execution engine.

use crate::dispatch::Backend;
use crate::runner::Invocation;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Phrases in an error stream that mean the binary itself is absent.
/// Narrower than "not found": kubectl reports missing
/// resources as `Error from server (NotFound): ... not found`.
const TOOL_MISSING_PHRASES: &[&str] = &[
    "command not found",
    "executable file not found",
    "is not recognized as",
    ": not found",
];

pub const TIMEOUT_MESSAGE: &str = "⏱️ Command timeout. Please try again.";

/// How an execution ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Succeeded with output
    Ok,
    /// Succeeded with nothing to show, or the target does not exist
    NoResources,
    /// The tool is not installed
    ToolMissing,
    /// The tool exited non-zero
    ToolError,
    /// The tool did not finish in time
    Timeout,
    /// The tool could not be run at all
    RuntimeError,
    /// Nothing was run; the text asks the caller for something
    Guidance,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NoResources => "no_resources",
            Self::ToolMissing => "tool_missing",
            Self::ToolError => "tool_error",
            Self::Timeout => "timeout",
            Self::RuntimeError => "runtime_error",
            Self::Guidance => "guidance",
        }
    }

    /// The command was attempted and did not work
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::ToolMissing | Self::ToolError | Self::Timeout | Self::RuntimeError
        )
    }
}

/// Result handed from the execution engine to the summarizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub outcome: Outcome,
    pub output: String,
}

impl ExecutionResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            outcome: Outcome::Ok,
            output: output.into(),
        }
    }

    /// Successful, but nothing to list
    pub fn empty(output: impl Into<String>) -> Self {
        Self {
            success: true,
            outcome: Outcome::NoResources,
            output: output.into(),
        }
    }

    /// The requested resource does not exist
    pub fn not_found(output: impl Into<String>) -> Self {
        Self {
            success: false,
            outcome: Outcome::NoResources,
            output: output.into(),
        }
    }

    pub fn guidance(output: impl Into<String>) -> Self {
        Self {
            success: false,
            outcome: Outcome::Guidance,
            output: output.into(),
        }
    }

    pub fn failure(outcome: Outcome, output: impl Into<String>) -> Self {
        Self {
            success: false,
            outcome,
            output: output.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::failure(Outcome::Timeout, TIMEOUT_MESSAGE)
    }
}

/// Whether an error stream says the binary is absent
pub fn is_tool_missing(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    TOOL_MISSING_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Display name for a binary: "kubectl" -> "Kubectl"
pub fn tool_label(program: &str) -> String {
    let base = Path::new(program)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program);
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Message for a backend whose binary is absent
pub fn missing_tool_message(backend: Backend, program: &str) -> String {
    match backend {
        Backend::Runtime => {
            let label = tool_label(program);
            format!(
                "❌ {} not installed or not running. Please start the {} daemon.",
                label, label
            )
        }
        _ => format!(
            "❌ {} not installed. Install {} or use Docker commands instead.",
            program, program
        ),
    }
}

/// Interpret a direct orchestrator/runtime invocation
pub fn interpret(backend: Backend, program: &str, invocation: Invocation) -> ExecutionResult {
    let label = tool_label(program);

    match invocation {
        Invocation::Completed {
            success: true,
            stdout,
            stderr,
            ..
        } => {
            let output = stdout.trim();
            let notice = stderr.trim();
            if !output.is_empty() {
                ExecutionResult::ok(format!("✅ {} Output:\n{}", label, output))
            } else if !notice.is_empty() {
                // kubectl reports "No resources found ..." on stderr with exit 0
                ExecutionResult::empty(format!("ℹ️ {}", notice))
            } else if backend == Backend::Runtime {
                ExecutionResult::empty("✅ No containers found or command executed successfully")
            } else {
                ExecutionResult::empty("✅ Command executed successfully (no output)")
            }
        }
        Invocation::Completed {
            success: false,
            code,
            stderr,
            ..
        } => {
            let error = stderr.trim();
            if is_tool_missing(error) {
                ExecutionResult::failure(Outcome::ToolMissing, missing_tool_message(backend, program))
            } else if error.is_empty() {
                let code = code.map_or_else(|| "a signal".to_string(), |c| format!("code {}", c));
                ExecutionResult::failure(
                    Outcome::ToolError,
                    format!("❌ {} Error:\nexited with {}", label, code),
                )
            } else {
                ExecutionResult::failure(Outcome::ToolError, format!("❌ {} Error:\n{}", label, error))
            }
        }
        Invocation::Failed { kind, message } => {
            if kind == std::io::ErrorKind::NotFound {
                ExecutionResult::failure(Outcome::ToolMissing, missing_tool_message(backend, program))
            } else {
                ExecutionResult::failure(
                    Outcome::RuntimeError,
                    format!("❌ Error running {}: {}", program, message),
                )
            }
        }
        Invocation::TimedOut => ExecutionResult::timeout(),
    }
}
