//! Execution engine.
//!
//! Runs a resolved `CommandSpec` against the orchestrator or the runtime,
//! including the two-step runtime log lookup with its orchestrator fallback
//! and the two-tool health check. Always returns an `ExecutionResult`.

use crate::config::ExecutorConfig;
use crate::dispatch::{Backend, CommandSpec, Operation};
use crate::outcome::{interpret, tool_label, ExecutionResult};
use crate::runner::{Invocation, ProcessRunner, ToolRunner};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Availability of one tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolHealth {
    pub name: String,
    pub available: bool,
    /// One-line verdict, e.g. "✅ Docker: Running"
    pub verdict: String,
}

/// Both tools, probed independently
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub runtime: ToolHealth,
    pub orchestrator: ToolHealth,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn render(&self) -> String {
        format!(
            "System Health Check:\n{}\n{}",
            self.runtime.verdict, self.orchestrator.verdict
        )
    }

    pub fn all_available(&self) -> bool {
        self.runtime.available && self.orchestrator.available
    }
}

/// Runs command specs through a `ToolRunner`
#[derive(Debug, Clone)]
pub struct Executor<R = ProcessRunner> {
    runner: R,
    config: ExecutorConfig,
}

impl Executor<ProcessRunner> {
    pub fn with_processes(config: ExecutorConfig) -> Self {
        Self::new(ProcessRunner, config)
    }
}

impl<R: ToolRunner> Executor<R> {
    pub fn new(runner: R, config: ExecutorConfig) -> Self {
        Self { runner, config }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    fn program(&self, backend: Backend) -> &str {
        match backend {
            Backend::Runtime => &self.config.runtime_bin,
            _ => &self.config.orchestrator_bin,
        }
    }

    /// Command line a spec would run, for display
    pub fn command_line(&self, spec: &CommandSpec) -> Option<String> {
        match &spec.operation {
            Operation::Invoke { args, .. } => {
                let mut line = self.program(spec.backend).to_string();
                for arg in args {
                    line.push(' ');
                    line.push_str(arg);
                }
                Some(line)
            }
            _ => None,
        }
    }

    pub async fn execute(&self, spec: &CommandSpec) -> ExecutionResult {
        match &spec.operation {
            Operation::Invoke { args, mutates } => {
                if *mutates && !self.config.allow_mutations {
                    let line = self.command_line(spec).unwrap_or_default();
                    info!("  Refusing mutation: {}", line);
                    return ExecutionResult::guidance(format!(
                        "ℹ️ Skipped '{}': mutating commands are disabled. \
                         Set executor.allow_mutations = true to enable them.",
                        line
                    ));
                }
                self.invoke(spec.backend, args, self.config.command_timeout())
                    .await
            }
            Operation::FetchLogs { name, namespace } => {
                self.fetch_logs(name, namespace.as_deref()).await
            }
            Operation::HealthCheck => {
                let report = self.health_check().await;
                ExecutionResult::ok(report.render())
            }
            Operation::Respond { message } => ExecutionResult::guidance(message.clone()),
        }
    }

    /// One direct call to a backend
    pub async fn invoke(&self, backend: Backend, args: &[String], timeout: Duration) -> ExecutionResult {
        let program = self.program(backend);
        let invocation = self.runner.run(program, args, timeout).await;
        interpret(backend, program, invocation)
    }

    /// Runtime logs for `name`, falling back to the orchestrator
    pub async fn fetch_logs(&self, name: &str, namespace: Option<&str>) -> ExecutionResult {
        let runtime = self.runtime_logs(name).await;
        if runtime.success {
            return runtime;
        }

        warn!("[!]  No runtime logs for '{}', falling back to orchestrator", name);
        let mut args = vec![
            "logs".to_string(),
            name.to_string(),
            format!("--tail={}", self.config.orchestrator_log_tail),
        ];
        if let Some(namespace) = namespace {
            args.push("-n".to_string());
            args.push(namespace.to_string());
        }
        self.invoke(Backend::Orchestrator, &args, self.config.command_timeout())
            .await
    }

    /// Find a running container matching `name` and read its recent logs
    async fn runtime_logs(&self, name: &str) -> ExecutionResult {
        let program = &self.config.runtime_bin;
        let timeout = self.config.lookup_timeout();
        let label = tool_label(program);

        let lookup_args = vec![
            "ps".to_string(),
            "--filter".to_string(),
            format!("name={}", name),
            "--format".to_string(),
            "{{.Names}}".to_string(),
        ];
        let lookup = self.runner.run(program, &lookup_args, timeout).await;

        let actual = lookup
            .stdout()
            .and_then(|out| out.lines().map(str::trim).find(|line| !line.is_empty()))
            .map(str::to_string);

        if let Some(actual) = actual {
            let logs_args = vec![
                "logs".to_string(),
                actual.clone(),
                "--tail".to_string(),
                self.config.runtime_log_tail.to_string(),
            ];
            let logs = self.runner.run(program, &logs_args, timeout).await;

            // Container stderr is replayed on the runtime's stderr
            if let Invocation::Completed {
                success: true,
                stdout,
                stderr,
                ..
            } = logs
            {
                let text = [stdout.trim(), stderr.trim()]
                    .iter()
                    .filter(|part| !part.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join("\n");
                return if text.is_empty() {
                    ExecutionResult::empty(format!("✅ Container {} has no logs yet", actual))
                } else {
                    ExecutionResult::ok(format!("✅ {} Logs for {}:\n{}", label, actual, text))
                };
            }
        }

        ExecutionResult::not_found(format!("❌ No running container found with name: {}", name))
    }

    /// Probe the runtime daemon and the orchestrator client concurrently
    pub async fn health_check(&self) -> HealthReport {
        let timeout = self.config.health_timeout();
        let runtime_args = vec!["info".to_string()];
        let orchestrator_args = vec!["version".to_string(), "--client".to_string()];

        let (runtime, orchestrator) = tokio::join!(
            self.runner.run(&self.config.runtime_bin, &runtime_args, timeout),
            self.runner
                .run(&self.config.orchestrator_bin, &orchestrator_args, timeout),
        );

        HealthReport {
            runtime: verdict(&tool_label(&self.config.runtime_bin), &runtime, "Running", "Not running"),
            orchestrator: verdict(
                &tool_label(&self.config.orchestrator_bin),
                &orchestrator,
                "Installed",
                "Not installed",
            ),
            checked_at: Utc::now(),
        }
    }
}

fn verdict(name: &str, invocation: &Invocation, up: &str, down: &str) -> ToolHealth {
    let (available, state) = match invocation {
        Invocation::Completed { success: true, .. } => (true, up),
        Invocation::Completed { .. } => (false, down),
        Invocation::Failed { kind, .. } if *kind == std::io::ErrorKind::NotFound => (false, down),
        _ => (false, "Not available"),
    };
    let glyph = if available { "✅" } else { "❌" };
    ToolHealth {
        name: name.to_string(),
        available,
        verdict: format!("{} {}: {}", glyph, name, state),
    }
}
