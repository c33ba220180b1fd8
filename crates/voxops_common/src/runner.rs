//! External tool invocation.
//!
//! Runs a binary directly (no shell) with a wall-clock timeout and captures
//! its exit status and output. This layer does not interpret results; see
//! `outcome` for that.

use std::future::Future;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// Maximum output length to capture per stream
const MAX_OUTPUT_BYTES: usize = 64 * 1024;

/// Raw result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// The process ran to completion
    Completed {
        success: bool,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The process could not be started or awaited
    Failed {
        kind: std::io::ErrorKind,
        message: String,
    },
    /// The timeout expired; the process was killed
    TimedOut,
}

impl Invocation {
    /// Exit 0 with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::Completed {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Exit 1 with the given stderr
    pub fn error(stderr: impl Into<String>) -> Self {
        Self::Completed {
            success: false,
            code: Some(1),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Binary not on PATH
    pub fn missing(program: &str) -> Self {
        Self::Failed {
            kind: std::io::ErrorKind::NotFound,
            message: format!("{}: No such file or directory (os error 2)", program),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Completed { success: true, .. })
    }

    /// Trimmed stdout of a successful run
    pub fn stdout(&self) -> Option<&str> {
        match self {
            Self::Completed {
                success: true,
                stdout,
                ..
            } => Some(stdout.trim()),
            _ => None,
        }
    }
}

/// Something that can run an external tool
pub trait ToolRunner: Send + Sync {
    fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> impl Future<Output = Invocation> + Send;
}

/// Runs tools as child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String], timeout: Duration) -> Invocation {
        let start = Instant::now();
        debug!("  Executing: {} {:?}", program, args);

        // Dropping the child (on timeout) kills it
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                debug!("  Spawn failed for {}: {}", program, e);
                return Invocation::Failed {
                    kind: e.kind(),
                    message: e.to_string(),
                };
            }
        };

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                debug!(
                    "  {} exited with {:?} after {}ms",
                    program,
                    output.status.code(),
                    start.elapsed().as_millis()
                );
                Invocation::Completed {
                    success: output.status.success(),
                    code: output.status.code(),
                    stdout: truncate_output(&output.stdout),
                    stderr: truncate_output(&output.stderr),
                }
            }
            Ok(Err(e)) => Invocation::Failed {
                kind: e.kind(),
                message: e.to_string(),
            },
            Err(_) => {
                warn!(
                    "[!]  {} {:?} timed out after {}ms",
                    program,
                    args,
                    start.elapsed().as_millis()
                );
                Invocation::TimedOut
            }
        }
    }
}

/// Lossy UTF-8 conversion capped at `MAX_OUTPUT_BYTES`
fn truncate_output(bytes: &[u8]) -> String {
    let slice = if bytes.len() > MAX_OUTPUT_BYTES {
        &bytes[..MAX_OUTPUT_BYTES]
    } else {
        bytes
    };
    String::from_utf8_lossy(slice).to_string()
}

/// Scripted runner for tests: canned results keyed by command line
#[cfg(any(test, feature = "test-support"))]
pub mod testing {
    use super::{Invocation, ToolRunner};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug)]
    pub struct ScriptedRunner {
        script: HashMap<String, Invocation>,
        fallback: Invocation,
        calls: Mutex<Vec<(String, Duration)>>,
    }

    impl Default for ScriptedRunner {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ScriptedRunner {
        /// Unscripted commands behave like a missing binary
        pub fn new() -> Self {
            Self {
                script: HashMap::new(),
                fallback: Invocation::missing("unscripted"),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Script the result for `command_line` ("kubectl get pods")
        pub fn on(mut self, command_line: &str, result: Invocation) -> Self {
            self.script.insert(command_line.to_string(), result);
            self
        }

        pub fn otherwise(mut self, result: Invocation) -> Self {
            self.fallback = result;
            self
        }

        /// Command lines run so far, in order
        pub fn calls(&self) -> Vec<String> {
            self.lock().iter().map(|(line, _)| line.clone()).collect()
        }

        /// Timeout passed with each call, in order
        pub fn timeouts(&self) -> Vec<Duration> {
            self.lock().iter().map(|(_, timeout)| *timeout).collect()
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, Duration)>> {
            self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    impl ToolRunner for ScriptedRunner {
        async fn run(&self, program: &str, args: &[String], timeout: Duration) -> Invocation {
            let mut line = program.to_string();
            for arg in args {
                line.push(' ');
                line.push_str(arg);
            }
            self.lock().push((line.clone(), timeout));
            self.script
                .get(&line)
                .cloned()
                .unwrap_or_else(|| self.fallback.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout() {
        let result = ProcessRunner
            .run("echo", &args(&["hello"]), Duration::from_secs(5))
            .await;
        assert!(result.succeeded());
        assert_eq!(result.stdout(), Some("hello"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit() {
        let result = ProcessRunner
            .run("false", &[], Duration::from_secs(5))
            .await;
        assert!(matches!(
            result,
            Invocation::Completed {
                success: false,
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_binary() {
        let result = ProcessRunner
            .run("voxops-no-such-tool", &[], Duration::from_secs(5))
            .await;
        assert!(matches!(
            result,
            Invocation::Failed {
                kind: std::io::ErrorKind::NotFound,
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_child() {
        let start = Instant::now();
        let result = ProcessRunner
            .run("sleep", &args(&["7.25"]), Duration::from_millis(200))
            .await;
        assert_eq!(result, Invocation::TimedOut);
        assert!(start.elapsed() < Duration::from_secs(5));

        #[cfg(target_os = "linux")]
        {
            tokio::time::sleep(Duration::from_millis(300)).await;
            let alive = std::fs::read_dir("/proc")
                .unwrap()
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| std::fs::read(entry.path().join("cmdline")).ok())
                .any(|cmdline| cmdline == b"sleep\x007.25\x00");
            assert!(!alive, "timed out child is still running");
        }
    }

    #[tokio::test]
    async fn test_scripted_runner_records_calls() {
        let runner = testing::ScriptedRunner::new().on("kubectl get pods", Invocation::ok("web Running"));
        let hit = runner
            .run("kubectl", &args(&["get", "pods"]), Duration::from_secs(10))
            .await;
        let miss = runner.run("docker", &args(&["ps"]), Duration::from_secs(5)).await;
        assert_eq!(hit.stdout(), Some("web Running"));
        assert!(matches!(miss, Invocation::Failed { .. }));
        assert_eq!(runner.calls(), vec!["kubectl get pods", "docker ps"]);
        assert_eq!(
            runner.timeouts(),
            vec![Duration::from_secs(10), Duration::from_secs(5)]
        );
    }
}
