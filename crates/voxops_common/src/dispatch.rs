//! Intent dispatch table.
//!
//! Every intent has exactly one entry holding both the command template and
//! the description template, so what the caller is told and what the engine
//! runs come from the same row.

use crate::extractor::ParameterBag;
use crate::intent::Intent;
use serde::Serialize;

/// Replica count used when scaling without a heard number
pub const DEFAULT_REPLICAS: u32 = 3;

/// Names recognised as log targets when none are configured
pub const DEFAULT_KNOWN_NAMES: &[&str] = &["backend", "frontend", "database", "redis", "nginx", "mysql"];

const LOGS_GUIDANCE: &str = "Please specify container/pod name. Example: 'show logs of backend'";

/// Which external tool a command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Cluster-level resource manager (kubectl)
    Orchestrator,
    /// Local container engine (docker)
    Runtime,
    /// Handled without a single tool call
    Internal,
}

/// Command shape of a dispatch entry; `{name}` and `{replicas}` are filled in
#[derive(Debug, Clone, Copy)]
pub enum CommandTemplate {
    Args(&'static [&'static str]),
    /// `named` when a name was heard, `unnamed` otherwise
    NamedOrAll {
        named: &'static [&'static str],
        unnamed: &'static [&'static str],
    },
    /// `running` when the text mentions "running", `all` otherwise
    RunningOrAll {
        running: &'static [&'static str],
        all: &'static [&'static str],
    },
    FetchLogs,
    HealthCheck,
    NotImplemented,
}

/// One row of the dispatch table
#[derive(Debug, Clone, Copy)]
pub struct DispatchEntry {
    pub intent: Intent,
    pub backend: Backend,
    pub command: CommandTemplate,
    /// Description template; `{name}`, `{replicas}` and `{which}` are filled in
    pub description: &'static str,
    /// Substituted for `{name}` in the description when no name was heard
    pub name_fallback: &'static str,
    /// Example phrase shown when a required name is missing
    pub requires_name: Option<&'static str>,
    /// Append `-n <namespace>` when a namespace was heard
    pub namespaced: bool,
}

impl DispatchEntry {
    const fn new(
        intent: Intent,
        backend: Backend,
        command: CommandTemplate,
        description: &'static str,
    ) -> Self {
        Self {
            intent,
            backend,
            command,
            description,
            name_fallback: "unknown",
            requires_name: None,
            namespaced: false,
        }
    }

    const fn namespaced(mut self) -> Self {
        self.namespaced = true;
        self
    }

    const fn requires_name(mut self, example: &'static str) -> Self {
        self.requires_name = Some(example);
        self
    }

    const fn name_fallback(mut self, fallback: &'static str) -> Self {
        self.name_fallback = fallback;
        self
    }
}

use Backend::{Internal, Orchestrator, Runtime};
use CommandTemplate::*;

/// The dispatch table, one row per intent
pub const DISPATCH_TABLE: &[DispatchEntry] = &[
    DispatchEntry::new(Intent::GetPods, Orchestrator, Args(&["get", "pods"]), "Fetching all pods in the cluster").namespaced(),
    DispatchEntry::new(
        Intent::DescribePod,
        Orchestrator,
        NamedOrAll {
            named: &["describe", "pod", "{name}"],
            unnamed: &["describe", "pods"],
        },
        "Getting detailed information about pod: {name}",
    )
    .name_fallback("all pods")
    .namespaced(),
    DispatchEntry::new(Intent::DeletePod, Orchestrator, Args(&["delete", "pod", "{name}"]), "Deleting pod: {name}")
        .requires_name("delete pod web")
        .namespaced(),
    DispatchEntry::new(
        Intent::RestartPod,
        Orchestrator,
        Args(&["rollout", "restart", "deployment", "{name}"]),
        "Restarting deployment: {name}",
    )
    .requires_name("restart deployment api")
    .namespaced(),
    DispatchEntry::new(
        Intent::ListContainers,
        Runtime,
        RunningOrAll {
            running: &["ps"],
            all: &["ps", "-a"],
        },
        "Listing {which} Docker containers",
    ),
    DispatchEntry::new(Intent::ListImages, Runtime, Args(&["images"]), "Showing all Docker images"),
    DispatchEntry::new(Intent::StopContainer, Runtime, Args(&["stop", "{name}"]), "Stopping container: {name}")
        .requires_name("stop container redis"),
    DispatchEntry::new(Intent::GetServices, Orchestrator, Args(&["get", "services"]), "Fetching all Kubernetes services")
        .namespaced(),
    DispatchEntry::new(
        Intent::ScaleDeployment,
        Orchestrator,
        Args(&["scale", "deployment", "{name}", "--replicas={replicas}"]),
        "Scaling deployment {name} to {replicas} replicas",
    )
    .requires_name("scale deployment api to 3 replicas")
    .namespaced(),
    DispatchEntry::new(Intent::GetDeployments, Orchestrator, Args(&["get", "deployments"]), "Listing all deployments")
        .namespaced(),
    DispatchEntry::new(Intent::GetLogs, Runtime, FetchLogs, "Fetching logs for: {name}").namespaced(),
    DispatchEntry::new(Intent::GetNodes, Orchestrator, Args(&["get", "nodes"]), "Listing all cluster nodes"),
    DispatchEntry::new(Intent::HealthCheck, Internal, HealthCheck, "Checking system health status"),
    DispatchEntry::new(Intent::GetNamespaces, Orchestrator, Args(&["get", "namespaces"]), "Listing all namespaces"),
    DispatchEntry::new(Intent::GetConfigmaps, Orchestrator, Args(&["get", "configmaps"]), "Listing all config maps")
        .namespaced(),
    DispatchEntry::new(Intent::GetSecrets, Orchestrator, Args(&["get", "secrets"]), "Listing all secrets").namespaced(),
    DispatchEntry::new(Intent::Unknown, Internal, NotImplemented, "Command not recognized"),
];

/// What the engine should do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    /// Run the backend binary with these arguments
    Invoke { args: Vec<String>, mutates: bool },
    /// Runtime log lookup, orchestrator logs as fallback
    FetchLogs {
        name: String,
        namespace: Option<String>,
    },
    /// Probe both tools
    HealthCheck,
    /// Nothing to run; answer with guidance
    Respond { message: String },
}

/// A resolved command and its description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub intent: Intent,
    pub backend: Backend,
    pub operation: Operation,
    pub description: String,
}

/// The text a command was resolved from
#[derive(Debug, Clone, Copy)]
pub struct Utterance<'a> {
    /// As received
    pub raw: &'a str,
    /// After normalization
    pub normalized: &'a str,
}

/// Resolves intents through `DISPATCH_TABLE`
#[derive(Debug, Clone)]
pub struct DispatchTable {
    entries: &'static [DispatchEntry],
    known_names: Vec<String>,
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new(DEFAULT_KNOWN_NAMES.iter().map(|s| s.to_string()).collect())
    }
}

impl DispatchTable {
    pub fn new(known_names: Vec<String>) -> Self {
        Self {
            entries: DISPATCH_TABLE,
            known_names: known_names.into_iter().map(|n| n.to_lowercase()).collect(),
        }
    }

    pub fn entry(&self, intent: Intent) -> Option<&DispatchEntry> {
        self.entries.iter().find(|entry| entry.intent == intent)
    }

    /// First token that is a known log target
    pub fn log_target(&self, normalized: &str) -> Option<String> {
        normalized
            .replace('-', " ")
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
            .find(|word| self.known_names.iter().any(|known| known == word))
            .map(str::to_string)
    }

    pub fn resolve(&self, intent: Intent, params: &ParameterBag, utterance: &Utterance<'_>) -> CommandSpec {
        let Some(entry) = self.entry(intent).or_else(|| self.entry(Intent::Unknown)) else {
            return CommandSpec {
                intent,
                backend: Backend::Internal,
                operation: Operation::Respond {
                    message: not_implemented(utterance.raw),
                },
                description: "Command not recognized".to_string(),
            };
        };

        let running = utterance.normalized.contains("running");
        let log_target = match entry.command {
            FetchLogs => self.log_target(utterance.normalized),
            _ => None,
        };
        let name = match entry.command {
            FetchLogs => log_target.clone(),
            _ => params.name.clone(),
        };

        let slots = Slots {
            name: name.as_deref().unwrap_or(entry.name_fallback),
            replicas: params.replicas.unwrap_or(DEFAULT_REPLICAS),
            which: if running { "running" } else { "all" },
        };
        let description = slots.fill(entry.description);

        let operation = match (entry.requires_name, &name) {
            (Some(example), None) => Operation::Respond {
                message: format!("Please specify a name. Example: '{}'", example),
            },
            _ => self.operation(entry, &slots, name.is_some(), running, log_target, params, utterance),
        };

        CommandSpec {
            intent: entry.intent,
            backend: entry.backend,
            operation,
            description,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn operation(
        &self,
        entry: &DispatchEntry,
        slots: &Slots<'_>,
        has_name: bool,
        running: bool,
        log_target: Option<String>,
        params: &ParameterBag,
        utterance: &Utterance<'_>,
    ) -> Operation {
        let template = match entry.command {
            Args(args) => args,
            NamedOrAll { named, unnamed } => {
                if has_name {
                    named
                } else {
                    unnamed
                }
            }
            RunningOrAll { running: live, all } => {
                if running {
                    live
                } else {
                    all
                }
            }
            FetchLogs => {
                return match log_target {
                    Some(name) => Operation::FetchLogs {
                        name,
                        namespace: params.namespace.clone(),
                    },
                    None => Operation::Respond {
                        message: LOGS_GUIDANCE.to_string(),
                    },
                };
            }
            HealthCheck => return Operation::HealthCheck,
            NotImplemented => {
                return Operation::Respond {
                    message: not_implemented(utterance.raw),
                }
            }
        };

        let mut args: Vec<String> = template.iter().map(|arg| slots.fill(arg)).collect();
        if entry.namespaced {
            if let Some(namespace) = &params.namespace {
                args.push("-n".to_string());
                args.push(namespace.clone());
            }
        }

        Operation::Invoke {
            args,
            mutates: entry.intent.is_mutation(),
        }
    }
}

/// Fixed reply for commands nothing matched
pub fn not_implemented(raw: &str) -> String {
    format!(
        "Command '{}' recognized but not implemented yet. Try: show pods, list containers, get services, show logs",
        raw
    )
}

struct Slots<'a> {
    name: &'a str,
    replicas: u32,
    which: &'a str,
}

impl Slots<'_> {
    fn fill(&self, template: &str) -> String {
        template
            .replace("{name}", self.name)
            .replace("{replicas}", &self.replicas.to_string())
            .replace("{which}", self.which)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract;

    fn resolve(text: &str, intent: Intent) -> CommandSpec {
        let table = DispatchTable::default();
        let params = extract(text);
        table.resolve(
            intent,
            &params,
            &Utterance {
                raw: text,
                normalized: text,
            },
        )
    }

    fn args(spec: &CommandSpec) -> Vec<&str> {
        match &spec.operation {
            Operation::Invoke { args, .. } => args.iter().map(String::as_str).collect(),
            other => panic!("expected invocation, got {:?}", other),
        }
    }

    #[test]
    fn test_every_intent_has_one_entry() {
        for intent in Intent::ALL {
            let rows = DISPATCH_TABLE.iter().filter(|e| e.intent == intent).count();
            assert_eq!(rows, 1, "{} has {} rows", intent, rows);
        }
    }

    #[test]
    fn test_scale_with_default_replicas() {
        let table = DispatchTable::default();
        let params = ParameterBag {
            name: Some("api".to_string()),
            ..Default::default()
        };
        let spec = table.resolve(
            Intent::ScaleDeployment,
            &params,
            &Utterance {
                raw: "scale deployment api",
                normalized: "scale deployment api",
            },
        );
        assert_eq!(spec.description, "Scaling deployment api to 3 replicas");
        assert_eq!(args(&spec), vec!["scale", "deployment", "api", "--replicas=3"]);
    }

    #[test]
    fn test_scale_with_heard_replicas() {
        let spec = resolve("scale deployment payments to 5 replicas", Intent::ScaleDeployment);
        assert_eq!(spec.description, "Scaling deployment payments to 5 replicas");
        assert_eq!(
            spec.operation,
            Operation::Invoke {
                args: vec![
                    "scale".to_string(),
                    "deployment".to_string(),
                    "payments".to_string(),
                    "--replicas=5".to_string()
                ],
                mutates: true,
            }
        );
    }

    #[test]
    fn test_mutation_without_name_asks_for_one() {
        let spec = resolve("delete the broken one", Intent::DeletePod);
        assert_eq!(spec.description, "Deleting pod: unknown");
        match spec.operation {
            Operation::Respond { message } => assert!(message.contains("delete pod web")),
            other => panic!("expected guidance, got {:?}", other),
        }
    }

    #[test]
    fn test_containers_running_variant() {
        let spec = resolve("show containers are running", Intent::ListContainers);
        assert_eq!(spec.backend, Backend::Runtime);
        assert_eq!(args(&spec), vec!["ps"]);
        assert_eq!(spec.description, "Listing running Docker containers");

        let spec = resolve("list containers", Intent::ListContainers);
        assert_eq!(args(&spec), vec!["ps", "-a"]);
        assert_eq!(spec.description, "Listing all Docker containers");
    }

    #[test]
    fn test_describe_named_or_all() {
        let spec = resolve("describe pod web", Intent::DescribePod);
        assert_eq!(args(&spec), vec!["describe", "pod", "web"]);

        let spec = resolve("describe pods", Intent::DescribePod);
        assert_eq!(args(&spec), vec!["describe", "pods"]);
        assert_eq!(spec.description, "Getting detailed information about pod: all pods");
    }

    #[test]
    fn test_namespace_is_appended() {
        let spec = resolve("show pods in namespace staging", Intent::GetPods);
        assert_eq!(args(&spec), vec!["get", "pods", "-n", "staging"]);

        let spec = resolve("show pods in namespace kube-system", Intent::GetPods);
        assert_eq!(args(&spec), vec!["get", "pods", "-n", "kube-system"]);

        // Nodes are cluster-scoped
        let spec = resolve("show nodes in namespace staging", Intent::GetNodes);
        assert_eq!(args(&spec), vec!["get", "nodes"]);
    }

    #[test]
    fn test_logs_use_known_names() {
        let spec = resolve("show logs of backend", Intent::GetLogs);
        assert_eq!(spec.description, "Fetching logs for: backend");
        assert_eq!(
            spec.operation,
            Operation::FetchLogs {
                name: "backend".to_string(),
                namespace: None
            }
        );

        let spec = resolve("show logs of my-redis.", Intent::GetLogs);
        assert!(matches!(spec.operation, Operation::FetchLogs { ref name, .. } if name == "redis"));
    }

    #[test]
    fn test_logs_without_known_name() {
        let spec = resolve("show logs of payments", Intent::GetLogs);
        assert_eq!(spec.description, "Fetching logs for: unknown");
        assert_eq!(
            spec.operation,
            Operation::Respond {
                message: LOGS_GUIDANCE.to_string()
            }
        );
    }

    #[test]
    fn test_custom_known_names() {
        let table = DispatchTable::new(vec!["Payments".to_string()]);
        assert_eq!(table.log_target("tail logs of payments"), Some("payments".to_string()));
        assert_eq!(table.log_target("tail logs of backend"), None);
    }

    #[test]
    fn test_unknown_is_not_implemented() {
        let spec = resolve("do the thing", Intent::Unknown);
        assert_eq!(spec.description, "Command not recognized");
        match spec.operation {
            Operation::Respond { message } => {
                assert!(message.starts_with("Command 'do the thing' recognized but not implemented yet."));
                assert!(message.contains("show pods, list containers, get services, show logs"));
            }
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[test]
    fn test_health_is_internal() {
        let spec = resolve("status", Intent::HealthCheck);
        assert_eq!(spec.backend, Backend::Internal);
        assert_eq!(spec.operation, Operation::HealthCheck);
    }
}
