//! Intents recognised by the classifier.

use serde::{Deserialize, Serialize};

/// Classified purpose of a spoken command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// List pods: "show me the pods", "pod status"
    GetPods,
    /// Describe one pod (or all when no name was heard)
    DescribePod,
    /// Delete a named pod
    DeletePod,
    /// Rollout restart of the named deployment
    RestartPod,
    /// List containers; "running" narrows to live containers
    ListContainers,
    /// List local images
    ListImages,
    /// Stop a named container
    StopContainer,
    /// List services
    GetServices,
    /// Scale a deployment to N replicas (default 3)
    ScaleDeployment,
    /// List deployments
    GetDeployments,
    /// Container logs, runtime first, orchestrator as fallback
    GetLogs,
    /// List cluster nodes
    GetNodes,
    /// Probe both tools
    HealthCheck,
    /// List namespaces
    GetNamespaces,
    /// List config maps
    GetConfigmaps,
    /// List secrets
    GetSecrets,
    /// Nothing matched
    Unknown,
}

impl Intent {
    /// Every intent, `Unknown` last
    pub const ALL: [Intent; 17] = [
        Intent::GetPods,
        Intent::DescribePod,
        Intent::DeletePod,
        Intent::RestartPod,
        Intent::ListContainers,
        Intent::ListImages,
        Intent::StopContainer,
        Intent::GetServices,
        Intent::ScaleDeployment,
        Intent::GetDeployments,
        Intent::GetLogs,
        Intent::GetNodes,
        Intent::HealthCheck,
        Intent::GetNamespaces,
        Intent::GetConfigmaps,
        Intent::GetSecrets,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetPods => "get_pods",
            Self::DescribePod => "describe_pod",
            Self::DeletePod => "delete_pod",
            Self::RestartPod => "restart_pod",
            Self::ListContainers => "list_containers",
            Self::ListImages => "list_images",
            Self::StopContainer => "stop_container",
            Self::GetServices => "get_services",
            Self::ScaleDeployment => "scale_deployment",
            Self::GetDeployments => "get_deployments",
            Self::GetLogs => "get_logs",
            Self::GetNodes => "get_nodes",
            Self::HealthCheck => "health_check",
            Self::GetNamespaces => "get_namespaces",
            Self::GetConfigmaps => "get_configmaps",
            Self::GetSecrets => "get_secrets",
            Self::Unknown => "unknown",
        }
    }

    /// Parse from the snake_case name (used by the routing corpus)
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.iter().copied().find(|intent| intent.as_str() == s)
    }

    /// Whether executing this intent changes cluster or container state
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::DeletePod | Self::RestartPod | Self::StopContainer | Self::ScaleDeployment
        )
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for intent in Intent::ALL {
            assert_eq!(Intent::from_name(intent.as_str()), Some(intent));
        }
        assert_eq!(Intent::from_name("GET_PODS"), Some(Intent::GetPods));
        assert_eq!(Intent::from_name("reboot_cluster"), None);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Intent::ScaleDeployment).unwrap();
        assert_eq!(json, "\"scale_deployment\"");
    }

    #[test]
    fn test_mutations() {
        assert!(Intent::DeletePod.is_mutation());
        assert!(Intent::ScaleDeployment.is_mutation());
        assert!(!Intent::GetPods.is_mutation());
        assert!(!Intent::GetLogs.is_mutation());
    }
}
