//! Parameter extraction from normalized text.
//!
//! Each rule runs independently of the detected intent and only its first
//! match (by position) is used. A name is the single token following a
//! resource-kind word, so multi-word names and names with punctuation
//! ("web-1") are cut at the first non-word character. Namespaces may
//! contain hyphens ("kube-system").

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(pod|container|deployment|service)\s+(\w+)").unwrap());

static REPLICAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(replica|instance|pod)").unwrap());

static NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"namespace\s+([\w-]+)").unwrap());

/// Extracted command parameters; a key is present only when it was heard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterBag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ParameterBag {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.replicas.is_none() && self.namespace.is_none()
    }
}

/// Pull `name`, `replicas` and `namespace` out of normalized text
pub fn extract(normalized: &str) -> ParameterBag {
    let name = NAME_RE
        .captures(normalized)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string());

    // Overflowing counts are treated as not heard
    let replicas = REPLICAS_RE
        .captures(normalized)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    let namespace = NAMESPACE_RE
        .captures(normalized)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    ParameterBag {
        name,
        replicas,
        namespace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_command() {
        let params = extract("scale deployment payments to 5 replicas");
        assert_eq!(params.name.as_deref(), Some("payments"));
        assert_eq!(params.replicas, Some(5));
        assert_eq!(params.namespace, None);
    }

    #[test]
    fn test_first_match_by_position() {
        let params = extract("stop container api then pod web");
        assert_eq!(params.name.as_deref(), Some("api"));

        let params = extract("run 2 instances or 4 replicas");
        assert_eq!(params.replicas, Some(2));
    }

    #[test]
    fn test_namespace() {
        let params = extract("show pods in namespace staging");
        assert_eq!(params.namespace.as_deref(), Some("staging"));
        assert_eq!(params.name, None);
    }

    #[test]
    fn test_name_stops_at_punctuation() {
        let params = extract("describe pod web-1 in namespace kube-system");
        assert_eq!(params.name.as_deref(), Some("web"));
    }

    #[test]
    fn test_namespace_keeps_hyphens() {
        let params = extract("describe pod web-1 in namespace kube-system.");
        assert_eq!(params.namespace.as_deref(), Some("kube-system"));
    }

    #[test]
    fn test_replicas_without_space() {
        assert_eq!(extract("scale api to 3pods").replicas, Some(3));
    }

    #[test]
    fn test_overflowing_replicas_are_dropped() {
        assert_eq!(extract("scale to 99999999999 replicas").replicas, None);
    }

    #[test]
    fn test_nothing_heard() {
        let params = extract("show logs of backend");
        assert!(params.is_empty());
        assert_eq!(serde_json::to_string(&params).unwrap(), "{}");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "scale deployment api to 7 replicas in namespace prod";
        assert_eq!(extract(text), extract(text));
    }
}
