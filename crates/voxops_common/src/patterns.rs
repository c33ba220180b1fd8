//! Ordered intent pattern tables.
//!
//! A `PatternSet` is built once and shared read-only. Rows are tried in
//! declaration order and so are the patterns inside each row; the first
//! pattern that matches decides the intent. Overlaps are resolved by that
//! order alone. An intent may have more than one row, so a broad pattern can
//! sit below the rows it must not shadow.

use crate::intent::Intent;
use regex::{Regex, RegexBuilder};

/// Built-in table, in match order
pub const BUILTIN_RULES: &[(Intent, &[&str])] = &[
    (
        Intent::GetPods,
        &[
            r"\b(show|list|get|display)\b.*\bpods?\b",
            r"\bpods?\b.*\bstatus\b",
            r"\brunning\b.*\bpods?\b",
        ],
    ),
    (
        Intent::DescribePod,
        &[
            r"\bdescribe\b.*\bpods?\b",
            r"\bdetails?\b.*\bpods?\b",
            r"\binfo\b.*\bpods?\b",
        ],
    ),
    (
        Intent::DeletePod,
        &[
            r"\b(delete|remove|kill)\b.*\bpods?\b",
            r"\bpods?\b.*\b(delete|remove)\b",
        ],
    ),
    (
        Intent::RestartPod,
        &[
            r"\brestart\b.*\bpods?\b",
            r"\bpods?\b.*\brestart\b",
            r"\brestart\b.*\bdeployments?\b",
        ],
    ),
    (
        Intent::ListContainers,
        &[
            r"\b(show|list|get)\b.*\bcontainers?\b",
            r"\bcontainers?\b.*\brunning\b",
            r"\brunning\b.*\bcontainers?\b",
            r"\bdocker\s+ps\b",
        ],
    ),
    (
        Intent::ListImages,
        &[
            r"\b(show|list|get)\b.*\bimages?\b",
            r"\bdocker\b.*\bimages?\b",
            r"\bimages?\b",
        ],
    ),
    (
        Intent::StopContainer,
        &[r"\bstop\b.*\bcontainers?\b", r"\bcontainers?\b.*\bstop\b"],
    ),
    (
        Intent::GetServices,
        &[
            r"\b(show|list|get)\b.*\bservices?\b",
            r"\bservices?\b.*\bstatus\b",
            r"\bservices?\b",
        ],
    ),
    (
        Intent::ScaleDeployment,
        &[
            r"\bscale\b.*\bdeployments?\b",
            r"\bdeployments?\b.*\bscale\b",
            r"\b(increase|decrease)\b.*\breplicas?\b",
            r"\bscale\b.*\b\d+\s*(replicas?|instances?)\b",
        ],
    ),
    (
        Intent::GetDeployments,
        &[
            r"\b(show|list|get)\b.*\bdeployments?\b",
            r"\bdeployments?\b.*\bstatus\b",
            r"\bdeployments?\b",
        ],
    ),
    (
        Intent::GetLogs,
        &[
            r"\b(show|get|display|fetch|tail)\b.*\blogs?\b",
            r"\blogs?\b.*\bpods?\b",
            r"\blogs?\b.*\bcontainers?\b",
            r"\blogs?\b",
        ],
    ),
    (
        Intent::GetNodes,
        &[
            r"\b(show|list|get)\b.*\bnodes?\b",
            r"\bnodes?\b.*\bstatus\b",
            r"\bnodes?\b",
        ],
    ),
    // "show me everything that's running": pods, once no other resource was named
    (Intent::GetPods, &[r"\b(show|list|get)\b.*\brunning\b"]),
    (
        Intent::HealthCheck,
        &[
            r"\bhealth\b.*\bcheck\b",
            r"\bsystem\b.*\bstatus\b",
            r"\bcheck\b.*\bhealth\b",
            r"\bstatus\b.*\bsystem\b",
            r"\b(health|healthy|status)\b",
        ],
    ),
    (Intent::GetNamespaces, &[r"\bnamespaces?\b"]),
    (Intent::GetConfigmaps, &[r"\bconfig\s*maps?\b"]),
    (Intent::GetSecrets, &[r"\bsecrets?\b"]),
];

/// Errors raised while building a pattern table
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("invalid pattern for {intent}: {pattern}: {source}")]
    InvalidPattern {
        intent: Intent,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("intent {0} is the fallback and cannot carry patterns")]
    ReservedIntent(Intent),

    #[error("intent {0} has no patterns")]
    EmptyRule(Intent),
}

/// Patterns for one intent
#[derive(Debug, Clone)]
struct IntentRule {
    intent: Intent,
    patterns: Vec<Regex>,
}

/// The pattern that decided a classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub intent: Intent,
    pub pattern: String,
}

/// Immutable, ordered intent pattern table
#[derive(Debug, Clone)]
pub struct PatternSet {
    rules: Vec<IntentRule>,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PatternSet {
    /// Build a table from `(intent, patterns)` rules, keeping their order.
    /// Patterns are matched case-insensitively.
    pub fn from_rules<I, P, S>(rules: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = (Intent, P)>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled: Vec<IntentRule> = Vec::new();

        for (intent, patterns) in rules {
            if intent == Intent::Unknown {
                return Err(PatternError::ReservedIntent(intent));
            }

            let mut regexes = Vec::new();
            for pattern in patterns {
                let pattern = pattern.as_ref();
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| PatternError::InvalidPattern {
                        intent,
                        pattern: pattern.to_string(),
                        source,
                    })?;
                regexes.push(regex);
            }

            if regexes.is_empty() {
                return Err(PatternError::EmptyRule(intent));
            }

            compiled.push(IntentRule {
                intent,
                patterns: regexes,
            });
        }

        Ok(Self { rules: compiled })
    }

    /// The built-in table
    pub fn builtin() -> Self {
        Self::from_rules(
            BUILTIN_RULES
                .iter()
                .map(|(intent, patterns)| (*intent, patterns.iter().copied())),
        )
        .expect("built-in intent patterns compile")
    }

    /// First matching rule in declaration order
    pub fn first_match(&self, text: &str) -> Option<RuleMatch> {
        self.rules.iter().find_map(|rule| {
            rule.patterns
                .iter()
                .find(|regex| regex.is_match(text))
                .map(|regex| RuleMatch {
                    intent: rule.intent,
                    pattern: regex.as_str().to_string(),
                })
        })
    }

    /// Intents in match order, once per row
    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.rules.iter().map(|rule| rule.intent)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
