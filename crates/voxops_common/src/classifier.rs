//! Intent classifier over a shared pattern table.

use crate::intent::Intent;
use crate::patterns::{PatternSet, RuleMatch};
use std::sync::Arc;
use tracing::debug;

/// Classifies normalized text; never fails, `Unknown` is the fallback
#[derive(Debug, Clone)]
pub struct Classifier {
    patterns: Arc<PatternSet>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Arc::new(PatternSet::builtin()))
    }
}

impl Classifier {
    pub fn new(patterns: Arc<PatternSet>) -> Self {
        Self { patterns }
    }

    pub fn classify(&self, normalized: &str) -> Intent {
        self.explain(normalized)
            .map(|hit| hit.intent)
            .unwrap_or(Intent::Unknown)
    }

    /// Like `classify`, but also reports the deciding pattern
    pub fn explain(&self, normalized: &str) -> Option<RuleMatch> {
        let hit = self.patterns.first_match(normalized);
        match &hit {
            Some(rule) => debug!("  '{}' -> {} via {}", normalized, rule.intent, rule.pattern),
            None => debug!("  '{}' -> unknown", normalized),
        }
        hit
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }
}
