//! Transcription cleanup applied before classification.
//!
//! Speech recognisers regularly hear "pods" as "boats" or "ports", and
//! questions ("what pods ...") route better as imperatives ("show pods ...").
//! Replacements are plain substring substitutions applied in a fixed order.

/// Built-in substitutions, applied first and in this order
pub const BUILTIN_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("boats", "pods"),
    ("ports", "pods"),
    ("pots", "pods"),
    ("what", "show"),
    ("which", "show"),
];

/// Lower-cases text and applies an ordered list of literal substitutions
#[derive(Debug, Clone)]
pub struct Normalizer {
    substitutions: Vec<(String, String)>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Normalizer {
    /// Built-in substitutions followed by `extra`, in the given order
    pub fn new(extra: Vec<(String, String)>) -> Self {
        let mut substitutions: Vec<(String, String)> = BUILTIN_SUBSTITUTIONS
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();

        substitutions.extend(
            extra
                .into_iter()
                .filter(|(from, _)| !from.is_empty())
                .map(|(from, to)| (from.to_lowercase(), to.to_lowercase())),
        );

        Self { substitutions }
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut result = text.to_lowercase();
        for (from, to) in &self.substitutions {
            result = result.replace(from.as_str(), to);
        }
        result
    }
}

/// Normalize with the built-in substitutions only
pub fn normalize(text: &str) -> String {
    Normalizer::default().normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homophones_become_pods() {
        assert_eq!(normalize("Show me the BOATS"), "show me the pods");
        assert_eq!(normalize("list ports"), "list pods");
        assert_eq!(normalize("get pots"), "get pods");
    }

    #[test]
    fn test_questions_become_imperatives() {
        assert_eq!(
            normalize("What containers are running"),
            "show containers are running"
        );
        assert_eq!(normalize("which nodes"), "show nodes");
    }

    #[test]
    fn test_substitution_is_literal() {
        // No word boundaries: "somewhat" is rewritten too
        assert_eq!(normalize("somewhat"), "someshow");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_extra_substitutions_run_after_builtins() {
        let normalizer = Normalizer::new(vec![
            ("Cube control".to_string(), "kubectl".to_string()),
            ("show".to_string(), "list".to_string()),
        ]);
        assert_eq!(normalizer.normalize("cube control what"), "kubectl list");
    }

    #[test]
    fn test_empty_extra_pattern_is_ignored() {
        let normalizer = Normalizer::new(vec![(String::new(), "x".to_string())]);
        assert_eq!(normalizer.normalize("pods"), "pods");
    }
}
