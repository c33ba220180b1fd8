//! Voice command pipeline.
//!
//! normalize -> classify -> extract -> resolve -> execute -> summarize.
//! Request-scoped and infallible: every failure ends up as text in the
//! returned report.

use crate::classifier::Classifier;
use crate::config::Config;
use crate::dispatch::{CommandSpec, DispatchTable, Utterance};
use crate::executor::Executor;
use crate::extractor::{extract, ParameterBag};
use crate::intent::Intent;
use crate::normalizer::Normalizer;
use crate::outcome::{ExecutionResult, Outcome};
use crate::patterns::PatternSet;
use crate::runner::{ProcessRunner, ToolRunner};
use crate::summarizer::summarize;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Everything decided about a command before anything runs
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub normalized: String,
    pub intent: Intent,
    /// Pattern that decided the intent, if any
    pub pattern: Option<String>,
    pub parameters: ParameterBag,
    pub spec: CommandSpec,
}

/// Result of processing one command
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReport {
    pub command: String,
    pub display_text: String,
    pub spoken_text: String,
    pub intent: Intent,
    pub description: String,
    pub parameters: ParameterBag,
    pub outcome: Outcome,
    #[serde(skip)]
    pub result: ExecutionResult,
}

pub struct Pipeline<R = ProcessRunner> {
    normalizer: Normalizer,
    classifier: Classifier,
    dispatch: DispatchTable,
    executor: Executor<R>,
}

impl Pipeline<ProcessRunner> {
    /// Pipeline running real processes with built-in patterns
    pub fn from_config(config: &Config) -> Self {
        Self::with_runner(config, ProcessRunner)
    }
}

impl<R: ToolRunner> Pipeline<R> {
    pub fn with_runner(config: &Config, runner: R) -> Self {
        Self::new(
            Normalizer::new(config.normalizer.extra_substitutions.clone()),
            Classifier::new(Arc::new(PatternSet::builtin())),
            DispatchTable::new(config.logs.known_names.clone()),
            Executor::new(runner, config.executor.clone()),
        )
    }

    pub fn new(
        normalizer: Normalizer,
        classifier: Classifier,
        dispatch: DispatchTable,
        executor: Executor<R>,
    ) -> Self {
        Self {
            normalizer,
            classifier,
            dispatch,
            executor,
        }
    }

    pub fn executor(&self) -> &Executor<R> {
        &self.executor
    }

    /// Everything up to execution; runs nothing
    pub fn resolve(&self, command: &str) -> Resolution {
        let normalized = self.normalizer.normalize(command);
        let hit = self.classifier.explain(&normalized);
        let intent = hit.as_ref().map_or(Intent::Unknown, |m| m.intent);
        let parameters = extract(&normalized);
        let spec = self.dispatch.resolve(
            intent,
            &parameters,
            &Utterance {
                raw: command,
                normalized: &normalized,
            },
        );

        Resolution {
            normalized,
            intent,
            pattern: hit.map(|m| m.pattern),
            parameters,
            spec,
        }
    }

    pub async fn process(&self, command: &str) -> CommandReport {
        let start = Instant::now();
        let resolution = self.resolve(command);
        info!(
            "  Command '{}' -> {} ({})",
            command, resolution.intent, resolution.spec.description
        );

        let result = self.executor.execute(&resolution.spec).await;
        let summary = summarize(&result.output);
        info!(
            "  {} finished as {} in {}ms",
            resolution.intent,
            result.outcome.as_str(),
            start.elapsed().as_millis()
        );

        CommandReport {
            command: command.to_string(),
            display_text: summary.display_text,
            spoken_text: summary.spoken_text,
            intent: resolution.intent,
            description: resolution.spec.description,
            parameters: resolution.parameters,
            outcome: result.outcome,
            result,
        }
    }
}
