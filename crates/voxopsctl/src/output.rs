//! Output formatting for voxopsctl

use owo_colors::OwoColorize;
use voxops_common::executor::HealthReport;
use voxops_common::{CommandReport, Operation, Outcome, Resolution};

/// Header line color by outcome
fn outcome_tag(outcome: Outcome) -> String {
    let tag = format!("[{}]", outcome.as_str());
    match outcome {
        Outcome::Ok => tag.bright_green().to_string(),
        Outcome::NoResources | Outcome::Guidance => tag.yellow().to_string(),
        _ => tag.bright_red().to_string(),
    }
}

/// Intent and description header, then the display text
pub fn format_report(report: &CommandReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}  {}\n",
        outcome_tag(report.outcome),
        report.intent.as_str().cyan(),
        report.description.dimmed()
    ));
    out.push('\n');
    out.push_str(&report.display_text);
    out.push('\n');
    out
}

pub fn format_resolution(resolution: &Resolution, command_line: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<12}{}\n", "normalized", resolution.normalized));
    out.push_str(&format!("{:<12}{}\n", "intent", resolution.intent.as_str().cyan()));
    if let Some(pattern) = &resolution.pattern {
        out.push_str(&format!("{:<12}{}\n", "pattern", pattern.dimmed()));
    }
    if let Some(name) = &resolution.parameters.name {
        out.push_str(&format!("{:<12}{}\n", "name", name));
    }
    if let Some(replicas) = resolution.parameters.replicas {
        out.push_str(&format!("{:<12}{}\n", "replicas", replicas));
    }
    if let Some(namespace) = &resolution.parameters.namespace {
        out.push_str(&format!("{:<12}{}\n", "namespace", namespace));
    }
    out.push_str(&format!("{:<12}{}\n", "description", resolution.spec.description));

    let action = match (&resolution.spec.operation, command_line) {
        (Operation::Invoke { mutates: true, .. }, Some(line)) => format!("{} {}", line, "(mutating)".yellow()),
        (Operation::Invoke { .. }, Some(line)) => line.to_string(),
        (Operation::FetchLogs { name, .. }, _) => format!("logs for {} (runtime, then orchestrator)", name),
        (Operation::HealthCheck, _) => "health check".to_string(),
        (Operation::Respond { message }, _) => message.clone(),
        (Operation::Invoke { args, .. }, None) => args.join(" "),
    };
    out.push_str(&format!("{:<12}{}\n", "would run", action));
    out
}

pub fn format_health(report: &HealthReport) -> String {
    let mut out = report.render();
    out.push('\n');
    out.push_str(&format!(
        "{}\n",
        format!("checked at {}", report.checked_at.format("%Y-%m-%d %H:%M:%S UTC")).dimmed()
    ));
    out
}
