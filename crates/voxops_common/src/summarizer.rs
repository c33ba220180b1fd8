//! Response summarizer.
//!
//! Produces the on-screen text and the short spoken sentence for an
//! execution output. Both are computed from the raw output so the display
//! prefix never feeds back into the spoken count.

use serde::Serialize;

/// Spoken text with more sentences than this is cut down
const MAX_SPOKEN_SEGMENTS: usize = 5;

/// Sentences kept when spoken text is cut down
const KEPT_SPOKEN_SEGMENTS: usize = 3;

/// Glyph replacements applied before speaking, in order
const SPEECH_REPLACEMENTS: &[(&str, &str)] = &[
    ("✅", "Success."),
    ("❌", "Error."),
    ("⚠️", "Warning."),
    ("ℹ️", "Info."),
    ("⏱️", "Timeout."),
    ("🤖", ""),
    ("\n", ". "),
];

/// Display and spoken renderings of one result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub display_text: String,
    pub spoken_text: String,
}

pub fn summarize(output: &str) -> Summary {
    Summary {
        display_text: display_text(output),
        spoken_text: sanitize_for_speech(&spoken_summary(output)),
    }
}

/// Status line followed by the full output
pub fn display_text(output: &str) -> String {
    let lower = output.to_lowercase();

    let prefix = if lower.contains("running") {
        format!("✅ Found {} running pod(s). ", lower.matches("running").count())
    } else if lower.contains("error") || lower.contains("failed") {
        "⚠️ There seems to be an issue. ".to_string()
    } else if lower.contains("no resources found") {
        "ℹ️ No resources found. ".to_string()
    } else {
        "✅ Command executed successfully. ".to_string()
    };

    format!("{}\n\n{}", prefix, output)
}

/// One short sentence describing the output
pub fn spoken_summary(output: &str) -> String {
    let lower = output.to_lowercase();

    if lower.contains("running") {
        format!("Found {} running items", lower.matches("running").count())
    } else if lower.contains("error") || lower.contains("failed") {
        "Command failed with an error".to_string()
    } else if lower.contains("no resources found") {
        "No resources found".to_string()
    } else if lower.contains("success") {
        "Command executed successfully".to_string()
    } else {
        "Command completed".to_string()
    }
}

/// Replace glyphs with words and keep long text short enough to say
pub fn sanitize_for_speech(text: &str) -> String {
    let mut spoken = text.to_string();
    for (glyph, word) in SPEECH_REPLACEMENTS {
        spoken = spoken.replace(glyph, word);
    }
    // Bare forms without the emoji variation selector
    spoken = spoken
        .replace('⚠', "Warning.")
        .replace('ℹ', "Info.")
        .replace('⏱', "Timeout.");

    let segments: Vec<&str> = spoken.split('.').collect();
    if segments.len() > MAX_SPOKEN_SEGMENTS {
        spoken = format!(
            "{}. Check screen for full details.",
            segments[..KEPT_SPOKEN_SEGMENTS].join(". ")
        );
    }

    spoken.trim().to_string()
}
