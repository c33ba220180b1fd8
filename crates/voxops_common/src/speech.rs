//! Spoken output.
//!
//! Speaking never blocks or fails the caller: the text-to-speech program is
//! started on a background task and any failure is only logged.

use crate::config::SpeechConfig;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, warn};

/// Something that can say a sentence
pub trait Speaker: Send + Sync {
    /// Fire-and-forget
    fn speak(&self, text: &str);
}

/// Speaks through an external text-to-speech program
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Speak and wait for the program to finish
    pub async fn say(&self, text: &str) -> std::io::Result<()> {
        let status = Command::new(&self.program)
            .args(self.command_args(text))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        if status.success() {
            debug!("  Spoke via {}", self.program);
        } else {
            warn!("[!]  {} exited with {}", self.program, status);
        }
        Ok(())
    }

    /// Argument vector for `text`; the text goes last
    fn command_args(&self, text: &str) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(text.to_string());
        args
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        // Needs a runtime; outside one there is nobody to hear it anyway
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("[!]  No async runtime, not speaking");
            return;
        };

        let speaker = self.clone();
        let text = text.to_string();
        handle.spawn(async move {
            if let Err(e) = speaker.say(&text).await {
                warn!("[!]  Speech failed ({}): {}", speaker.program, e);
            }
        });
    }
}

/// Speech disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSpeaker;

impl Speaker for NullSpeaker {
    fn speak(&self, _text: &str) {}
}

pub fn speaker_from_config(config: &SpeechConfig) -> Arc<dyn Speaker> {
    if config.enabled {
        Arc::new(CommandSpeaker::new(config.program.clone(), config.args.clone()))
    } else {
        Arc::new(NullSpeaker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_last_argument() {
        let speaker = CommandSpeaker::new("espeak", vec!["-s".to_string(), "150".to_string()]);
        assert_eq!(speaker.command_args("Found 2 running items"), vec!["-s", "150", "Found 2 running items"]);
    }

    #[test]
    fn test_speak_without_runtime_is_harmless() {
        CommandSpeaker::new("voxops-no-such-tts", Vec::new()).speak("hello");
        NullSpeaker.speak("hello");
    }

    #[tokio::test]
    async fn test_say_reports_missing_program() {
        let err = CommandSpeaker::new("voxops-no-such-tts", Vec::new())
            .say("hello")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_missing_program_does_not_fail_caller() {
        let speaker = speaker_from_config(&SpeechConfig {
            enabled: true,
            program: "voxops-no-such-tts".to_string(),
            args: Vec::new(),
        });
        speaker.speak("Command completed");
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}
