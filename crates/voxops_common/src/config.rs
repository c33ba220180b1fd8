//! Configuration management.
//!
//! Loads settings from an explicit path, `$VOXOPS_CONFIG`,
//! /etc/voxops/config.toml or $XDG_CONFIG_HOME/voxops/config.toml, or uses
//! defaults. Every field has a default so partial files are fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// System-wide config file path
pub const CONFIG_PATH: &str = "/etc/voxops/config.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "VOXOPS_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// External tool invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Orchestrator client binary
    #[serde(default = "default_orchestrator_bin")]
    pub orchestrator_bin: String,

    /// Container runtime binary
    #[serde(default = "default_runtime_bin")]
    pub runtime_bin: String,

    /// Timeout for direct orchestrator/runtime calls
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,

    /// Timeout for each runtime log lookup sub-call
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,

    /// Timeout for each health probe
    #[serde(default = "default_health_timeout")]
    pub health_timeout_secs: u64,

    /// Lines kept by the orchestrator log fallback
    #[serde(default = "default_orchestrator_log_tail")]
    pub orchestrator_log_tail: u32,

    /// Lines kept by runtime log retrieval
    #[serde(default = "default_runtime_log_tail")]
    pub runtime_log_tail: u32,

    /// Run delete/restart/stop/scale commands instead of describing them
    #[serde(default)]
    pub allow_mutations: bool,
}

fn default_orchestrator_bin() -> String {
    "kubectl".to_string()
}

fn default_runtime_bin() -> String {
    "docker".to_string()
}

fn default_command_timeout() -> u64 {
    10
}

fn default_lookup_timeout() -> u64 {
    5
}

fn default_health_timeout() -> u64 {
    5
}

fn default_orchestrator_log_tail() -> u32 {
    50
}

fn default_runtime_log_tail() -> u32 {
    30
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            orchestrator_bin: default_orchestrator_bin(),
            runtime_bin: default_runtime_bin(),
            command_timeout_secs: default_command_timeout(),
            lookup_timeout_secs: default_lookup_timeout(),
            health_timeout_secs: default_health_timeout(),
            orchestrator_log_tail: default_orchestrator_log_tail(),
            runtime_log_tail: default_runtime_log_tail(),
            allow_mutations: false,
        }
    }
}

impl ExecutorConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }
}

/// Log target recognition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_known_names")]
    pub known_names: Vec<String>,
}

fn default_known_names() -> Vec<String> {
    crate::dispatch::DEFAULT_KNOWN_NAMES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            known_names: default_known_names(),
        }
    }
}

/// Extra transcription fixes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// `[from, to]` pairs applied after the built-in substitutions
    #[serde(default)]
    pub extra_substitutions: Vec<(String, String)>,
}

/// Spoken summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Text-to-speech program; the text is passed as the last argument
    #[serde(default = "default_speech_program")]
    pub program: String,

    #[serde(default = "default_speech_args")]
    pub args: Vec<String>,
}

fn default_speech_program() -> String {
    "espeak".to_string()
}

fn default_speech_args() -> Vec<String> {
    vec!["-s".to_string(), "150".to_string()]
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            program: default_speech_program(),
            args: default_speech_args(),
        }
    }
}

/// HTTP daemon settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    // Localhost only
    "127.0.0.1:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

/// Full configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub logs: LogsConfig,

    #[serde(default)]
    pub normalizer: NormalizerConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path (argument or `$VOXOPS_CONFIG`) must load. The
    /// well-known locations are optional: a missing or broken file there
    /// falls back to defaults with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Self::load_from_path(Path::new(&path));
            }
        }

        for path in Self::search_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(config) => return Ok(config),
                Err(e) => warn!("Ignoring config: {}", e),
            }
        }

        warn!("Config not found, using defaults");
        Ok(Config::default())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_PATH)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("voxops").join("config.toml"));
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.executor.orchestrator_bin, "kubectl");
        assert_eq!(config.executor.runtime_bin, "docker");
        assert_eq!(config.executor.command_timeout(), Duration::from_secs(10));
        assert_eq!(config.executor.lookup_timeout(), Duration::from_secs(5));
        assert_eq!(config.executor.orchestrator_log_tail, 50);
        assert!(!config.executor.allow_mutations);
        assert_eq!(config.logs.known_names.len(), 6);
        assert!(!config.speech.enabled);
        assert_eq!(config.server.bind, "127.0.0.1:5000");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [executor]
            orchestrator_bin = "oc"
            allow_mutations = true

            [normalizer]
            extra_substitutions = [["cube control", "kubectl"]]
            "#,
        )
        .unwrap();
        assert_eq!(config.executor.orchestrator_bin, "oc");
        assert!(config.executor.allow_mutations);
        assert_eq!(config.executor.runtime_bin, "docker");
        assert_eq!(config.executor.command_timeout_secs, 10);
        assert_eq!(
            config.normalizer.extra_substitutions,
            vec![("cube control".to_string(), "kubectl".to_string())]
        );
        assert_eq!(config.logs.known_names[0], "backend");
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logs]\nknown_names = [\"payments\"]").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.logs.known_names, vec!["payments".to_string()]);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let err = Config::load(Some(Path::new("/nonexistent/voxops.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_explicit_path_must_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[executor\nbroken").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed.executor.runtime_log_tail, 30);
        assert_eq!(parsed.speech.args, vec!["-s".to_string(), "150".to_string()]);
    }
}
