//! # Host Configuration
//!
//! Versioned JSON configuration for the playground host. Every field has a
//! default, so `{}` is a valid file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use engine_process::ProcessEngineConfig;
use execution_bridge::{RunFailurePolicy, RUN_FAILURE_NOTICE};
use highlighter::Markup;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which engine the host drives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EngineConfig {
    /// In-process simulated engine
    Sim {
        /// Output written when an exact source text is run
        #[serde(default)]
        responses: BTreeMap<String, Vec<String>>,
    },
    /// Native compiler and VM executables
    Process(ProcessEngineConfig),
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::Sim {
            responses: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineConfig::Sim { .. } => "sim",
            EngineConfig::Process(_) => "process",
        }
    }
}

/// Host configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Format version
    pub version: u32,
    pub engine: EngineConfig,
    /// How delimiters are emphasized in the source pane
    pub markup: Markup,
    /// Turn run failures into a console notice instead of an error
    pub contain_run_failures: bool,
    /// Console text for a contained run failure
    pub run_failure_notice: String,
    /// Maximum steps to run (0 = unlimited)
    pub max_steps: usize,
    /// Prefix source lines with their numbers
    pub line_numbers: bool,
}

impl HostConfig {
    /// Current config format version
    pub const CURRENT_VERSION: u32 = 1;

    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let config: HostConfig = serde_json::from_str(text)
            .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;

        if config.version != Self::CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion(config.version));
        }

        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn run_policy(&self) -> RunFailurePolicy {
        RunFailurePolicy::from_contain_flag(self.contain_run_failures)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            engine: EngineConfig::default(),
            markup: Markup::Ansi,
            contain_run_failures: false,
            run_failure_notice: RUN_FAILURE_NOTICE.to_string(),
            max_steps: 0,
            line_numbers: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = HostConfig::from_json("{}").unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.run_policy(), RunFailurePolicy::Propagate);
    }

    #[test]
    fn test_roundtrip() {
        let mut responses = BTreeMap::new();
        responses.insert("(+ 1 2)".to_string(), vec!["3\n".to_string()]);
        let config = HostConfig {
            engine: EngineConfig::Sim { responses },
            markup: Markup::Html,
            contain_run_failures: true,
            max_steps: 50,
            ..HostConfig::default()
        };

        let json = config.to_json().unwrap();
        assert_eq!(HostConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_process_engine_section() {
        let json = r#"{
            "version": 1,
            "engine": { "kind": "process", "runner": "vm-dev", "runner_args": ["{}", "--jit"] },
            "markup": "plain"
        }"#;
        let config = HostConfig::from_json(json).unwrap();

        match &config.engine {
            EngineConfig::Process(process) => {
                assert_eq!(process.runner, "vm-dev");
                assert_eq!(process.compiler, "codegen");
                assert_eq!(process.runner_args, ["{}", "--jit"]);
            }
            other => panic!("expected process engine, got {:?}", other),
        }
        assert_eq!(config.markup, Markup::Plain);
        assert_eq!(config.engine.kind(), "process");
    }

    #[test]
    fn test_run_failure_notice_override() {
        let json = r#"{"contain_run_failures": true, "run_failure_notice": "Failed to compile\n"}"#;
        let config = HostConfig::from_json(json).unwrap();
        assert_eq!(config.run_policy(), RunFailurePolicy::Contain);
        assert_eq!(config.run_failure_notice, "Failed to compile\n");
        assert_eq!(HostConfig::default().run_failure_notice, RUN_FAILURE_NOTICE);
    }

    #[test]
    fn test_unsupported_version() {
        match HostConfig::from_json(r#"{"version": 999}"#) {
            Err(ConfigError::UnsupportedVersion(999)) => {}
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            HostConfig::from_json("{ not json"),
            Err(ConfigError::DeserializationFailed(_))
        ));
    }

    #[test]
    fn test_unknown_engine_kind() {
        assert!(matches!(
            HostConfig::from_json(r#"{"engine": {"kind": "wasm"}}"#),
            Err(ConfigError::DeserializationFailed(_))
        ));
    }
}
