//! Configuration management

use std::{env, path::Path, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Environment files to load before processing config.
    /// Paths support ~ expansion. Loaded in order, later files override earlier.
    #[serde(default)]
    pub env_files: Vec<String>,
    /// Server configuration
    pub server: ServerConfig,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// RPC provider configuration
    pub rpc: RpcConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            request_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024, // 1MB - chat payloads are small
        }
    }
}

/// LLM provider configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the chat completions API
    pub base_url: String,
    /// Model name
    pub model: String,
    /// API key. Supports a literal value or `env:VAR_NAME`.
    pub api_key: Option<String>,
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum tool-calling steps per chat request
    pub max_steps: u32,
    /// Per-step request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: Some("env:OPENAI_API_KEY".to_string()),
            temperature: 0.7,
            max_steps: 20,
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl LlmConfig {
    /// Resolve the API key (expand `env:VAR_NAME` references)
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            if let Some(var_name) = key.strip_prefix("env:") {
                env::var(var_name).unwrap_or_default()
            } else {
                key.clone()
            }
        })
    }
}

/// RPC provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Timeout for the `eth_blockNumber` probe used during endpoint fallback
    #[serde(with = "humantime_serde")]
    pub probe_timeout: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file does not exist or cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        // Merge environment variables (FLARESCAN_ prefix)
        figment = figment.merge(Env::prefixed("FLARESCAN_").split("__"));

        let config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        // Load env files into process environment (before key resolution)
        config.load_env_files();

        Ok(config)
    }

    /// Load environment files into the process environment.
    /// Supports ~ expansion. Files that don't exist are silently skipped.
    fn load_env_files(&self) {
        for path_str in &self.env_files {
            let expanded = if path_str.starts_with('~') {
                if let Some(home) = dirs::home_dir() {
                    path_str.replacen('~', &home.display().to_string(), 1)
                } else {
                    path_str.clone()
                }
            } else {
                path_str.clone()
            };

            let path = Path::new(&expanded);
            if path.exists() {
                match dotenvy::from_path(path) {
                    Ok(()) => {
                        tracing::info!("Loaded env file: {expanded}");
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load env file {expanded}: {e}");
                    }
                }
            } else {
                tracing::debug!("Env file not found (skipped): {expanded}");
            }
        }
    }
}

/// Custom humantime serde module for Duration
pub mod humantime_serde {
    use std::time::Duration;

    use serde::{self, Deserialize, Deserializer, Serializer};

    /// Serialize Duration to human-readable string (e.g., "30s")
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the serializer fails.
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}s", duration.as_secs()))
    }

    /// Deserialize human-readable duration string (e.g., "30s", "5m", "100ms")
    ///
    /// # Errors
    ///
    /// Returns a deserialization error if the string cannot be parsed as a duration.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        if let Some(ms) = s.strip_suffix("ms") {
            ms.parse::<u64>()
                .map(Duration::from_millis)
                .map_err(serde::de::Error::custom)
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(serde::de::Error::custom)
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(serde::de::Error::custom)
        } else {
            // Assume seconds
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.max_steps, 20);
        assert!((config.llm.temperature - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn resolve_api_key_literal() {
        let llm = LlmConfig {
            api_key: Some("sk-test-123".to_string()),
            ..Default::default()
        };
        assert_eq!(llm.resolve_api_key().unwrap(), "sk-test-123");
    }

    #[test]
    fn resolve_api_key_from_env() {
        // SAFETY-free: std::env::set_var is unavailable under forbid(unsafe_code)
        // in edition 2024, so exercise the fallback path for a missing var.
        let llm = LlmConfig {
            api_key: Some("env:FLARESCAN_TEST_MISSING_KEY".to_string()),
            ..Default::default()
        };
        assert_eq!(llm.resolve_api_key().unwrap(), "");
    }

    #[test]
    fn load_env_files_skips_missing() {
        let config = Config {
            env_files: vec!["/nonexistent/path/.env".to_string()],
            ..Default::default()
        };
        // Should not panic
        config.load_env_files();
    }

    #[test]
    fn load_env_files_sets_env_vars() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join("test.env");
        let mut f = std::fs::File::create(&env_path).unwrap();
        writeln!(f, "FLARESCAN_TEST_KEY_A=hello_from_env_file").unwrap();
        drop(f);

        let config = Config {
            env_files: vec![env_path.to_string_lossy().to_string()],
            ..Default::default()
        };
        config.load_env_files();

        assert_eq!(
            env::var("FLARESCAN_TEST_KEY_A").unwrap(),
            "hello_from_env_file"
        );
    }

    #[test]
    fn config_deserialized_from_yaml() {
        let yaml = r#"
server:
  host: "0.0.0.0"
  port: 9000
  request_timeout: "45s"
llm:
  model: "gpt-4o"
  temperature: 0.2
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.request_timeout, Duration::from_secs(45));
        assert_eq!(config.llm.model, "gpt-4o");
    }

    #[test]
    fn duration_suffixes() {
        use serde::Deserialize;

        #[derive(Deserialize)]
        struct Wrap {
            #[serde(with = "humantime_serde")]
            d: Duration,
        }
        let w: Wrap = serde_yaml::from_str("d: \"100ms\"").unwrap();
        assert_eq!(w.d, Duration::from_millis(100));
        let w: Wrap = serde_yaml::from_str("d: \"5m\"").unwrap();
        assert_eq!(w.d, Duration::from_secs(300));
        let w: Wrap = serde_yaml::from_str("d: \"7\"").unwrap();
        assert_eq!(w.d, Duration::from_secs(7));
    }
}
