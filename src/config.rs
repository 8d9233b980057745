//! Configuration management for Game Scout
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{GameScoutError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Game Scout
///
/// Holds the recommendation gateway settings, the option catalog settings
/// and the conversation defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Recommendation gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Option catalog and games catalog configuration
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Conversation flow defaults
    #[serde(default)]
    pub flow: FlowConfig,
}

/// Endpoint and credential handed to an HTTP collaborator
///
/// This is the only configuration the conversation collaborators see;
/// everything else in [`Config`] is consumed while building them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    /// Full URL of the remote endpoint
    pub endpoint: String,
    /// Bearer credential sent in the `Authorization` header
    pub credential: String,
}

impl GatewaySettings {
    /// Creates settings from an endpoint and credential
    ///
    /// # Examples
    ///
    /// ```
    /// use gamescout::config::GatewaySettings;
    ///
    /// let settings = GatewaySettings::new("http://localhost:54321/functions/v1/x", "anon");
    /// assert_eq!(settings.credential, "anon");
    /// ```
    pub fn new(endpoint: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credential: credential.into(),
        }
    }
}

/// Recommendation gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway flavour: "proxy" (filter payload function) or "completion" (LLM endpoint)
    #[serde(default = "default_gateway_kind")]
    pub kind: String,

    /// Search endpoint URL
    #[serde(default = "default_gateway_endpoint")]
    pub endpoint: String,

    /// Bearer credential for the endpoint
    #[serde(default)]
    pub credential: String,

    /// HTTP timeout for a single search (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Completion settings, used when `kind` is "completion"
    #[serde(default)]
    pub completion: CompletionConfig,
}

fn default_gateway_kind() -> String {
    "proxy".to_string()
}

fn default_gateway_endpoint() -> String {
    "http://localhost:54321/functions/v1/get-game-recommendations".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            kind: default_gateway_kind(),
            endpoint: default_gateway_endpoint(),
            credential: String::new(),
            timeout_seconds: default_timeout_seconds(),
            completion: CompletionConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Endpoint and credential for the search gateway
    pub fn settings(&self) -> GatewaySettings {
        GatewaySettings::new(self.endpoint.clone(), self.credential.clone())
    }
}

/// LLM completion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Model name sent with each completion request
    #[serde(default = "default_completion_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_completion_model() -> String {
    "gpt-4".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: default_completion_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Catalog configuration
///
/// `endpoint`/`credential` address the selectable option list used by the
/// guided conversation. `api_base`/`api_key` address the public games
/// catalog queried directly by vibe search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Option catalog URL
    #[serde(default = "default_catalog_endpoint")]
    pub endpoint: String,

    /// Bearer credential for the option catalog; falls back to the gateway credential
    #[serde(default)]
    pub credential: String,

    /// Base URL of the public games catalog API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Key for the public games catalog API
    #[serde(default)]
    pub api_key: String,

    /// Number of games requested per vibe search
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_catalog_endpoint() -> String {
    "http://localhost:54321/functions/v1/get-tags".to_string()
}

fn default_api_base() -> String {
    "https://api.rawg.io/api".to_string()
}

fn default_page_size() -> u32 {
    20
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_catalog_endpoint(),
            credential: String::new(),
            api_base: default_api_base(),
            api_key: String::new(),
            page_size: default_page_size(),
        }
    }
}

/// Conversation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Default conversation mode for `scout`: "guided" or "free_text"
    #[serde(default = "default_flow_mode")]
    pub default_mode: String,
}

fn default_flow_mode() -> String {
    "guided".to_string()
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            default_mode: default_flow_mode(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GameScoutError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| GameScoutError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(endpoint) = std::env::var("GAMESCOUT_GATEWAY_ENDPOINT") {
            tracing::debug!(endpoint = %endpoint, "Env override: GAMESCOUT_GATEWAY_ENDPOINT");
            self.gateway.endpoint = endpoint;
        }

        if let Ok(credential) = std::env::var("GAMESCOUT_GATEWAY_CREDENTIAL") {
            tracing::debug!("Env override: GAMESCOUT_GATEWAY_CREDENTIAL");
            self.gateway.credential = credential;
        }

        if let Ok(kind) = std::env::var("GAMESCOUT_GATEWAY_KIND") {
            tracing::debug!(kind = %kind, "Env override: GAMESCOUT_GATEWAY_KIND");
            self.gateway.kind = kind.to_lowercase();
        }

        if let Ok(endpoint) = std::env::var("GAMESCOUT_CATALOG_ENDPOINT") {
            tracing::debug!(endpoint = %endpoint, "Env override: GAMESCOUT_CATALOG_ENDPOINT");
            self.catalog.endpoint = endpoint;
        }

        if let Ok(api_key) = std::env::var("GAMESCOUT_CATALOG_API_KEY") {
            tracing::debug!("Env override: GAMESCOUT_CATALOG_API_KEY");
            self.catalog.api_key = api_key;
        }

        if let Ok(timeout) = std::env::var("GAMESCOUT_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(v) => {
                    self.gateway.timeout_seconds = v;
                    tracing::debug!(timeout_seconds = v, "Env override: GAMESCOUT_TIMEOUT_SECONDS");
                }
                Err(_) => {
                    tracing::warn!("Invalid value for GAMESCOUT_TIMEOUT_SECONDS: {}", timeout);
                }
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(endpoint) = &cli.endpoint {
            tracing::debug!(endpoint = %endpoint, "CLI override: --endpoint");
            self.gateway.endpoint = endpoint.clone();
        }
    }

    /// Endpoint and credential for the option catalog
    ///
    /// An empty catalog credential falls back to the gateway credential, since
    /// both usually belong to the same serverless project.
    pub fn catalog_settings(&self) -> GatewaySettings {
        let credential = if self.catalog.credential.is_empty() {
            self.gateway.credential.clone()
        } else {
            self.catalog.credential.clone()
        };
        GatewaySettings::new(self.catalog.endpoint.clone(), credential)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let valid_kinds = ["proxy", "completion"];
        if !valid_kinds.contains(&self.gateway.kind.as_str()) {
            return Err(GameScoutError::Config(format!(
                "Invalid gateway kind: {}. Must be one of: {}",
                self.gateway.kind,
                valid_kinds.join(", ")
            ))
            .into());
        }

        validate_url("gateway.endpoint", &self.gateway.endpoint)?;
        validate_url("catalog.endpoint", &self.catalog.endpoint)?;
        validate_url("catalog.api_base", &self.catalog.api_base)?;

        if self.gateway.timeout_seconds == 0 {
            return Err(GameScoutError::Config(
                "gateway.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        let temperature = self.gateway.completion.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(GameScoutError::Config(
                "gateway.completion.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.gateway.completion.max_tokens == 0 {
            return Err(GameScoutError::Config(
                "gateway.completion.max_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if self.catalog.page_size == 0 || self.catalog.page_size > 40 {
            return Err(GameScoutError::Config(
                "catalog.page_size must be between 1 and 40".to_string(),
            )
            .into());
        }

        let valid_modes = ["guided", "free_text"];
        if !valid_modes.contains(&self.flow.default_mode.as_str()) {
            return Err(GameScoutError::Config(format!(
                "Invalid flow mode: {}. Must be one of: {}",
                self.flow.default_mode,
                valid_modes.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GameScoutError::Config(format!("{} cannot be empty", field)).into());
    }
    url::Url::parse(value)
        .map_err(|e| GameScoutError::Config(format!("{} is not a valid URL: {}", field, e)))?;
    Ok(())
}
