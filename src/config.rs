//! Configuration management for the travel planner
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings. The resulting
//! [`TravelPlannerConfig`] is built once at process start and handed to the
//! planner by reference.

use crate::{Result, TravelPlannerError};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the OpenRouter API key
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
/// Environment variable overriding the chat model
pub const MODEL_ENV: &str = "MODEL";

const ENV_PREFIX: &str = "TRAVEL_PLANNER";
const LOCAL_CONFIG_FILE: &str = "travel-planner.toml";
const DOTENV_FILE: &str = ".env";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelPlannerConfig {
    /// Geocoding service configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Weather service configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Language model configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Nominatim geocoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim instance
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Client identification sent as `User-Agent`; Nominatim rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_service_timeout")]
    pub timeout_seconds: u64,
}

/// Open-Meteo forecast settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the forecast API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_service_timeout")]
    pub timeout_seconds: u64,
}

/// Chat completion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Bearer token; checked when the itinerary is requested, not at load time
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    "travel-planner/1.0".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_llm_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

const fn default_temperature() -> f32 {
    0.4
}

const fn default_service_timeout() -> u64 {
    15
}

const fn default_llm_timeout() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_service_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_service_timeout(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl GeocodingConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl LlmConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl TravelPlannerConfig {
    /// Load configuration from the given file (or the default locations), a
    /// `.env` file in the working directory, and the process environment.
    /// Process variables win over `.env` entries.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut vars = read_dotenv(Path::new(DOTENV_FILE))?;
        vars.extend(env::vars());
        Self::load_with_env(config_path, vars)
    }

    /// Load configuration using an explicit set of environment variables
    pub fn load_with_env(
        config_path: Option<PathBuf>,
        vars: HashMap<String, String>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(TravelPlannerError::config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                if let Some(path) = Self::default_config_file() {
                    builder = builder.add_source(
                        File::from(path)
                            .required(false)
                            .format(FileFormat::Toml),
                    );
                }
            }
        }

        // Add environment variable overrides, e.g. TRAVEL_PLANNER_LLM__MODEL
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(Some(vars.clone())),
        );

        // Conventional variables win over everything else
        builder = builder
            .set_override_option("llm.api_key", non_empty(vars.get(API_KEY_ENV)))?
            .set_override_option("llm.model", non_empty(vars.get(MODEL_ENV)))?;

        let mut config: TravelPlannerConfig = builder.build()?.try_deserialize()?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// First existing config file: `./travel-planner.toml`, then the user config dir
    #[must_use]
    pub fn default_config_file() -> Option<PathBuf> {
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local.to_path_buf());
        }
        Self::get_config_path().filter(|path| path.exists())
    }

    /// Get the per-user configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-planner").join("config.toml"))
    }

    /// Apply default values to fields that were set but left empty
    pub fn apply_defaults(&mut self) {
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.user_agent.trim().is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.llm.base_url.is_empty() {
            self.llm.base_url = default_llm_base_url();
        }
        if self.llm.model.trim().is_empty() {
            self.llm.model = default_model();
        }
        if self
            .llm
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            self.llm.api_key = None;
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        for (name, url) in [
            ("Geocoding", &self.geocoding.base_url),
            ("Weather", &self.weather.base_url),
            ("LLM", &self.llm.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TravelPlannerError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                )));
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, timeout) in [
            ("Geocoding", self.geocoding.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
            ("LLM", self.llm.timeout_seconds),
        ] {
            if timeout == 0 || timeout > 300 {
                return Err(TravelPlannerError::config(format!(
                    "{name} timeout must be between 1 and 300 seconds"
                )));
            }
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(TravelPlannerError::config(
                "LLM temperature must be between 0.0 and 2.0",
            ));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelPlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelPlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        Ok(())
    }
}

/// Read `KEY=value` pairs from a dotenv file; a missing file yields no entries
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => {
            return Err(TravelPlannerError::config(format!(
                "Failed to read {}: {e}",
                path.display()
            )));
        }
    };

    entries
        .map(|entry| {
            entry.map_err(|e| {
                TravelPlannerError::config(format!("Invalid entry in {}: {e}", path.display()))
            })
        })
        .collect()
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
