use crate::error::ConfigError;
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub default_temperature: f64,
    pub default_max_tokens: u32,
    pub max_retries: u32,
    /// Base of the exponential backoff, in seconds.
    pub retry_delay: f64,
    pub max_retry_delay_secs: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub use_mock: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            default_temperature: 0.7,
            default_max_tokens: 2000,
            max_retries: 3,
            retry_delay: 2.0,
            max_retry_delay_secs: 60,
            request_timeout_secs: 60,
            log_level: "info".to_string(),
            use_mock: false,
        }
    }
}

impl Config {
    /// Load configuration from file, environment variables, or create default
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_stored()?;

        // Environment variables override config file
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// The config file alone, without environment overrides. This is what
    /// gets modified and written back by [`set_api_key`](Self::set_api_key).
    pub fn load_stored() -> Result<Self, ConfigError> {
        Self::load_stored_from(&Self::get_config_path()?)
    }

    pub fn load_stored_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_path(path)
        } else {
            info!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("GROQ_API_KEY").filter(|k| !k.is_empty()) {
            self.groq_api_key = Some(api_key);
        }
        if let Some(model) = lookup("COPYSMITH_MODEL") {
            self.model = model;
        }
        if let Some(api_base) = lookup("COPYSMITH_API_BASE") {
            self.api_base = api_base;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level.to_lowercase();
        }
        if lookup("COPYSMITH_USE_MOCK").is_some() {
            self.use_mock = true;
        }
    }

    /// Checks everything a generator needs before it serves a request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.use_mock && self.get_api_key().is_none() {
            return Err(ConfigError::MissingApiKey);
        }
        if !(0.0..=1.0).contains(&self.default_temperature) {
            return Err(ConfigError::InvalidValue {
                field: "default_temperature",
                reason: format!("{} is outside 0.0..=1.0", self.default_temperature),
            });
        }
        if self.default_max_tokens == 0 {
            return Err(invalid_zero("default_max_tokens"));
        }
        if self.max_retries == 0 {
            return Err(invalid_zero("max_retries"));
        }
        if !(self.retry_delay.is_finite() && self.retry_delay > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "retry_delay",
                reason: format!("{} must be a positive number of seconds", self.retry_delay),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid_zero("request_timeout_secs"));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "model",
                reason: "model name is empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(&Self::get_config_path()?)
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<(), ConfigError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        info!("Saved config to: {}", config_path.display());
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
        let home = home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".copysmith"))
    }

    /// Set API key and save config
    pub fn set_api_key(&mut self, api_key: String) -> Result<(), ConfigError> {
        self.groq_api_key = Some(api_key);
        self.save()?;
        info!("API key saved to config file");
        Ok(())
    }

    pub fn get_api_key(&self) -> Option<&str> {
        self.groq_api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn is_mock_mode(&self) -> bool {
        self.use_mock
    }

    pub fn show_config_info(&self) -> Result<(), ConfigError> {
        let config_path = Self::get_config_path()?;
        println!("Configuration file: {}", config_path.display());
        println!(
            "Status: {}",
            if config_path.exists() { "Found" } else { "Not found (using defaults)" }
        );

        println!("API Key: {}", mask_key(self.get_api_key()));
        println!("Model: {}", self.model);
        println!("API base: {}", self.api_base);
        println!("Temperature: {}", self.default_temperature);
        println!("Max tokens: {}", self.default_max_tokens);
        println!(
            "Retries: {} (backoff base {}s, capped at {}s)",
            self.max_retries, self.retry_delay, self.max_retry_delay_secs
        );
        println!("Request timeout: {}s", self.request_timeout_secs);
        println!("Mock mode: {}", self.use_mock);

        println!("\nTo set API key:");
        println!("  copysmith --set-api-key <your-key>");
        println!("\nOr set environment variable:");
        println!("  export GROQ_API_KEY=<your-key>");

        Ok(())
    }
}

fn invalid_zero(field: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: "must be greater than zero".to_string(),
    }
}

fn mask_key(key: Option<&str>) -> String {
    match key {
        Some(k) if k.chars().count() > 8 => {
            let prefix: String = k.chars().take(4).collect();
            format!("{prefix}... (set)")
        }
        Some(_) => "Set".to_string(),
        None => "Not set".to_string(),
    }
}
