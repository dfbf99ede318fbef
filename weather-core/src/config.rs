use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_API_BASE: &str = "https://api.openweathermap.org";
pub const DEFAULT_ICON_BASE: &str = "https://openweathermap.org/img/wn";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_BIND: &str = "WEATHER_BIND";
pub const ENV_SERVER_URL: &str = "WEATHER_SERVER_URL";

/// OpenWeather credentials and endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_icon_base")]
    pub icon_base: String,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: default_api_base(),
            icon_base: default_icon_base(),
        }
    }
}

/// Where the server listens and where the client finds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_server_url")]
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), url: default_server_url() }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [openweather]
/// api_key = "..."
///
/// [server]
/// bind = "127.0.0.1:3000"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub openweather: Option<ProviderConfig>,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load config from disk and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let cfg = Self::load_from(&path)?;
        Ok(cfg.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config file.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-lookup", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides looked up through `var` (normally the process environment).
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = var(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.upsert_provider_api_key(key);
        }
        if let Some(bind) = var(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Some(url) = var(ENV_SERVER_URL) {
            self.server.url = url;
        }
        self
    }

    /// Set or replace the API key, keeping any custom endpoints.
    pub fn upsert_provider_api_key(&mut self, api_key: String) {
        match self.openweather.as_mut() {
            Some(provider) => provider.api_key = api_key,
            None => self.openweather = Some(ProviderConfig::new(api_key)),
        }
    }

    /// Returns the API key, if present and non-empty.
    pub fn provider_api_key(&self) -> Option<&str> {
        self.openweather
            .as_ref()
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn is_provider_configured(&self) -> bool {
        self.provider_api_key().is_some()
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_icon_base() -> String {
    DEFAULT_ICON_BASE.to_string()
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}
