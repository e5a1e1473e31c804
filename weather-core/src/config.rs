use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Base URL used when neither the config file, the environment nor a flag set one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "WEATHER_SERVICE_URL";

/// Where the weather service lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string() }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Example TOML:
    /// [service]
    /// base_url = "http://localhost:8000"
    pub service: ServiceConfig,
}

impl Config {
    pub fn base_url(&self) -> &str {
        &self.service.base_url
    }

    /// Validate and store a new base URL. Trailing slashes are dropped so that
    /// paths can be appended verbatim.
    pub fn set_base_url(&mut self, raw: &str) -> Result<()> {
        self.service.base_url = normalize_base_url(raw)?;
        Ok(())
    }

    /// Apply overrides on top of the file contents. A flag beats the
    /// environment; empty values are ignored.
    pub fn with_overrides(mut self, env: Option<String>, flag: Option<String>) -> Result<Self> {
        if let Some(url) = env.as_deref().filter(|s| !s.trim().is_empty()) {
            self.set_base_url(url)
                .with_context(|| format!("Invalid {BASE_URL_ENV} value: {url}"))?;
        }
        if let Some(url) = flag.as_deref().filter(|s| !s.trim().is_empty()) {
            self.set_base_url(url).with_context(|| format!("Invalid --base-url value: {url}"))?;
        }
        Ok(self)
    }

    /// Load the config file, then apply `WEATHER_SERVICE_URL` and the given flag.
    pub fn resolve(flag: Option<String>) -> Result<Self> {
        let env = std::env::var(BASE_URL_ENV).ok();
        Self::load()?.with_overrides(env, flag)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.service.base_url = normalize_base_url(&cfg.service.base_url)
            .with_context(|| format!("Invalid base_url in config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

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
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).with_context(|| format!("'{trimmed}' is not a valid URL"))?;

    if !matches!(url.scheme(), "http" | "https") {
        bail!("Unsupported URL scheme '{}'. Use http or https.", url.scheme());
    }

    Ok(trimmed.to_string())
}
