use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Current-weather endpoint of the provider
    pub endpoint: String,

    /// City passed to the provider as `q`
    pub city: String,

    /// Provider unit system (`metric` gives Celsius)
    pub units: String,

    /// Language of the weather description
    pub language: String,

    /// Upper bound on a single weather request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            city: "Seoul".to_string(),
            units: "metric".to_string(),
            language: "kr".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".config/weather-widget"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, writing the defaults there first if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            anyhow::bail!("Endpoint must not be empty");
        }
        if self.city.trim().is_empty() {
            anyhow::bail!("City must not be empty");
        }
        if self.units.trim().is_empty() {
            anyhow::bail!("Units must not be empty");
        }
        if self.language.trim().is_empty() {
            anyhow::bail!("Language must not be empty");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("Request timeout must be greater than 0");
        }
        Ok(())
    }
}
