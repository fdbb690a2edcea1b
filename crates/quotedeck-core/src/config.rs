use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
///
/// Loaded from the config file with CLI flags layered on top.
/// Priority: CLI > File > Defaults (like a sensible person would do)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load config from default location or fall back to defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            // No config file? Use defaults
            Ok(Self::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get the config file path
    /// Uses XDG on Linux/macOS, AppData on Windows
    fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("quotedeck");

        Ok(config_dir.join("config.toml"))
    }

    /// Default location of the cache database.
    pub fn cache_db_path() -> crate::Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find cache directory".into()))?
            .join("quotedeck");

        std::fs::create_dir_all(&cache_dir)?;
        Ok(cache_dir.join("cache.db"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the quote list (a static JSON array of {text, author})
    #[serde(default = "default_quotes_url")]
    pub url: String,
}

fn default_quotes_url() -> String {
    "https://raw.githubusercontent.com/shreeshjha/quotedeck/main/quotes.json".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_quotes_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in hours
    #[serde(default = "default_cache_ttl")]
    pub ttl_hours: u64,

    /// Disable the on-disk cache entirely (always fetch)
    #[serde(default)]
    pub disabled: bool,
}

fn default_cache_ttl() -> u64 {
    24 // a day-old quote list is still a quote list
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_cache_ttl(),
            disabled: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Skip the typewriter animation and show quotes instantly
    #[serde(default)]
    pub reduced_motion: bool,

    /// Start with quotes rendered in uppercase
    #[serde(default)]
    pub uppercase: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            uppercase: false,
        }
    }
}
