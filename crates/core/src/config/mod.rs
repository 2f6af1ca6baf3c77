//! Application configuration with layered loading.
//!
//! Configuration is loaded with figment from:
//!
//! 1. Environment variables (SWCACHE_*)
//! 2. TOML config file (if SWCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::cache::Generation;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SWCACHE_*)
/// 2. TOML config file (if SWCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Origin of the application whose requests are intercepted.
    ///
    /// Requests to any other origin are never intercepted.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Active cache generation label.
    ///
    /// Defaults to a label derived from the crate version, so each release
    /// supersedes the previous generation.
    #[serde(default = "default_generation")]
    pub generation: String,

    /// Path to SQLite cache database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for network fetches.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to read from one network response.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Path of the offline fallback document served to failed navigations.
    #[serde(default = "default_fallback_path")]
    pub fallback_path: Option<String>,

    /// Paths fetched into the cache on install.
    #[serde(default)]
    pub precache_paths: Vec<String>,
}

fn default_origin() -> String {
    "http://localhost:8080".into()
}

fn default_generation() -> String {
    format!("swcache-v{}", env!("CARGO_PKG_VERSION"))
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./swcache.sqlite")
}

fn default_user_agent() -> String {
    format!("swcache/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_fallback_path() -> Option<String> {
    Some("/offline.html".into())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            generation: default_generation(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            fallback_path: default_fallback_path(),
            precache_paths: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SWCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SWCACHE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Parsed application origin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `origin` is not an http(s) URL.
    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.origin)
            .map_err(|e| ConfigError::Invalid { field: "origin".into(), reason: e.to_string() })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::Invalid {
                field: "origin".into(),
                reason: format!("unsupported scheme: {scheme}"),
            }),
        }
    }

    /// Active generation label.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `generation` is blank.
    pub fn active_generation(&self) -> Result<Generation, ConfigError> {
        Generation::new(self.generation.clone())
            .map_err(|e| ConfigError::Invalid { field: "generation".into(), reason: e.to_string() })
    }

    /// Absolute URL of the fallback document, if one is configured.
    pub fn fallback_url(&self) -> Result<Option<Url>, ConfigError> {
        self.fallback_path
            .as_deref()
            .map(|path| self.resolve("fallback_path", path))
            .transpose()
    }

    /// Absolute URLs to precache on install; always includes the fallback document.
    pub fn precache_urls(&self) -> Result<Vec<Url>, ConfigError> {
        let mut urls = self
            .precache_paths
            .iter()
            .map(|path| self.resolve("precache_paths", path))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(fallback) = self.fallback_url()?
            && !urls.contains(&fallback)
        {
            urls.push(fallback);
        }
        Ok(urls)
    }

    fn resolve(&self, field: &str, path: &str) -> Result<Url, ConfigError> {
        if !path.starts_with('/') {
            return Err(ConfigError::Invalid { field: field.into(), reason: format!("path must start with '/': {path}") });
        }
        self.origin_url()?
            .join(path)
            .map_err(|e| ConfigError::Invalid { field: field.into(), reason: e.to_string() })
    }
}
