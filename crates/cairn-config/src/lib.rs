//! # cairn-config
//!
//! Layered configuration loading for Cairn using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CAIRN_*` prefix, `__` as separator)
//! 2. Project-level `.cairn/config.toml`
//! 3. User-level `~/.config/cairn/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CAIRN_API__BASE_URL` -> `api.base_url`,
//! `CAIRN_CACHE__TTL_DAYS` -> `cache.ttl_days`, etc. The `__` (double
//! underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use cairn_config::CairnConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = CairnConfig::load_with_dotenv().expect("config");
//! println!("runner at {}", config.api.base_url);
//! ```

mod api;
mod cache;
mod error;

pub use api::ApiConfig;
pub use cache::CacheSettings;
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CairnConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheSettings,
}

impl CairnConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`CAIRN_*` prefix)
    /// 2. `.cairn/config.toml` (project-local)
    /// 3. `~/.config/cairn/config.toml` (user-global)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any layer fails to merge or extract.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` before building the figment. This is the typical
    /// entry point for the CLI and tests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any layer fails to merge or extract.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".cairn/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("CAIRN_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cairn").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir
    /// looking for a `.env` file. Silently does nothing if no `.env` is
    /// found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = CairnConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.cache.ttl_days, 7);
        assert!(config.cache.dir.is_empty());
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: CairnConfig = CairnConfig::figment().extract()?;
            assert_eq!(config.api.timeout_secs, 30);
            assert_eq!(config.cache.ttl_days, 7);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CAIRN_API__BASE_URL", "https://runner.internal");
            jail.set_env("CAIRN_CACHE__TTL_DAYS", "2");
            let config: CairnConfig = CairnConfig::figment().extract()?;
            assert_eq!(config.api.base_url, "https://runner.internal");
            assert_eq!(config.cache.ttl_days, 2);
            Ok(())
        });
    }
}
