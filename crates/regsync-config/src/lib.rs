//! # regsync-config
//!
//! Layered configuration loading for regsync using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`REGSYNC_*` prefix, `__` as separator)
//! 2. Project-level `.regsync/config.toml`
//! 3. User-level `~/.config/regsync/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `REGSYNC_API__USERNAME` -> `api.username`,
//! `REGSYNC_PROJECTS__SOURCE` -> `projects.source`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use regsync_config::RegsyncConfig;
//!
//! let config = RegsyncConfig::load_with_dotenv().expect("config");
//! if config.api.is_configured() {
//!     println!("Register API: {}", config.api.base_url);
//! }
//! ```

mod api;
mod error;
mod pacing;
mod projects;
mod scenario;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use pacing::PacingConfig;
pub use projects::ProjectsConfig;
pub use scenario::ScenarioConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RegsyncConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub projects: ProjectsConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
}

impl RegsyncConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if you need `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.pacing.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".regsync/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("REGSYNC_").split("__"))
    }

    /// Fail with [`ConfigError::MissingSection`] unless credentials are set.
    pub fn require_api(&self) -> Result<&ApiConfig, ConfigError> {
        if self.api.is_configured() {
            Ok(&self.api)
        } else {
            Err(ConfigError::MissingSection {
                section: "api",
                hint: "REGSYNC_API__USERNAME and REGSYNC_API__PASSWORD",
            })
        }
    }

    /// Fail with [`ConfigError::MissingSection`] unless both projects are set.
    pub fn require_projects(&self) -> Result<&ProjectsConfig, ConfigError> {
        if self.projects.is_configured() {
            Ok(&self.projects)
        } else {
            Err(ConfigError::MissingSection {
                section: "projects",
                hint: "REGSYNC_PROJECTS__SOURCE and REGSYNC_PROJECTS__DESTINATION",
            })
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("regsync").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_unconfigured() {
        let config = RegsyncConfig::default();
        assert!(!config.api.is_configured());
        assert!(!config.projects.is_configured());
        assert!(config.require_api().is_err());
        assert!(matches!(
            config.require_projects(),
            Err(ConfigError::MissingSection {
                section: "projects",
                ..
            })
        ));
    }

    #[test]
    fn missing_api_names_the_variables_to_set() {
        let err = RegsyncConfig::default().require_api().unwrap_err();
        assert_eq!(
            err.to_string(),
            "[api] is not configured; set REGSYNC_API__USERNAME and REGSYNC_API__PASSWORD"
        );
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: RegsyncConfig = RegsyncConfig::figment().extract()?;
            assert_eq!(config.pacing.poll_attempts, 8);
            assert_eq!(config.scenario.fixtures.len(), 3);
            Ok(())
        });
    }
}
