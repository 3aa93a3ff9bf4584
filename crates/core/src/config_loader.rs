use crate::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    const ENV_PREFIX: &'static str = "STOCK_METRICS_";

    /// Loads configuration by layering defaults, TOML, environment variables, and JSON.
    ///
    /// Missing files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a present configuration source cannot be parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads configuration from a specific TOML file instead of `config/Config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if a present configuration source cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let config: AppConfig = Self::base(path.as_ref())
            .merge(Self::env())
            .join(Json::file("config/Config.json"))
            .extract()
            .context("Failed to load configuration")?;

        Ok(config)
    }

    /// Loads configuration with a profile overlay (`Config.{profile}.toml` next to `path`).
    ///
    /// # Errors
    ///
    /// Returns an error if a present configuration source cannot be parsed.
    pub fn load_with_profile(path: impl AsRef<Path>, profile: &str) -> Result<AppConfig> {
        let path = path.as_ref();
        let profile_file = path.with_file_name(format!("Config.{profile}.toml"));

        let config: AppConfig = Self::base(path)
            .merge(Toml::file(profile_file))
            .merge(Self::env())
            .join(Json::file("config/Config.json"))
            .extract()
            .with_context(|| format!("Failed to load configuration profile '{profile}'"))?;

        Ok(config)
    }

    fn base(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::file(path))
    }

    fn env() -> Env {
        Env::prefixed(Self::ENV_PREFIX).split("__")
    }
}
