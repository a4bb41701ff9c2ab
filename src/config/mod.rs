//! Typed configuration, loaded from the environment.
//!
//! A `.env` file is read first when present, then variables with the
//! `PEAKPATH` prefix are deserialized into the section structs below.
//! Nested fields use `__` as the separator:
//!
//! - `PEAKPATH__SERVER__PORT=3001` -> `server.port`
//! - `PEAKPATH__AI__ANTHROPIC_API_KEY=...` -> `ai.anthropic_api_key`
//!
//! Every section carries serde defaults, so a bare environment still loads;
//! `validate()` is what decides whether the result is actually runnable.

mod ai;
mod database;
mod error;
mod server;
mod upload;

pub use ai::AiConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use upload::UploadConfig;

use serde::Deserialize;

/// Root configuration, one field per section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub upload: UploadConfig,
}

impl AppConfig {
    /// Reads `.env` (when present) and the `PEAKPATH__`-prefixed
    /// environment into a typed config.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PEAKPATH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validates every section; the first failing section wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.ai.validate()?;
        self.upload.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
