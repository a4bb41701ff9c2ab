//! Configuration failure types.

use thiserror::Error;

/// Loading failed before the app could start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("configuration invalid: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded value that cannot be run with.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("required setting missing: {0}")]
    MissingRequired(&'static str),

    #[error("port must be a non-zero, bindable value")]
    InvalidPort,

    #[error("request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("database URL must use the sqlite scheme")]
    InvalidDatabaseUrl,

    #[error("connection pool size out of range")]
    PoolSizeTooLarge,

    #[error("Anthropic API keys start with sk-ant-")]
    InvalidAnthropicKey,

    #[error("upload size limit must be between 1 KiB and 50 MiB")]
    InvalidUploadLimit,

    #[error("rate limits must be greater than zero")]
    InvalidRateLimit,
}
