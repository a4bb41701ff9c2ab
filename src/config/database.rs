//! SQLite connection settings.

use serde::Deserialize;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL, `sqlite://peakpath.db` or `sqlite::memory:`.
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Create the database file on first run.
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.url.starts_with("sqlite:") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 || self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            create_if_missing: default_create_if_missing(),
        }
    }
}

fn default_url() -> String {
    "sqlite://peakpath.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_create_if_missing() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_url_validates() {
        let config = DatabaseConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.create_if_missing);
    }

    #[test]
    fn accepts_the_in_memory_url() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn only_sqlite_urls_are_allowed() {
        let config = DatabaseConfig {
            url: "postgresql://localhost/peakpath".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        ));
    }

    #[test]
    fn pool_size_bounds_are_enforced() {
        for size in [0, MAX_POOL_SIZE + 1] {
            let config = DatabaseConfig {
                max_connections: size,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }
}
