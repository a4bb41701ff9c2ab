//! Upload configuration

use serde::Deserialize;

use super::error::ValidationError;

const KIB: usize = 1024;
const MIB: usize = 1024 * 1024;

/// PDF upload configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl UploadConfig {
    /// Validate upload configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_bytes < KIB || self.max_bytes > 50 * MIB {
            return Err(ValidationError::InvalidUploadLimit);
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

fn default_max_bytes() -> usize {
    10 * MIB
}
