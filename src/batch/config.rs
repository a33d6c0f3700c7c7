//! TOML configuration for the batch writer.
//!
//! ```toml
//! # shotfan.toml
//! [batch]
//! spill_dir = "/scratch/shotfan"
//! spill_prefix = "run42-"
//! spill_buffer_size = 131072
//! copy_buffer_size = 1048576
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::spill::{DEFAULT_SPILL_PREFIX, STREAM_COPY_BUFFER_SIZE};

use super::error::ConfigError;

/// Default `BufWriter` capacity for each spill.
pub const DEFAULT_SPILL_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for [`BatchWriter`](super::BatchWriter)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchWriterConfig {
    /// Directory for spill files (None = system temp directory)
    pub spill_dir: Option<PathBuf>,

    /// File name prefix for spill files
    pub spill_prefix: String,

    /// Write buffer size for each spill file, in bytes
    pub spill_buffer_size: usize,

    /// Buffer size used when concatenating spills onto the output, in bytes
    pub copy_buffer_size: usize,
}

impl Default for BatchWriterConfig {
    fn default() -> Self {
        Self {
            spill_dir: None,
            spill_prefix: DEFAULT_SPILL_PREFIX.to_string(),
            spill_buffer_size: DEFAULT_SPILL_BUFFER_SIZE,
            copy_buffer_size: STREAM_COPY_BUFFER_SIZE,
        }
    }
}

/// Root of a config file; batch settings live under `[batch]`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    batch: BatchWriterConfig,
}

impl BatchWriterConfig {
    /// Set the spill directory.
    pub fn with_spill_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.spill_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.batch.validate()?;
        Ok(file.batch)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spill_buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "spill_buffer_size must be greater than zero".to_string(),
            ));
        }
        if self.copy_buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "copy_buffer_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
