use crate::record::RecordError;

/// Errors that can occur while fanning out or concatenating streams
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// A spill file could not be allocated during construction
    #[error("Failed to allocate spill file for writer {index}: {source}")]
    ResourceExhausted {
        /// Writer slot whose spill could not be created
        index: usize,
        /// Underlying allocation failure
        #[source]
        source: std::io::Error,
    },

    /// The caller broke an input contract (row too short, table too narrow, ...)
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// I/O error on the output channel or a spill file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from one of the per-stream record writers
    #[error("Record writer error: {0}")]
    RecordError(#[from] RecordError),

    /// The configuration failed validation
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// The writer was already finalized by `write_end`
    #[error("Batch writer already finalized")]
    Finalized,
}

/// Errors that can occur while loading a [`BatchWriterConfig`](super::BatchWriterConfig)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema
    #[error("Failed to parse TOML configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value parsed but is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
