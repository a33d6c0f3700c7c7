/// Errors raised by a single-stream record writer
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// I/O error on the writer's sink
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The format cannot express the requested operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// The writer was finished with a partially filled block
    #[error("Incomplete block: {recorded} of {required} samples recorded")]
    IncompleteBlock {
        /// Samples present in the trailing block
        recorded: usize,
        /// Samples a complete block needs
        required: usize,
    },

    /// A format name could not be parsed
    #[error("Unknown sample format: {0}")]
    UnknownFormat(String),

    /// A result type character could not be parsed
    #[error("Unknown result type: {0:?}")]
    UnknownResultType(char),
}
