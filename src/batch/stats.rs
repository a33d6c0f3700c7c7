use std::fmt;

/// Statistics from a completed batch write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchStats {
    /// Number of shots fanned out
    pub num_shots: usize,
    /// Number of record writers (streams)
    pub num_writers: usize,
    /// Number of spill files concatenated onto the output
    pub spill_files: usize,
    /// Samples appended to every writer
    pub samples_per_writer: u64,
    /// Bytes copied from spill files onto the output
    pub bytes_concatenated: u64,
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} samples to each of {} writer(s) ({} shots), concatenated {} bytes from {} spill file(s)",
            self.samples_per_writer,
            self.num_writers,
            self.num_shots,
            self.bytes_concatenated,
            self.spill_files
        )
    }
}
