//! # Batch Writer Module
//!
//! Fans one producer's samples out to N per-stream record writers and lays the
//! framed streams end to end in a single output.
//!
//! ## Design
//!
//! 1. **One stream in memory**: writer 0 frames directly into the output; writers
//!    `1..N` frame into temp-file spills that are appended at `write_end`.
//!
//! 2. **Two layouts**: serial formats get one writer per shot and bulk input is
//!    transposed into per-shot runs; `ptb64` gets one writer per 64 shots and bulk
//!    input is copied 8 bytes at a time with no transpose.
//!
//! 3. **Owned spills**: every spill is allocated at construction (all or nothing)
//!    and released exactly once, at `write_end` or on drop.
//!
//! ## Lifecycle
//!
//! ```text
//! Open --begin_result_type / batch_write_bit / batch_write_bytes--> Open
//! Open --write_end--> Finalized        (any later call: BatchError::Finalized)
//! Open --drop--> spills released, nothing concatenated
//! ```

mod config;
mod error;
mod stats;
mod writer_impl;


pub use config::{BatchWriterConfig, DEFAULT_SPILL_BUFFER_SIZE};
pub use error::{BatchError, ConfigError};
pub use stats::BatchStats;
pub use writer_impl::BatchWriter;
