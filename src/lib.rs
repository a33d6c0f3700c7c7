//! # shotfan - Fan-out Writer for Per-Shot Sample Streams
//!
//! `shotfan` takes boolean samples for many shots at once and writes every shot's
//! stream through its own record writer, then lays the framed streams end to end in
//! a single output.
//!
//! ## Key Features
//!
//! - **Bounded memory**: only the first stream writes into the output as it goes;
//!   every other stream spills to its own temp file and is appended at the end.
//!
//! - **Bulk input**: a whole [`BitTable`](table::BitTable) of samples can be fanned
//!   out in one call. Serial formats transpose it in 64x64 blocks; the packed
//!   `ptb64` format copies it byte for byte.
//!
//! - **Pluggable framing**: six record formats (`01`, `b8`, `r8`, `hits`, `dets`,
//!   `ptb64`) behind one [`RecordWriter`](record::RecordWriter) trait.
//!
//! - **Owned cleanup**: spill files are deleted exactly once, whether the write
//!   finishes, fails, or is abandoned.
//!
//! ## Quick Start
//!
//! ```rust
//! use shotfan::batch::BatchWriter;
//! use shotfan::record::{ResultType, SampleFormat};
//! use shotfan::table::{pack_bits, BitTable};
//!
//! let mut out = Vec::new();
//! let mut writer = BatchWriter::new(&mut out, 3, SampleFormat::Dets)?;
//!
//! // One sample per call...
//! writer.begin_result_type(ResultType::Detector)?;
//! writer.batch_write_bit(&pack_bits(&[true, false, true]))?;
//!
//! // ...or 64 samples per block of a bit table (major = sample, minor = shot).
//! let table = BitTable::from_fn(64, 3, |sample, shot| sample == 1 && shot == 1);
//! writer.batch_write_bytes(&table, 1)?;
//!
//! let stats = writer.write_end()?;
//! drop(writer);
//!
//! assert_eq!(stats.num_writers, 3);
//! assert_eq!(out, b"shot D0\nshot D2\nshot D0\n");
//! # Ok::<(), shotfan::batch::BatchError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`batch`]: the fan-out writer, its configuration and statistics
//! - [`record`]: single-stream record writers and format names
//! - [`spill`]: temp-file spills and bounded stream copy
//! - [`table`]: padded bit tables and the 64x64 block transpose

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod batch;
pub mod record;
pub mod spill;
pub mod table;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::batch::{BatchError, BatchStats, BatchWriter, BatchWriterConfig};
    pub use crate::record::{RecordWriter, ResultType, SampleFormat, SampleLayout};
    pub use crate::table::{pack_bits, BitTable};
}
