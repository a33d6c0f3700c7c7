//! # Record Writer Module
//!
//! Single-stream writers that frame the samples of one shot (or, for `ptb64`, one
//! group of 64 shots). The batch writer owns one of these per stream and never looks
//! inside the framing they produce.
//!
//! | format  | layout               | encoding                                        |
//! |---------|----------------------|-------------------------------------------------|
//! | `01`    | serial               | `0`/`1` characters, newline at end              |
//! | `b8`    | serial               | 8 samples per byte, LSB first                   |
//! | `r8`    | serial               | zero run lengths, one byte per set sample       |
//! | `hits`  | serial               | comma-separated indices of set samples          |
//! | `dets`  | serial               | `shot M0 D3 L1` style typed indices             |
//! | `ptb64` | transposed packed 64 | 8 bytes per sample, 64-sample blocks verbatim   |

mod error;
mod format;
mod writers;

#[cfg(test)]
mod tests;

pub use error::RecordError;
pub use format::{ResultType, SampleFormat, SampleLayout};
pub use writers::{
    B8Writer, DetsWriter, HitsWriter, Ptb64Writer, R8Writer, RecordWriter, TextWriter,
    PTB64_BLOCK_SAMPLES, PTB64_SAMPLE_BYTES,
};
