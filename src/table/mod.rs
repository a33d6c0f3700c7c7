//! # Bit Table Module
//!
//! Dense boolean matrices used as the input of bulk fan-out.
//!
//! ## Layout
//!
//! A [`BitTable`] is stored as `num_major_u64_padded() * 64` major rows, each
//! `num_minor_u8_padded()` bytes wide. The minor index is the shot, the major index
//! is the sample:
//!
//! ```text
//! byte offset of (major m, minor s) = m * num_minor_u8_padded() + s / 8
//! bit within that byte              = s % 8            (least significant first)
//! ```
//!
//! Both dimensions are padded up to whole 64-bit words so that every row can be read
//! as little-endian `u64` words and the table can be transposed in 64x64 blocks.
//! The packed fan-out path copies bytes straight out of this layout, so it is a
//! binary contract rather than an implementation detail.

mod bit_table;
mod transpose;


pub use bit_table::{pack_bits, BitTable};
pub use transpose::transpose_64x64;
