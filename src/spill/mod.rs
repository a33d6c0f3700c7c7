//! # Spill Module
//!
//! Temporary storage for every stream except the first. A [`SpillFile`] is a
//! move-only handle around a named temp file: the batch writer owns it from
//! allocation until [`SpillFile::release`] (or drop) deletes it, so each spill is
//! released exactly once on both the success and the error path.
//!
//! Allocation goes through a [`SpillSource`] so callers can choose where spills live
//! and tests can make allocation fail on demand.

mod file;
mod source;


pub use file::{stream_copy, SpillFile, STREAM_COPY_BUFFER_SIZE};
pub use source::{SpillSource, TempDirSource, DEFAULT_SPILL_PREFIX};
