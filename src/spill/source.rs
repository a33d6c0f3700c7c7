use std::io;
use std::path::PathBuf;

use super::file::SpillFile;

/// File name prefix used for spills unless configured otherwise.
pub const DEFAULT_SPILL_PREFIX: &str = "shotfan-spill-";

/// Allocator for spill files.
///
/// `index` is the writer slot (1-based, slot 0 never spills) the spill will back.
pub trait SpillSource {
    /// Create the spill for writer slot `index`.
    fn allocate(&mut self, index: usize) -> io::Result<SpillFile>;
}

impl<F> SpillSource for F
where
    F: FnMut(usize) -> io::Result<SpillFile>,
{
    fn allocate(&mut self, index: usize) -> io::Result<SpillFile> {
        self(index)
    }
}

/// Creates spills in a directory, or the system temp directory when none is set.
#[derive(Debug, Clone)]
pub struct TempDirSource {
    dir: Option<PathBuf>,
    prefix: String,
}

impl TempDirSource {
    /// Source for `dir` (system temp directory when `None`).
    pub fn new(dir: Option<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir,
            prefix: prefix.into(),
        }
    }
}

impl Default for TempDirSource {
    fn default() -> Self {
        Self::new(None, DEFAULT_SPILL_PREFIX)
    }
}

impl SpillSource for TempDirSource {
    fn allocate(&mut self, _index: usize) -> io::Result<SpillFile> {
        let dir = self.dir.clone().unwrap_or_else(std::env::temp_dir);
        SpillFile::new_in(dir, &self.prefix)
    }
}
