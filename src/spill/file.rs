use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Default buffer size for copying spill content with bounded memory.
pub const STREAM_COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Temp file holding one stream's encoded data until concatenation.
///
/// The file is deleted when the handle is released or dropped.
#[derive(Debug)]
pub struct SpillFile {
    temp_file: NamedTempFile,
}

impl SpillFile {
    /// Create a spill in the system temp directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            temp_file: NamedTempFile::new()?,
        })
    }

    /// Create a spill inside `dir`, with a file name starting with `prefix`.
    pub fn new_in<P: AsRef<Path>>(dir: P, prefix: &str) -> io::Result<Self> {
        let temp_file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(".spill")
            .tempfile_in(dir)?;
        Ok(Self { temp_file })
    }

    /// Wrap an already-created temp file.
    pub fn from_temp_file(temp_file: NamedTempFile) -> Self {
        Self { temp_file }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        self.temp_file.path()
    }

    /// Open an independent buffered write handle positioned at the start.
    pub fn writer(&self, capacity: usize) -> io::Result<BufWriter<File>> {
        let file = self.temp_file.reopen()?;
        Ok(BufWriter::with_capacity(capacity, file))
    }

    /// Current size of the backing file in bytes.
    ///
    /// Data still sitting in a writer's buffer is not counted.
    pub fn size(&self) -> io::Result<u64> {
        self.temp_file.as_file().metadata().map(|m| m.len())
    }

    /// Open a buffered reader over the whole file, from the first byte.
    pub fn reader(&self) -> io::Result<BufReader<File>> {
        let mut file = self.temp_file.reopen()?;
        file.seek(SeekFrom::Start(0))?;
        Ok(BufReader::new(file))
    }

    /// Delete the backing file, reporting any failure.
    pub fn release(self) -> io::Result<()> {
        self.temp_file.close()
    }
}

/// Copy everything from `reader` into `writer` through a `buffer_size` buffer.
///
/// Returns the number of bytes copied.
pub fn stream_copy<R: Read, W: Write + ?Sized>(
    mut reader: R,
    writer: &mut W,
    buffer_size: usize,
) -> io::Result<u64> {
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut total_written = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..bytes_read])?;
        total_written += bytes_read as u64;
    }

    Ok(total_written)
}
