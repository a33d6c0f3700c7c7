use std::io::Write;

use super::error::RecordError;
use super::format::ResultType;

/// Samples per `ptb64` block; a writer may only finish on a block boundary.
pub const PTB64_BLOCK_SAMPLES: usize = 64;

/// Bytes per `ptb64` sample (one bit for each of 64 shots).
pub const PTB64_SAMPLE_BYTES: usize = 8;

/// Single-stream writer that frames one shot's (or shot group's) samples.
///
/// Each implementation owns its sink `W` until [`finish`](RecordWriter::finish)
/// writes the trailing framing and hands the sink back.
pub trait RecordWriter<W: Write> {
    /// Start a new named section of results.
    fn begin_result_type(&mut self, result_type: ResultType) -> Result<(), RecordError> {
        let _ = result_type;
        Ok(())
    }

    /// Append one sample.
    fn write_bit(&mut self, bit: bool) -> Result<(), RecordError>;

    /// Append `8 * data.len()` samples, least-significant bit of each byte first.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), RecordError> {
        for byte in data {
            for i in 0..8 {
                self.write_bit((byte >> i) & 1 == 1)?;
            }
        }
        Ok(())
    }

    /// Write trailing framing, flush, and return the sink.
    fn finish(self: Box<Self>) -> Result<W, RecordError>;

    /// Return the sink without trailing framing. Samples still held back by the
    /// writer (a partial `b8` byte, an unfilled `ptb64` block) are dropped.
    fn abandon(self: Box<Self>) -> W;
}

// =============================================================================
// 01
// =============================================================================

/// `01` format: one ASCII digit per sample.
pub struct TextWriter<W: Write> {
    out: W,
}

impl<W: Write> TextWriter<W> {
    /// Wrap `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RecordWriter<W> for TextWriter<W> {
    fn write_bit(&mut self, bit: bool) -> Result<(), RecordError> {
        self.out.write_all(if bit { b"1" } else { b"0" })?;
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), RecordError> {
        let mut text = Vec::with_capacity(data.len() * 8);
        for byte in data {
            text.extend((0..8).map(|i| b'0' + ((byte >> i) & 1)));
        }
        self.out.write_all(&text)?;
        Ok(())
    }

    fn abandon(self: Box<Self>) -> W {
        self.out
    }

    fn finish(mut self: Box<Self>) -> Result<W, RecordError> {
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(self.out)
    }
}

// =============================================================================
// b8
// =============================================================================

/// `b8` format: samples packed eight to a byte.
pub struct B8Writer<W: Write> {
    out: W,
    pending: u8,
    pending_bits: u8,
}

impl<W: Write> B8Writer<W> {
    /// Wrap `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: 0,
            pending_bits: 0,
        }
    }
}

impl<W: Write> RecordWriter<W> for B8Writer<W> {
    fn write_bit(&mut self, bit: bool) -> Result<(), RecordError> {
        self.pending |= (bit as u8) << self.pending_bits;
        self.pending_bits += 1;
        if self.pending_bits == 8 {
            self.out.write_all(&[self.pending])?;
            self.pending = 0;
            self.pending_bits = 0;
        }
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), RecordError> {
        if self.pending_bits != 0 {
            // Off a byte boundary; fall back to shifting bit by bit.
            for byte in data {
                for i in 0..8 {
                    self.write_bit((byte >> i) & 1 == 1)?;
                }
            }
            return Ok(());
        }
        self.out.write_all(data)?;
        Ok(())
    }

    fn abandon(self: Box<Self>) -> W {
        self.out
    }

    fn finish(mut self: Box<Self>) -> Result<W, RecordError> {
        if self.pending_bits != 0 {
            self.out.write_all(&[self.pending])?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

// =============================================================================
// r8
// =============================================================================

/// `r8` format: for every set sample, one byte counting the zeros before it.
///
/// A byte of `0xFF` stands for 255 zeros with no set sample after them. The final
/// byte counts trailing zeros as if a set sample followed the last one.
pub struct R8Writer<W: Write> {
    out: W,
    run: u8,
}

impl<W: Write> R8Writer<W> {
    /// Wrap `out`.
    pub fn new(out: W) -> Self {
        Self { out, run: 0 }
    }
}

impl<W: Write> RecordWriter<W> for R8Writer<W> {
    fn write_bit(&mut self, bit: bool) -> Result<(), RecordError> {
        if bit {
            self.out.write_all(&[self.run])?;
            self.run = 0;
        } else {
            self.run += 1;
            if self.run == u8::MAX {
                self.out.write_all(&[u8::MAX])?;
                self.run = 0;
            }
        }
        Ok(())
    }

    fn abandon(self: Box<Self>) -> W {
        self.out
    }

    fn finish(mut self: Box<Self>) -> Result<W, RecordError> {
        self.out.write_all(&[self.run])?;
        self.out.flush()?;
        Ok(self.out)
    }
}

// =============================================================================
// hits
// =============================================================================

/// `hits` format: comma-separated indices of set samples.
pub struct HitsWriter<W: Write> {
    out: W,
    position: u64,
    first: bool,
}

impl<W: Write> HitsWriter<W> {
    /// Wrap `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            position: 0,
            first: true,
        }
    }
}

impl<W: Write> RecordWriter<W> for HitsWriter<W> {
    fn write_bit(&mut self, bit: bool) -> Result<(), RecordError> {
        if bit {
            if self.first {
                self.first = false;
            } else {
                self.out.write_all(b",")?;
            }
            write!(self.out, "{}", self.position)?;
        }
        self.position += 1;
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), RecordError> {
        for byte in data {
            if *byte == 0 {
                self.position += 8;
                continue;
            }
            for i in 0..8 {
                self.write_bit((byte >> i) & 1 == 1)?;
            }
        }
        Ok(())
    }

    fn abandon(self: Box<Self>) -> W {
        self.out
    }

    fn finish(mut self: Box<Self>) -> Result<W, RecordError> {
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(self.out)
    }
}

// =============================================================================
// dets
// =============================================================================

/// `dets` format: `shot` followed by ` <type><index>` for each set sample.
///
/// The index restarts at zero whenever a new result type begins.
pub struct DetsWriter<W: Write> {
    out: W,
    result_type: ResultType,
    position: u64,
    started: bool,
}

impl<W: Write> DetsWriter<W> {
    /// Wrap `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            result_type: ResultType::Measurement,
            position: 0,
            started: false,
        }
    }

    fn start(&mut self) -> Result<(), RecordError> {
        if !self.started {
            self.out.write_all(b"shot")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> RecordWriter<W> for DetsWriter<W> {
    fn begin_result_type(&mut self, result_type: ResultType) -> Result<(), RecordError> {
        self.start()?;
        self.result_type = result_type;
        self.position = 0;
        Ok(())
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), RecordError> {
        self.start()?;
        if bit {
            write!(self.out, " {}{}", self.result_type.as_char(), self.position)?;
        }
        self.position += 1;
        Ok(())
    }

    fn abandon(self: Box<Self>) -> W {
        self.out
    }

    fn finish(mut self: Box<Self>) -> Result<W, RecordError> {
        self.start()?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(self.out)
    }
}

// =============================================================================
// ptb64
// =============================================================================

/// `ptb64` format: each sample is 8 bytes holding 64 shots.
///
/// Samples are buffered and emitted in blocks of [`PTB64_BLOCK_SAMPLES`], so the
/// writer must be finished on a block boundary.
pub struct Ptb64Writer<W: Write> {
    out: W,
    block: Vec<u8>,
    recorded: usize,
}

impl<W: Write> Ptb64Writer<W> {
    /// Wrap `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            block: Vec::with_capacity(PTB64_BLOCK_SAMPLES * PTB64_SAMPLE_BYTES),
            recorded: 0,
        }
    }
}

impl<W: Write> RecordWriter<W> for Ptb64Writer<W> {
    fn write_bit(&mut self, _bit: bool) -> Result<(), RecordError> {
        Err(RecordError::Unsupported(
            "ptb64 records 64 shots per sample; use write_bytes with 8-byte samples".to_string(),
        ))
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), RecordError> {
        if data.len() % PTB64_SAMPLE_BYTES != 0 {
            return Err(RecordError::Unsupported(format!(
                "ptb64 samples are {} bytes, got {} bytes",
                PTB64_SAMPLE_BYTES,
                data.len()
            )));
        }
        for sample in data.chunks_exact(PTB64_SAMPLE_BYTES) {
            self.block.extend_from_slice(sample);
            self.recorded += 1;
            if self.recorded == PTB64_BLOCK_SAMPLES {
                self.out.write_all(&self.block)?;
                self.block.clear();
                self.recorded = 0;
            }
        }
        Ok(())
    }

    fn abandon(self: Box<Self>) -> W {
        self.out
    }

    fn finish(mut self: Box<Self>) -> Result<W, RecordError> {
        if self.recorded != 0 {
            return Err(RecordError::IncompleteBlock {
                recorded: self.recorded,
                required: PTB64_BLOCK_SAMPLES,
            });
        }
        self.out.flush()?;
        Ok(self.out)
    }
}
