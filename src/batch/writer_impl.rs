use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::record::{RecordWriter, ResultType, SampleFormat, SampleLayout};
use crate::spill::{stream_copy, SpillFile, SpillSource, TempDirSource};
use crate::table::BitTable;

use super::config::BatchWriterConfig;
use super::error::BatchError;
use super::stats::BatchStats;

/// Where one record writer's bytes go.
///
/// Writer 0 frames straight into the borrowed output; every other writer frames
/// into its own spill file.
enum Sink<'a, O: Write> {
    Output(&'a mut O),
    Spill(BufWriter<File>),
}

impl<O: Write> Write for Sink<'_, O> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Output(out) => out.write(buf),
            Sink::Spill(spill) => spill.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::Output(out) => out.write_all(buf),
            Sink::Spill(spill) => spill.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Output(out) => out.flush(),
            Sink::Spill(spill) => spill.flush(),
        }
    }
}

type BoxedWriter<'a, O> = Box<dyn RecordWriter<Sink<'a, O>> + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Finalized,
}

/// Fans samples out to one record writer per stream and concatenates the streams.
///
/// Writer 0 writes directly into the borrowed output. Writers `1..N` write into
/// spill files, which [`write_end`](Self::write_end) appends to the output in writer
/// order before deleting them. Only one stream's worth of encoded data ever has to
/// fit in the output's buffers at a time.
///
/// The number of writers depends on the layout of the chosen [`SampleFormat`]:
/// one per shot for serial formats, one per 64 shots for `ptb64`.
///
/// # Example
///
/// ```rust
/// use shotfan::batch::BatchWriter;
/// use shotfan::record::SampleFormat;
/// use shotfan::table::pack_bits;
///
/// let mut out = Vec::new();
/// let mut writer = BatchWriter::new(&mut out, 2, SampleFormat::Text01)?;
/// writer.batch_write_bit(&pack_bits(&[true, false]))?;
/// writer.batch_write_bit(&pack_bits(&[false, true]))?;
/// writer.write_end()?;
/// drop(writer);
///
/// assert_eq!(out, b"10\n01\n");
/// # Ok::<(), shotfan::batch::BatchError>(())
/// ```
pub struct BatchWriter<'a, O: Write + 'a> {
    format: SampleFormat,
    layout: SampleLayout,
    num_shots: usize,
    writers: Vec<BoxedWriter<'a, O>>,
    spills: Vec<SpillFile>,
    copy_buffer_size: usize,
    samples_written: u64,
    state: State,
}

impl<'a, O: Write + 'a> BatchWriter<'a, O> {
    /// Create a batch writer with default configuration.
    ///
    /// # Arguments
    ///
    /// * `out` - Output channel; receives writer 0 directly and the spills at the end
    /// * `num_shots` - Number of shots (positive; a multiple of 64 for `ptb64`)
    /// * `format` - Per-stream encoding
    pub fn new(out: &'a mut O, num_shots: usize, format: SampleFormat) -> Result<Self, BatchError> {
        Self::with_config(out, num_shots, format, &BatchWriterConfig::default())
    }

    /// Create a batch writer with custom configuration.
    ///
    /// The configuration is validated first, whether it was loaded from TOML or
    /// built in code.
    pub fn with_config(
        out: &'a mut O,
        num_shots: usize,
        format: SampleFormat,
        config: &BatchWriterConfig,
    ) -> Result<Self, BatchError> {
        let mut source = TempDirSource::new(config.spill_dir.clone(), config.spill_prefix.clone());
        Self::with_spill_source(out, num_shots, format, config, &mut source)
    }

    /// Create a batch writer whose spills come from `source`.
    ///
    /// Either every spill is allocated, or construction fails with
    /// [`BatchError::ResourceExhausted`] after releasing the ones already made.
    pub fn with_spill_source<S: SpillSource + ?Sized>(
        out: &'a mut O,
        num_shots: usize,
        format: SampleFormat,
        config: &BatchWriterConfig,
        source: &mut S,
    ) -> Result<Self, BatchError> {
        config.validate()?;
        let layout = format.layout();
        let num_writers = writer_count(num_shots, layout)?;

        let mut spills = Vec::with_capacity(num_writers - 1);
        let mut writers: Vec<BoxedWriter<'a, O>> = Vec::with_capacity(num_writers);
        writers.push(format.writer(Sink::Output(out)));

        for index in 1..num_writers {
            let allocated = source
                .allocate(index)
                .and_then(|spill| spill.writer(config.spill_buffer_size).map(|w| (spill, w)));
            match allocated {
                Ok((spill, sink)) => {
                    spills.push(spill);
                    writers.push(format.writer(Sink::Spill(sink)));
                }
                Err(err) => {
                    discard_writers(writers);
                    let _ = release_spills(spills);
                    return Err(BatchError::ResourceExhausted { index, source: err });
                }
            }
        }

        log::debug!(
            "Opened batch writer: {} shots, {} writer(s), {} spill file(s), format {} ({:?})",
            num_shots,
            num_writers,
            spills.len(),
            format,
            layout
        );

        Ok(Self {
            format,
            layout,
            num_shots,
            writers,
            spills,
            copy_buffer_size: config.copy_buffer_size,
            samples_written: 0,
            state: State::Open,
        })
    }

    /// Per-stream encoding.
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Fan-out layout derived from the format.
    pub fn layout(&self) -> SampleLayout {
        self.layout
    }

    /// Number of shots.
    pub fn num_shots(&self) -> usize {
        self.num_shots
    }

    /// Number of record writers.
    pub fn num_writers(&self) -> usize {
        self.num_shots / self.layout.shots_per_writer()
    }

    /// Number of spill files currently held.
    pub fn spill_count(&self) -> usize {
        self.spills.len()
    }

    /// Samples appended to every writer so far.
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Whether `write_end` has been called.
    pub fn is_finalized(&self) -> bool {
        self.state == State::Finalized
    }

    fn ensure_open(&self) -> Result<(), BatchError> {
        match self.state {
            State::Open => Ok(()),
            State::Finalized => Err(BatchError::Finalized),
        }
    }

    /// Start a new section of results in every writer, in writer order.
    pub fn begin_result_type(&mut self, result_type: ResultType) -> Result<(), BatchError> {
        self.ensure_open()?;
        for writer in &mut self.writers {
            writer.begin_result_type(result_type)?;
        }
        Ok(())
    }

    /// Append one sample to every writer.
    ///
    /// `row` holds one bit per shot, packed least-significant bit first (see
    /// [`pack_bits`](crate::table::pack_bits) and [`BitTable::row`]).
    ///
    /// Under `ptb64` each writer receives the 8 bytes covering its 64 shots
    /// verbatim; otherwise writer `k` receives bit `k`.
    pub fn batch_write_bit(&mut self, row: &[u8]) -> Result<(), BatchError> {
        self.ensure_open()?;
        let needed = self.num_shots.div_ceil(8);
        if row.len() < needed {
            return Err(BatchError::PreconditionViolation(format!(
                "row has {} bytes but {} shots need {}",
                row.len(),
                self.num_shots,
                needed
            )));
        }

        match self.layout {
            SampleLayout::TransposedPacked64 => {
                for (writer, sample) in self.writers.iter_mut().zip(row.chunks_exact(8)) {
                    writer.write_bytes(sample)?;
                }
            }
            SampleLayout::Serial => {
                for (k, writer) in self.writers.iter_mut().enumerate() {
                    writer.write_bit((row[k / 8] >> (k % 8)) & 1 == 1)?;
                }
            }
        }

        self.samples_written += 1;
        Ok(())
    }

    /// Append `num_major_u64 * 64` samples to every writer from `table`.
    ///
    /// The table's minor index is the shot and its major index is the sample; its
    /// first `num_major_u64 * 64` major rows are consumed.
    ///
    /// Serial formats transpose the table and hand each writer one contiguous run.
    /// `ptb64` needs no transpose: writer `k` receives the 8 bytes at
    /// `8k + stride * m` for every sample `m`, where `stride` is
    /// [`BitTable::num_minor_u8_padded`].
    pub fn batch_write_bytes(
        &mut self,
        table: &BitTable,
        num_major_u64: usize,
    ) -> Result<(), BatchError> {
        self.ensure_open()?;
        if num_major_u64 == 0 {
            return Ok(());
        }
        if table.num_minor() < self.num_shots {
            return Err(BatchError::PreconditionViolation(format!(
                "table has {} minor columns but there are {} shots",
                table.num_minor(),
                self.num_shots
            )));
        }
        if num_major_u64 > table.num_major_u64_padded() {
            return Err(BatchError::PreconditionViolation(format!(
                "requested {} blocks of 64 samples but table holds {}",
                num_major_u64,
                table.num_major_u64_padded()
            )));
        }

        let num_samples = num_major_u64 * 64;
        match self.layout {
            SampleLayout::TransposedPacked64 => {
                let stride = table.num_minor_u8_padded();
                let bytes = table.as_bytes();
                let mut run = Vec::with_capacity(num_samples * 8);
                for (k, writer) in self.writers.iter_mut().enumerate() {
                    run.clear();
                    for m in 0..num_samples {
                        let p = k * 8 + stride * m;
                        run.extend_from_slice(&bytes[p..p + 8]);
                    }
                    writer.write_bytes(&run)?;
                }
            }
            SampleLayout::Serial => {
                let transposed = table.transposed();
                let run_len = num_major_u64 * 8;
                for (k, writer) in self.writers.iter_mut().enumerate() {
                    writer.write_bytes(&transposed.row(k)[..run_len])?;
                }
            }
        }

        self.samples_written += num_samples as u64;
        Ok(())
    }

    /// Finish every writer, append the spills to the output in writer order, and
    /// release them.
    ///
    /// The writer is finalized even if this fails; later calls return
    /// [`BatchError::Finalized`].
    pub fn write_end(&mut self) -> Result<BatchStats, BatchError> {
        self.ensure_open()?;
        self.state = State::Finalized;

        let writers = std::mem::take(&mut self.writers);
        let spills = std::mem::take(&mut self.spills);
        let spill_files = spills.len();

        let concatenated = finish_and_concatenate(writers, &spills, self.copy_buffer_size);
        let released = release_spills(spills);
        let bytes_concatenated = concatenated?;
        released?;

        log::debug!(
            "Finalized batch writer: {} bytes concatenated from {} spill file(s)",
            bytes_concatenated,
            spill_files
        );

        Ok(BatchStats {
            num_shots: self.num_shots,
            num_writers: self.num_writers(),
            spill_files,
            samples_per_writer: self.samples_written,
            bytes_concatenated,
        })
    }
}

impl<'a, O: Write + 'a> Drop for BatchWriter<'a, O> {
    fn drop(&mut self) {
        if self.state == State::Open {
            log::warn!(
                "BatchWriter dropped without calling write_end(); discarding {} spilled writer(s)",
                self.spills.len()
            );
        }
        // Close the spill handles before deleting the files underneath them.
        discard_writers(std::mem::take(&mut self.writers));
        let _ = release_spills(std::mem::take(&mut self.spills));
    }
}

/// Writers needed for `num_shots` under `layout`.
fn writer_count(num_shots: usize, layout: SampleLayout) -> Result<usize, BatchError> {
    let per_writer = layout.shots_per_writer();
    if num_shots == 0 {
        return Err(BatchError::PreconditionViolation(
            "at least one shot is required".to_string(),
        ));
    }
    if num_shots % per_writer != 0 {
        return Err(BatchError::PreconditionViolation(format!(
            "{} shots is not a multiple of {} as the packed layout requires",
            num_shots, per_writer
        )));
    }
    Ok(num_shots / per_writer)
}

/// Finish all writers, then stream every spill onto the output.
fn finish_and_concatenate<O: Write>(
    writers: Vec<BoxedWriter<'_, O>>,
    spills: &[SpillFile],
    copy_buffer_size: usize,
) -> Result<u64, BatchError> {
    let mut output = None;
    for writer in writers {
        match writer.finish()? {
            Sink::Output(out) => output = Some(out),
            Sink::Spill(mut spill) => spill.flush()?,
        }
    }
    let out = output.ok_or_else(|| {
        BatchError::PreconditionViolation("writer 0 did not return the output channel".to_string())
    })?;

    let mut total = 0u64;
    for spill in spills {
        total += stream_copy(spill.reader()?, out, copy_buffer_size)?;
    }
    out.flush()?;
    Ok(total)
}

/// Close writers without framing or flushing; their spills are about to be deleted.
fn discard_writers<O: Write>(writers: Vec<BoxedWriter<'_, O>>) {
    for writer in writers {
        if let Sink::Spill(spill) = writer.abandon() {
            let (_file, _unflushed) = spill.into_parts();
        }
    }
}

/// Release every spill, logging failures. Returns the first failure.
fn release_spills(spills: Vec<SpillFile>) -> io::Result<()> {
    let mut first_error = None;
    for spill in spills {
        let path = spill.path().to_path_buf();
        if let Err(e) = spill.release() {
            log::warn!("Failed to release spill file {}: {}", path.display(), e);
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}
