//! Splitting a file into numbered parts.
//!
//! The input is read sequentially and written out as parts of exactly
//! `chunk_size` bytes, except the last which holds whatever remains:
//!
//! ```text
//! archive.zip (2600 bytes), chunk size 500
//!   Part_001.zippart  500 bytes
//!   Part_002.zippart  500 bytes
//!   ...
//!   Part_006.zippart  100 bytes
//! ```
//!
//! An empty input yields zero parts. This is not an error, but merging an
//! empty part set is, so callers that need a restorable result should check
//! [`SplitResult::part_count`].

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::naming::{PartName, PartNaming};
use crate::part::PartDescriptor;
use crate::progress::{BYTES_MIB, NoProgress, ProgressReporter};
use crate::{Error, IO_BUFFER_SIZE, Result};

/// Default chunk size: 15 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 15 * BYTES_MIB;

/// Options for [`Splitter`].
pub struct SplitOptions<'a> {
    chunk_size: u64,
    naming: PartNaming,
    progress: Option<Box<dyn ProgressReporter + 'a>>,
}

impl<'a> SplitOptions<'a> {
    /// Creates options with the default chunk size and naming.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum size of each part in bytes.
    ///
    /// Validated when the split runs; zero is rejected with
    /// [`Error::InvalidChunkSize`].
    pub fn chunk_size(mut self, bytes: u64) -> Self {
        self.chunk_size = bytes;
        self
    }

    /// Sets the part naming template.
    pub fn naming(mut self, naming: PartNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Sets the progress reporter.
    pub fn progress(mut self, reporter: impl ProgressReporter + 'a) -> Self {
        self.progress = Some(Box::new(reporter));
        self
    }

    /// Returns the configured chunk size.
    pub fn get_chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Returns the configured naming template.
    pub fn get_naming(&self) -> &PartNaming {
        &self.naming
    }
}

impl Default for SplitOptions<'_> {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            naming: PartNaming::default(),
            progress: None,
        }
    }
}

impl std::fmt::Debug for SplitOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitOptions")
            .field("chunk_size", &self.chunk_size)
            .field("naming", &self.naming)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Outcome of a successful split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    /// The parts written, in sequence order.
    pub parts: Vec<PartDescriptor>,
    /// Total bytes read from the input.
    pub bytes_read: u64,
}

impl SplitResult {
    /// Returns the number of parts written.
    pub fn part_count(&self) -> u32 {
        // parts.len() never exceeds u32::MAX: split fails with TooManyParts first
        self.parts.len() as u32
    }

    /// Returns the paths of all parts, in sequence order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.parts.iter().map(|p| p.path.as_path())
    }
}

/// Splits files into numbered parts.
///
/// # Example
///
/// ```rust,no_run
/// use zippart::{SplitOptions, Splitter};
///
/// let mut splitter = Splitter::new(SplitOptions::new().chunk_size(10 * 1024 * 1024));
/// let result = splitter.split("backup.zip", "outbox/")?;
/// println!("wrote {} parts", result.part_count());
/// # Ok::<(), zippart::Error>(())
/// ```
#[derive(Debug)]
pub struct Splitter<'a> {
    options: SplitOptions<'a>,
}

impl<'a> Splitter<'a> {
    /// Creates a splitter with the given options.
    pub fn new(options: SplitOptions<'a>) -> Self {
        Self { options }
    }

    /// Splits `input` into parts inside `output_dir`.
    ///
    /// `output_dir` is created (with parents) if it does not exist. Existing
    /// parts with the same numbers are overwritten; other files are left alone.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidChunkSize`] if the chunk size is zero
    /// - [`Error::NotFound`] if `input` does not exist or is not a file
    /// - [`Error::InputIsPart`] if `input` lives in `output_dir` under a part
    ///   file name, so writing the parts would overwrite it
    /// - [`Error::Io`] on any read or write failure; parts written before the
    ///   failure are left in place
    pub fn split(
        &mut self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<SplitResult> {
        let input = input.as_ref();
        let output_dir = output_dir.as_ref();
        let chunk_size = self.options.chunk_size;

        if chunk_size == 0 {
            return Err(Error::InvalidChunkSize(chunk_size));
        }
        let input_len = require_file(input)?;

        fs::create_dir_all(output_dir)
            .map_err(|e| Error::io("create output directory", output_dir, e))?;
        reject_input_as_part(input, output_dir, &self.options.naming)?;
        let file = File::open(input).map_err(|e| Error::io("open input", input, e))?;

        let mut no_progress = NoProgress;
        let progress: &mut dyn ProgressReporter = match self.options.progress.as_mut() {
            Some(reporter) => &mut **reporter,
            None => &mut no_progress,
        };
        progress.on_total(input_len);

        let result = split_stream(
            BufReader::with_capacity(IO_BUFFER_SIZE, file),
            input,
            output_dir,
            chunk_size,
            &self.options.naming,
            progress,
        )?;
        log::info!(
            "split {} into {} parts ({} bytes) in {}",
            input.display(),
            result.part_count(),
            result.bytes_read,
            output_dir.display()
        );
        Ok(result)
    }
}

/// Splits `input` into parts of at most `chunk_size` bytes inside `output_dir`.
///
/// Returns the number of parts written, which is zero for an empty input.
/// See [`Splitter::split`] for errors.
///
/// # Example
///
/// ```rust,no_run
/// let parts = zippart::split("archive.zip", "parts/", 15 * 1024 * 1024)?;
/// println!("{parts} parts");
/// # Ok::<(), zippart::Error>(())
/// ```
pub fn split(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    chunk_size: u64,
) -> Result<u32> {
    let mut splitter = Splitter::new(SplitOptions::new().chunk_size(chunk_size));
    Ok(splitter.split(input, output_dir)?.part_count())
}

/// Returns the length of `input`, or [`Error::NotFound`] unless it is a file.
fn require_file(input: &Path) -> Result<u64> {
    match fs::metadata(input) {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        Ok(_) => Err(Error::NotFound {
            what: "input file",
            path: input.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound {
            what: "input file",
            path: input.to_path_buf(),
        }),
        Err(e) => Err(Error::io("inspect input", input, e)),
    }
}

/// Fails with [`Error::InputIsPart`] if `input` is a part file inside `output_dir`.
///
/// Both paths are resolved first, so a symlinked input or a relative
/// `output_dir` is compared by the file it actually refers to.
fn reject_input_as_part(input: &Path, output_dir: &Path, naming: &PartNaming) -> Result<()> {
    let input_real = fs::canonicalize(input).map_err(|e| Error::io("resolve input", input, e))?;
    let dir_real = fs::canonicalize(output_dir)
        .map_err(|e| Error::io("resolve output directory", output_dir, e))?;

    let (Some(parent), Some(name)) = (input_real.parent(), input_real.file_name()) else {
        return Ok(());
    };
    if parent != dir_real {
        return Ok(());
    }
    match naming.matcher()?.parse(name) {
        PartName::Numbered(_) => Err(Error::InputIsPart {
            path: input.to_path_buf(),
        }),
        PartName::Unnumbered | PartName::Foreign => Ok(()),
    }
}

/// Writes `reader` out as parts until it is exhausted.
fn split_stream<R: BufRead>(
    mut reader: R,
    input: &Path,
    output_dir: &Path,
    chunk_size: u64,
    naming: &PartNaming,
    progress: &mut dyn ProgressReporter,
) -> Result<SplitResult> {
    let mut parts = Vec::new();
    let mut bytes_read = 0u64;
    let mut sequence = 0u32;

    loop {
        // Peek before creating a file so EOF never produces an empty part
        let at_eof = match reader.fill_buf() {
            Ok(buf) => buf.is_empty(),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::io("read input", input, e)),
        };
        if at_eof {
            break;
        }

        sequence = sequence.checked_add(1).ok_or(Error::TooManyParts)?;
        let path = naming.part_path(output_dir, sequence);
        progress.on_part_start(sequence, &path);

        let size = write_part(&mut reader, input, &path, chunk_size)?;
        log::debug!("wrote part {} ({} bytes) to {}", sequence, size, path.display());
        progress.on_part_complete(sequence, size);

        bytes_read += size;
        parts.push(PartDescriptor {
            sequence,
            path,
            size,
        });
    }

    Ok(SplitResult { parts, bytes_read })
}

/// Copies up to `chunk_size` bytes from `reader` into a new file at `path`.
///
/// The part file is flushed and closed before this returns.
fn write_part<R: BufRead>(
    reader: &mut R,
    input: &Path,
    path: &Path,
    chunk_size: u64,
) -> Result<u64> {
    let file = File::create(path).map_err(|e| Error::io("create part", path, e))?;
    let mut writer = BufWriter::with_capacity(IO_BUFFER_SIZE, file);

    let mut chunk = reader.take(chunk_size);
    let mut written = 0u64;
    loop {
        let buf = match chunk.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::io("read input", input, e)),
        };
        if buf.is_empty() {
            break;
        }
        writer
            .write_all(buf)
            .map_err(|e| Error::io("write part", path, e))?;
        let n = buf.len();
        chunk.consume(n);
        written += n as u64;
    }

    writer.flush().map_err(|e| Error::io("write part", path, e))?;
    Ok(written)
}
