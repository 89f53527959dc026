//! Merging numbered parts back into one file.
//!
//! Parts are discovered with [`PartSet::discover`], ordered by sequence
//! number and concatenated verbatim into a freshly created output file.
//!
//! The part set is fully validated before the output is touched, so an empty
//! or broken set never creates, truncates or deletes the output. Once writing
//! has started, any failure removes the incomplete output before the error is
//! returned.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::naming::PartNaming;
use crate::part::{FallbackOrdering, PartDescriptor, PartSet};
use crate::progress::{NoProgress, ProgressReporter};
use crate::{Error, IO_BUFFER_SIZE, Result};

/// Options for [`Merger`].
pub struct MergeOptions<'a> {
    naming: PartNaming,
    fallback: FallbackOrdering,
    progress: Option<Box<dyn ProgressReporter + 'a>>,
}

impl<'a> MergeOptions<'a> {
    /// Creates options with the default naming and [`FallbackOrdering::Reject`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the part naming template.
    pub fn naming(mut self, naming: PartNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Sets the policy for directories whose part-like files are all unnumbered.
    pub fn fallback(mut self, fallback: FallbackOrdering) -> Self {
        self.fallback = fallback;
        self
    }

    /// Sets the progress reporter.
    pub fn progress(mut self, reporter: impl ProgressReporter + 'a) -> Self {
        self.progress = Some(Box::new(reporter));
        self
    }
}

impl Default for MergeOptions<'_> {
    fn default() -> Self {
        Self {
            naming: PartNaming::default(),
            fallback: FallbackOrdering::default(),
            progress: None,
        }
    }
}

impl std::fmt::Debug for MergeOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeOptions")
            .field("naming", &self.naming)
            .field("fallback", &self.fallback)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Outcome of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// Number of parts concatenated.
    pub part_count: u32,
    /// Total bytes written to the output.
    pub bytes_written: u64,
    /// The output file.
    pub output: PathBuf,
    /// Part-like files left out because they carry no sequence number.
    pub skipped: Vec<PathBuf>,
}

/// Merges part sets into single files.
///
/// # Example
///
/// ```rust,no_run
/// use zippart::{MergeOptions, Merger};
///
/// let result = Merger::new(MergeOptions::new()).merge("inbox/", "backup.zip")?;
/// println!("restored {} bytes from {} parts", result.bytes_written, result.part_count);
/// # Ok::<(), zippart::Error>(())
/// ```
#[derive(Debug)]
pub struct Merger<'a> {
    options: MergeOptions<'a>,
}

impl<'a> Merger<'a> {
    /// Creates a merger with the given options.
    pub fn new(options: MergeOptions<'a>) -> Self {
        Self { options }
    }

    /// Concatenates the parts in `parts_dir` into `output`.
    ///
    /// An existing file at `output` is replaced.
    ///
    /// # Errors
    ///
    /// - Any discovery error from [`PartSet::discover`], including
    ///   [`Error::EmptyPartSet`]; the output is left untouched
    /// - [`Error::NotFound`] if the parent directory of `output` does not exist
    /// - [`Error::OutputIsPart`] if `output` is one of the parts
    /// - [`Error::Io`] on any read or write failure; the incomplete output is
    ///   removed
    pub fn merge(
        &mut self,
        parts_dir: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<MergeResult> {
        let parts_dir = parts_dir.as_ref();
        let output = output.as_ref();

        let set = PartSet::discover(parts_dir, &self.options.naming, self.options.fallback)?;
        require_parent_dir(output)?;
        if set.contains_path(output) {
            return Err(Error::OutputIsPart {
                path: output.to_path_buf(),
            });
        }

        let mut no_progress = NoProgress;
        let progress: &mut dyn ProgressReporter = match self.options.progress.as_mut() {
            Some(reporter) => &mut **reporter,
            None => &mut no_progress,
        };
        for path in set.skipped() {
            progress.on_warning(&format!(
                "skipped {}: no sequence number in file name",
                path.display()
            ));
        }
        if set.used_lexical_fallback() {
            progress.on_warning("no numbered parts found; merging in file name order");
        }
        progress.on_total(set.total_size());

        remove_existing(output)?;
        let bytes_written = write_output(set.parts(), output, progress)?;

        // Discovery guarantees at most u32::MAX parts
        let part_count = set.len() as u32;
        log::info!(
            "merged {} parts ({} bytes) from {} into {}",
            part_count,
            bytes_written,
            parts_dir.display(),
            output.display()
        );
        Ok(MergeResult {
            part_count,
            bytes_written,
            output: output.to_path_buf(),
            skipped: set.skipped().to_vec(),
        })
    }
}

/// Concatenates the parts in `parts_dir` into `output`.
///
/// Returns the total number of bytes written. See [`Merger::merge`] for errors.
///
/// # Example
///
/// ```rust,no_run
/// let bytes = zippart::merge("parts/", "archive.zip")?;
/// println!("{bytes} bytes");
/// # Ok::<(), zippart::Error>(())
/// ```
pub fn merge(parts_dir: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<u64> {
    let mut merger = Merger::new(MergeOptions::new());
    Ok(merger.merge(parts_dir, output)?.bytes_written)
}

/// Fails with [`Error::NotFound`] unless the directory containing `output` exists.
fn require_parent_dir(output: &Path) -> Result<()> {
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        // Bare file name: the current directory
        _ => return Ok(()),
    };
    if parent.is_dir() {
        Ok(())
    } else {
        Err(Error::NotFound {
            what: "output directory",
            path: parent.to_path_buf(),
        })
    }
}

/// Deletes a pre-existing output file, if any.
fn remove_existing(output: &Path) -> Result<()> {
    match fs::remove_file(output) {
        Ok(()) => {
            log::debug!("removed existing output {}", output.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io("remove existing output", output, e)),
    }
}

/// Removes a partially written output after a failure.
fn discard_incomplete(output: &Path) {
    match fs::remove_file(output) {
        Ok(()) => log::debug!("removed incomplete output {}", output.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!(
            "failed to remove incomplete output '{}': {}",
            output.display(),
            e
        ),
    }
}

/// Writes the parts into `output`, removing it again if anything fails.
fn write_output(
    parts: &[PartDescriptor],
    output: &Path,
    progress: &mut dyn ProgressReporter,
) -> Result<u64> {
    concatenate(parts, output, progress).inspect_err(|_| discard_incomplete(output))
}

/// Writes every part, in order, into a new file at `output`.
///
/// The output handle is owned here, so it is closed on every return path
/// before the caller decides whether to discard the file.
fn concatenate(
    parts: &[PartDescriptor],
    output: &Path,
    progress: &mut dyn ProgressReporter,
) -> Result<u64> {
    let file = File::create(output).map_err(|e| Error::io("create output", output, e))?;
    let mut writer = BufWriter::with_capacity(IO_BUFFER_SIZE, file);
    let mut total = 0u64;

    for part in parts {
        progress.on_part_start(part.sequence, &part.path);
        let mut reader =
            File::open(&part.path).map_err(|e| Error::io("open part", &part.path, e))?;
        let copied = copy_part(&mut reader, &mut writer, &part.path, output)?;
        log::debug!(
            "appended part {} ({} bytes) from {}",
            part.sequence,
            copied,
            part.path.display()
        );
        progress.on_part_complete(part.sequence, copied);
        total += copied;
    }

    let file = writer
        .into_inner()
        .map_err(|e| Error::io("write output", output, e.into_error()))?;
    file.sync_all()
        .map_err(|e| Error::io("sync output", output, e))?;
    Ok(total)
}

/// Copies one part into the output, attributing failures to the right file.
fn copy_part<R: io::Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    part: &Path,
    output: &Path,
) -> Result<u64> {
    let mut buf = vec![0u8; IO_BUFFER_SIZE];
    let mut copied = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(copied),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::io("read part", part, e)),
        };
        writer
            .write_all(&buf[..n])
            .map_err(|e| Error::io("write output", output, e))?;
        copied += n as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::StatisticsProgress;
    use tempfile::TempDir;

    fn write_parts(dir: &Path, chunks: &[&[u8]]) {
        let naming = PartNaming::default();
        for (index, chunk) in chunks.iter().enumerate() {
            fs::write(naming.part_path(dir, index as u32 + 1), chunk).unwrap();
        }
    }

    #[test]
    fn test_merge_concatenates_in_sequence_order() {
        let dir = TempDir::new().unwrap();
        let parts = dir.path().join("parts");
        fs::create_dir(&parts).unwrap();
        // Written in reverse so creation order differs from sequence order
        fs::write(parts.join("Part_003.zippart"), b"!").unwrap();
        fs::write(parts.join("Part_002.zippart"), b"world").unwrap();
        fs::write(parts.join("Part_001.zippart"), b"hello ").unwrap();

        let output = dir.path().join("out.txt");
        let bytes = merge(&parts, &output).unwrap();

        assert_eq!(bytes, 12);
        assert_eq!(fs::read(&output).unwrap(), b"hello world!");
    }

    #[test]
    fn test_merge_overwrites_existing_output() {
        let dir = TempDir::new().unwrap();
        write_parts(dir.path(), &[b"new"]);

        let output = dir.path().join("out.bin");
        fs::write(&output, b"much longer previous content").unwrap();

        merge(dir.path(), &output).unwrap();
        assert_eq!(fs::read(&output).unwrap(), b"new");
    }

    #[test]
    fn test_merge_empty_set_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let parts = dir.path().join("parts");
        fs::create_dir(&parts).unwrap();

        let output = dir.path().join("out.zip");
        let err = merge(&parts, &output).unwrap_err();
        assert!(matches!(err, Error::EmptyPartSet { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_merge_empty_set_keeps_existing_output() {
        let dir = TempDir::new().unwrap();
        let parts = dir.path().join("parts");
        fs::create_dir(&parts).unwrap();

        let output = dir.path().join("out.zip");
        fs::write(&output, b"keep").unwrap();

        assert!(merge(&parts, &output).is_err());
        assert_eq!(fs::read(&output).unwrap(), b"keep");
    }

    #[test]
    fn test_merge_missing_parts_dir() {
        let dir = TempDir::new().unwrap();
        let err = merge(dir.path().join("gone"), dir.path().join("out.zip")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_merge_missing_output_parent() {
        let dir = TempDir::new().unwrap();
        write_parts(dir.path(), &[b"a"]);

        let err = merge(dir.path(), dir.path().join("no/such/dir/out.zip")).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                what: "output directory",
                ..
            }
        ));
    }

    #[test]
    fn test_merge_refuses_to_overwrite_a_part() {
        let dir = TempDir::new().unwrap();
        write_parts(dir.path(), &[b"a", b"b"]);

        let target = dir.path().join("Part_002.zippart");
        let err = merge(dir.path(), &target).unwrap_err();
        assert!(matches!(err, Error::OutputIsPart { .. }));
        assert_eq!(fs::read(&target).unwrap(), b"b");
    }

    #[test]
    fn test_merge_output_into_parts_dir_is_allowed() {
        let dir = TempDir::new().unwrap();
        write_parts(dir.path(), &[b"ab", b"cd"]);

        let output = dir.path().join("restored.zip");
        assert_eq!(merge(dir.path(), &output).unwrap(), 4);
        assert_eq!(fs::read(&output).unwrap(), b"abcd");

        // The restored file is not a part, so merging again gives the same result
        assert_eq!(merge(dir.path(), &output).unwrap(), 4);
        assert_eq!(fs::read(&output).unwrap(), b"abcd");
    }

    #[test]
    fn test_merge_empty_parts_contribute_nothing() {
        let dir = TempDir::new().unwrap();
        write_parts(dir.path(), &[b"", b"x", b""]);

        let output = dir.path().join("out.bin");
        assert_eq!(merge(dir.path(), &output).unwrap(), 1);
        assert_eq!(fs::read(&output).unwrap(), b"x");
    }

    #[test]
    fn test_merge_reports_progress_and_skips() {
        let dir = TempDir::new().unwrap();
        let parts = dir.path().join("parts");
        fs::create_dir(&parts).unwrap();
        write_parts(&parts, &[b"aaa", b"bb"]);
        fs::write(parts.join("Part_extra.zippart"), b"zzz").unwrap();

        let mut stats = StatisticsProgress::new();
        let result = {
            let options = MergeOptions::new().progress(&mut stats);
            Merger::new(options)
                .merge(&parts, dir.path().join("out.bin"))
                .unwrap()
        };

        assert_eq!(result.part_count, 2);
        assert_eq!(result.bytes_written, 5);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(stats.total_bytes(), Some(5));
        assert_eq!(stats.part_sizes(), &[(1, 3), (2, 2)]);
        assert_eq!(stats.warnings().len(), 1);
        assert!(stats.warnings()[0].contains("Part_extra.zippart"));
    }

    #[test]
    fn test_merge_lexical_fallback() {
        let dir = TempDir::new().unwrap();
        let parts = dir.path().join("parts");
        fs::create_dir(&parts).unwrap();
        fs::write(parts.join("Part_b.zippart"), b"2").unwrap();
        fs::write(parts.join("Part_a.zippart"), b"1").unwrap();

        let output = dir.path().join("out.bin");
        let err = merge(&parts, &output).unwrap_err();
        assert!(matches!(err, Error::UnnumberedParts { count: 2, .. }));
        assert!(!output.exists());

        let result = Merger::new(MergeOptions::new().fallback(FallbackOrdering::Lexical))
            .merge(&parts, &output)
            .unwrap();
        assert_eq!(result.part_count, 2);
        assert_eq!(fs::read(&output).unwrap(), b"12");
    }

    #[test]
    fn test_write_failure_discards_output() {
        struct FailingWriter;

        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("disk full"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut reader: &[u8] = b"payload";
        let err = copy_part(
            &mut reader,
            &mut FailingWriter,
            Path::new("Part_001.zippart"),
            Path::new("out.bin"),
        )
        .unwrap_err();
        match err {
            Error::Io {
                operation, path, ..
            } => {
                assert_eq!(operation, "write output");
                assert_eq!(path, PathBuf::from("out.bin"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("partial.bin");
        fs::write(&output, b"half").unwrap();
        discard_incomplete(&output);
        assert!(!output.exists());
        // Already gone: silently ignored
        discard_incomplete(&output);
    }

    #[test]
    fn test_vanished_part_discards_output() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("Part_001.zippart");
        fs::write(&first, b"first part").unwrap();
        let parts = vec![
            PartDescriptor {
                sequence: 1,
                path: first,
                size: 10,
            },
            PartDescriptor {
                sequence: 2,
                path: dir.path().join("Part_002.zippart"),
                size: 10,
            },
        ];

        let output = dir.path().join("out.bin");
        let err = write_output(&parts, &output, &mut NoProgress).unwrap_err();
        match err {
            Error::Io {
                operation, path, ..
            } => {
                assert_eq!(operation, "open part");
                assert_eq!(path, dir.path().join("Part_002.zippart"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_default_options() {
        let options = MergeOptions::default();
        assert_eq!(options.fallback, FallbackOrdering::Reject);
        assert_eq!(options.naming, PartNaming::default());
    }
}
