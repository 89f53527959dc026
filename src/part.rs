//! Typed part descriptors and part set discovery.
//!
//! Merging starts by turning a directory listing into a [`PartSet`]: an
//! ordered list of [`PartDescriptor`]s sorted by the integer sequence number
//! embedded in each file name. Directory enumeration order and lexical file
//! name order play no role in the result.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::naming::{PartName, PartNaming};
use crate::{Error, Result};

/// One part file: its position in the original file and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDescriptor {
    /// Sequence number (1-indexed).
    pub sequence: u32,
    /// Path of the part file.
    pub path: PathBuf,
    /// Size of the part in bytes.
    pub size: u64,
}

/// What to do when files match the part template but none is numbered.
///
/// A file such as `Part_abc.zippart` has the right prefix and suffix but no
/// sequence number, so its position cannot be known. When at least one
/// properly numbered part exists these files are always skipped; this policy
/// only applies when *every* candidate is unnumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackOrdering {
    /// Fail with [`Error::UnnumberedParts`].
    #[default]
    Reject,
    /// Order candidates by file name (byte-wise) and merge them in that order.
    Lexical,
}

/// The ordered, validated set of parts found in a directory.
#[derive(Debug, Clone)]
pub struct PartSet {
    dir: PathBuf,
    parts: Vec<PartDescriptor>,
    skipped: Vec<PathBuf>,
    lexical_fallback: bool,
}

/// A candidate whose name matched the template without a usable number.
struct Unnumbered {
    name: OsString,
    path: PathBuf,
    size: u64,
}

impl PartSet {
    /// Discovers the part files in `dir`.
    ///
    /// Only regular files directly inside `dir` are considered (symlinks to
    /// files are followed). Names that do not match `naming` are ignored.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `dir` does not exist or is not a directory
    /// - [`Error::EmptyPartSet`] if no file matches the template
    /// - [`Error::UnnumberedParts`] if only unnumbered candidates exist and
    ///   `fallback` is [`FallbackOrdering::Reject`]
    /// - [`Error::DuplicatePart`] if two files carry the same number
    /// - [`Error::MissingPart`] if the numbers are not contiguous from 1
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use zippart::{FallbackOrdering, PartNaming, PartSet};
    ///
    /// let set = PartSet::discover("parts/", &PartNaming::default(), FallbackOrdering::Reject)?;
    /// for part in set.parts() {
    ///     println!("{:>4} {}", part.sequence, part.path.display());
    /// }
    /// # Ok::<(), zippart::Error>(())
    /// ```
    pub fn discover(
        dir: impl AsRef<Path>,
        naming: &PartNaming,
        fallback: FallbackOrdering,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        require_dir(dir)?;

        let matcher = naming.matcher()?;
        let mut numbered = Vec::new();
        let mut unnumbered = Vec::new();

        let entries = fs::read_dir(dir).map_err(|e| Error::io("read directory", dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("read directory", dir, e))?;
            let name = entry.file_name();
            let class = matcher.parse(&name);
            if class == PartName::Foreign {
                continue;
            }

            let path = entry.path();
            let meta = fs::metadata(&path).map_err(|e| Error::io("inspect part", &path, e))?;
            if !meta.is_file() {
                log::debug!("ignoring non-file entry {}", path.display());
                continue;
            }

            match class {
                PartName::Numbered(sequence) => numbered.push(PartDescriptor {
                    sequence,
                    path,
                    size: meta.len(),
                }),
                PartName::Unnumbered => unnumbered.push(Unnumbered {
                    name,
                    path,
                    size: meta.len(),
                }),
                PartName::Foreign => {}
            }
        }

        if numbered.is_empty() {
            if unnumbered.is_empty() {
                return Err(Error::EmptyPartSet {
                    dir: dir.to_path_buf(),
                });
            }
            return Self::from_unnumbered(dir, unnumbered, fallback);
        }

        let skipped: Vec<PathBuf> = unnumbered.into_iter().map(|u| u.path).collect();
        for path in &skipped {
            log::warn!(
                "skipping {}: matches the part template but has no sequence number",
                path.display()
            );
        }

        numbered.sort_by(|a, b| a.sequence.cmp(&b.sequence).then_with(|| a.path.cmp(&b.path)));
        validate_contiguous(dir, &numbered)?;

        log::debug!("discovered {} parts in {}", numbered.len(), dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
            parts: numbered,
            skipped,
            lexical_fallback: false,
        })
    }

    /// Builds the set from unnumbered candidates according to `fallback`.
    fn from_unnumbered(
        dir: &Path,
        mut candidates: Vec<Unnumbered>,
        fallback: FallbackOrdering,
    ) -> Result<Self> {
        match fallback {
            FallbackOrdering::Reject => Err(Error::UnnumberedParts {
                count: candidates.len(),
                dir: dir.to_path_buf(),
            }),
            FallbackOrdering::Lexical => {
                log::warn!(
                    "no numbered parts in {}; merging {} candidates in file name order",
                    dir.display(),
                    candidates.len()
                );
                candidates.sort_by(|a, b| a.name.cmp(&b.name));

                let mut parts = Vec::with_capacity(candidates.len());
                for (index, candidate) in candidates.into_iter().enumerate() {
                    let sequence = u32::try_from(index + 1).map_err(|_| Error::TooManyParts)?;
                    parts.push(PartDescriptor {
                        sequence,
                        path: candidate.path,
                        size: candidate.size,
                    });
                }

                Ok(Self {
                    dir: dir.to_path_buf(),
                    parts,
                    skipped: Vec::new(),
                    lexical_fallback: true,
                })
            }
        }
    }

    /// Returns the directory the parts were discovered in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the parts in merge order.
    pub fn parts(&self) -> &[PartDescriptor] {
        &self.parts
    }

    /// Consumes the set, returning the parts in merge order.
    pub fn into_parts(self) -> Vec<PartDescriptor> {
        self.parts
    }

    /// Returns the number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns `true` if the set has no parts.
    ///
    /// A successfully discovered set is never empty.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns the sum of all part sizes as seen at discovery time.
    pub fn total_size(&self) -> u64 {
        self.parts.iter().map(|p| p.size).sum()
    }

    /// Returns part-like files that were left out because they carry no number.
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    /// Returns `true` if the order came from [`FallbackOrdering::Lexical`].
    pub fn used_lexical_fallback(&self) -> bool {
        self.lexical_fallback
    }

    /// Returns `true` if `path` refers to one of the parts.
    pub(crate) fn contains_path(&self, path: &Path) -> bool {
        let canonical = fs::canonicalize(path).ok();
        self.parts.iter().any(|part| {
            part.path == path
                || match (&canonical, fs::canonicalize(&part.path)) {
                    (Some(a), Ok(b)) => *a == b,
                    _ => false,
                }
        })
    }
}

/// Fails with [`Error::NotFound`] unless `dir` is an existing directory.
fn require_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotFound {
            what: "parts directory",
            path: dir.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound {
            what: "parts directory",
            path: dir.to_path_buf(),
        }),
        Err(e) => Err(Error::io("inspect directory", dir, e)),
    }
}

/// Checks that sorted parts are numbered 1..=N with no duplicates.
fn validate_contiguous(dir: &Path, parts: &[PartDescriptor]) -> Result<()> {
    let mut expected: u32 = 1;
    for (index, part) in parts.iter().enumerate() {
        if index > 0 && parts[index - 1].sequence == part.sequence {
            return Err(Error::DuplicatePart {
                sequence: part.sequence,
                first: parts[index - 1].path.clone(),
                second: part.path.clone(),
            });
        }
        if part.sequence != expected {
            return Err(Error::MissingPart {
                sequence: expected,
                dir: dir.to_path_buf(),
            });
        }
        expected = expected.saturating_add(1);
    }
    Ok(())
}
