//! Error types for split and merge operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when splitting a file into parts or merging parts back,
//! along with a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Nothing is
//! retried internally: the first failure aborts the operation and is returned
//! with the path and operation that caused it.
//!
//! ```rust,no_run
//! use zippart::{Error, merge};
//!
//! match merge("parts/", "restored.zip") {
//!     Ok(bytes) => println!("restored {bytes} bytes"),
//!     Err(Error::EmptyPartSet { dir }) => eprintln!("no parts in {}", dir.display()),
//!     Err(e) if e.is_not_found() => eprintln!("missing input: {e}"),
//!     Err(e) => eprintln!("merge failed: {e}"),
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants | Typical cause |
//! |----------|----------|---------------|
//! | I/O | [`Io`][Error::Io], [`NotFound`][Error::NotFound] | Missing or unreadable paths, disk full |
//! | Part set | [`EmptyPartSet`][Error::EmptyPartSet], [`MissingPart`][Error::MissingPart], [`DuplicatePart`][Error::DuplicatePart], [`UnnumberedParts`][Error::UnnumberedParts] | Wrong directory, incomplete transfer |
//! | Configuration | [`InvalidChunkSize`][Error::InvalidChunkSize], [`InvalidNaming`][Error::InvalidNaming] | Bad caller arguments |

use std::io;
use std::path::PathBuf;

/// The error type for split and merge operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading or writing a file.
    ///
    /// `operation` names what was being done (e.g. `"read part"`) and `path`
    /// is the file it was being done to.
    #[error("I/O error: failed to {operation} '{}': {source}", path.display())]
    Io {
        /// Short description of the failed operation.
        operation: &'static str,
        /// The path being operated on.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A required path does not exist or is not the expected kind of entry.
    ///
    /// Returned for a missing input file, a missing parts directory, or a
    /// missing parent directory of the merge output.
    #[error("{what} not found: '{}'", path.display())]
    NotFound {
        /// What kind of path was expected (e.g. `"input file"`).
        what: &'static str,
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The parts directory contains no part files.
    ///
    /// This is always fatal: merging is never reported as "zero bytes merged".
    #[error("no parts found in '{}'", dir.display())]
    EmptyPartSet {
        /// The directory that was searched.
        dir: PathBuf,
    },

    /// The part sequence has a gap or does not start at 1.
    #[error("part {sequence} missing from '{}'", dir.display())]
    MissingPart {
        /// The first sequence number that is absent (1-indexed).
        sequence: u32,
        /// The directory that was searched.
        dir: PathBuf,
    },

    /// Two files carry the same sequence number (e.g. `Part_001` and `Part_0001`).
    #[error(
        "part {sequence} is ambiguous: both '{}' and '{}' claim it",
        first.display(),
        second.display()
    )]
    DuplicatePart {
        /// The duplicated sequence number.
        sequence: u32,
        /// The first file claiming the number.
        first: PathBuf,
        /// The second file claiming the number.
        second: PathBuf,
    },

    /// Files match the part template but none carries a sequence number.
    ///
    /// Returned when [`FallbackOrdering::Reject`](crate::FallbackOrdering::Reject)
    /// is in effect.
    #[error(
        "{count} part-like files in '{}' have no sequence number; refusing to guess their order",
        dir.display()
    )]
    UnnumberedParts {
        /// Number of unnumbered candidates found.
        count: usize,
        /// The directory that was searched.
        dir: PathBuf,
    },

    /// Chunk size must be positive.
    #[error("invalid chunk size {0}: must be at least 1 byte")]
    InvalidChunkSize(u64),

    /// The part naming template is unusable.
    #[error("invalid part naming: {0}")]
    InvalidNaming(String),

    /// The merge output path is one of the parts being merged.
    #[error("output '{}' is one of the parts being merged", path.display())]
    OutputIsPart {
        /// The conflicting path.
        path: PathBuf,
    },

    /// The split input would be overwritten by one of its own parts.
    #[error("input '{}' would be overwritten by a part written to the same directory", path.display())]
    InputIsPart {
        /// The input path.
        path: PathBuf,
    },

    /// The input would produce more parts than a sequence number can hold.
    #[error("too many parts: sequence numbers are limited to {}", u32::MAX)]
    TooManyParts,
}

impl Error {
    /// Wraps an I/O error with the operation and path it happened on.
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error means a path could not be found.
    ///
    /// This covers [`Error::NotFound`] as well as I/O errors whose kind is
    /// [`io::ErrorKind::NotFound`].
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Returns `true` if this error describes a bad part set rather than a
    /// failing file system.
    pub fn is_part_set_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyPartSet { .. }
                | Error::MissingPart { .. }
                | Error::DuplicatePart { .. }
                | Error::UnnumberedParts { .. }
        )
    }

    /// Returns the underlying [`io::ErrorKind`], if this is an I/O error.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Error::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// A specialized Result type for split and merge operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_context() {
        let err = Error::io(
            "read part",
            "/tmp/parts/Part_002.zippart",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("read part"));
        assert!(msg.contains("Part_002.zippart"));
        assert_eq!(err.io_kind(), Some(io::ErrorKind::PermissionDenied));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found() {
        let err = Error::NotFound {
            what: "input file",
            path: PathBuf::from("missing.zip"),
        };
        assert_eq!(err.to_string(), "input file not found: 'missing.zip'");
        assert!(err.is_not_found());

        let err = Error::io(
            "open input",
            "gone.zip",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_empty_part_set() {
        let err = Error::EmptyPartSet {
            dir: PathBuf::from("parts"),
        };
        assert_eq!(err.to_string(), "no parts found in 'parts'");
        assert!(err.is_part_set_error());
        assert_eq!(err.io_kind(), None);
    }

    #[test]
    fn test_missing_and_duplicate_part() {
        let err = Error::MissingPart {
            sequence: 4,
            dir: PathBuf::from("parts"),
        };
        assert!(err.to_string().contains("part 4 missing"));
        assert!(err.is_part_set_error());

        let err = Error::DuplicatePart {
            sequence: 1,
            first: PathBuf::from("Part_001.zippart"),
            second: PathBuf::from("Part_0001.zippart"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Part_001.zippart"));
        assert!(msg.contains("Part_0001.zippart"));
    }

    #[test]
    fn test_invalid_chunk_size() {
        let err = Error::InvalidChunkSize(0);
        assert!(err.to_string().contains("invalid chunk size 0"));
        assert!(!err.is_part_set_error());
    }
}
