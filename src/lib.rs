//! # zippart
//!
//! Split a file (typically a ZIP archive) into fixed-size numbered parts, and
//! merge those parts back into a byte-identical copy.
//!
//! This is useful for moving large files through channels with a size cap,
//! such as email attachments. Parts are raw byte ranges of the original with
//! no header, so they can be concatenated by any tool; this crate adds
//! reliable ordering on the way back.
//!
//! ## Quick Start
//!
//! ### Splitting
//!
//! ```rust,no_run
//! use zippart::split;
//!
//! // 15 MiB parts: parts/Part_001.zippart, parts/Part_002.zippart, ...
//! let count = split("backup.zip", "parts/", 15 * 1024 * 1024)?;
//! println!("wrote {count} parts");
//! # Ok::<(), zippart::Error>(())
//! ```
//!
//! ### Merging
//!
//! ```rust,no_run
//! use zippart::merge;
//!
//! let bytes = merge("parts/", "backup.zip")?;
//! println!("restored {bytes} bytes");
//! # Ok::<(), zippart::Error>(())
//! ```
//!
//! ## Part Naming and Ordering
//!
//! Parts are named `Part_<NNN>.zippart` with a sequence number zero-padded to
//! at least three digits. Beyond 999 the field simply grows
//! (`Part_1000.zippart`). The merger extracts the number from each name and
//! sorts by its integer value, so the result does not depend on how the file
//! system lists the directory or on lexical name order.
//!
//! The naming template is configurable through [`PartNaming`].
//!
//! ## Configuration
//!
//! [`Splitter`] and [`Merger`] take [`SplitOptions`] and [`MergeOptions`]
//! builders for chunk size, naming, the [`FallbackOrdering`] policy and an
//! optional [`ProgressReporter`]:
//!
//! ```rust,no_run
//! use zippart::{MergeOptions, Merger, SplitOptions, Splitter};
//! use zippart::progress::LogProgress;
//!
//! let split = Splitter::new(SplitOptions::new().chunk_size(500).progress(LogProgress))
//!     .split("input.zip", "parts/")?;
//! let merged = Merger::new(MergeOptions::new()).merge("parts/", "copy.zip")?;
//! assert_eq!(split.bytes_read, merged.bytes_written);
//! # Ok::<(), zippart::Error>(())
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

/// Buffer size for file reads and writes (64 KiB).
pub(crate) const IO_BUFFER_SIZE: usize = 64 * 1024;

pub mod error;
pub mod merge;
pub mod naming;
pub mod part;
pub mod progress;
pub mod split;

pub use error::{Error, Result};
pub use merge::{MergeOptions, MergeResult, Merger, merge};
pub use naming::{PartMatcher, PartName, PartNaming};
pub use part::{FallbackOrdering, PartDescriptor, PartSet};
pub use progress::{LogProgress, NoProgress, ProgressReporter, StatisticsProgress};
pub use split::{DEFAULT_CHUNK_SIZE, SplitOptions, SplitResult, Splitter, split};
