//! Progress reporting for split and merge operations.
//!
//! Verbosity is never a process-wide setting. Callers that want to observe an
//! operation pass a [`ProgressReporter`] in the options; the default is
//! [`NoProgress`].
//!
//! # Example
//!
//! ```rust,no_run
//! use zippart::progress::StatisticsProgress;
//! use zippart::{SplitOptions, Splitter};
//!
//! let options = SplitOptions::new()
//!     .chunk_size(1024 * 1024)
//!     .progress(StatisticsProgress::new());
//! let result = Splitter::new(options).split("archive.zip", "parts/")?;
//! println!("{} parts", result.part_count());
//! # Ok::<(), zippart::Error>(())
//! ```

use std::path::Path;

/// IEC byte unit: 1 KiB = 1024 bytes.
pub const BYTES_KIB: u64 = 1024;
/// IEC byte unit: 1 MiB = 1024 KiB.
pub const BYTES_MIB: u64 = 1024 * BYTES_KIB;
/// IEC byte unit: 1 GiB = 1024 MiB.
pub const BYTES_GIB: u64 = 1024 * BYTES_MIB;

// Floating point versions for formatting calculations
const BYTES_KB: f64 = 1024.0;
const BYTES_MB: f64 = BYTES_KB * 1024.0;
const BYTES_GB: f64 = BYTES_MB * 1024.0;

/// Observer for split and merge operations.
///
/// All methods have no-op defaults, so implementors only override the events
/// they care about.
pub trait ProgressReporter: Send {
    /// Called once before the first part is processed.
    ///
    /// For a split this is the input size; for a merge it is the sum of all
    /// part sizes.
    fn on_total(&mut self, total_bytes: u64) {
        let _ = total_bytes;
    }

    /// Called before a part is written (split) or read (merge).
    fn on_part_start(&mut self, sequence: u32, path: &Path) {
        let _ = (sequence, path);
    }

    /// Called after a part has been fully written or copied.
    fn on_part_complete(&mut self, sequence: u32, bytes: u64) {
        let _ = (sequence, bytes);
    }

    /// Called on any non-fatal condition, such as a skipped file.
    fn on_warning(&mut self, message: &str) {
        let _ = message;
    }
}

/// A reporter that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// A reporter that forwards events to the [`log`] facade.
///
/// Part events are logged at `info` level, warnings at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn on_total(&mut self, total_bytes: u64) {
        log::info!("processing {}", format_bytes(total_bytes));
    }

    fn on_part_start(&mut self, sequence: u32, path: &Path) {
        log::info!("part {}: {}", sequence, path.display());
    }

    fn on_part_complete(&mut self, sequence: u32, bytes: u64) {
        log::info!("part {} done ({} bytes)", sequence, bytes);
    }

    fn on_warning(&mut self, message: &str) {
        log::warn!("{}", message);
    }
}

/// A reporter that records what happened, for inspection afterwards.
#[derive(Debug, Clone, Default)]
pub struct StatisticsProgress {
    total_bytes: Option<u64>,
    part_sizes: Vec<(u32, u64)>,
    warnings: Vec<String>,
}

impl StatisticsProgress {
    /// Creates an empty statistics reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total reported by [`ProgressReporter::on_total`], if any.
    pub fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }

    /// Returns `(sequence, bytes)` for every completed part, in completion order.
    pub fn part_sizes(&self) -> &[(u32, u64)] {
        &self.part_sizes
    }

    /// Returns the sum of all completed part sizes.
    pub fn processed_bytes(&self) -> u64 {
        self.part_sizes.iter().map(|&(_, bytes)| bytes).sum()
    }

    /// Returns all warnings received.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl ProgressReporter for StatisticsProgress {
    fn on_total(&mut self, total_bytes: u64) {
        self.total_bytes = Some(total_bytes);
    }

    fn on_part_complete(&mut self, sequence: u32, bytes: u64) {
        self.part_sizes.push((sequence, bytes));
    }

    fn on_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

impl<P: ProgressReporter + ?Sized> ProgressReporter for &mut P {
    fn on_total(&mut self, total_bytes: u64) {
        (**self).on_total(total_bytes);
    }

    fn on_part_start(&mut self, sequence: u32, path: &Path) {
        (**self).on_part_start(sequence, path);
    }

    fn on_part_complete(&mut self, sequence: u32, bytes: u64) {
        (**self).on_part_complete(sequence, bytes);
    }

    fn on_warning(&mut self, message: &str) {
        (**self).on_warning(message);
    }
}

/// Formats a byte count as a human-readable string using IEC units.
///
/// ```rust
/// use zippart::progress::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(15 * 1024 * 1024), "15.00 MiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    let b = bytes as f64;
    if b >= BYTES_GB {
        format!("{:.2} GiB", b / BYTES_GB)
    } else if b >= BYTES_MB {
        format!("{:.2} MiB", b / BYTES_MB)
    } else if b >= BYTES_KB {
        format!("{:.2} KiB", b / BYTES_KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Parses a size such as `500`, `64K`, `15M` or `2G` (IEC multiples).
///
/// A trailing `B`/`iB` is accepted (`15MiB`, `64KB`). Returns `None` for
/// malformed input or on overflow.
///
/// ```rust
/// use zippart::progress::parse_size;
///
/// assert_eq!(parse_size("500"), Some(500));
/// assert_eq!(parse_size("15M"), Some(15 * 1024 * 1024));
/// assert_eq!(parse_size("2GiB"), Some(2 * 1024 * 1024 * 1024));
/// assert_eq!(parse_size("lots"), None);
/// ```
pub fn parse_size(input: &str) -> Option<u64> {
    let s = input.trim();
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, unit) = s.split_at(digits_end);
    if digits.is_empty() {
        return None;
    }
    let value: u64 = digits.parse().ok()?;

    let unit = unit.trim_start().to_ascii_uppercase();
    let unit = unit
        .strip_suffix("IB")
        .or_else(|| unit.strip_suffix('B'))
        .unwrap_or(unit.as_str());
    let multiplier = match unit {
        "" => 1,
        "K" => BYTES_KIB,
        "M" => BYTES_MIB,
        "G" => BYTES_GIB,
        _ => return None,
    };
    value.checked_mul(multiplier)
}
