//! Part file naming template.
//!
//! Every part file name is built from a fixed prefix, a zero-padded decimal
//! sequence number and a fixed suffix:
//!
//! - `Part_001.zippart` - First part
//! - `Part_002.zippart` - Second part
//! - `Part_1000.zippart` - Thousandth part (the field grows, it never wraps)
//!
//! Merging never relies on lexical order of these names. The sequence number
//! is extracted with a pattern match and compared as an integer, so
//! `Part_1000` sorts after `Part_999` even though it sorts before it as text.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::{Error, Result};

/// Default file name prefix.
pub const DEFAULT_PREFIX: &str = "Part_";
/// Default file name suffix.
pub const DEFAULT_SUFFIX: &str = ".zippart";
/// Default minimum width of the sequence field.
pub const DEFAULT_WIDTH: usize = 3;
/// Largest accepted sequence field width (enough for any `u32`).
pub const MAX_WIDTH: usize = 10;

/// Naming template for part files.
///
/// # Example
///
/// ```rust
/// use zippart::PartNaming;
///
/// let naming = PartNaming::default();
/// assert_eq!(naming.file_name(1), "Part_001.zippart");
/// assert_eq!(naming.file_name(42), "Part_042.zippart");
/// assert_eq!(naming.file_name(1000), "Part_1000.zippart");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartNaming {
    prefix: String,
    suffix: String,
    width: usize,
}

impl PartNaming {
    /// Creates a naming template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNaming`] if the prefix or suffix contains a path
    /// separator or NUL byte, if both are empty, or if `width` is not in
    /// `1..=10`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use zippart::PartNaming;
    ///
    /// let naming = PartNaming::new("backup.zip.", "", 4)?;
    /// assert_eq!(naming.file_name(7), "backup.zip.0007");
    /// # Ok::<(), zippart::Error>(())
    /// ```
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>, width: usize) -> Result<Self> {
        let prefix = prefix.into();
        let suffix = suffix.into();

        for (label, value) in [("prefix", &prefix), ("suffix", &suffix)] {
            if value.chars().any(|c| c == '/' || c == '\\' || c == '\0') {
                return Err(Error::InvalidNaming(format!(
                    "{label} '{value}' must not contain path separators or NUL"
                )));
            }
        }
        if prefix.is_empty() && suffix.is_empty() {
            return Err(Error::InvalidNaming(
                "prefix and suffix cannot both be empty".to_string(),
            ));
        }
        if !(1..=MAX_WIDTH).contains(&width) {
            return Err(Error::InvalidNaming(format!(
                "width {width} must be between 1 and {MAX_WIDTH}"
            )));
        }

        Ok(Self {
            prefix,
            suffix,
            width,
        })
    }

    /// Returns the file name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the file name suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns the minimum width of the sequence field.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Generates the file name for a sequence number (1-indexed).
    ///
    /// Numbers wider than [`width`](Self::width) are written in full.
    pub fn file_name(&self, sequence: u32) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            sequence,
            self.suffix,
            width = self.width
        )
    }

    /// Generates the path of a part inside `dir`.
    pub fn part_path(&self, dir: impl AsRef<Path>, sequence: u32) -> PathBuf {
        dir.as_ref().join(self.file_name(sequence))
    }

    /// Compiles the template into a matcher for classifying file names.
    pub fn matcher(&self) -> Result<PartMatcher> {
        let pattern = format!(
            r"(?s)^{}(?:(?P<seq>[0-9]+)|.*){}$",
            regex::escape(&self.prefix),
            regex::escape(&self.suffix)
        );
        let regex = Regex::new(&pattern)
            .map_err(|e| Error::InvalidNaming(format!("cannot build part pattern: {e}")))?;
        Ok(PartMatcher { regex })
    }
}

impl Default for PartNaming {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            width: DEFAULT_WIDTH,
        }
    }
}

/// Classification of a directory entry name against a [`PartNaming`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartName {
    /// A part file carrying this sequence number.
    Numbered(u32),
    /// Matches the prefix and suffix, but the middle is not a usable number.
    Unnumbered,
    /// Not a part file.
    Foreign,
}

/// Compiled form of a [`PartNaming`] template.
#[derive(Debug, Clone)]
pub struct PartMatcher {
    regex: Regex,
}

impl PartMatcher {
    /// Classifies a file name.
    ///
    /// Names that are not valid UTF-8 are never part files. A numeric field
    /// too large for `u32` is reported as [`PartName::Unnumbered`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use zippart::{PartName, PartNaming};
    ///
    /// let matcher = PartNaming::default().matcher()?;
    /// assert_eq!(matcher.parse("Part_007.zippart".as_ref()), PartName::Numbered(7));
    /// assert_eq!(matcher.parse("Part_1234.zippart".as_ref()), PartName::Numbered(1234));
    /// assert_eq!(matcher.parse("Part_x.zippart".as_ref()), PartName::Unnumbered);
    /// assert_eq!(matcher.parse("notes.txt".as_ref()), PartName::Foreign);
    /// # Ok::<(), zippart::Error>(())
    /// ```
    pub fn parse(&self, file_name: &OsStr) -> PartName {
        let Some(name) = file_name.to_str() else {
            return PartName::Foreign;
        };
        let Some(caps) = self.regex.captures(name) else {
            return PartName::Foreign;
        };
        match caps.name("seq").map(|m| m.as_str().parse::<u32>()) {
            Some(Ok(sequence)) => PartName::Numbered(sequence),
            Some(Err(_)) | None => PartName::Unnumbered,
        }
    }
}
