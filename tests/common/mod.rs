//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// The 26-letter pattern used by the reference scenarios.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Returns `len` bytes of repeating `ABC...Z`.
pub fn alphabet(len: usize) -> Vec<u8> {
    ALPHABET.iter().copied().cycle().take(len).collect()
}

/// Returns `len` bytes that differ at every offset within a 251-byte window,
/// so misplaced chunks are detected.
pub fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// A scratch area with an input file, a parts directory and an output path.
pub struct Workspace {
    pub dir: TempDir,
    pub input: PathBuf,
    pub parts: PathBuf,
    pub output: PathBuf,
}

impl Workspace {
    /// Creates a workspace whose input file holds `data`.
    ///
    /// The parts directory is not created; split is expected to create it.
    pub fn with_input(data: &[u8]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let input = dir.path().join("archive.zip");
        fs::write(&input, data).expect("Failed to write input");
        let parts = dir.path().join("parts");
        let output = dir.path().join("restored.zip");
        Self {
            dir,
            input,
            parts,
            output,
        }
    }

    /// Returns the sorted file names in the parts directory.
    pub fn part_names(&self) -> Vec<String> {
        list_names(&self.parts)
    }
}

/// Returns the sorted file names in `dir`.
pub fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
