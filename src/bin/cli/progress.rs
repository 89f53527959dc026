//! Progress bar implementation for CLI operations.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use zippart::ProgressReporter;

/// Progress display for split and merge operations
pub struct CliProgress {
    bar: ProgressBar,
    verbose: bool,
}

impl CliProgress {
    /// Creates a new progress display
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb
        };

        Self { bar, verbose }
    }

    /// Finishes the progress display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn on_total(&mut self, total_bytes: u64) {
        self.bar.set_length(total_bytes);
    }

    fn on_part_start(&mut self, sequence: u32, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.bar.set_message(format!("part {sequence}: {name}"));
    }

    fn on_part_complete(&mut self, sequence: u32, bytes: u64) {
        self.bar.inc(bytes);
        if self.verbose {
            self.bar.println(format!("  part {sequence:>4}  {bytes} bytes"));
        }
    }

    fn on_warning(&mut self, message: &str) {
        // Warnings are shown even in quiet mode
        self.bar.suspend(|| eprintln!("Warning: {}", message));
    }
}
