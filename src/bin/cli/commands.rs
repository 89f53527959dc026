//! Command implementations for the CLI tool.

use std::path::Path;

use zippart::{FallbackOrdering, MergeOptions, Merger, SplitOptions, Splitter};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;
use crate::progress::CliProgress;

/// Display settings shared by all commands.
#[derive(Clone, Copy)]
pub struct DisplayOptions {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
}

/// Configuration for the split command.
pub struct SplitConfig<'a> {
    pub input: &'a Path,
    pub output_dir: &'a Path,
    pub chunk_size: u64,
    pub display: DisplayOptions,
}

/// Configuration for the merge command.
pub struct MergeConfig<'a> {
    pub parts_dir: &'a Path,
    pub output: &'a Path,
    pub lexical_fallback: bool,
    pub display: DisplayOptions,
}

/// Split command implementation
pub fn split(config: &SplitConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.display.format);
    let mut progress = progress_for(config.display);

    let result = {
        let options = SplitOptions::new()
            .chunk_size(config.chunk_size)
            .progress(&mut progress);
        Splitter::new(options).split(config.input, config.output_dir)
    };
    progress.finish();

    match result {
        Ok(result) => {
            print!("{}", formatter.format_split_result(config.input, &result));
            ExitCode::Success
        }
        Err(e) => {
            eprint!("{}", formatter.format_error(&e));
            error_to_exit_code(&e)
        }
    }
}

/// Merge command implementation
pub fn merge(config: &MergeConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.display.format);
    let mut progress = progress_for(config.display);

    let fallback = if config.lexical_fallback {
        FallbackOrdering::Lexical
    } else {
        FallbackOrdering::Reject
    };

    let result = {
        let options = MergeOptions::new()
            .fallback(fallback)
            .progress(&mut progress);
        Merger::new(options).merge(config.parts_dir, config.output)
    };
    progress.finish();

    match result {
        Ok(result) => {
            print!("{}", formatter.format_merge_result(&result));
            ExitCode::Success
        }
        Err(e) => {
            eprint!("{}", formatter.format_error(&e));
            error_to_exit_code(&e)
        }
    }
}

/// Builds the progress display; JSON output never draws a bar.
fn progress_for(display: DisplayOptions) -> CliProgress {
    let quiet = display.quiet || display.format == OutputFormat::Json;
    CliProgress::new(quiet, display.verbose && !quiet)
}
