//! CLI tool for splitting files into parts and merging them back.

mod commands;
mod exit_codes;
mod output;
mod progress;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// Split files into numbered parts and merge them back
#[derive(Parser)]
#[command(name = "zippart")]
#[command(author, version, about = "Split files into numbered parts and merge them back", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Print every part as it is processed
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a file into numbered parts (alias: s)
    #[command(alias = "s")]
    Split {
        /// File to split
        input: PathBuf,

        /// Directory to write parts into (created if missing)
        #[arg(short = 'o', long, default_value = ".")]
        output: PathBuf,

        /// Maximum part size in bytes; K, M and G suffixes are accepted
        #[arg(short = 'c', long, default_value = "15M", value_parser = parse_chunk_size)]
        chunk_size: u64,
    },

    /// Merge numbered parts back into one file (alias: m)
    #[command(alias = "m")]
    Merge {
        /// Directory containing the parts
        parts_dir: PathBuf,

        /// File to write (replaced if it exists)
        output: PathBuf,

        /// If no part carries a sequence number, merge in file name order
        /// instead of failing
        #[arg(long)]
        lexical_fallback: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Parses a chunk size argument such as `500`, `64K` or `15M`.
fn parse_chunk_size(value: &str) -> Result<u64, String> {
    match zippart::progress::parse_size(value) {
        Some(0) => Err("chunk size must be at least 1 byte".to_string()),
        Some(n) => Ok(n),
        None => Err(format!("invalid size '{value}' (expected e.g. 500, 64K, 15M)")),
    }
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = Cli::parse();
    let display = commands::DisplayOptions {
        format: cli.format,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let exit_code = match cli.command {
        Commands::Split {
            input,
            output,
            chunk_size,
        } => commands::split(&commands::SplitConfig {
            input: &input,
            output_dir: &output,
            chunk_size,
            display,
        }),

        Commands::Merge {
            parts_dir,
            output,
            lexical_fallback,
        } => commands::merge(&commands::MergeConfig {
            parts_dir: &parts_dir,
            output: &output,
            lexical_fallback,
            display,
        }),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chunk_size() {
        assert_eq!(parse_chunk_size("500"), Ok(500));
        assert_eq!(parse_chunk_size("15M"), Ok(15 * 1024 * 1024));
        assert!(parse_chunk_size("0").is_err());
        assert!(parse_chunk_size("big").is_err());
    }

    #[test]
    fn test_split_defaults() {
        let cli = Cli::try_parse_from(["zippart", "split", "archive.zip"]).unwrap();
        match cli.command {
            Commands::Split {
                input,
                output,
                chunk_size,
            } => {
                assert_eq!(input, PathBuf::from("archive.zip"));
                assert_eq!(output, PathBuf::from("."));
                assert_eq!(chunk_size, zippart::DEFAULT_CHUNK_SIZE);
            }
            _ => panic!("expected split command"),
        }
    }

    #[test]
    fn test_merge_arguments() {
        let cli = Cli::try_parse_from([
            "zippart",
            "merge",
            "parts",
            "out.zip",
            "--lexical-fallback",
            "-f",
            "json",
        ])
        .unwrap();
        assert!(cli.format == OutputFormat::Json);
        match cli.command {
            Commands::Merge {
                parts_dir,
                output,
                lexical_fallback,
            } => {
                assert_eq!(parts_dir, PathBuf::from("parts"));
                assert_eq!(output, PathBuf::from("out.zip"));
                assert!(lexical_fallback);
            }
            _ => panic!("expected merge command"),
        }
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["zippart", "-q", "-v", "merge", "p", "o"]).is_err());
    }
}
