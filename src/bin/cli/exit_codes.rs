//! Exit codes for the CLI tool.

use zippart::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Part set is empty, incomplete or ambiguous
pub const BAD_PART_SET: i32 = 3;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    FatalError,
    BadPartSet,
    IoError,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::FatalError => FATAL_ERROR,
            Self::BadPartSet => BAD_PART_SET,
            Self::IoError => IO_ERROR,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a zippart error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io { .. } | Error::NotFound { .. } => ExitCode::IoError,
        Error::EmptyPartSet { .. }
        | Error::MissingPart { .. }
        | Error::DuplicatePart { .. }
        | Error::UnnumberedParts { .. } => ExitCode::BadPartSet,
        Error::InvalidChunkSize(_)
        | Error::InvalidNaming(_)
        | Error::OutputIsPart { .. }
        | Error::InputIsPart { .. } => ExitCode::BadArgs,
        Error::TooManyParts => ExitCode::FatalError,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
