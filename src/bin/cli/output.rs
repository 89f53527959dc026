//! Output formatting for CLI operations.

use serde_json::json;
use std::path::Path;
use zippart::progress::format_bytes;
use zippart::{Error, MergeResult, SplitResult};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats split results
    fn format_split_result(&self, input: &Path, result: &SplitResult) -> String;

    /// Formats merge results
    fn format_merge_result(&self, result: &MergeResult) -> String;

    /// Formats a failure
    fn format_error(&self, error: &Error) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_split_result(&self, input: &Path, result: &SplitResult) -> String {
        let mut output = String::new();

        if result.parts.is_empty() {
            output.push_str(&format!(
                "{} is empty: no parts written (there is nothing to merge later)\n",
                input.display()
            ));
            return output;
        }

        output.push_str(&format!(
            "Split {} ({}) into {} parts\n",
            input.display(),
            format_bytes(result.bytes_read),
            result.part_count()
        ));
        if let (Some(first), Some(last)) = (result.parts.first(), result.parts.last()) {
            output.push_str(&format!("  First: {}\n", first.path.display()));
            output.push_str(&format!(
                "  Last:  {} ({})\n",
                last.path.display(),
                format_bytes(last.size)
            ));
        }

        output
    }

    fn format_merge_result(&self, result: &MergeResult) -> String {
        let mut output = format!(
            "Merged {} parts into {} ({})\n",
            result.part_count,
            result.output.display(),
            format_bytes(result.bytes_written)
        );

        if !result.skipped.is_empty() {
            output.push_str(&format!(
                "Skipped {} unnumbered files:\n",
                result.skipped.len()
            ));
            for path in &result.skipped {
                output.push_str(&format!("  {}\n", path.display()));
            }
        }

        output
    }

    fn format_error(&self, error: &Error) -> String {
        format!("Error: {}\n", error)
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_split_result(&self, input: &Path, result: &SplitResult) -> String {
        let obj = json!({
            "success": true,
            "input": input.display().to_string(),
            "part_count": result.part_count(),
            "bytes_read": result.bytes_read,
            "parts": result.parts.iter().map(|p| json!({
                "sequence": p.sequence,
                "path": p.path.display().to_string(),
                "size": p.size,
            })).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_merge_result(&self, result: &MergeResult) -> String {
        let obj = json!({
            "success": true,
            "output": result.output.display().to_string(),
            "part_count": result.part_count,
            "bytes_written": result.bytes_written,
            "skipped": result.skipped.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_error(&self, error: &Error) -> String {
        let obj = json!({
            "success": false,
            "error": error.to_string(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}
