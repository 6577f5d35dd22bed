//! Pure formatting functions for terminal output.
//!
//! Logs go to stderr through `tracing`; these helpers print the human-facing
//! summary of a run.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Render step outputs as an aligned `key: value` block.
pub fn format_outputs(outputs: &[(&str, String)]) -> String {
    let width = outputs.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    outputs
        .iter()
        .map(|(key, value)| format!("  {:<width$}  {}", key, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display the outputs produced by a run.
pub fn display_outputs(outputs: &[(&str, String)]) {
    if outputs.is_empty() {
        display_status("Nothing to do");
        return;
    }
    eprintln!("\n{}", style("Outputs:").bold());
    eprintln!("{}", format_outputs(outputs));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_outputs_aligns_keys() {
        let rendered = format_outputs(&[
            ("cut-pr-number", "12".to_string()),
            ("cut-branch", "release/1.1".to_string()),
        ]);
        assert_eq!(
            rendered,
            "  cut-pr-number  12\n  cut-branch     release/1.1"
        );
    }

    #[test]
    fn test_format_outputs_empty() {
        assert_eq!(format_outputs(&[]), "");
    }
}
