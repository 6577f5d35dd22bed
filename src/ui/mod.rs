//! User interface module - run summaries and failure reporting.

pub mod formatter;

pub use formatter::{
    display_error, display_outputs, display_status, display_success, format_outputs,
};

use crate::ci;

/// Report a fatal error.
///
/// Inside GitHub Actions the message becomes an `::error::` annotation on
/// stdout so it shows up on the failed step.
pub fn report_failure(message: &str) {
    if ci::is_actions() {
        println!("{}", ci::error_annotation(message));
    }
    display_error(message);
}
