//! GitHub Actions glue: event payload, step outputs and annotations

use crate::error::Result;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const EVENT_PATH_VAR: &str = "GITHUB_EVENT_PATH";
pub const OUTPUT_VAR: &str = "GITHUB_OUTPUT";

/// True when running inside a GitHub Actions job
pub fn is_actions() -> bool {
    env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Path of the triggering event payload, when the runner provides one
pub fn event_path() -> Option<PathBuf> {
    env::var_os(EVENT_PATH_VAR).map(PathBuf::from)
}

/// Path of the step output file, when the runner provides one
pub fn output_path() -> Option<PathBuf> {
    env::var_os(OUTPUT_VAR).map(PathBuf::from)
}

/// Number of the pull request that triggered the run.
///
/// Reads `pull_request.number` from the event payload and falls back to
/// `fallback` when there is no payload or it carries no pull request.
pub fn pull_request_number(event: Option<&Path>, fallback: Option<u64>) -> Result<Option<u64>> {
    let Some(path) = event else {
        return Ok(fallback);
    };

    let payload: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    let number = payload
        .get("pull_request")
        .and_then(|pr| pr.get("number"))
        .and_then(|n| n.as_u64());

    tracing::debug!(path = %path.display(), ?number, "read event payload");
    Ok(number.or(fallback))
}

/// Append `key=value` lines to the step output file, or print them when there is none
pub fn write_outputs(outputs: &[(&str, String)], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            for (key, value) in outputs {
                writeln!(file, "{}={}", key, value)?;
            }
        }
        None => {
            for (key, value) in outputs {
                println!("{}={}", key, value);
            }
        }
    }
    Ok(())
}

/// Workflow command that marks the step as failed with `message`
pub fn error_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{}", escaped)
}
