//! External command execution
//!
//! The package manifest is only ever read and written through an external
//! editing tool, so command execution sits behind the [Exec] trait.

use crate::error::{ReleaseTrainError, Result};
use std::collections::HashMap;
use std::process::Command;
use std::sync::Mutex;

/// Runs external tools
pub trait Exec {
    /// Run a tool, failing on a non-zero exit code
    fn exec(&self, tool: &str, args: &[String]) -> Result<()>;

    /// Run a tool and capture its standard output
    fn exec_output(&self, tool: &str, args: &[String]) -> Result<String>;
}

/// Executes tools as child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExec;

impl SystemExec {
    fn run(tool: &str, args: &[String]) -> Result<std::process::Output> {
        tracing::debug!(tool, ?args, "running");

        let output = Command::new(tool)
            .args(args)
            .output()
            .map_err(|e| ReleaseTrainError::exec(format!("Failed to execute {}: {}", tool, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(ReleaseTrainError::exec(format!(
                "{} failed with exit code {}\nStdout: {}\nStderr: {}",
                tool,
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        Ok(output)
    }
}

impl Exec for SystemExec {
    fn exec(&self, tool: &str, args: &[String]) -> Result<()> {
        Self::run(tool, args).map(|_| ())
    }

    fn exec_output(&self, tool: &str, args: &[String]) -> Result<String> {
        let output = Self::run(tool, args)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// A recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCall {
    pub tool: String,
    pub args: Vec<String>,
    pub captured: bool,
}

/// Mock executor returning canned output per tool
#[derive(Default)]
pub struct MockExec {
    outputs: HashMap<String, String>,
    calls: Mutex<Vec<ExecCall>>,
}

impl MockExec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned stdout for every captured run of `tool`
    pub fn with_output(mut self, tool: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.outputs.insert(tool.into(), stdout.into());
        self
    }

    pub fn calls(&self) -> Vec<ExecCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, tool: &str, args: &[String], captured: bool) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(ExecCall {
                tool: tool.to_string(),
                args: args.to_vec(),
                captured,
            });
        }
    }
}

impl Exec for MockExec {
    fn exec(&self, tool: &str, args: &[String]) -> Result<()> {
        self.record(tool, args, false);
        Ok(())
    }

    fn exec_output(&self, tool: &str, args: &[String]) -> Result<String> {
        self.record(tool, args, true);
        self.outputs
            .get(tool)
            .cloned()
            .ok_or_else(|| ReleaseTrainError::exec(format!("no output configured for {}", tool)))
    }
}
