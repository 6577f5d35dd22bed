pub mod changelog;
pub mod ci;
pub mod config;
pub mod domain;
pub mod error;
pub mod exec;
pub mod forge;
pub mod git;
pub mod manifest;
pub mod release;
pub mod telemetry;
pub mod ui;

pub use error::{ReleaseTrainError, Result};
