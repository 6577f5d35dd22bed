//! Package manifest version field, read and written through the edit tool

use crate::config::ManifestConfig;
use crate::domain::Version;
use crate::error::Result;
use crate::exec::Exec;

/// Arguments that print the version field
pub fn read_args(config: &ManifestConfig) -> Vec<String> {
    vec!["-r".to_string(), ".version".to_string(), config.path.clone()]
}

/// Arguments that rewrite the version field in place
pub fn write_args(config: &ManifestConfig, version: &str) -> Vec<String> {
    vec![
        "-i".to_string(),
        format!(".version = \"{}\"", version),
        config.path.clone(),
    ]
}

/// Raw version string stored in the manifest
pub fn get_package_version(exec: &dyn Exec, config: &ManifestConfig) -> Result<String> {
    let stdout = exec.exec_output(&config.tool, &read_args(config))?;
    Ok(stdout.trim().to_string())
}

/// Parsed manifest version
pub fn read_version(exec: &dyn Exec, config: &ManifestConfig) -> Result<Version> {
    Version::parse(&get_package_version(exec, config)?)
}

pub fn set_package_version(exec: &dyn Exec, config: &ManifestConfig, version: &str) -> Result<()> {
    tracing::info!(version, path = %config.path, "writing manifest version");
    exec.exec(&config.tool, &write_args(config, version))
}
