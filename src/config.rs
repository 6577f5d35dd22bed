use crate::error::Result;
use crate::git::GitUser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file looked up in the working and config directories
pub const CONFIG_FILE_NAME: &str = "release-train.toml";

/// Represents the complete configuration for release-train.
///
/// Every section is optional; missing keys fall back to the defaults used on
/// GitHub Actions.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub github: GithubConfig,
}

fn default_main_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_user_name() -> String {
    "github-actions[bot]".to_string()
}

fn default_user_email() -> String {
    "41898282+github-actions[bot]@users.noreply.github.com".to_string()
}

/// Local repository settings and the committer identity.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_main_branch")]
    pub main_branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_user_name")]
    pub user_name: String,

    #[serde(default = "default_user_email")]
    pub user_email: String,
}

impl GitConfig {
    pub fn user(&self) -> GitUser {
        GitUser {
            name: self.user_name.clone(),
            email: self.user_email.clone(),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            main_branch: default_main_branch(),
            remote: default_remote(),
            user_name: default_user_name(),
            user_email: default_user_email(),
        }
    }
}

fn default_manifest_path() -> String {
    "./package.json".to_string()
}

fn default_manifest_tool() -> String {
    "yq".to_string()
}

/// Where the package version lives and which tool edits it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ManifestConfig {
    #[serde(default = "default_manifest_path")]
    pub path: String,

    #[serde(default = "default_manifest_tool")]
    pub tool: String,
}

impl ManifestConfig {
    /// File name used in commit messages, e.g. `package.json`
    pub fn file_name(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.path)
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            path: default_manifest_path(),
            tool: default_manifest_tool(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_url: default_api_url(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-train.toml` in current directory
/// 3. `release-train.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// An explicit path that cannot be read is an error; the implicit locations
/// are only used when they exist.
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if local.exists() {
        fs::read_to_string(local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}
