//! Pre-release suffix handling (`-beta.3`, `-alpha.0`)
//!
//! The release train only ever produces `beta` pre-releases, but any identifier
//! allowed by semver.org is parsed so that callers can reject it explicitly.
//! See https://semver.org/#spec-item-9

use crate::domain::version::parse_number;
use crate::error::{ReleaseTrainError, Result};
use std::fmt;
use std::str::FromStr;

/// Pre-release identifier type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreReleaseType {
    Alpha,
    Beta,
    ReleaseCandidate,
    Custom(String),
}

impl PreReleaseType {
    /// Parse a pre-release identifier
    ///
    /// Accepts "alpha", "beta", "rc", or any single identifier that is valid in
    /// a semver pre-release. Dotted identifiers are rejected, the dot separates
    /// the identifier from the counter.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn is_beta(&self) -> bool {
        matches!(self, PreReleaseType::Beta)
    }
}

impl FromStr for PreReleaseType {
    type Err = ReleaseTrainError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s.contains('.') {
            return Err(ReleaseTrainError::version(format!(
                "Invalid pre-release identifier: '{}'",
                s
            )));
        }

        semver::Prerelease::new(s).map_err(|e| {
            ReleaseTrainError::version(format!("Invalid pre-release identifier '{}': {}", s, e))
        })?;

        Ok(match s {
            "alpha" => PreReleaseType::Alpha,
            "beta" => PreReleaseType::Beta,
            "rc" => PreReleaseType::ReleaseCandidate,
            other => PreReleaseType::Custom(other.to_string()),
        })
    }
}

impl fmt::Display for PreReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseType::Alpha => write!(f, "alpha"),
            PreReleaseType::Beta => write!(f, "beta"),
            PreReleaseType::ReleaseCandidate => write!(f, "rc"),
            PreReleaseType::Custom(s) => write!(f, "{}", s),
        }
    }
}

/// Pre-release component of a version: an identifier plus a counter
///
/// # Examples
/// - "beta.0" -> PreRelease { identifier: Beta, number: 0 }
/// - "alpha.2" -> PreRelease { identifier: Alpha, number: 2 }
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreRelease {
    pub identifier: PreReleaseType,
    pub number: u32,
}

impl PreRelease {
    pub fn new(identifier: PreReleaseType, number: u32) -> Self {
        PreRelease { identifier, number }
    }

    /// First beta of a release line (`beta.0`)
    pub fn first_beta() -> Self {
        PreRelease::new(PreReleaseType::Beta, 0)
    }

    /// Parse a pre-release suffix in the form `identifier.number`
    ///
    /// # Examples
    /// ```ignore
    /// let pr = PreRelease::parse("beta.1")?;
    /// assert_eq!(pr.identifier, PreReleaseType::Beta);
    /// assert_eq!(pr.number, 1);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let (identifier, number) = s.split_once('.').ok_or_else(|| {
            ReleaseTrainError::version(format!(
                "Pre-release '{}' must be in the form 'identifier.number'",
                s
            ))
        })?;

        let identifier = PreReleaseType::parse(identifier)?;
        let number = parse_number(number, "pre-release", s)?;

        Ok(PreRelease { identifier, number })
    }

    /// Next counter on the same identifier
    pub fn increment(&self) -> Result<Self> {
        let number = self.number.checked_add(1).ok_or_else(|| {
            ReleaseTrainError::version(format!("Cannot bump pre-release past {}", self))
        })?;
        Ok(PreRelease {
            identifier: self.identifier.clone(),
            number,
        })
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.identifier, self.number)
    }
}
