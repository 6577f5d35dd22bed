use crate::domain::prerelease::PreRelease;
use crate::error::{ReleaseTrainError, Result};
use std::fmt;
use std::str::FromStr;

/// Patch component of a version
///
/// A freshly cut release line has no published patch yet, which is written as
/// `x` in the manifest (`1.2.x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchLevel {
    Unreleased,
    Released(u32),
}

impl fmt::Display for PatchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchLevel::Unreleased => write!(f, "x"),
            PatchLevel::Released(n) => write!(f, "{}", n),
        }
    }
}

/// Semantic version as carried by the package manifest and release branches
///
/// Serialised as `MAJOR.MINOR.PATCH[-identifier.N]`, where PATCH may be the
/// `x` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: PatchLevel,
    pub pre_release: Option<PreRelease>,
}

impl Version {
    /// Create a new released version without pre-release
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch: PatchLevel::Released(patch),
            pre_release: None,
        }
    }

    /// Placeholder version for a release line with nothing published (`x.y.x`)
    pub fn unreleased(major: u32, minor: u32) -> Self {
        Version {
            major,
            minor,
            patch: PatchLevel::Unreleased,
            pre_release: None,
        }
    }

    pub fn with_pre_release(mut self, pre_release: PreRelease) -> Self {
        self.pre_release = Some(pre_release);
        self
    }

    /// Parse a version string (e.g. "1.2.3", "1.2.x", "1.2.3-beta.0")
    pub fn parse(s: &str) -> Result<Self> {
        let (core, pre_release) = match s.split_once('-') {
            Some((core, suffix)) => (core, Some(PreRelease::parse(suffix)?)),
            None => (s, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseTrainError::version(format!(
                "Invalid version format: '{}' - expected MAJOR.MINOR.PATCH",
                s
            )));
        }

        let major = parse_number(parts[0], "major", s)?;
        let minor = parse_number(parts[1], "minor", s)?;
        let patch = if parts[2] == "x" {
            PatchLevel::Unreleased
        } else {
            PatchLevel::Released(parse_number(parts[2], "patch", s)?)
        };

        Ok(Version {
            major,
            minor,
            patch,
            pre_release,
        })
    }

    pub fn is_pre_release(&self) -> bool {
        self.pre_release.is_some()
    }

    pub fn is_beta(&self) -> bool {
        self.pre_release
            .as_ref()
            .is_some_and(|pr| pr.identifier.is_beta())
    }
}

/// Parse a numeric version part in canonical form: ASCII digits only and no
/// leading zero, so that every accepted string serialises back unchanged.
pub(crate) fn parse_number(part: &str, component: &str, input: &str) -> Result<u32> {
    let invalid = || {
        ReleaseTrainError::version(format!(
            "Invalid {} version '{}' in '{}'",
            component, part, input
        ))
    };

    // u32::from_str accepts a leading '+', which is not valid here
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(invalid());
    }

    part.parse::<u32>().map_err(|_| invalid())
}

impl FromStr for Version {
    type Err = ReleaseTrainError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre_release) = &self.pre_release {
            write!(f, "-{}", pre_release)?;
        }
        Ok(())
    }
}

/// Version component selected by a bump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionComponent {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionComponent::Major => write!(f, "major"),
            VersionComponent::Minor => write!(f, "minor"),
            VersionComponent::Patch => write!(f, "patch"),
        }
    }
}

/// Major and minor component of a release line (`release/x.y`, `cut/x.y`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MajorMinor {
    pub major: u32,
    pub minor: u32,
}

impl MajorMinor {
    pub fn new(major: u32, minor: u32) -> Self {
        MajorMinor { major, minor }
    }

    /// Parse a string in the form `major.minor`
    pub fn parse(s: &str) -> Result<Self> {
        let (major, minor) = s.split_once('.').ok_or_else(|| {
            ReleaseTrainError::version(format!("Expected 'major.minor' string: {}", s))
        })?;
        Ok(MajorMinor {
            major: parse_number(major, "major", s)?,
            minor: parse_number(minor, "minor", s)?,
        })
    }
}

impl fmt::Display for MajorMinor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
