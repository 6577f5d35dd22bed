use crate::domain::version::MajorMinor;
use std::fmt;
use std::str::FromStr;

/// Release severity of a change: decides which version component a cut moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Major,
    Minor,
}

impl Severity {
    /// Severity implied by a release line: `x.0` opens a major line.
    pub fn of_release_line(version: MajorMinor) -> Self {
        if version.minor == 0 {
            Severity::Major
        } else {
            Severity::Minor
        }
    }

    /// Whether an existing release line of severity `self` can absorb a change
    /// that needs `required`. Major requirements need a major line, minor
    /// requirements fit anywhere.
    pub fn fits(self, required: Severity) -> bool {
        match required {
            Severity::Major => self == Severity::Major,
            Severity::Minor => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Major => "major",
            Severity::Minor => "minor",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Severity::Major),
            "minor" => Ok(Severity::Minor),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_of_release_line() {
        assert_eq!(Severity::of_release_line(MajorMinor::new(2, 0)), Severity::Major);
        assert_eq!(Severity::of_release_line(MajorMinor::new(0, 0)), Severity::Major);
        assert_eq!(Severity::of_release_line(MajorMinor::new(1, 3)), Severity::Minor);
    }

    #[test]
    fn test_severity_fits() {
        assert!(Severity::Major.fits(Severity::Major));
        assert!(Severity::Major.fits(Severity::Minor));
        assert!(Severity::Minor.fits(Severity::Minor));
        assert!(!Severity::Minor.fits(Severity::Major));
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("major".parse::<Severity>().unwrap(), Severity::Major);
        assert_eq!("minor".parse::<Severity>().unwrap(), Severity::Minor);
        assert!("patch".parse::<Severity>().is_err());
    }
}
