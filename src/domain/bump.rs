//! Version bump policy for the beta -> candidate pipeline

use crate::domain::prerelease::PreRelease;
use crate::domain::version::{PatchLevel, Version, VersionComponent};
use crate::error::{ReleaseTrainError, Result};

/// Stage a version is being bumped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    /// Next beta. The component is only used when starting a new beta series.
    Beta(VersionComponent),
    /// Freeze the current beta into a plain release version.
    Candidate,
}

impl BumpKind {
    /// Beta bump on the patch component
    pub fn beta() -> Self {
        BumpKind::Beta(VersionComponent::Patch)
    }
}

/// Compute the next version for the given stage.
///
/// - **Beta** on a beta version: only the counter moves (`1.2.3-beta.1` -> `1.2.3-beta.2`).
/// - **Beta** otherwise: only the selected component is incremented and
///   `-beta.0` is attached (`1.2.3` minor -> `1.3.3-beta.0`). An unreleased `x`
///   patch becomes the line's first patch, so `1.0.x` -> `1.0.0-beta.0`.
/// - **Candidate**: the beta pre-release is dropped. Anything that is not a beta
///   is rejected.
pub fn bump_version(version: &Version, kind: BumpKind) -> Result<Version> {
    match kind {
        BumpKind::Beta(component) => {
            if let Some(pre_release) =
                version.pre_release.as_ref().filter(|pr| pr.identifier.is_beta())
            {
                return Ok(Version {
                    pre_release: Some(pre_release.increment()?),
                    ..version.clone()
                });
            }

            let mut next = version.clone();
            match component {
                VersionComponent::Major => next.major = increment(version.major, component)?,
                VersionComponent::Minor => next.minor = increment(version.minor, component)?,
                VersionComponent::Patch => {
                    next.patch = PatchLevel::Released(match version.patch {
                        PatchLevel::Unreleased => 0,
                        PatchLevel::Released(n) => increment(n, component)?,
                    })
                }
            }
            next.pre_release = Some(PreRelease::first_beta());
            Ok(next)
        }
        BumpKind::Candidate => {
            if !version.is_beta() {
                return Err(ReleaseTrainError::precondition(format!(
                    "Candidate versions can only be created from beta versions, but found: {}",
                    version
                )));
            }

            Ok(Version {
                pre_release: None,
                ..version.clone()
            })
        }
    }
}

fn increment(value: u32, component: VersionComponent) -> Result<u32> {
    value.checked_add(1).ok_or_else(|| {
        ReleaseTrainError::version(format!("Cannot bump {} version past {}", component, value))
    })
}
