//! Pull request labels understood by the release train

use crate::domain::severity::Severity;
use crate::domain::version::VersionComponent;
use crate::error::{ReleaseTrainError, Result};

pub const VERSION_MAJOR_LABEL: &str = "version: major";
pub const VERSION_MINOR_LABEL: &str = "version: minor";
pub const VERSION_PATCH_LABEL: &str = "version: patch";

pub const MAJOR_SEVERITY_LABEL: &str = "release-severity: major";
pub const MINOR_SEVERITY_LABEL: &str = "release-severity: minor";

/// Marks a pull request for inclusion in the changelog
pub const CHANGELOG_LABEL: &str = "changelog";

/// Marks the pull request of the label-driven cut flow
pub const RELEASE_CUT_LABEL: &str = "release: cut";

fn version_label(label: &str) -> Option<VersionComponent> {
    match label {
        VERSION_MAJOR_LABEL => Some(VersionComponent::Major),
        VERSION_MINOR_LABEL => Some(VersionComponent::Minor),
        VERSION_PATCH_LABEL => Some(VersionComponent::Patch),
        _ => None,
    }
}

fn severity_label(label: &str) -> Option<Severity> {
    match label {
        MAJOR_SEVERITY_LABEL => Some(Severity::Major),
        MINOR_SEVERITY_LABEL => Some(Severity::Minor),
        _ => None,
    }
}

pub fn label_for_severity(severity: Severity) -> &'static str {
    match severity {
        Severity::Major => MAJOR_SEVERITY_LABEL,
        Severity::Minor => MINOR_SEVERITY_LABEL,
    }
}

/// Version component requested by a pull request's labels, if any.
///
/// Carrying more than one `version:` label is an error.
pub fn version_from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Option<VersionComponent>> {
    let mut found = None;
    for component in labels.iter().filter_map(|l| version_label(l.as_ref())) {
        if found.is_some() {
            return Err(ReleaseTrainError::label("multiple version labels detected."));
        }
        found = Some(component);
    }
    Ok(found)
}

/// Release severity recorded on a pull request, if any.
///
/// Carrying more than one `release-severity:` label is an error.
pub fn severity_from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Option<Severity>> {
    let mut found = None;
    for severity in labels.iter().filter_map(|l| severity_label(l.as_ref())) {
        if found.is_some() {
            return Err(ReleaseTrainError::label("multiple severity labels detected."));
        }
        found = Some(severity);
    }
    Ok(found)
}

pub fn changelog_from_labels<S: AsRef<str>>(labels: &[S]) -> bool {
    labels.iter().any(|l| l.as_ref() == CHANGELOG_LABEL)
}

/// Severity a merged pull request requires from the next release line.
///
/// Either label family can ask for a major release; everything else,
/// including an unlabelled pull request, is minor.
pub fn required_severity<S: AsRef<str>>(labels: &[S]) -> Severity {
    let major = labels
        .iter()
        .any(|l| matches!(l.as_ref(), VERSION_MAJOR_LABEL | MAJOR_SEVERITY_LABEL));
    if major {
        Severity::Major
    } else {
        Severity::Minor
    }
}
