//! Branch naming conventions of the release train
//!
//! - `cut/x.y`: proposes opening the `x.y` release line
//! - `release/x.y`: a long-lived release line
//! - `release/x.y.z[-beta.n]`: a pending beta or candidate release of a line
//!
//! Parsers return `None` for anything that does not match so that callers can
//! skip unrelated branches without aborting.

use crate::domain::version::{MajorMinor, Version};
use regex::Regex;
use std::sync::OnceLock;

pub const RELEASE_BRANCH_PREFIX: &str = "release";
pub const CUT_BRANCH_PREFIX: &str = "cut";

fn branch_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(r"^([^/]+)/([^/]+)$").expect("branch shape regex is valid"))
}

/// Split `prefix/suffix`, returning the suffix when the prefix matches and no
/// further segments follow.
fn suffix_for<'a>(prefix: &str, branch: &'a str) -> Option<&'a str> {
    let captures = branch_shape().captures(branch)?;
    if captures.get(1)?.as_str() != prefix {
        return None;
    }
    captures.get(2).map(|m| m.as_str())
}

/// Parse `cut/x.y`
pub fn parse_cut_branch(name: &str) -> Option<MajorMinor> {
    MajorMinor::parse(suffix_for(CUT_BRANCH_PREFIX, name)?).ok()
}

/// Parse a release line branch `release/x.y`
pub fn parse_release_line_branch(name: &str) -> Option<MajorMinor> {
    MajorMinor::parse(suffix_for(RELEASE_BRANCH_PREFIX, name)?).ok()
}

/// Parse a versioned release branch `release/<version>`
pub fn parse_release_branch(name: &str) -> Option<Version> {
    Version::parse(suffix_for(RELEASE_BRANCH_PREFIX, name)?).ok()
}

pub fn cut_branch(version: MajorMinor) -> String {
    format!("{}/{}", CUT_BRANCH_PREFIX, version)
}

pub fn release_line_branch(version: MajorMinor) -> String {
    format!("{}/{}", RELEASE_BRANCH_PREFIX, version)
}

pub fn release_branch(version: &Version) -> String {
    format!("{}/{}", RELEASE_BRANCH_PREFIX, version)
}

/// Cut branch used by the label-driven flow, which nests the release line
/// name (`cut/release/x.y`).
pub fn labelled_cut_branch(version: MajorMinor) -> String {
    format!("{}/{}", CUT_BRANCH_PREFIX, release_line_branch(version))
}

/// Test for a versioned release branch.
///
/// With `Some(true)` only pre-release versions match; otherwise every
/// versioned release branch matches.
pub fn is_release_branch(name: &str, pre_release: Option<bool>) -> bool {
    match parse_release_branch(name) {
        None => false,
        Some(version) => match pre_release {
            Some(true) => version.is_pre_release(),
            _ => true,
        },
    }
}

/// Role a branch plays in the release train
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchRole {
    Cut(MajorMinor),
    ReleaseLine(MajorMinor),
    Release(Version),
    Other,
}

impl BranchRole {
    pub fn classify(name: &str) -> Self {
        if let Some(version) = parse_cut_branch(name) {
            BranchRole::Cut(version)
        } else if let Some(version) = parse_release_line_branch(name) {
            BranchRole::ReleaseLine(version)
        } else if let Some(version) = parse_release_branch(name) {
            BranchRole::Release(version)
        } else {
            BranchRole::Other
        }
    }
}
