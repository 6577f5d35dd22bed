//! Release train orchestrators
//!
//! Each flow locates the single open pull request it owns, reuses it when it
//! still fits, and otherwise creates fresh branches and a new pull request,
//! carrying changelog items forward. Finding more than one candidate pull
//! request aborts the run: it means two runs raced and a human has to close
//! the duplicate.

pub mod create_cut_pr;
pub mod create_release_pr;
pub mod cut_release_pr;

pub use create_cut_pr::create_cut_pr;
pub use create_release_pr::create_release_pr;
pub use cut_release_pr::cut_release_pr;

use crate::changelog;
use crate::config::Config;
use crate::domain::{branch, MajorMinor, Severity};
use crate::error::{ReleaseTrainError, Result};
use crate::exec::Exec;
use crate::forge::{Forge, PullRequest};
use crate::git::Git;

/// Everything a flow needs for one run
pub struct Ctx<'a> {
    pub config: &'a Config,
    /// Branch the run was triggered on
    pub ref_name: String,
    pub git: &'a dyn Git,
    pub forge: &'a dyn Forge,
    pub exec: &'a dyn Exec,
    /// Merged pull request that triggered the run, if any
    pub pr: Option<PullRequest>,
}

/// Named values handed to later CI steps
pub trait StepOutputs {
    fn outputs(&self) -> Vec<(&'static str, String)>;
}

/// Result of the cut flows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutResult {
    pub cut_pr_number: u64,
    /// Release line branch the cut PR targets
    pub cut_branch: String,
}

impl StepOutputs for CutResult {
    fn outputs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("cut-pr-number", self.cut_pr_number.to_string()),
            ("cut-branch", self.cut_branch.clone()),
        ]
    }
}

/// Result of the release flow; empty when the run exited early
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseResult {
    pub release_pr_number: Option<u64>,
    pub release_pr_head: Option<String>,
    pub release_version: Option<String>,
}

impl StepOutputs for ReleaseResult {
    fn outputs(&self) -> Vec<(&'static str, String)> {
        let mut outputs = Vec::new();
        if let Some(number) = self.release_pr_number {
            outputs.push(("release-pr-number", number.to_string()));
        }
        if let Some(head) = &self.release_pr_head {
            outputs.push(("release-pr-head", head.clone()));
        }
        if let Some(version) = &self.release_version {
            outputs.push(("release-version", version.clone()));
        }
        outputs
    }
}

/// Next release line to cut, based on the `release/x.y` branches in the repository.
///
/// Without any release line the first cut is `0.0` whatever the severity.
pub fn next_cut_version(forge: &dyn Forge, severity: Severity) -> Result<MajorMinor> {
    let mut latest: Option<MajorMinor> = None;
    for name in forge.branches() {
        let name = name?;
        if let Some(line) = branch::parse_release_line_branch(&name) {
            if latest.map_or(true, |current| line > current) {
                latest = Some(line);
            }
        }
    }

    let next = match latest {
        None => MajorMinor::new(0, 0),
        Some(line) => {
            let overflow = || {
                ReleaseTrainError::version(format!(
                    "Cannot cut a {} release after release/{}",
                    severity, line
                ))
            };
            match severity {
                Severity::Major => {
                    MajorMinor::new(line.major.checked_add(1).ok_or_else(overflow)?, 0)
                }
                Severity::Minor => {
                    MajorMinor::new(line.major, line.minor.checked_add(1).ok_or_else(overflow)?)
                }
            }
        }
    };
    tracing::debug!(?latest, %severity, %next, "computed next cut version");
    Ok(next)
}

/// `#a, #b` listing for duplicate pull request errors
pub(crate) fn pr_numbers(prs: &[&PullRequest]) -> String {
    prs.iter()
        .map(|pr| format!("#{}", pr.number))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Items of a pull request that is about to be replaced
pub(crate) fn carried_items(pr: &PullRequest) -> Result<Vec<String>> {
    Ok(changelog::parse(pr.body.as_deref().unwrap_or_default())?.items)
}

/// Append `items` to the changelog of `pr`, one at a time, in order
pub(crate) fn append_changelog(
    forge: &dyn Forge,
    pr: PullRequest,
    items: &[String],
) -> Result<PullRequest> {
    if items.is_empty() {
        return Ok(pr);
    }

    let body = items.iter().try_fold(
        pr.body.clone().unwrap_or_default(),
        |body, item| changelog::append_item(&body, item),
    )?;
    tracing::info!(number = pr.number, count = items.len(), "updating changelog");
    forge.update_pull_request_body(pr.number, &body)
}

/// Fail unless at most one pull request matched
pub(crate) fn ensure_single<'p>(
    prs: impl IntoIterator<Item = &'p PullRequest>,
    message: &str,
) -> Result<()> {
    let prs: Vec<&PullRequest> = prs.into_iter().collect();
    if prs.len() > 1 {
        return Err(ReleaseTrainError::invariant(format!(
            "{}: {}",
            message,
            pr_numbers(&prs)
        )));
    }
    Ok(())
}
