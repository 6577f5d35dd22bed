use super::{append_changelog, carried_items, ensure_single, Ctx, ReleaseResult};
use crate::changelog;
use crate::domain::{branch, bump_version, BumpKind, Version};
use crate::error::{ReleaseTrainError, Result};
use crate::forge::{NewPullRequest, PullRequest, PullRequestFilter};
use crate::manifest;

/// Keep one beta or candidate release PR open against a `release/x.y` line.
///
/// Merging a cut PR or a beta release PR seeds the changelog from its body.
/// Merging a beta release PR opens the candidate; merging a final release PR
/// ends the run without doing anything.
pub fn create_release_pr(ctx: &Ctx<'_>) -> Result<ReleaseResult> {
    if branch::parse_release_line_branch(&ctx.ref_name).is_none() {
        return Err(ReleaseTrainError::precondition(
            "This action can only be run on a `release/x.y` branch.",
        ));
    }

    let mut items = Vec::new();
    if let Some(pr) = &ctx.pr {
        let carries_changelog = branch::parse_cut_branch(&pr.head).is_some()
            || branch::is_release_branch(&pr.head, Some(true));
        let has_body = pr.body.as_deref().is_some_and(|body| !body.is_empty());

        if carries_changelog && has_body {
            items.extend(changelog::items_or_empty(pr.body.as_deref()));
        } else if branch::is_release_branch(&pr.head, None) {
            tracing::info!(number = pr.number, "triggered by a merged release PR, exiting");
            return Ok(ReleaseResult::default());
        } else if pr.wants_changelog() {
            items.push(pr.changelog_entry());
        }
    }

    let mut matches = Vec::new();
    for pr in ctx.forge.pull_requests(&PullRequestFilter::with_base(&ctx.ref_name)) {
        let pr = pr?;
        if let Some(version) = branch::parse_release_branch(&pr.head) {
            matches.push((pr, version));
        }
    }
    ensure_single(
        matches.iter().map(|(pr, _)| pr),
        "Multiple release PRs were found, when only one can exist",
    )?;

    let mut existing = None;
    if let Some((pr, version)) = matches.pop() {
        if version.is_pre_release() {
            tracing::info!(number = pr.number, %version, "reusing release PR");
            existing = Some((pr, version));
        } else {
            // The candidate is outdated once anything else lands on the line.
            tracing::info!(number = pr.number, %version, "replacing outdated candidate PR");
            let mut carried = carried_items(&pr)?;
            carried.append(&mut items);
            items = carried;
            ctx.forge.close_pull_request(pr.number)?;
        }
    }

    let (release_pr, version) = match existing {
        Some(found) => found,
        None => {
            let version = next_release_version(ctx)?;
            (open_release_pr(ctx, &version)?, version)
        }
    };

    let release_pr = append_changelog(ctx.forge, release_pr, &items)?;
    Ok(ReleaseResult {
        release_pr_number: Some(release_pr.number),
        release_pr_head: Some(release_pr.head),
        release_version: Some(version.to_string()),
    })
}

/// Manifest version bumped to the next beta, or to the candidate when a beta was just merged
fn next_release_version(ctx: &Ctx<'_>) -> Result<Version> {
    let current = manifest::read_version(ctx.exec, &ctx.config.manifest)?;
    let mut version = bump_version(&current, BumpKind::beta())?;

    let merged_beta = ctx
        .pr
        .as_ref()
        .and_then(|pr| branch::parse_release_branch(&pr.head))
        .is_some_and(|merged| merged.is_beta());
    if merged_beta {
        version = bump_version(&version, BumpKind::Candidate)?;
    }

    tracing::info!(%current, %version, "bumped package version");
    Ok(version)
}

fn open_release_pr(ctx: &Ctx<'_>, version: &Version) -> Result<PullRequest> {
    let base_branch = ctx.ref_name.as_str();
    let release_branch = branch::release_branch(version);
    let manifest = &ctx.config.manifest;

    ctx.git.fetch()?;
    ctx.git.create_branch(&release_branch, Some(base_branch))?;
    ctx.git.checkout(&release_branch)?;

    let package_version = version.to_string();
    manifest::set_package_version(ctx.exec, manifest, &package_version)?;
    ctx.git.commit(
        &format!("bump {} version to {}", manifest.file_name(), package_version),
        &[manifest.path.as_str()],
    )?;
    ctx.git.push(&[&release_branch], true)?;

    ctx.git.checkout(base_branch)?;

    let header = format!(
        "> [!important]\n> Merging this PR will publish {}\n\n---\n",
        package_version
    );
    ctx.forge.create_pull_request(&NewPullRequest {
        head: release_branch,
        base: base_branch.to_string(),
        title: format!("Release {}", package_version),
        body: changelog::generate::<&str>(&header, &[]),
    })
}
