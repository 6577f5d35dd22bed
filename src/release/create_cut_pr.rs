use super::{append_changelog, carried_items, ensure_single, next_cut_version, CutResult, Ctx};
use crate::changelog;
use crate::domain::{branch, labels, MajorMinor, Severity};
use crate::error::{ReleaseTrainError, Result};
use crate::forge::{NewPullRequest, PullRequest, PullRequestFilter};
use crate::manifest;

/// Keep exactly one cut PR open on the main branch, sized for the changes merged so far.
///
/// A cut PR whose line is a minor release is upgraded to a major one when a
/// major change lands; the old PR is closed and its changelog carried over.
pub fn create_cut_pr(ctx: &Ctx<'_>) -> Result<CutResult> {
    let main_branch = ctx.git.main_branch();
    if ctx.ref_name != main_branch {
        return Err(ReleaseTrainError::precondition(format!(
            "This action can only be run on the {} branch",
            main_branch
        )));
    }

    let mut items = Vec::new();
    let required = match &ctx.pr {
        Some(pr) => {
            if pr.wants_changelog() {
                items.push(pr.title.clone());
            }
            labels::required_severity(&pr.labels)
        }
        None => Severity::Minor,
    };

    let mut matches = Vec::new();
    for pr in ctx.forge.pull_requests(&PullRequestFilter::open()) {
        let pr = pr?;
        if let Some(line) = branch::parse_cut_branch(&pr.head) {
            matches.push((pr, Severity::of_release_line(line)));
        }
    }
    ensure_single(
        matches.iter().map(|(pr, _)| pr),
        "Multiple cut PRs were found, when only one can exist",
    )?;

    let mut cut_pr = None;
    if let Some((pr, severity)) = matches.pop() {
        if severity.fits(required) {
            tracing::info!(number = pr.number, %severity, "reusing cut PR");
            cut_pr = Some(pr);
        } else {
            tracing::info!(number = pr.number, %severity, %required, "replacing outdated cut PR");
            let mut carried = carried_items(&pr)?;
            carried.append(&mut items);
            items = carried;
            ctx.forge.close_pull_request(pr.number)?;
        }
    }

    let cut_pr = match cut_pr {
        Some(pr) => pr,
        None => open_cut_pr(ctx, next_cut_version(ctx.forge, required)?)?,
    };

    let cut_pr = append_changelog(ctx.forge, cut_pr, &items)?;
    Ok(CutResult {
        cut_pr_number: cut_pr.number,
        cut_branch: cut_pr.base,
    })
}

fn open_cut_pr(ctx: &Ctx<'_>, line: MajorMinor) -> Result<PullRequest> {
    let cut_branch = branch::cut_branch(line);
    let release_branch = branch::release_line_branch(line);
    let manifest = &ctx.config.manifest;

    ctx.git.create_branch(&cut_branch, None)?;
    ctx.git.create_branch(&release_branch, None)?;

    ctx.git.checkout(&cut_branch)?;
    let package_version = format!("{}.x", line);
    manifest::set_package_version(ctx.exec, manifest, &package_version)?;
    ctx.git.commit(
        &format!("update {} version to {}", manifest.file_name(), package_version),
        &[manifest.path.as_str()],
    )?;
    ctx.git.push(&[&cut_branch, &release_branch], false)?;

    ctx.git.checkout(&ctx.ref_name)?;

    let header = format!(
        "> [!important]\n> Merge this PR to create release branch for `{}`.\n\n---\n",
        line
    );
    ctx.forge.create_pull_request(&NewPullRequest {
        head: cut_branch,
        base: release_branch,
        title: format!("chore(release): cut {} release", line),
        body: changelog::generate::<&str>(&header, &[]),
    })
}
