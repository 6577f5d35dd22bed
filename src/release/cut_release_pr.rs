use super::{carried_items, ensure_single, next_cut_version, CutResult, Ctx};
use crate::changelog;
use crate::domain::labels::{self, RELEASE_CUT_LABEL};
use crate::domain::{branch, MajorMinor, Severity};
use crate::error::{ReleaseTrainError, Result};
use crate::forge::{NewPullRequest, PullRequest, PullRequestFilter};
use crate::manifest;

/// Label-driven cut: keep one `release: cut` PR open at the requested severity.
///
/// The release line branch of the selected PR is then force-moved to the
/// main branch so it tracks everything merged so far.
pub fn cut_release_pr(ctx: &Ctx<'_>, severity: Severity) -> Result<CutResult> {
    let main_branch = ctx.git.main_branch();
    let default_branch = ctx.forge.default_branch()?;
    if default_branch != main_branch {
        tracing::warn!(
            %default_branch,
            main_branch,
            "repository default branch differs from the configured main branch"
        );
    }

    let mut matches = Vec::new();
    for pr in ctx.forge.pull_requests(&PullRequestFilter::open()) {
        let pr = pr?;
        if pr.has_label(RELEASE_CUT_LABEL) {
            matches.push(pr);
        }
    }
    ensure_single(&matches, "Multiple open cut PRs were found, only one can exist")?;

    let mut items = Vec::new();
    let mut outdated = None;
    let mut cut_pr = None;
    if let Some(pr) = matches.pop() {
        let existing = labels::severity_from_labels(&pr.labels)?.ok_or_else(|| {
            ReleaseTrainError::precondition(format!(
                "release cut PR #{} doesn't have an associated release severity tag.",
                pr.number
            ))
        })?;

        if existing.fits(severity) {
            tracing::info!(number = pr.number, %existing, "reusing cut PR");
            cut_pr = Some(pr);
        } else {
            items = carried_items(&pr)?;
            outdated = Some(pr);
        }
    }

    let cut_pr = match cut_pr {
        Some(pr) => pr,
        None => {
            let line = next_cut_version(ctx.forge, severity)?;
            let pr = open_labelled_cut_pr(ctx, line, severity, &items)?;
            if let Some(old) = outdated {
                tracing::info!(
                    number = old.number,
                    replacement = pr.number,
                    "closing outdated cut PR"
                );
                ctx.forge.close_pull_request(old.number)?;
            }
            pr
        }
    };

    ctx.git.move_branch(&cut_pr.base, main_branch)?;
    ctx.git.push(&[&cut_pr.base], true)?;

    Ok(CutResult {
        cut_pr_number: cut_pr.number,
        cut_branch: cut_pr.base,
    })
}

fn open_labelled_cut_pr(
    ctx: &Ctx<'_>,
    line: MajorMinor,
    severity: Severity,
    items: &[String],
) -> Result<PullRequest> {
    let release_branch = branch::release_line_branch(line);
    let cut_branch = branch::labelled_cut_branch(line);
    let manifest = &ctx.config.manifest;

    ctx.git.create_branch(&release_branch, None)?;
    ctx.git.create_branch(&cut_branch, None)?;

    ctx.git.checkout(&cut_branch)?;
    let package_version = format!("{}.0", line);
    manifest::set_package_version(ctx.exec, manifest, &package_version)?;
    ctx.git.commit(
        &format!("update {} version to {}", manifest.file_name(), package_version),
        &[manifest.path.as_str()],
    )?;
    ctx.git.push(&[&release_branch, &cut_branch], false)?;

    let pr = ctx.forge.create_pull_request(&NewPullRequest {
        head: cut_branch,
        base: release_branch.clone(),
        title: format!("chore(release): cut {} release", line),
        body: changelog::generate(&release_branch, items),
    })?;

    let cut_labels = [
        RELEASE_CUT_LABEL.to_string(),
        labels::label_for_severity(severity).to_string(),
    ];
    let applied = ctx.forge.set_labels(pr.number, &cut_labels)?;
    Ok(PullRequest { labels: applied, ..pr })
}
