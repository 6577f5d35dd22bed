use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use release_train::config;
use release_train::domain::{BranchRole, Severity};
use release_train::exec::SystemExec;
use release_train::forge::{Forge, GitHubForge, RepoId};
use release_train::git::{Git, Git2Repository};
use release_train::release::{self, Ctx, StepOutputs};
use release_train::{ci, telemetry, ui};

#[derive(Parser)]
#[command(
    name = "release-train",
    version,
    about = "Maintain cut and release pull requests for a release train"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    github_token: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", global = true, help = "Repository as owner/name")]
    repository: Option<String>,

    #[arg(
        long,
        env = "GITHUB_REF_NAME",
        global = true,
        help = "Branch the run was triggered on (defaults to the checked-out branch)"
    )]
    ref_name: Option<String>,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open or update the cut PR for the next release line (run on the main branch)
    CreateCutPr {
        #[arg(long, help = "Triggering pull request when there is no event payload")]
        pull_request: Option<u64>,
    },
    /// Open or update the beta/candidate release PR (run on a release/x.y branch)
    CreateReleasePr {
        #[arg(long, help = "Triggering pull request when there is no event payload")]
        pull_request: Option<u64>,
    },
    /// Open or update the labelled cut PR at the given severity
    CutReleasePr {
        #[arg(long)]
        severity: Severity,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init_tracing(args.json_logs);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::report_failure(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    let repository: RepoId = args
        .repository
        .as_deref()
        .context("No repository given; pass --repository or set GITHUB_REPOSITORY")?
        .parse()?;
    let token = args
        .github_token
        .context("No token given; pass --github-token or set GITHUB_TOKEN")?;

    let forge = GitHubForge::new(config.github.api_url.clone(), &token, repository)?;
    let git = Git2Repository::open(".", config.git.remote.clone(), config.git.main_branch.clone())
        .context("Git repository error")?
        .with_token(token);

    let ref_name = match args.ref_name {
        Some(ref_name) => ref_name,
        None => git.current_branch()?,
    };
    git.config_user(&config.git.user())?;

    let fallback = match &args.command {
        Command::CreateCutPr { pull_request } | Command::CreateReleasePr { pull_request } => {
            *pull_request
        }
        Command::CutReleasePr { .. } => None,
    };
    let pr_number = ci::pull_request_number(ci::event_path().as_deref(), fallback)?;
    let pr = pr_number.map(|n| forge.get_pull_request(n)).transpose()?;

    tracing::info!(
        repository = %forge.repo(),
        %ref_name,
        role = ?BranchRole::classify(&ref_name),
        pull_request = ?pr_number,
        "starting release train"
    );

    let ctx = Ctx {
        config: &config,
        ref_name,
        git: &git,
        forge: &forge,
        exec: &SystemExec,
        pr,
    };

    let outputs = match args.command {
        Command::CreateCutPr { .. } => release::create_cut_pr(&ctx)?.outputs(),
        Command::CreateReleasePr { .. } => release::create_release_pr(&ctx)?.outputs(),
        Command::CutReleasePr { severity } => release::cut_release_pr(&ctx, severity)?.outputs(),
    };

    ci::write_outputs(&outputs, ci::output_path().as_deref())?;
    ui::display_outputs(&outputs);
    ui::display_success("Release train updated");
    Ok(())
}
