// tests/create_cut_pr_test.rs
mod common;

use common::{ctx, feature_pr, pr, strings, with_body};
use release_train::changelog;
use release_train::config::Config;
use release_train::domain::labels::{CHANGELOG_LABEL, MAJOR_SEVERITY_LABEL, MINOR_SEVERITY_LABEL};
use release_train::exec::{ExecCall, MockExec};
use release_train::forge::{ForgeCall, MockForge, NewPullRequest};
use release_train::git::{GitCall, MockGit};
use release_train::release::{create_cut_pr, CutResult};
use release_train::ReleaseTrainError;

const CUT_HEADER: &str =
    "> [!important]\n> Merge this PR to create release branch for `{}`.\n\n---\n";

fn cut_header(line: &str) -> String {
    CUT_HEADER.replace("{}", line)
}

fn expected_creation(line: &str) -> Vec<GitCall> {
    vec![
        GitCall::CreateBranch {
            name: format!("cut/{}", line),
            from: None,
        },
        GitCall::CreateBranch {
            name: format!("release/{}", line),
            from: None,
        },
        GitCall::Checkout(format!("cut/{}", line)),
        GitCall::Commit {
            message: format!("update package.json version to {}.x", line),
            paths: strings(&["./package.json"]),
        },
        GitCall::Push {
            branches: vec![format!("cut/{}", line), format!("release/{}", line)],
            force: false,
        },
        GitCall::Checkout("main".to_string()),
    ]
}

fn expected_exec(line: &str) -> Vec<ExecCall> {
    vec![ExecCall {
        tool: "yq".to_string(),
        args: vec![
            "-i".to_string(),
            format!(".version = \"{}.x\"", line),
            "./package.json".to_string(),
        ],
        captured: false,
    }]
}

fn expected_new_pr(line: &str) -> NewPullRequest {
    NewPullRequest {
        head: format!("cut/{}", line),
        base: format!("release/{}", line),
        title: format!("chore(release): cut {} release", line),
        body: changelog::generate::<&str>(&cut_header(line), &[]),
    }
}

fn run_new_cut(branches: &[&str], severity_label: &str, expected_line: &str) {
    let config = Config::default();
    let git = MockGit::new();
    let forge = MockForge::new().with_branches(branches.iter().copied());
    let exec = MockExec::new();
    let trigger = feature_pr(111, "my feature", &[CHANGELOG_LABEL, severity_label]);

    let result = create_cut_pr(&ctx(&config, "main", &git, &forge, &exec, Some(trigger))).unwrap();

    assert_eq!(
        result,
        CutResult {
            cut_pr_number: 1,
            cut_branch: format!("release/{}", expected_line),
        }
    );
    assert_eq!(git.calls(), expected_creation(expected_line));
    assert_eq!(exec.calls(), expected_exec(expected_line));

    let body = changelog::generate(&cut_header(expected_line), &["my feature"]);
    assert_eq!(
        forge.calls(),
        vec![
            ForgeCall::CreatePullRequest(expected_new_pr(expected_line)),
            ForgeCall::UpdatePullRequestBody { number: 1, body },
        ]
    );
}

#[test]
fn test_create_new_cut_pr_without_release_branches() {
    run_new_cut(&[], MINOR_SEVERITY_LABEL, "0.0");
    run_new_cut(&[], MAJOR_SEVERITY_LABEL, "0.0");
}

#[test]
fn test_create_new_cut_pr_after_one_release_branch() {
    run_new_cut(&["release/1.0"], MINOR_SEVERITY_LABEL, "1.1");
    run_new_cut(&["release/1.0"], MAJOR_SEVERITY_LABEL, "2.0");
}

#[test]
fn test_create_new_cut_pr_after_multiple_release_branches() {
    let branches = ["release/1.0", "release/1.1", "release/2.0"];
    run_new_cut(&branches, MINOR_SEVERITY_LABEL, "2.1");
    run_new_cut(&branches, MAJOR_SEVERITY_LABEL, "3.0");
}

#[test]
fn test_version_major_label_requires_major_cut() {
    run_new_cut(&["release/1.0"], "version: major", "2.0");
}

#[test]
fn test_reuse_existing_cut_pr() {
    let config = Config::default();
    let git = MockGit::new();
    let body = changelog::generate("# Some header\n", &["item a", "item b"]);
    let forge = MockForge::new()
        .with_branches(["release/1.0", "release/1.1"])
        .with_pull_request(with_body(pr(222, "cut/1.1", "release/1.1"), body))
        .with_pull_request(pr(5, "feat/other", "main"));
    let exec = MockExec::new();
    let trigger = feature_pr(111, "my feature", &[CHANGELOG_LABEL, MINOR_SEVERITY_LABEL]);

    let result = create_cut_pr(&ctx(&config, "main", &git, &forge, &exec, Some(trigger))).unwrap();

    assert_eq!(result.cut_pr_number, 222);
    assert_eq!(result.cut_branch, "release/1.1");
    assert!(git.mutations().is_empty());
    assert!(exec.calls().is_empty());
    assert_eq!(
        forge.calls(),
        vec![ForgeCall::UpdatePullRequestBody {
            number: 222,
            body: changelog::generate("# Some header\n", &["item a", "item b", "my feature"]),
        }]
    );
}

#[test]
fn test_reuse_without_changelog_label_touches_nothing() {
    let config = Config::default();
    let git = MockGit::new();
    let forge = MockForge::new().with_pull_request(pr(222, "cut/1.1", "release/1.1"));
    let exec = MockExec::new();
    let trigger = feature_pr(111, "internal refactor", &[MINOR_SEVERITY_LABEL]);

    let result = create_cut_pr(&ctx(&config, "main", &git, &forge, &exec, Some(trigger))).unwrap();

    assert_eq!(result.cut_pr_number, 222);
    assert!(git.calls().is_empty());
    assert!(forge.calls().is_empty());
}

#[test]
fn test_major_cut_pr_satisfies_minor_change() {
    let config = Config::default();
    let git = MockGit::new();
    let forge = MockForge::new().with_pull_request(pr(300, "cut/2.0", "release/2.0"));
    let exec = MockExec::new();
    let trigger = feature_pr(111, "small fix", &[MINOR_SEVERITY_LABEL]);

    let result = create_cut_pr(&ctx(&config, "main", &git, &forge, &exec, Some(trigger))).unwrap();

    assert_eq!(result.cut_pr_number, 300);
    assert_eq!(result.cut_branch, "release/2.0");
    assert!(git.mutations().is_empty());
}

#[test]
fn test_upgrade_existing_cut_pr() {
    let config = Config::default();
    let git = MockGit::new();
    let body = changelog::generate("# Some header\n", &["item a", "item b"]);
    let forge = MockForge::new()
        .with_branches(["release/1.0"])
        .with_pull_request(with_body(pr(222, "cut/1.1", "release/1.1"), body));
    let exec = MockExec::new();
    let trigger = feature_pr(111, "my feature", &[CHANGELOG_LABEL, MAJOR_SEVERITY_LABEL]);

    let result = create_cut_pr(&ctx(&config, "main", &git, &forge, &exec, Some(trigger))).unwrap();

    assert_eq!(
        result,
        CutResult {
            cut_pr_number: 223,
            cut_branch: "release/2.0".to_string(),
        }
    );
    assert!(!forge.is_open(222));
    assert_eq!(git.calls(), expected_creation("2.0"));

    let calls = forge.calls();
    assert_eq!(calls[0], ForgeCall::ClosePullRequest(222));
    assert_eq!(calls[1], ForgeCall::CreatePullRequest(expected_new_pr("2.0")));
    match &calls[2] {
        ForgeCall::UpdatePullRequestBody { number, body } => {
            assert_eq!(*number, 223);
            assert!(body.contains("- item a\n- item b\n- my feature"));
        }
        other => panic!("unexpected call {:?}", other),
    }
}

#[test]
fn test_commit_push_without_pull_request() {
    let config = Config::default();
    let git = MockGit::new();
    let forge = MockForge::new().with_branches(["release/1.0"]);
    let exec = MockExec::new();

    let result = create_cut_pr(&ctx(&config, "main", &git, &forge, &exec, None)).unwrap();

    assert_eq!(result.cut_branch, "release/1.1");
    assert_eq!(git.calls(), expected_creation("1.1"));
    assert_eq!(
        forge.calls(),
        vec![ForgeCall::CreatePullRequest(expected_new_pr("1.1"))]
    );
}

#[test]
fn test_multiple_cut_prs_abort() {
    let config = Config::default();
    let git = MockGit::new();
    let forge = MockForge::new()
        .with_pull_request(pr(5, "cut/1.1", "release/1.1"))
        .with_pull_request(pr(6, "cut/2.0", "release/2.0"));
    let exec = MockExec::new();

    let err = create_cut_pr(&ctx(&config, "main", &git, &forge, &exec, None)).unwrap_err();

    assert!(matches!(err, ReleaseTrainError::Invariant(_)));
    assert_eq!(
        err.to_string(),
        "Multiple cut PRs were found, when only one can exist: #5, #6"
    );
    assert!(git.calls().is_empty());
    assert!(forge.calls().is_empty());
}

#[test]
fn test_must_run_on_main_branch() {
    let config = Config::default();
    let git = MockGit::on_branch("release/1.0");
    let forge = MockForge::new();
    let exec = MockExec::new();

    let err = create_cut_pr(&ctx(&config, "release/1.0", &git, &forge, &exec, None)).unwrap_err();

    assert!(matches!(err, ReleaseTrainError::Precondition(_)));
    assert_eq!(err.to_string(), "This action can only be run on the main branch");
    assert!(git.calls().is_empty());
}
