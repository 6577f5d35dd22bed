// tests/create_release_pr_test.rs
mod common;

use common::{ctx, feature_pr, pr, strings, with_body};
use release_train::changelog;
use release_train::config::Config;
use release_train::domain::labels::CHANGELOG_LABEL;
use release_train::exec::{ExecCall, MockExec};
use release_train::forge::{ForgeCall, MockForge, NewPullRequest};
use release_train::git::{GitCall, MockGit};
use release_train::release::{create_release_pr, ReleaseResult};
use release_train::ReleaseTrainError;

fn release_header(version: &str) -> String {
    format!("> [!important]\n> Merging this PR will publish {}\n\n---\n", version)
}

fn expected_creation(version: &str) -> Vec<GitCall> {
    let branch = format!("release/{}", version);
    vec![
        GitCall::Fetch,
        GitCall::CreateBranch {
            name: branch.clone(),
            from: Some("release/1.0".to_string()),
        },
        GitCall::Checkout(branch.clone()),
        GitCall::Commit {
            message: format!("bump package.json version to {}", version),
            paths: strings(&["./package.json"]),
        },
        GitCall::Push {
            branches: vec![branch],
            force: true,
        },
        GitCall::Checkout("release/1.0".to_string()),
    ]
}

fn expected_exec(version: &str) -> Vec<ExecCall> {
    vec![
        ExecCall {
            tool: "yq".to_string(),
            args: strings(&["-r", ".version", "./package.json"]),
            captured: true,
        },
        ExecCall {
            tool: "yq".to_string(),
            args: vec![
                "-i".to_string(),
                format!(".version = \"{}\"", version),
                "./package.json".to_string(),
            ],
            captured: false,
        },
    ]
}

fn expected_new_pr(version: &str) -> NewPullRequest {
    NewPullRequest {
        head: format!("release/{}", version),
        base: "release/1.0".to_string(),
        title: format!("Release {}", version),
        body: changelog::generate::<&str>(&release_header(version), &[]),
    }
}

fn merged_cut_pr() -> release_train::forge::PullRequest {
    with_body(
        pr(111, "cut/1.0", "release/1.0"),
        changelog::generate("# Some header\n", &["item a", "item b"]),
    )
}

#[test]
fn test_creates_beta_release_when_cut_pr_merges() {
    let cases = [
        ("1.0.x", "1.0.0"),
        ("1.0.0", "1.0.1"),
        ("1.0.6", "1.0.7"),
        ("1.1.x", "1.1.0"),
        ("1.1.0", "1.1.1"),
        ("1.1.6", "1.1.7"),
    ];

    for (package_version, version) in cases {
        let beta = format!("{}-beta.0", version);
        let config = Config::default();
        let git = MockGit::on_branch("release/1.0");
        let forge = MockForge::new().with_pull_request(pr(221, "feat/unrelated", "main"));
        let exec = MockExec::new().with_output("yq", format!("{}\n", package_version));

        let result = create_release_pr(&ctx(
            &config,
            "release/1.0",
            &git,
            &forge,
            &exec,
            Some(merged_cut_pr()),
        ))
        .unwrap();

        assert_eq!(
            result,
            ReleaseResult {
                release_pr_number: Some(222),
                release_pr_head: Some(format!("release/{}", beta)),
                release_version: Some(beta.clone()),
            },
            "package version {}",
            package_version
        );
        assert_eq!(git.calls(), expected_creation(&beta));
        assert_eq!(exec.calls(), expected_exec(&beta));
        assert_eq!(
            forge.calls(),
            vec![
                ForgeCall::CreatePullRequest(expected_new_pr(&beta)),
                ForgeCall::UpdatePullRequestBody {
                    number: 222,
                    body: changelog::generate(&release_header(&beta), &["item a", "item b"]),
                },
            ]
        );
    }
}

#[test]
fn test_creates_beta_release_when_feature_merges_with_changelog_label() {
    let config = Config::default();
    let git = MockGit::on_branch("release/1.0");
    let forge = MockForge::new();
    let exec = MockExec::new().with_output("yq", "1.0.x");
    let trigger = feature_pr(111, "my cool feature", &[CHANGELOG_LABEL]);

    let context = ctx(&config, "release/1.0", &git, &forge, &exec, Some(trigger));
    let result = create_release_pr(&context).unwrap();

    assert_eq!(result.release_version.as_deref(), Some("1.0.0-beta.0"));
    let updated = forge.pull_request(1).unwrap();
    assert!(updated
        .body
        .unwrap()
        .contains("<!-- changelog -->\n- my cool feature by @octocat (#111)\n<!-- /changelog -->"));
}

#[test]
fn test_creates_beta_release_when_feature_merges_without_changelog_label() {
    let config = Config::default();
    let git = MockGit::on_branch("release/1.0");
    let forge = MockForge::new();
    let exec = MockExec::new().with_output("yq", "1.0.x");
    let trigger = feature_pr(111, "my cool feature", &[]);

    let context = ctx(&config, "release/1.0", &git, &forge, &exec, Some(trigger));
    let result = create_release_pr(&context).unwrap();

    assert_eq!(result.release_pr_head.as_deref(), Some("release/1.0.0-beta.0"));
    assert_eq!(
        forge.calls(),
        vec![ForgeCall::CreatePullRequest(expected_new_pr("1.0.0-beta.0"))]
    );
}

#[test]
fn test_reuses_beta_release_when_feature_merges() {
    let config = Config::default();
    let git = MockGit::on_branch("release/1.0");
    let existing = with_body(
        pr(222, "release/1.0.0-beta.0", "release/1.0"),
        changelog::generate("# Some header\n", &["item a", "item b"]),
    );
    let forge = MockForge::new()
        .with_pull_request(existing)
        .with_pull_request(pr(300, "release/2.0.0-beta.0", "release/2.0"));
    let exec = MockExec::new();
    let trigger = feature_pr(111, "my cool feature", &[CHANGELOG_LABEL]);

    let context = ctx(&config, "release/1.0", &git, &forge, &exec, Some(trigger));
    let result = create_release_pr(&context).unwrap();

    assert_eq!(
        result,
        ReleaseResult {
            release_pr_number: Some(222),
            release_pr_head: Some("release/1.0.0-beta.0".to_string()),
            release_version: Some("1.0.0-beta.0".to_string()),
        }
    );
    assert!(git.calls().is_empty());
    assert!(exec.calls().is_empty());
    let body = forge.pull_request(222).unwrap().body.unwrap();
    assert!(body.contains("- item a\n- item b\n- my cool feature by @octocat (#111)"));
}

#[test]
fn test_creates_candidate_release_when_beta_merges() {
    let config = Config::default();
    let git = MockGit::on_branch("release/1.0");
    let forge = MockForge::new();
    let exec = MockExec::new().with_output("yq", "1.0.0-beta.0\n");
    let merged_beta = with_body(
        pr(111, "release/1.0.0-beta.0", "release/1.0"),
        changelog::generate("# Some header\n", &["item a", "item b", "item c"]),
    );

    let result = create_release_pr(&ctx(
        &config,
        "release/1.0",
        &git,
        &forge,
        &exec,
        Some(merged_beta),
    ))
    .unwrap();

    assert_eq!(
        result,
        ReleaseResult {
            release_pr_number: Some(1),
            release_pr_head: Some("release/1.0.0".to_string()),
            release_version: Some("1.0.0".to_string()),
        }
    );
    assert_eq!(git.calls(), expected_creation("1.0.0"));
    assert_eq!(exec.calls(), expected_exec("1.0.0"));
    let body = forge.pull_request(1).unwrap().body.unwrap();
    assert!(body.contains("- item a\n- item b\n- item c"));
}

#[test]
fn test_outdated_candidate_is_replaced_by_next_beta() {
    let config = Config::default();
    let git = MockGit::on_branch("release/1.0");
    let candidate = with_body(
        pr(50, "release/1.0.0", "release/1.0"),
        changelog::generate(&release_header("1.0.0"), &["item a"]),
    );
    let forge = MockForge::new().with_pull_request(candidate);
    let exec = MockExec::new().with_output("yq", "1.0.0");
    let trigger = feature_pr(111, "late fix", &[CHANGELOG_LABEL]);

    let context = ctx(&config, "release/1.0", &git, &forge, &exec, Some(trigger));
    let result = create_release_pr(&context).unwrap();

    assert_eq!(result.release_version.as_deref(), Some("1.0.1-beta.0"));
    assert!(!forge.is_open(50));
    assert_eq!(forge.calls()[0], ForgeCall::ClosePullRequest(50));

    let number = result.release_pr_number.unwrap();
    let items = changelog::parse(&forge.pull_request(number).unwrap().body.unwrap())
        .unwrap()
        .items;
    assert_eq!(items, vec!["item a", "late fix by @octocat (#111)"]);
}

#[test]
fn test_merged_final_release_exits_early() {
    let config = Config::default();
    let git = MockGit::on_branch("release/1.0");
    let forge = MockForge::new();
    let exec = MockExec::new();
    let merged = with_body(
        pr(111, "release/1.0.0", "release/1.0"),
        changelog::generate("", &["item a"]),
    );

    let context = ctx(&config, "release/1.0", &git, &forge, &exec, Some(merged));
    let result = create_release_pr(&context).unwrap();

    assert_eq!(result, ReleaseResult::default());
    assert!(git.calls().is_empty());
    assert!(forge.calls().is_empty());
    assert!(exec.calls().is_empty());
}

#[test]
fn test_multiple_release_prs_abort() {
    let config = Config::default();
    let git = MockGit::on_branch("release/1.0");
    let forge = MockForge::new()
        .with_pull_request(pr(7, "release/1.0.0-beta.0", "release/1.0"))
        .with_pull_request(pr(9, "release/1.0.1-beta.0", "release/1.0"));
    let exec = MockExec::new();

    let context = ctx(&config, "release/1.0", &git, &forge, &exec, None);
    let err = create_release_pr(&context).unwrap_err();

    assert!(matches!(err, ReleaseTrainError::Invariant(_)));
    assert_eq!(
        err.to_string(),
        "Multiple release PRs were found, when only one can exist: #7, #9"
    );
    assert!(git.calls().is_empty());
}

#[test]
fn test_must_run_on_release_line_branch() {
    let config = Config::default();
    let git = MockGit::new();
    let forge = MockForge::new();
    let exec = MockExec::new();

    for ref_name in ["main", "release/1.0.0", "cut/1.0"] {
        let context = ctx(&config, ref_name, &git, &forge, &exec, None);
        let err = create_release_pr(&context).unwrap_err();
        assert!(matches!(err, ReleaseTrainError::Precondition(_)));
        assert_eq!(
            err.to_string(),
            "This action can only be run on a `release/x.y` branch."
        );
    }
}

#[test]
fn test_unparseable_manifest_version_fails_before_mutating() {
    let config = Config::default();
    let git = MockGit::on_branch("release/1.0");
    let forge = MockForge::new();
    let exec = MockExec::new().with_output("yq", "not-a-version");

    let context = ctx(&config, "release/1.0", &git, &forge, &exec, None);
    let err = create_release_pr(&context).unwrap_err();

    assert!(matches!(err, ReleaseTrainError::Version(_)));
    assert!(git.calls().is_empty());
    assert!(forge.calls().is_empty());
}
