// tests/common/mod.rs
#![allow(dead_code)]

use release_train::config::Config;
use release_train::exec::MockExec;
use release_train::forge::{MockForge, PullRequest};
use release_train::git::MockGit;
use release_train::release::Ctx;

pub fn pr(number: u64, head: &str, base: &str) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {}", number),
        body: None,
        head: head.to_string(),
        base: base.to_string(),
        labels: Vec::new(),
        author: Some("octocat".to_string()),
    }
}

pub fn feature_pr(number: u64, title: &str, labels: &[&str]) -> PullRequest {
    PullRequest {
        title: title.to_string(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        ..pr(number, "feat/my-feature", "main")
    }
}

pub fn with_body(pr: PullRequest, body: String) -> PullRequest {
    PullRequest {
        body: Some(body),
        ..pr
    }
}

pub fn with_labels(pr: PullRequest, labels: &[&str]) -> PullRequest {
    PullRequest {
        labels: labels.iter().map(|l| l.to_string()).collect(),
        ..pr
    }
}

pub fn ctx<'a>(
    config: &'a Config,
    ref_name: &str,
    git: &'a MockGit,
    forge: &'a MockForge,
    exec: &'a MockExec,
    pr: Option<PullRequest>,
) -> Ctx<'a> {
    Ctx {
        config,
        ref_name: ref_name.to_string(),
        git,
        forge,
        exec,
        pr,
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
