use crate::error::Result;
use crate::git::{Git, GitUser};
use std::sync::Mutex;

/// A call recorded by [MockGit]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    ConfigUser(GitUser),
    Checkout(String),
    CreateBranch { name: String, from: Option<String> },
    Fetch,
    MoveBranch { name: String, target: String },
    Commit { message: String, paths: Vec<String> },
    Push { branches: Vec<String>, force: bool },
}

impl GitCall {
    /// True for calls that change local or remote repository state
    pub fn is_mutation(&self) -> bool {
        !matches!(self, GitCall::ConfigUser(_) | GitCall::Fetch)
    }
}

/// Mock repository that records operations without touching disk
pub struct MockGit {
    main_branch: String,
    current: Mutex<String>,
    calls: Mutex<Vec<GitCall>>,
}

impl MockGit {
    /// Create a mock checked out on `main`
    pub fn new() -> Self {
        Self::on_branch("main")
    }

    /// Create a mock whose main branch is `main` and which is checked out on `branch`
    pub fn on_branch(branch: impl Into<String>) -> Self {
        MockGit {
            main_branch: "main".to_string(),
            current: Mutex::new(branch.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Recorded calls that mutate the repository
    pub fn mutations(&self) -> Vec<GitCall> {
        self.calls().into_iter().filter(GitCall::is_mutation).collect()
    }

    pub fn created_branches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GitCall::CreateBranch { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn checkouts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GitCall::Checkout(branch) => Some(branch),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GitCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Default for MockGit {
    fn default() -> Self {
        Self::new()
    }
}

impl Git for MockGit {
    fn main_branch(&self) -> &str {
        &self.main_branch
    }

    fn config_user(&self, user: &GitUser) -> Result<()> {
        self.record(GitCall::ConfigUser(user.clone()));
        Ok(())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        if let Ok(mut current) = self.current.lock() {
            *current = branch.to_string();
        }
        self.record(GitCall::Checkout(branch.to_string()));
        Ok(())
    }

    fn create_branch(&self, name: &str, from: Option<&str>) -> Result<()> {
        self.record(GitCall::CreateBranch {
            name: name.to_string(),
            from: from.map(str::to_string),
        });
        Ok(())
    }

    fn fetch(&self) -> Result<()> {
        self.record(GitCall::Fetch);
        Ok(())
    }

    fn move_branch(&self, name: &str, target: &str) -> Result<()> {
        self.record(GitCall::MoveBranch {
            name: name.to_string(),
            target: target.to_string(),
        });
        Ok(())
    }

    fn commit(&self, message: &str, paths: &[&str]) -> Result<()> {
        self.record(GitCall::Commit {
            message: message.to_string(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
        });
        Ok(())
    }

    fn push(&self, branches: &[&str], force: bool) -> Result<()> {
        self.record(GitCall::Push {
            branches: branches.iter().map(|b| b.to_string()).collect(),
            force,
        });
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.current.lock().map(|c| c.clone()).unwrap_or_default())
    }
}
