use crate::error::{ReleaseTrainError, Result};
use crate::forge::{Forge, NewPullRequest, Paged, PullRequest, PullRequestFilter};
use std::sync::Mutex;

/// A mutating call recorded by [MockForge]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForgeCall {
    CreatePullRequest(NewPullRequest),
    UpdatePullRequestBody { number: u64, body: String },
    ClosePullRequest(u64),
    SetLabels { number: u64, labels: Vec<String> },
}

#[derive(Debug)]
struct StoredPullRequest {
    pr: PullRequest,
    open: bool,
}

#[derive(Debug)]
struct State {
    branches: Vec<String>,
    pull_requests: Vec<StoredPullRequest>,
    next_number: u64,
    calls: Vec<ForgeCall>,
}

/// In-memory forge for tests
///
/// New pull requests are numbered after the highest number seen so far.
#[derive(Debug)]
pub struct MockForge {
    default_branch: String,
    state: Mutex<State>,
}

impl MockForge {
    pub fn new() -> Self {
        MockForge {
            default_branch: "main".to_string(),
            state: Mutex::new(State {
                branches: vec!["main".to_string()],
                pull_requests: Vec::new(),
                next_number: 1,
                calls: Vec::new(),
            }),
        }
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = branch.into();
        self
    }

    pub fn with_branches<I, S>(self, branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut state) = self.state.lock() {
            state.branches.extend(branches.into_iter().map(Into::into));
        }
        self
    }

    /// Seed an open pull request
    pub fn with_pull_request(self, pr: PullRequest) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.next_number = state.next_number.max(pr.number + 1);
            state.pull_requests.push(StoredPullRequest { pr, open: true });
        }
        self
    }

    pub fn calls(&self) -> Vec<ForgeCall> {
        self.state.lock().map(|s| s.calls.clone()).unwrap_or_default()
    }

    /// Current state of a pull request, open or closed
    pub fn pull_request(&self, number: u64) -> Option<PullRequest> {
        let state = self.state.lock().ok()?;
        state
            .pull_requests
            .iter()
            .find(|stored| stored.pr.number == number)
            .map(|stored| stored.pr.clone())
    }

    pub fn is_open(&self, number: u64) -> bool {
        self.state
            .lock()
            .map(|s| s.pull_requests.iter().any(|p| p.pr.number == number && p.open))
            .unwrap_or(false)
    }

    pub fn open_pull_requests(&self) -> Vec<PullRequest> {
        self.state
            .lock()
            .map(|s| {
                s.pull_requests
                    .iter()
                    .filter(|p| p.open)
                    .map(|p| p.pr.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> Result<T>) -> Result<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ReleaseTrainError::forge("mock forge state poisoned"))?;
        f(&mut state)
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

fn find(state: &mut State, number: u64) -> Result<&mut StoredPullRequest> {
    state
        .pull_requests
        .iter_mut()
        .find(|stored| stored.pr.number == number)
        .ok_or_else(|| ReleaseTrainError::forge(format!("pull request #{} not found", number)))
}

impl Forge for MockForge {
    fn default_branch(&self) -> Result<String> {
        Ok(self.default_branch.clone())
    }

    fn branches(&self) -> Paged<'_, String> {
        let branches = self.state.lock().map(|s| s.branches.clone()).unwrap_or_default();
        Box::new(branches.into_iter().map(Ok))
    }

    fn pull_requests(&self, filter: &PullRequestFilter) -> Paged<'_, PullRequest> {
        let prs: Vec<PullRequest> = self
            .open_pull_requests()
            .into_iter()
            .filter(|pr| filter.base.as_ref().map_or(true, |base| &pr.base == base))
            .collect();
        Box::new(prs.into_iter().map(Ok))
    }

    fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        self.with_state(|state| Ok(find(state, number)?.pr.clone()))
    }

    fn create_pull_request(&self, new: &NewPullRequest) -> Result<PullRequest> {
        self.with_state(|state| {
            state.calls.push(ForgeCall::CreatePullRequest(new.clone()));
            let pr = PullRequest {
                number: state.next_number,
                title: new.title.clone(),
                body: Some(new.body.clone()),
                head: new.head.clone(),
                base: new.base.clone(),
                labels: Vec::new(),
                author: Some("github-actions[bot]".to_string()),
            };
            state.next_number += 1;
            state.pull_requests.push(StoredPullRequest {
                pr: pr.clone(),
                open: true,
            });
            Ok(pr)
        })
    }

    fn update_pull_request_body(&self, number: u64, body: &str) -> Result<PullRequest> {
        self.with_state(|state| {
            state.calls.push(ForgeCall::UpdatePullRequestBody {
                number,
                body: body.to_string(),
            });
            let stored = find(state, number)?;
            stored.pr.body = Some(body.to_string());
            Ok(stored.pr.clone())
        })
    }

    fn close_pull_request(&self, number: u64) -> Result<()> {
        self.with_state(|state| {
            state.calls.push(ForgeCall::ClosePullRequest(number));
            find(state, number)?.open = false;
            Ok(())
        })
    }

    fn set_labels(&self, number: u64, labels: &[String]) -> Result<Vec<String>> {
        self.with_state(|state| {
            state.calls.push(ForgeCall::SetLabels {
                number,
                labels: labels.to_vec(),
            });
            let stored = find(state, number)?;
            stored.pr.labels = labels.to_vec();
            Ok(stored.pr.labels.clone())
        })
    }
}
