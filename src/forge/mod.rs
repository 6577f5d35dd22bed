//! Code-hosting forge abstraction
//!
//! Pull requests and remote branch listings come from the forge. The
//! orchestrators only see the [Forge] trait; [github::GitHubForge] talks to
//! the GitHub REST API and [mock::MockForge] keeps everything in memory.

pub mod github;
pub mod mock;

pub use github::{GitHubForge, RepoId};
pub use mock::{ForgeCall, MockForge};

use crate::domain::labels;
use crate::error::Result;

/// Lazily fetched results, one page at a time
pub type Paged<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

/// An open pull request as seen by the release flows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    /// Source branch name
    pub head: String,
    /// Target branch name
    pub base: String,
    pub labels: Vec<String>,
    /// Login of the author, when the forge reports one
    pub author: Option<String>,
}

impl PullRequest {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn wants_changelog(&self) -> bool {
        labels::changelog_from_labels(&self.labels)
    }

    /// Changelog line crediting the author: `title by @author (#n)`
    pub fn changelog_entry(&self) -> String {
        match &self.author {
            Some(author) => format!("{} by @{} (#{})", self.title, author, self.number),
            None => format!("{} (#{})", self.title, self.number),
        }
    }
}

/// Restricts a pull request listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestFilter {
    /// Only pull requests targeting this branch
    pub base: Option<String>,
}

impl PullRequestFilter {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        PullRequestFilter {
            base: Some(base.into()),
        }
    }
}

/// Fields for creating a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Operations the release flows need from the forge
pub trait Forge {
    /// Name of the repository's default branch
    fn default_branch(&self) -> Result<String>;

    /// Names of all remote branches
    fn branches(&self) -> Paged<'_, String>;

    /// Open pull requests matching `filter`
    fn pull_requests(&self, filter: &PullRequestFilter) -> Paged<'_, PullRequest>;

    fn get_pull_request(&self, number: u64) -> Result<PullRequest>;

    fn create_pull_request(&self, pr: &NewPullRequest) -> Result<PullRequest>;

    fn update_pull_request_body(&self, number: u64, body: &str) -> Result<PullRequest>;

    fn close_pull_request(&self, number: u64) -> Result<()>;

    /// Replace the labels of an issue or pull request, returning the new set
    fn set_labels(&self, number: u64, labels: &[String]) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(author: Option<&str>) -> PullRequest {
        PullRequest {
            number: 42,
            title: "feat: shiny".to_string(),
            body: None,
            head: "feat/shiny".to_string(),
            base: "main".to_string(),
            labels: vec!["changelog".to_string()],
            author: author.map(str::to_string),
        }
    }

    #[test]
    fn test_changelog_entry() {
        assert_eq!(pr(Some("octocat")).changelog_entry(), "feat: shiny by @octocat (#42)");
        assert_eq!(pr(None).changelog_entry(), "feat: shiny (#42)");
    }

    #[test]
    fn test_labels() {
        let pr = pr(None);
        assert!(pr.has_label("changelog"));
        assert!(pr.wants_changelog());
        assert!(!pr.has_label("release: cut"));
    }
}
