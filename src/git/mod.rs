//! Local git operations abstraction layer
//!
//! The release flows only need a handful of porcelain operations on the
//! checked-out repository: create and move branches, check them out, commit a
//! file and push. They are expressed through the [Git] trait so that the
//! orchestrators can be driven against a recording mock in tests.
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockGit]: records every call for assertions
//!
//! ```rust
//! # use release_train::git::Git;
//! # fn example<G: Git>(git: &G) -> release_train::Result<()> {
//! git.create_branch("cut/1.1", None)?;
//! git.checkout("cut/1.1")?;
//! git.push(&["cut/1.1"], false)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{GitCall, MockGit};
pub use repository::Git2Repository;

use crate::error::Result;

/// Identity used for commits made by the release train
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitUser {
    pub name: String,
    pub email: String,
}

/// Common git operation trait
///
/// All operations act on the local repository the tool is running in; only
/// [Git::fetch] and [Git::push] talk to the remote.
pub trait Git {
    /// Name of the main integration branch (e.g. "main")
    fn main_branch(&self) -> &str;

    /// Set the committer identity in the repository-local config
    fn config_user(&self, user: &GitUser) -> Result<()>;

    /// Check out a branch or ref, updating the working tree
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Create a branch starting at `from`
    ///
    /// When `from` is `None`, the remote-tracking main branch
    /// (`origin/main`) is used.
    fn create_branch(&self, name: &str, from: Option<&str>) -> Result<()>;

    /// Fetch the remote's default refspecs
    fn fetch(&self) -> Result<()>;

    /// Point an existing or new branch at `target`, overwriting it
    fn move_branch(&self, name: &str, target: &str) -> Result<()>;

    /// Stage the listed paths and commit them on top of HEAD
    fn commit(&self, message: &str, paths: &[&str]) -> Result<()>;

    /// Push the listed local branches to the same names on the remote
    fn push(&self, branches: &[&str], force: bool) -> Result<()>;

    /// Short name of the checked-out branch
    fn current_branch(&self) -> Result<String>;
}
