use crate::error::{ReleaseTrainError, Result};
use crate::git::{Git, GitUser};
use git2::build::CheckoutBuilder;
use git2::{Cred, CredentialType, FetchOptions, RemoteCallbacks, Repository};
use std::path::Path;

/// Wrapper around git2::Repository implementing [Git]
pub struct Git2Repository {
    repo: Repository,
    remote: String,
    main_branch: String,
    token: Option<String>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(
        path: P,
        remote: impl Into<String>,
        main_branch: impl Into<String>,
    ) -> Result<Self> {
        let repo = Repository::discover(path)?;

        Ok(Git2Repository {
            repo,
            remote: remote.into(),
            main_branch: main_branch.into(),
            token: None,
        })
    }

    /// Authenticate fetch and push over HTTPS with a forge token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn callbacks(&self) -> RemoteCallbacks<'_> {
        let mut callbacks = RemoteCallbacks::new();
        let token = self.token.clone();
        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(token) = &token {
                    return Cred::userpass_plaintext("x-access-token", token);
                }
            }

            if allowed_types.contains(CredentialType::SSH_KEY) {
                if let Ok(cred) = Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")) {
                    return Ok(cred);
                }
            }

            Cred::default()
        });
        callbacks
    }

    fn resolve_commit(&self, spec: &str) -> Result<git2::Commit<'_>> {
        let object = self.repo.revparse_single(spec).map_err(|e| {
            ReleaseTrainError::Git(git2::Error::from_str(&format!(
                "Cannot resolve '{}': {}",
                spec,
                e.message()
            )))
        })?;
        Ok(object.peel_to_commit()?)
    }
}

impl Git for Git2Repository {
    fn main_branch(&self) -> &str {
        &self.main_branch
    }

    fn config_user(&self, user: &GitUser) -> Result<()> {
        let mut config = self.repo.config()?.open_level(git2::ConfigLevel::Local)?;
        config.set_str("user.name", &user.name)?;
        config.set_str("user.email", &user.email)?;
        Ok(())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        let (object, reference) = self.repo.revparse_ext(branch)?;

        self.repo
            .checkout_tree(&object, Some(CheckoutBuilder::new().safe()))?;

        match reference {
            Some(r) if r.is_branch() => {
                let name = r.name().ok_or_else(|| {
                    ReleaseTrainError::Git(git2::Error::from_str("branch name is not UTF-8"))
                })?;
                self.repo.set_head(name)?
            }
            _ => self.repo.set_head_detached(object.id())?,
        }

        tracing::debug!(branch, "checked out");
        Ok(())
    }

    fn create_branch(&self, name: &str, from: Option<&str>) -> Result<()> {
        let default_start = format!("{}/{}", self.remote, self.main_branch);
        let start = from.unwrap_or(&default_start);
        let commit = self.resolve_commit(start)?;

        self.repo.branch(name, &commit, false)?;
        tracing::info!(branch = name, from = start, "created branch");
        Ok(())
    }

    fn fetch(&self) -> Result<()> {
        let mut remote = self.repo.find_remote(&self.remote).map_err(|e| {
            ReleaseTrainError::config(format!("Cannot find remote '{}': {}", self.remote, e))
        })?;

        let mut options = FetchOptions::new();
        options.remote_callbacks(self.callbacks());

        let no_refspecs: &[&str] = &[];
        remote.fetch(no_refspecs, Some(&mut options), None)?;
        tracing::debug!(remote = %self.remote, "fetched");
        Ok(())
    }

    fn move_branch(&self, name: &str, target: &str) -> Result<()> {
        let commit = self.resolve_commit(target)?;
        self.repo.branch(name, &commit, true)?;
        tracing::info!(branch = name, target, "moved branch");
        Ok(())
    }

    fn commit(&self, message: &str, paths: &[&str]) -> Result<()> {
        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(Path::new(path.trim_start_matches("./")))?;
        }
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let parent = self.repo.head()?.peel_to_commit()?;
        let signature = self.repo.signature()?;

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?;
        tracing::info!(%oid, message, "committed");
        Ok(())
    }

    fn push(&self, branches: &[&str], force: bool) -> Result<()> {
        let mut remote = self.repo.find_remote(&self.remote).map_err(|e| {
            ReleaseTrainError::config(format!("Cannot find remote '{}': {}", self.remote, e))
        })?;

        let refspecs: Vec<String> = branches
            .iter()
            .map(|branch| {
                format!(
                    "{}refs/heads/{}:refs/heads/{}",
                    if force { "+" } else { "" },
                    branch,
                    branch
                )
            })
            .collect();
        let refspec_strs: Vec<&str> = refspecs.iter().map(|s| s.as_str()).collect();

        let mut options = git2::PushOptions::new();
        options.remote_callbacks(self.callbacks());

        remote.push(&refspec_strs, Some(&mut options))?;
        tracing::info!(?branches, force, remote = %self.remote, "pushed");
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(ReleaseTrainError::precondition("HEAD is detached"));
        }
        Ok(head.shorthand().unwrap_or_default().to_string())
    }
}
