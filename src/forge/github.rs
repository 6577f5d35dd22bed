//! GitHub REST client scoped to a single repository.

use crate::error::{ReleaseTrainError, Result};
use crate::forge::{Forge, NewPullRequest, Paged, PullRequest, PullRequestFilter};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

const PER_PAGE: usize = 100;
const API_VERSION: &str = "2022-11-28";

/// A repository identified as `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoId {
    type Err = ReleaseTrainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(RepoId {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(ReleaseTrainError::config(format!(
                "Repository must be given as owner/name, got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Deserialize)]
struct RefPayload {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct LabelPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    login: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    title: String,
    body: Option<String>,
    head: RefPayload,
    base: RefPayload,
    #[serde(default)]
    labels: Vec<LabelPayload>,
    user: Option<UserPayload>,
}

impl From<PullRequestPayload> for PullRequest {
    fn from(payload: PullRequestPayload) -> Self {
        PullRequest {
            number: payload.number,
            title: payload.title,
            body: payload.body,
            head: payload.head.name,
            base: payload.base.name,
            labels: payload.labels.into_iter().map(|l| l.name).collect(),
            author: payload.user.map(|u| u.login),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BranchPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    default_branch: String,
}

/// GitHub client for one repository
pub struct GitHubForge {
    client: Client,
    api_url: String,
    repo: RepoId,
}

impl fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubForge")
            .field("api_url", &self.api_url)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

impl GitHubForge {
    /// Create a client authenticating with `token`
    pub fn new(api_url: impl Into<String>, token: &str, repo: RepoId) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ReleaseTrainError::config("GitHub token contains invalid characters"))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .user_agent(concat!("release-train/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(GitHubForge {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            repo,
        })
    }

    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    fn url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}{}", self.api_url, self.repo.owner, self.repo.name, path)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check(request.send()?)?;
        Ok(response.json()?)
    }

    fn pages<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> PageIter<'_, T> {
        PageIter {
            forge: self,
            url: self.url(path),
            query,
            page: 1,
            buffer: VecDeque::new(),
            done: false,
        }
    }
}

fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let text = response.text().unwrap_or_default();
    Err(ReleaseTrainError::forge(format!("{} returned {}: {}", url, status, text)))
}

/// Walks a paginated listing, requesting the next page only when needed
struct PageIter<'a, T> {
    forge: &'a GitHubForge,
    url: String,
    query: Vec<(String, String)>,
    page: u32,
    buffer: VecDeque<T>,
    done: bool,
}

impl<T: DeserializeOwned> PageIter<'_, T> {
    fn fetch_page(&self) -> Result<Vec<T>> {
        tracing::debug!(url = %self.url, page = self.page, "fetching page");
        let request = self
            .forge
            .client
            .get(&self.url)
            .query(&self.query)
            .query(&[("per_page", PER_PAGE.to_string()), ("page", self.page.to_string())]);
        self.forge.send(request)
    }
}

impl<T: DeserializeOwned> Iterator for PageIter<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            if self.done {
                return None;
            }
            match self.fetch_page() {
                Ok(items) => {
                    self.done = items.len() < PER_PAGE;
                    self.page += 1;
                    self.buffer.extend(items);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl Forge for GitHubForge {
    fn default_branch(&self) -> Result<String> {
        let repo: RepositoryPayload = self.send(self.client.get(self.url("")))?;
        Ok(repo.default_branch)
    }

    fn branches(&self) -> Paged<'_, String> {
        Box::new(
            self.pages::<BranchPayload>("/branches", Vec::new())
                .map(|b| b.map(|b| b.name)),
        )
    }

    fn pull_requests(&self, filter: &PullRequestFilter) -> Paged<'_, PullRequest> {
        let mut query = vec![("state".to_string(), "open".to_string())];
        if let Some(base) = &filter.base {
            query.push(("base".to_string(), base.clone()));
        }
        Box::new(
            self.pages::<PullRequestPayload>("/pulls", query)
                .map(|pr| pr.map(PullRequest::from)),
        )
    }

    fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        let pr: PullRequestPayload =
            self.send(self.client.get(self.url(&format!("/pulls/{}", number))))?;
        Ok(pr.into())
    }

    fn create_pull_request(&self, pr: &NewPullRequest) -> Result<PullRequest> {
        let body = json!({
            "title": pr.title,
            "head": pr.head,
            "base": pr.base,
            "body": pr.body,
        });
        let created: PullRequestPayload =
            self.send(self.client.post(self.url("/pulls")).json(&body))?;
        tracing::info!(
            number = created.number,
            head = %pr.head,
            base = %pr.base,
            "created pull request"
        );
        Ok(created.into())
    }

    fn update_pull_request_body(&self, number: u64, body: &str) -> Result<PullRequest> {
        let updated: PullRequestPayload = self.send(
            self.client
                .patch(self.url(&format!("/pulls/{}", number)))
                .json(&json!({ "body": body })),
        )?;
        Ok(updated.into())
    }

    fn close_pull_request(&self, number: u64) -> Result<()> {
        let _: PullRequestPayload = self.send(
            self.client
                .patch(self.url(&format!("/pulls/{}", number)))
                .json(&json!({ "state": "closed" })),
        )?;
        tracing::info!(number, "closed pull request");
        Ok(())
    }

    fn set_labels(&self, number: u64, labels: &[String]) -> Result<Vec<String>> {
        let set: Vec<LabelPayload> = self.send(
            self.client
                .put(self.url(&format!("/issues/{}/labels", number)))
                .json(&json!({ "labels": labels })),
        )?;
        Ok(set.into_iter().map(|l| l.name).collect())
    }
}
