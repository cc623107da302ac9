use std::path::Path;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::{Error, Result};

/// GitHub's public REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Represents a GitHub release
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// The numeric release ID, used to patch the release
    pub id: u64,
}

// Subset of the `release` webhook payload found at GITHUB_EVENT_PATH

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Account {
    pub login: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct ReleasePayload {
    pub published_at: Option<String>,
    pub created_at: Option<String>,
    pub target_commitish: Option<String>,
    pub author: Option<Account>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct EventPayload {
    pub release: Option<ReleasePayload>,
}

impl EventPayload {
    /// Load the event payload the runner wrote to disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Repository operations on GitHub
pub trait GitHubApi {
    /// Post a comment on a pull request
    fn comment_on_pull_request(&self, number: u64, body: &str) -> Result<()>;

    /// Find the release attached to a tag
    fn release_by_tag(&self, tag: &str) -> Result<Release>;

    /// Replace the body of a release
    fn update_release_body(&self, release_id: u64, body: &str) -> Result<Release>;
}

/// Blocking client for the GitHub REST API, scoped to one repository
#[derive(Debug, Clone)]
pub struct GitHubClient {
    base_url: String,
    repository: String,
    token: String,
    client: Client,
}

impl GitHubClient {
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://api.github.com`
    /// * `repository` - `owner/name`
    /// * `token` - token sent as `Bearer <token>`
    pub fn new(
        base_url: impl Into<String>,
        repository: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            repository: repository.into(),
            token: token.into(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}{}",
            self.base_url.trim_end_matches('/'),
            self.repository,
            path
        )
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::blocking::RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "GitHub request");

        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
    }
}

/// Decode a successful response or turn the status into an error
fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json()?)
    } else {
        let body = response.text().unwrap_or_default();
        Err(Error::GitHub(format!("{}: {}", status, body.trim())))
    }
}

impl GitHubApi for GitHubClient {
    fn comment_on_pull_request(&self, number: u64, body: &str) -> Result<()> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/issues/{}/comments", number),
            )
            .json(&json!({ "body": body }))
            .send()?;
        let _: serde_json::Value = handle_response(response)?;
        Ok(())
    }

    fn release_by_tag(&self, tag: &str) -> Result<Release> {
        let response = self
            .request(reqwest::Method::GET, &format!("/releases/tags/{}", tag))
            .send()?;
        handle_response(response)
    }

    fn update_release_body(&self, release_id: u64, body: &str) -> Result<Release> {
        let response = self
            .request(reqwest::Method::PATCH, &format!("/releases/{}", release_id))
            .json(&json!({ "body": body }))
            .send()?;
        handle_response(response)
    }
}
