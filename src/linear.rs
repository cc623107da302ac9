//! Linear integration
//!
//! Linear exposes a single GraphQL endpoint. Two queries are used:
//! - a single issue lookup to confirm a referenced ticket exists
//! - a filtered issue list to fetch titles and links for release notes
//!
//! Linear expects the personal API key as the raw `Authorization` header
//! value, without a `Bearer` prefix.

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::tickets::TicketId;

/// Linear's public GraphQL endpoint
pub const DEFAULT_API_URL: &str = "https://api.linear.app/graphql";

// GraphQL query to look up one issue by its identifier
const ISSUE_QUERY: &str = r#"query ($id: String!) {
  issue(id: $id) {
    id
    identifier
    title
  }
}"#;

// GraphQL query to fetch every issue in a set of identifiers
const ISSUES_QUERY: &str = r#"query ($ids: [ID!]) {
  issues(filter: { id: { in: $ids } }) {
    nodes {
      id
      identifier
      title
      url
    }
  }
}"#;

/// A Linear issue as returned by the GraphQL API
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Issue {
    pub id: Option<String>,
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl Issue {
    /// The human-readable key (`ENG-123`), falling back to the raw ID
    pub fn key(&self) -> Option<&str> {
        self.identifier.as_deref().or(self.id.as_deref())
    }
}

#[derive(Serialize, Deserialize)]
struct Response<D> {
    data: Option<D>,
}

#[derive(Serialize, Deserialize)]
struct IssueData {
    issue: Option<Issue>,
}

#[derive(Serialize, Deserialize)]
struct Nodes {
    nodes: Vec<Issue>,
}

#[derive(Serialize, Deserialize)]
struct IssuesData {
    issues: Option<Nodes>,
}

/// Read access to an issue tracker
pub trait IssueTracker {
    /// Look up a single issue
    ///
    /// Returns `Ok(None)` when the tracker answered but the issue (or its ID)
    /// is missing, [`Error::TrackerApi`] when the tracker answered without
    /// data, and [`Error::TrackerConnection`] when it could not be reached.
    fn issue(&self, id: &TicketId) -> Result<Option<Issue>>;

    /// Fetch all issues whose ID is in `ids`
    fn issues(&self, ids: &[TicketId]) -> Result<Vec<Issue>>;
}

/// Blocking client for the Linear GraphQL API
#[derive(Debug, Clone)]
pub struct LinearClient {
    api_url: String,
    api_key: String,
    client: Client,
}

impl LinearClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    /// Send a query and return the decoded JSON body
    fn query(&self, query: &str, variables: Value) -> Result<Value> {
        debug!(url = %self.api_url, "sending Linear query");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", &self.api_key)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .map_err(|e| Error::TrackerConnection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::TrackerConnection(e.to_string()))?;

        serde_json::from_str(&body).map_err(|_| {
            Error::TrackerConnection(format!("{}: {}", status, body.trim()))
        })
    }
}

impl IssueTracker for LinearClient {
    fn issue(&self, id: &TicketId) -> Result<Option<Issue>> {
        let raw = self.query(ISSUE_QUERY, json!({ "id": id.as_str() }))?;
        decode_issue(raw)
    }

    fn issues(&self, ids: &[TicketId]) -> Result<Vec<Issue>> {
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        let raw = self.query(ISSUES_QUERY, json!({ "ids": ids }))?;
        decode_issues(raw)
    }
}

/// Decode the `data` object of a response, failing when it is null
fn decode_data<D: DeserializeOwned>(raw: Value) -> Result<D> {
    let response: Response<D> = serde_json::from_value(raw.clone())
        .map_err(|_| Error::TrackerApi(raw.to_string()))?;
    response.data.ok_or_else(|| Error::TrackerApi(raw.to_string()))
}

fn decode_issue(raw: Value) -> Result<Option<Issue>> {
    let data: IssueData = decode_data(raw)?;
    Ok(data.issue.filter(|issue| issue.id.is_some()))
}

fn decode_issues(raw: Value) -> Result<Vec<Issue>> {
    let data: IssuesData = decode_data(raw)?;
    Ok(data.issues.map(|i| i.nodes).unwrap_or_default())
}
