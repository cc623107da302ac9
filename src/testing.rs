//! In-memory stand-ins for the remote APIs, and a one-shot HTTP server for
//! checking what the real clients put on the wire

use std::cell::RefCell;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use crate::error::{Error, Result};
use crate::github::{GitHubApi, Release};
use crate::linear::{Issue, IssueTracker};
use crate::tickets::TicketId;

/// How a fake call should answer
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    ApiError,
    ConnectionError,
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::ApiError => Err(Error::TrackerApi(r#"{"data":null}"#.into())),
            Reply::ConnectionError => Err(Error::TrackerConnection("connection refused".into())),
        }
    }
}

pub struct FakeTracker {
    pub issue: Reply<Option<Issue>>,
    pub issues: Reply<Vec<Issue>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self {
            issue: Reply::Ok(None),
            issues: Reply::Ok(vec![]),
            calls: RefCell::new(vec![]),
        }
    }

    pub fn with_issue(mut self, issue: Reply<Option<Issue>>) -> Self {
        self.issue = issue;
        self
    }

    pub fn with_issues(mut self, issues: Reply<Vec<Issue>>) -> Self {
        self.issues = issues;
        self
    }
}

impl IssueTracker for FakeTracker {
    fn issue(&self, id: &TicketId) -> Result<Option<Issue>> {
        self.calls.borrow_mut().push(format!("issue {}", id));
        self.issue.get()
    }

    fn issues(&self, ids: &[TicketId]) -> Result<Vec<Issue>> {
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        self.calls
            .borrow_mut()
            .push(format!("issues {}", ids.join(",")));
        self.issues.get()
    }
}

pub struct FakeGitHub {
    pub release: Option<Release>,
    pub fail_update: bool,
    pub fail_comment: bool,
    pub calls: RefCell<Vec<String>>,
    pub comments: RefCell<Vec<(u64, String)>>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self {
            release: None,
            fail_update: false,
            fail_comment: false,
            calls: RefCell::new(vec![]),
            comments: RefCell::new(vec![]),
        }
    }

    pub fn with_release(mut self, id: u64) -> Self {
        self.release = Some(Release { id });
        self
    }
}

impl GitHubApi for FakeGitHub {
    fn comment_on_pull_request(&self, number: u64, body: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("comment {}", number));
        if self.fail_comment {
            return Err(Error::GitHub("403 Forbidden: Resource not accessible".into()));
        }
        self.comments.borrow_mut().push((number, body.to_string()));
        Ok(())
    }

    fn release_by_tag(&self, tag: &str) -> Result<Release> {
        self.calls.borrow_mut().push(format!("release {}", tag));
        self.release
            .clone()
            .ok_or_else(|| Error::GitHub("404 Not Found: {\"message\":\"Not Found\"}".into()))
    }

    fn update_release_body(&self, release_id: u64, body: &str) -> Result<Release> {
        self.calls
            .borrow_mut()
            .push(format!("update {} ({} bytes)", release_id, body.len()));
        if self.fail_update {
            return Err(Error::GitHub("422 Unprocessable Entity".into()));
        }
        Ok(Release { id: release_id })
    }
}

/// A request as received by [`serve_once`]
#[derive(Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercased
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Accept a single connection on a loopback port and answer it
///
/// Returns the server's base URL and a handle yielding the request it saw.
pub fn serve_once(status: &str, body: &str) -> (String, JoinHandle<RecordedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let status = status.to_string();
    let body = body.to_string();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
            }
        }

        let length = headers
            .iter()
            .find(|(name, _)| name == "content-length")
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .unwrap_or(0);
        let mut raw_body = vec![0; length];
        reader.read_exact(&mut raw_body).unwrap();

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        RecordedRequest {
            method,
            path,
            headers,
            body: String::from_utf8(raw_body).unwrap(),
        }
    });

    (url, handle)
}
