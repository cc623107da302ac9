//! Picks the text a ticket check runs against
//!
//! Pushes are checked on the commit message, pull requests on the first line
//! of the description (or the title when the description is empty).

use crate::error::{Error, Result};

/// Prefixes of the merge commits GitHub creates
const MERGE_PREFIXES: [&str; 2] = ["Merge pull request", "Merge branch"];

/// The CI event that triggered the check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Push { message: String },
    PullRequest { title: String, body: String },
}

impl Event {
    /// Build an event from its name and the texts the runner exported
    pub fn from_name(
        name: &str,
        commit_message: Option<String>,
        pr_title: Option<String>,
        pr_body: Option<String>,
    ) -> Result<Self> {
        match name {
            "push" => Ok(Event::Push {
                message: commit_message.unwrap_or_default(),
            }),
            "pull_request" => Ok(Event::PullRequest {
                title: pr_title.unwrap_or_default(),
                body: pr_body.unwrap_or_default(),
            }),
            other => Err(Error::UnsupportedEvent(other.to_string())),
        }
    }

    pub fn is_pull_request(&self) -> bool {
        matches!(self, Event::PullRequest { .. })
    }
}

/// Text to validate and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSource {
    pub text: String,
    /// Human-readable origin, used in failure messages
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing to validate; the check passes
    Skip(String),
    Check(TextSource),
}

/// Decide which text the ticket pattern is matched against
pub fn resolve(event: &Event) -> Result<Resolution> {
    match event {
        Event::Push { message } => {
            if MERGE_PREFIXES.iter().any(|p| message.starts_with(p)) {
                return Ok(Resolution::Skip(format!(
                    "Skipping validation for Merge Commit: {}",
                    message
                )));
            }

            Ok(Resolution::Check(TextSource {
                text: message.clone(),
                label: "Commit Message",
            }))
        }
        Event::PullRequest { title, body } => {
            let body = if body == "None" { "" } else { body.as_str() };

            match body.lines().next() {
                Some(first_line) => Ok(Resolution::Check(TextSource {
                    text: first_line.to_string(),
                    label: "First line of PR Description",
                })),
                None if title.is_empty() => Err(Error::EmptyPullRequest),
                None => Ok(Resolution::Check(TextSource {
                    text: title.clone(),
                    label: "PR Title",
                })),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(message: &str) -> Event {
        Event::Push {
            message: message.into(),
        }
    }

    fn pull_request(title: &str, body: &str) -> Event {
        Event::PullRequest {
            title: title.into(),
            body: body.into(),
        }
    }

    #[test]
    fn test_push_uses_commit_message() {
        let resolution = resolve(&push("ENG-1: Fix the login redirect\n\nDetails")).unwrap();
        assert_eq!(
            resolution,
            Resolution::Check(TextSource {
                text: "ENG-1: Fix the login redirect\n\nDetails".into(),
                label: "Commit Message",
            })
        );
    }

    #[test]
    fn test_push_skips_merge_commits() {
        for message in [
            "Merge pull request #42 from org/feature",
            "Merge branch 'main' into feature",
        ] {
            assert!(matches!(
                resolve(&push(message)).unwrap(),
                Resolution::Skip(_)
            ));
        }
    }

    #[test]
    fn test_pull_request_uses_first_body_line() {
        let resolution =
            resolve(&pull_request("Title", "ENG-9: Body first line\nsecond line")).unwrap();
        assert_eq!(
            resolution,
            Resolution::Check(TextSource {
                text: "ENG-9: Body first line".into(),
                label: "First line of PR Description",
            })
        );
    }

    #[test]
    fn test_pull_request_falls_back_to_title() {
        for body in ["", "None"] {
            let resolution = resolve(&pull_request("ENG-3: Title is used", body)).unwrap();
            assert_eq!(
                resolution,
                Resolution::Check(TextSource {
                    text: "ENG-3: Title is used".into(),
                    label: "PR Title",
                })
            );
        }
    }

    #[test]
    fn test_pull_request_without_title_or_body_fails() {
        assert!(matches!(
            resolve(&pull_request("", "")),
            Err(Error::EmptyPullRequest)
        ));
    }

    #[test]
    fn test_event_from_name() {
        let event = Event::from_name("push", Some("msg".into()), None, None).unwrap();
        assert_eq!(event, push("msg"));

        let event = Event::from_name("pull_request", None, Some("t".into()), None).unwrap();
        assert!(event.is_pull_request());

        assert!(matches!(
            Event::from_name("workflow_dispatch", None, None, None),
            Err(Error::UnsupportedEvent(_))
        ));
    }
}
