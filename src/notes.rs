//! Release notes Markdown
//!
//! A release document has three sections, always in this order:
//! release info, a summary of the Linear tickets referenced, and the change
//! log of commits in the release range.

use chrono::{DateTime, Utc};

use crate::git::CommitRecord;
use crate::github::ReleasePayload;
use crate::linear::Issue;
use crate::tickets::TicketSet;

pub const NO_TICKETS: &str = "No Linear tickets referenced.";
pub const NO_COMMITS: &str = "No commits found in this range.";
pub const UNRESOLVED_TICKETS: &str =
    "⚠️ Could not fetch ticket details from Linear. Referenced tickets:";

const UNKNOWN_ACTOR: &str = "Unknown";

/// Who released what, and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Branch or commitish the release was cut from
    pub target: String,
    /// Already formatted as `YYYY-MM-DD HH:MM:SS UTC`
    pub timestamp: String,
    pub actor: Option<String>,
}

impl ReleaseInfo {
    /// Build release info, preferring the release event payload when present
    ///
    /// # Arguments
    /// * `tag` - The release tag, used as target when the payload has none
    /// * `payload` - The `release` object of the triggering event
    /// * `actor` - The actor name exported by the runner
    /// * `now` - Used when the payload carries no timestamp
    pub fn new(
        tag: &str,
        payload: Option<&ReleasePayload>,
        actor: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let target = payload
            .and_then(|p| p.target_commitish.clone())
            .unwrap_or_else(|| tag.to_string());

        let timestamp = payload
            .and_then(|p| p.published_at.as_deref().or(p.created_at.as_deref()))
            .map(format_timestamp)
            .unwrap_or_else(|| now.format("%Y-%m-%d %H:%M:%S UTC").to_string());

        let actor = payload
            .and_then(|p| p.author.as_ref())
            .and_then(|a| a.login.clone())
            .or(actor);

        Self {
            target,
            timestamp,
            actor,
        }
    }

    fn render(&self) -> String {
        let actor = match &self.actor {
            Some(actor) => format!("@{}", actor),
            None => UNKNOWN_ACTOR.to_string(),
        };

        format!(
            "## 🚀 Release Info\n* **Target:** {}\n* **Date:** {}\n* **Released by:** {}",
            self.target, self.timestamp, actor
        )
    }
}

/// Turn `2024-05-01T12:30:00Z` into `2024-05-01 12:30:00 UTC`
pub fn format_timestamp(raw: &str) -> String {
    let spaced = raw.replacen('T', " ", 1);
    match spaced.strip_suffix('Z') {
        Some(rest) => format!("{} UTC", rest),
        None => spaced,
    }
}

/// Ticket summary section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// No tickets were referenced
    Empty,
    /// Details were fetched for every referenced ticket, in reference order
    Complete(Vec<Issue>),
    /// Tickets were referenced but their details are missing
    Unresolved(TicketSet),
}

impl Summary {
    /// Match fetched issues against the referenced tickets
    ///
    /// Anything short of an issue for every ticket degrades to `Unresolved`.
    pub fn from_issues(tickets: &TicketSet, issues: Vec<Issue>) -> Self {
        if tickets.is_empty() {
            return Summary::Empty;
        }

        let mut ordered = Vec::with_capacity(tickets.len());
        for ticket in tickets.iter() {
            match issues
                .iter()
                .find(|issue| issue.key() == Some(ticket.as_str()))
            {
                Some(issue) => ordered.push(issue.clone()),
                None => return Summary::Unresolved(tickets.clone()),
            }
        }

        Summary::Complete(ordered)
    }

    fn render(&self) -> String {
        let mut lines = vec!["## 📝 Summary (Linear Tickets)".to_string()];

        match self {
            Summary::Empty => lines.push(NO_TICKETS.to_string()),
            Summary::Complete(issues) => {
                for issue in issues {
                    lines.push(format!(
                        "* **{}**: {} ([View]({}))",
                        issue.key().unwrap_or_default(),
                        issue.title.as_deref().unwrap_or_default(),
                        issue.url.as_deref().unwrap_or_default()
                    ));
                }
            }
            Summary::Unresolved(tickets) => {
                lines.push(UNRESOLVED_TICKETS.to_string());
                for ticket in tickets.sorted() {
                    lines.push(format!("* {}", ticket));
                }
            }
        }

        lines.join("\n")
    }
}

/// Render the change log, one line per commit in the given order
pub fn render_change_log(commits: &[CommitRecord]) -> String {
    let mut lines = vec!["## 🛠 Change Log".to_string()];

    if commits.is_empty() {
        lines.push(NO_COMMITS.to_string());
    }

    for commit in commits {
        match &commit.author {
            Some(author) => lines.push(format!(
                "* {} ({}) - {}",
                commit.subject,
                commit.hash,
                mention(author)
            )),
            None => lines.push(format!("* {} ({})", commit.subject, commit.hash)),
        }
    }

    lines.join("\n")
}

/// `@handle` for single-word git author names, the plain name otherwise
///
/// Git records display names (`Jane Doe`), which aren't GitHub handles.
fn mention(author: &str) -> String {
    if author.chars().any(char::is_whitespace) {
        author.to_string()
    } else {
        format!("@{}", author)
    }
}

/// Assemble the full release document
pub fn render_document(info: &ReleaseInfo, summary: &Summary, commits: &[CommitRecord]) -> String {
    let mut document = [info.render(), summary.render(), render_change_log(commits)].join("\n\n");
    document.push('\n');
    document
}
