use tracing::{info, warn};

use crate::cli::{non_empty, non_empty_path, CheckArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::github::{GitHubApi, GitHubClient};
use crate::linear::{IssueTracker, LinearClient};
use crate::source::{self, Event, Resolution};
use crate::tickets::{self, TicketId};
use crate::ui;

/// Heading of the comment posted on a failing pull request
pub const COMMENT_HEADING: &str = "❌ **Linear Ticket Check Failed**";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing needed checking (merge commits)
    Skipped(String),
    /// The ticket exists in Linear
    Verified {
        ticket: TicketId,
        title: Option<String>,
    },
}

/// Main entry point of `ticket-check`
pub fn run(args: CheckArgs) -> Result<Outcome> {
    let config = Config::load(non_empty_path(args.config).as_deref())?;

    let event_name = non_empty(args.event).ok_or(Error::MissingConfig("EVENT_NAME"))?;
    let event = Event::from_name(
        &event_name,
        args.commit_message,
        args.pr_title,
        args.pr_body,
    )?;

    let tracker = non_empty(args.linear_api_key)
        .map(|key| LinearClient::new(config.linear.api_url.clone(), key));

    let result = check_ticket(&event, tracker.as_ref().map(|t| t as &dyn IssueTracker));

    if let Err(err) = &result {
        let pr_number = parse_pr_number(args.pr_number);
        let repository = non_empty(args.repository);
        let token = non_empty(args.github_token);

        if let (true, Some(pr_number), Some(repository), Some(token)) =
            (event.is_pull_request(), pr_number, repository, token)
        {
            let github = GitHubClient::new(config.github.api_url.clone(), repository, token);
            report_failure(&github, pr_number, err);
        }
    }

    result
}

/// Parse the pull request number, warning when it isn't a number
fn parse_pr_number(raw: Option<String>) -> Option<u64> {
    let raw = non_empty(raw)?;
    match raw.trim().parse::<u64>() {
        Ok(number) => Some(number),
        Err(err) => {
            warn!(pr_number = %raw, error = %err, "invalid PR number, not commenting");
            ui::warning(format!(
                "PR_NUMBER {:?} is not a number; skipping PR comment",
                raw
            ));
            None
        }
    }
}

/// Validate the ticket reference carried by `event`
///
/// The API key is only required once a ticket ID has been found, so format
/// errors are reported even when Linear isn't configured.
pub fn check_ticket(event: &Event, tracker: Option<&dyn IssueTracker>) -> Result<Outcome> {
    let source = match source::resolve(event)? {
        Resolution::Skip(reason) => {
            ui::step(&reason);
            return Ok(Outcome::Skipped(reason));
        }
        Resolution::Check(source) => source,
    };

    ui::step(format!("Checking {}", source.label));

    let (ticket, _) = tickets::parse_title(&source.text).ok_or_else(|| Error::InvalidFormat {
        label: source.label.to_string(),
        found: source.text.clone(),
        expected: tickets::EXPECTED_FORMAT,
    })?;

    ui::step(format!("Found Ticket ID: {}", ticket));

    let tracker = tracker.ok_or(Error::MissingConfig("LINEAR_API_KEY"))?;

    match tracker.issue(&ticket)? {
        Some(issue) => {
            info!(%ticket, "ticket verified");
            ui::success(format!(
                "Success! Verified ticket exists: {}",
                issue.title.as_deref().unwrap_or_default()
            ));
            Ok(Outcome::Verified {
                ticket,
                title: issue.title,
            })
        }
        None => Err(Error::TicketNotFound(ticket.to_string())),
    }
}

/// Comment on the pull request with the failure, best effort
///
/// A failure to comment is only logged; the check still fails with `err`.
pub fn report_failure(github: &dyn GitHubApi, pr_number: u64, err: &Error) {
    ui::step("Posting comment to GitHub PR...");

    let body = format!("{}\n\n{}", COMMENT_HEADING, err);
    if let Err(comment_err) = github.comment_on_pull_request(pr_number, &body) {
        warn!(pr_number, error = %comment_err, "failed to post comment");
        ui::warning(format!("Could not post comment to PR. {}", comment_err));
    }
}
