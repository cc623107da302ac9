use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cli::{non_empty, non_empty_path, NotesArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::git::{self, CommitRange, CommitRecord};
use crate::github::{EventPayload, GitHubApi, GitHubClient};
use crate::linear::{IssueTracker, LinearClient};
use crate::notes::{self, ReleaseInfo, Summary};
use crate::tickets;
use crate::ui;

/// What happened to the generated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Dry run: printed to stdout only
    Printed { path: PathBuf },
    /// The GitHub release body was replaced
    Published { path: PathBuf, release_id: u64 },
}

/// Main entry point of `release-notes`
pub fn run(args: NotesArgs) -> Result<Delivery> {
    let config = Config::load(non_empty_path(args.config).as_deref())?;
    let tag = non_empty(args.tag).ok_or(Error::MissingConfig("GITHUB_REF_NAME"))?;

    ui::step(format!("Generating notes for {}...", tag));

    let commits = match &args.git_log {
        Some(path) => git::parse_log(&std::fs::read_to_string(path)?),
        None => {
            let repo = git::open(&args.repo)?;
            let range = CommitRange::for_tag(&repo, &tag);
            match &range.from {
                Some(from) => ui::step(format!("Found previous tag: {}", from)),
                None => ui::step("No previous tag found. Generating notes for entire history."),
            }
            debug!(%range, "collecting commits");
            git::commits_in_range(&repo, &range)?
        }
    };

    let payload = match non_empty_path(args.event_path) {
        Some(path) => load_payload(&path),
        None => None,
    };
    let info = ReleaseInfo::new(
        &tag,
        payload.as_ref().and_then(|p| p.release.as_ref()),
        non_empty(args.actor),
        Utc::now(),
    );

    let tracker = non_empty(args.linear_api_key)
        .map(|key| LinearClient::new(config.linear.api_url.clone(), key));
    let document = build_document(
        &info,
        &commits,
        tracker.as_ref().map(|t| t as &dyn IssueTracker),
    );

    let github = match (non_empty(args.repository), non_empty(args.github_token)) {
        (Some(repository), Some(token)) => Some(GitHubClient::new(
            config.github.api_url.clone(),
            repository,
            token,
        )),
        _ => None,
    };

    deliver(
        &document,
        &config.notes.output_file,
        &tag,
        args.dry_run,
        github.as_ref().map(|g| g as &dyn GitHubApi),
    )
}

/// Read the event payload; an unreadable payload only loses some metadata
fn load_payload(path: &Path) -> Option<EventPayload> {
    match EventPayload::from_file(path) {
        Ok(payload) => Some(payload),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable event payload");
            None
        }
    }
}

/// Extract tickets from `commits`, fetch their details, and render the notes
///
/// Fetching is best effort: without a tracker, or when the fetch fails, the
/// summary lists the bare ticket IDs under a warning.
pub fn build_document(
    info: &ReleaseInfo,
    commits: &[CommitRecord],
    tracker: Option<&dyn IssueTracker>,
) -> String {
    let referenced = tickets::extract_all(commits.iter().map(|c| c.subject.as_str()));

    let summary = if referenced.is_empty() {
        Summary::Empty
    } else {
        match tracker {
            Some(tracker) => {
                ui::step(format!("Fetching titles for {} tickets...", referenced.len()));
                match tracker.issues(referenced.as_slice()) {
                    Ok(issues) => Summary::from_issues(&referenced, issues),
                    Err(err) => {
                        warn!(error = %err, "failed to fetch Linear data");
                        ui::warning(format!("Failed to fetch Linear data: {}", err));
                        Summary::Unresolved(referenced)
                    }
                }
            }
            None => {
                ui::warning("LINEAR_API_KEY is not set; listing ticket IDs only");
                Summary::Unresolved(referenced)
            }
        }
    };

    notes::render_document(info, &summary, commits)
}

/// Write the document to `output`, then print it or publish it
///
/// The file is written before anything else so it survives a failed update.
pub fn deliver(
    document: &str,
    output: &Path,
    tag: &str,
    dry_run: bool,
    github: Option<&dyn GitHubApi>,
) -> Result<Delivery> {
    std::fs::write(output, document)?;
    info!(path = %output.display(), "release notes written");

    if dry_run {
        ui::step("Dry run: not updating the GitHub release");
        println!("{}", document);
        return Ok(Delivery::Printed {
            path: output.to_path_buf(),
        });
    }

    let github = github.ok_or(Error::MissingConfig("GITHUB_TOKEN / GITHUB_REPOSITORY"))?;

    ui::step("Updating GitHub Release...");
    let release = github
        .release_by_tag(tag)
        .map_err(|e| Error::ReleaseUpdate(e.to_string()))?;
    github
        .update_release_body(release.id, document)
        .map_err(|e| Error::ReleaseUpdate(e.to_string()))?;

    ui::success("Successfully updated Release notes!");
    Ok(Delivery::Published {
        path: output.to_path_buf(),
        release_id: release.id,
    })
}
