use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} input is missing.")]
    MissingConfig(&'static str),

    #[error("Unsupported event: {0:?} (expected \"push\" or \"pull_request\")")]
    UnsupportedEvent(String),

    #[error("PR Description is empty and PR Title is missing/empty.")]
    EmptyPullRequest,

    #[error(
        "The format in the **{label}** is invalid.\n\n**Found:** \"{found}\"\n**Expected:** \"{expected}\"\n\n(Must start with ID, have a colon, and at least 10 chars of description)"
    )]
    InvalidFormat {
        label: String,
        found: String,
        expected: &'static str,
    },

    #[error("Linear API Error or Auth Failed.\nResponse: {0}")]
    TrackerApi(String),

    #[error("Ticket **{0}** was not found in Linear. Please check the ID.")]
    TicketNotFound(String),

    #[error("Error connecting to Linear API: {0}")]
    TrackerConnection(String),

    #[error("Error updating GitHub release (Tag might not have a release object yet): {0}")]
    ReleaseUpdate(String),

    #[error("GitHub API error: {0}")]
    GitHub(String),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
