use std::path::PathBuf;

use clap::Parser;

/// Fail the build unless the commit or pull request references a Linear ticket
#[derive(Parser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
pub struct CheckArgs {
    /// Triggering event: `push` or `pull_request`
    #[clap(long, env = "EVENT_NAME")]
    pub event: Option<String>,

    #[clap(long, env = "LINEAR_API_KEY", hide_env_values = true)]
    pub linear_api_key: Option<String>,

    /// Token used to comment on the pull request when the check fails
    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository as `owner/name`
    #[clap(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    #[clap(long, env = "PR_NUMBER")]
    pub pr_number: Option<String>,

    #[clap(long, env = "COMMIT_MSG")]
    pub commit_message: Option<String>,

    #[clap(long, env = "PR_TITLE")]
    pub pr_title: Option<String>,

    #[clap(long, env = "PR_BODY")]
    pub pr_body: Option<String>,

    /// Optional YAML configuration file
    #[clap(short, long, env = "TICKET_ACTIONS_CONFIG")]
    pub config: Option<String>,

    #[clap(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Generate release notes from the commits since the previous tag
#[derive(Parser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
pub struct NotesArgs {
    /// Tag being released
    #[clap(long, env = "GITHUB_REF_NAME")]
    pub tag: Option<String>,

    #[clap(long, env = "LINEAR_API_KEY", hide_env_values = true)]
    pub linear_api_key: Option<String>,

    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository as `owner/name`
    #[clap(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Fallback for the release author
    #[clap(long, env = "GITHUB_ACTOR")]
    pub actor: Option<String>,

    /// Print the notes instead of updating the GitHub release
    ///
    /// Any value other than an empty one or a false-like literal (`false`,
    /// `no`, `off`, `0`, `n`, `f`) turns the dry run on.
    #[clap(
        long,
        env = "DRY_RUN",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub dry_run: bool,

    /// Path to the triggering event's JSON payload
    #[clap(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<String>,

    /// Git repository to read commits from
    #[clap(long, default_value = ".")]
    pub repo: PathBuf,

    /// Read commits from `git log --pretty=format:'%h|%an|%s'` output instead
    #[clap(long)]
    pub git_log: Option<PathBuf>,

    /// Optional YAML configuration file
    #[clap(short, long, env = "TICKET_ACTIONS_CONFIG")]
    pub config: Option<String>,

    #[clap(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Runners export unset inputs as empty strings
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Like [`non_empty`], for inputs naming a file
pub fn non_empty_path(value: Option<String>) -> Option<PathBuf> {
    non_empty(value).map(PathBuf::from)
}
