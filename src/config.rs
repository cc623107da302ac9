//! Configuration for ticket-actions
//!
//! Everything has a default, so the YAML file is optional. It exists to point
//! the tools at other API endpoints (GitHub Enterprise, a proxy) or to move
//! the generated release notes file.
//!
//! ```yaml
//! linear:
//!   api_url: https://api.linear.app/graphql
//! github:
//!   api_url: https://github.example.com/api/v3
//! notes:
//!   output_file: release_notes.md
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{github, linear};

/// Default location of the generated release notes
const DEFAULT_OUTPUT_FILE: &str = "release_notes.md";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinearConfig {
    /// GraphQL endpoint
    pub api_url: String,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            api_url: linear::DEFAULT_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// REST API root
    pub api_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: github::DEFAULT_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotesConfig {
    /// Where the release document is written
    pub output_file: PathBuf,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub linear: LinearConfig,
    pub github: GitHubConfig,
    pub notes: NotesConfig,
}

impl Config {
    /// Load configuration from `path`, or the defaults when no path is given
    ///
    /// A path that was given but doesn't exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_str(&contents)?)
    }
}
