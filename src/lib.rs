//! # ticket-actions
//!
//! CI checks for teams that track work in Linear:
//! - `ticket-check` fails a build whose commit message or pull request
//!   doesn't start with an existing Linear ticket ID
//! - `release-notes` builds release notes from the commits since the previous
//!   tag and publishes them on the GitHub release

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod linear;
pub mod notes;
pub mod release;
pub mod source;
pub mod tickets;
pub mod ui;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use tickets::{TicketId, TicketSet};
