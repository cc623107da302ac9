//! Ticket references
//!
//! Linear tickets are referenced as `PREFIX-NUMBER` (e.g. `ENG-123`). The
//! validator requires a title shaped like `ENG-123: <description>` while the
//! release notes generator picks up every reference anywhere in a subject.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TITLE_PATTERN: Regex = Regex::new(r"^([A-Z]+-\d+): (.{10,})").unwrap();
    static ref REFERENCE_PATTERN: Regex = Regex::new(r"[A-Z]+-\d+").unwrap();
    static ref ID_PATTERN: Regex = Regex::new(r"^[A-Z]+-\d+$").unwrap();
}

/// Example shown to users whose title doesn't match
pub const EXPECTED_FORMAT: &str = "ENG-123: Detailed description here...";

/// A ticket identifier such as `ENG-123`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketId(String);

impl TicketId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TicketId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if ID_PATTERN.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(format!(
                "This does not look like a valid ticket ID (e.g., ENG-123): {:?}",
                s
            ))
        }
    }
}

/// Parse a validated title (`ENG-123: at least ten chars`)
///
/// Only the start of the text is anchored; anything after the description
/// is ignored. Returns the ticket ID and the description.
pub fn parse_title(text: &str) -> Option<(TicketId, &str)> {
    let caps = TITLE_PATTERN.captures(text)?;
    let id = caps.get(1)?.as_str();
    let description = caps.get(2)?.as_str();
    Some((TicketId(id.to_string()), description))
}

/// Collect every ticket reference found in the given texts
pub fn extract_all<'a, I>(texts: I) -> TicketSet
where
    I: IntoIterator<Item = &'a str>,
{
    let mut set = TicketSet::default();
    for text in texts {
        for m in REFERENCE_PATTERN.find_iter(text) {
            set.insert(TicketId(m.as_str().to_string()));
        }
    }
    set
}

/// De-duplicated ticket IDs, kept in the order they were first seen
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TicketSet {
    ids: Vec<TicketId>,
}

impl TicketSet {
    /// Insert an ID, returning `false` if it was already present
    pub fn insert(&mut self, id: TicketId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &TicketId> {
        self.ids.iter()
    }

    pub fn as_slice(&self) -> &[TicketId] {
        &self.ids
    }

    /// IDs in lexical order
    pub fn sorted(&self) -> Vec<&TicketId> {
        let mut ids: Vec<&TicketId> = self.ids.iter().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
