use std::fmt;
use std::path::Path;
use std::str::FromStr;

use git2::{DescribeFormatOptions, DescribeOptions, Repository, Sort};
use tracing::debug;

use crate::error::Result;

/// A single commit as it appears in the change log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Abbreviated commit hash
    pub hash: String,
    /// Author handle, when known
    pub author: Option<String>,
    /// First line of the commit message
    pub subject: String,
}

impl FromStr for CommitRecord {
    type Err = String;

    /// Parse a `hash|author|subject` line (`hash|subject` is also accepted)
    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = line.splitn(3, '|').collect();
        match parts.as_slice() {
            [hash, subject] => Ok(Self {
                hash: hash.trim().to_string(),
                author: None,
                subject: subject.to_string(),
            }),
            [hash, author, subject] => Ok(Self {
                hash: hash.trim().to_string(),
                author: Some(author.trim().to_string()).filter(|a| !a.is_empty()),
                subject: subject.to_string(),
            }),
            _ => Err(format!("Not a commit line: {:?}", line)),
        }
    }
}

/// Parse `git log --pretty=format:'%h|%an|%s'` output, skipping other lines
pub fn parse_log(output: &str) -> Vec<CommitRecord> {
    output
        .lines()
        .filter_map(|line| line.parse().ok())
        .collect()
}

/// Commits after `from` (exclusive) up to `to` (inclusive)
///
/// Without `from` the range covers the whole history up to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    pub from: Option<String>,
    pub to: String,
}

impl CommitRange {
    /// Range from the tag preceding `tag` up to `tag`
    pub fn for_tag(repo: &Repository, tag: &str) -> Self {
        Self {
            from: previous_tag(repo, tag),
            to: tag.to_string(),
        }
    }
}

impl fmt::Display for CommitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(f, "{}..{}", from, self.to),
            None => f.write_str(&self.to),
        }
    }
}

pub fn open(path: &Path) -> Result<Repository> {
    Ok(Repository::open(path)?)
}

/// Find the closest tag reachable from the parent of `tag`
///
/// Returns `None` when `tag` points at a root commit or no earlier tag exists.
pub fn previous_tag(repo: &Repository, tag: &str) -> Option<String> {
    let parent = repo.revparse_single(&format!("{}^", tag)).ok()?;

    let mut options = DescribeOptions::new();
    options.describe_tags();

    let describe = match parent.describe(&options) {
        Ok(describe) => describe,
        Err(err) => {
            debug!(%tag, error = %err, "no previous tag");
            return None;
        }
    };

    let mut format = DescribeFormatOptions::new();
    format.abbreviated_size(0);

    describe
        .format(Some(&format))
        .ok()
        .filter(|name| !name.is_empty())
}

/// List the commits in `range`, newest first
pub fn commits_in_range(repo: &Repository, range: &CommitRange) -> Result<Vec<CommitRecord>> {
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

    let to = repo.revparse_single(&range.to)?.peel_to_commit()?;
    revwalk.push(to.id())?;

    if let Some(from) = &range.from {
        let from = repo.revparse_single(from)?.peel_to_commit()?;
        revwalk.hide(from.id())?;
    }

    let mut commits = Vec::new();
    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        let hash = commit
            .as_object()
            .short_id()?
            .as_str()
            .unwrap_or_default()
            .to_string();
        let author = commit.author().name().map(|name| name.to_string());
        let subject = commit.summary().unwrap_or_default().to_string();

        commits.push(CommitRecord {
            hash,
            author,
            subject,
        });
    }

    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Oid, Signature};
    use tempfile::TempDir;

    fn commit(repo: &Repository, author: &str, message: &str) -> Oid {
        let sig = Signature::now(author, "dev@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    fn tag(repo: &Repository, name: &str, oid: Oid) {
        let object = repo.find_object(oid, None).unwrap();
        repo.tag_lightweight(name, &object, false).unwrap();
    }

    fn subjects(commits: &[CommitRecord]) -> Vec<&str> {
        commits.iter().map(|c| c.subject.as_str()).collect()
    }

    #[test]
    fn test_commit_record_parse() {
        let record: CommitRecord = "abc1234|alice|ENG-1: fix a | with pipe".parse().unwrap();
        assert_eq!(record.hash, "abc1234");
        assert_eq!(record.author.as_deref(), Some("alice"));
        assert_eq!(record.subject, "ENG-1: fix a | with pipe");

        let record: CommitRecord = "abc1234|Fix typo".parse().unwrap();
        assert_eq!(record.author, None);
        assert_eq!(record.subject, "Fix typo");

        assert!("no separator".parse::<CommitRecord>().is_err());
    }

    #[test]
    fn test_parse_log_skips_garbage() {
        let commits = parse_log("a1|bob|First\n\nnoise\nb2|carol|Second\n");
        assert_eq!(subjects(&commits), vec!["First", "Second"]);
    }

    #[test]
    fn test_range_display() {
        let range = CommitRange {
            from: Some("v1.0.0".into()),
            to: "v1.1.0".into(),
        };
        assert_eq!(range.to_string(), "v1.0.0..v1.1.0");

        let range = CommitRange {
            from: None,
            to: "v1.0.0".into(),
        };
        assert_eq!(range.to_string(), "v1.0.0");
    }

    #[test]
    fn test_range_between_tags() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let first = commit(&repo, "alice", "ENG-1: initial setup");
        tag(&repo, "v1.0.0", first);
        commit(&repo, "bob", "ENG-2: add login");
        let last = commit(&repo, "carol", "Unrelated cleanup");
        tag(&repo, "v1.1.0", last);

        let range = CommitRange::for_tag(&repo, "v1.1.0");
        assert_eq!(range.from.as_deref(), Some("v1.0.0"));

        let commits = commits_in_range(&repo, &range).unwrap();
        assert_eq!(subjects(&commits), vec!["Unrelated cleanup", "ENG-2: add login"]);
        assert_eq!(commits[0].author.as_deref(), Some("carol"));
        assert!(!commits[0].hash.is_empty());
    }

    #[test]
    fn test_range_without_previous_tag_covers_history() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        commit(&repo, "alice", "First");
        let last = commit(&repo, "alice", "Second");
        tag(&repo, "v0.1.0", last);

        let range = CommitRange::for_tag(&repo, "v0.1.0");
        assert_eq!(range.from, None);

        let commits = commits_in_range(&repo, &range).unwrap();
        assert_eq!(subjects(&commits), vec!["Second", "First"]);
    }

    #[test]
    fn test_previous_tag_on_root_commit() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let root = commit(&repo, "alice", "Root");
        tag(&repo, "v0.0.1", root);

        assert_eq!(previous_tag(&repo, "v0.0.1"), None);
    }
}
