//! Wrapper around the `bd` command line tool.
//!
//! Reads go through `bd ... --json`. Writes are fire-and-check: the caller
//! reloads the snapshot afterwards instead of patching it.

use crate::data::{Comment, Issue, IssueType, Snapshot, Status};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// Directory `bd init` creates at the repository root.
pub const BEADS_DIR: &str = ".beads";

/// Fields for `bd create`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub issue_type: IssueType,
    pub priority: u8,
}

/// Changes for `bd update`. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueUpdate {
    pub title: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<u8>,
    pub issue_type: Option<IssueType>,
    pub description: Option<String>,
}

/// A write against the tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create(NewIssue),
    Update { id: String, update: IssueUpdate },
    Close { id: String },
    Delete { id: String },
    AddComment { id: String, text: String },
    AddBlocker { id: String, blocker: String },
    RemoveBlocker { id: String, blocker: String },
}

impl Mutation {
    /// Issue the mutation targets, if it already exists.
    pub fn issue_id(&self) -> Option<&str> {
        match self {
            Mutation::Create(_) => None,
            Mutation::Update { id, .. }
            | Mutation::Close { id }
            | Mutation::Delete { id }
            | Mutation::AddComment { id, .. }
            | Mutation::AddBlocker { id, .. }
            | Mutation::RemoveBlocker { id, .. } => Some(id),
        }
    }

    /// Short description for logs and error messages, e.g. `close bd-1`.
    pub fn describe(&self) -> String {
        match self {
            Mutation::Create(new) => format!("create {:?}", new.title),
            Mutation::Update { id, .. } => format!("update {}", id),
            Mutation::Close { id } => format!("close {}", id),
            Mutation::Delete { id } => format!("delete {}", id),
            Mutation::AddComment { id, .. } => format!("comment on {}", id),
            Mutation::AddBlocker { id, blocker } => format!("add blocker {} to {}", blocker, id),
            Mutation::RemoveBlocker { id, blocker } => {
                format!("remove blocker {} from {}", blocker, id)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    program: String,
}

impl Client {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// True when `dir` holds a beads database.
    pub fn is_initialized(dir: &Path) -> bool {
        dir.join(BEADS_DIR).is_dir()
    }

    /// Every issue regardless of status.
    pub async fn list_all(&self) -> Result<Vec<Issue>> {
        let stdout = self.run(&["list", "--json", "--all", "--limit=0"]).await?;
        parse_issues(&stdout).context("Failed to parse bd list output")
    }

    /// Identifiers `bd` considers ready to work on.
    pub async fn ready_ids(&self) -> Result<HashSet<String>> {
        let stdout = self.run(&["ready", "--json"]).await?;
        let issues = parse_issues(&stdout).context("Failed to parse bd ready output")?;
        Ok(issues.into_iter().map(|i| i.id).collect())
    }

    /// Fetch a complete snapshot.
    ///
    /// A failing `bd ready` only costs the Ready column, so it degrades to an
    /// empty set instead of failing the refresh.
    pub async fn fetch_all(&self) -> Result<Snapshot> {
        let issues = self.list_all().await?;
        let ready_ids = match self.ready_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("bd ready failed, ready column will be empty: {:#}", e);
                HashSet::new()
            }
        };

        tracing::debug!("Fetched {} issues ({} ready)", issues.len(), ready_ids.len());
        Ok(Snapshot::new(issues, ready_ids))
    }

    /// Comments on `id`, oldest first.
    pub async fn comments(&self, id: &str) -> Result<Vec<Comment>> {
        let stdout = self.run(&["comments", id, "--json"]).await?;
        parse_comments(&stdout).context("Failed to parse bd comments output")
    }

    /// Create an issue and return it as `bd` stored it.
    pub async fn create(&self, new: &NewIssue) -> Result<Issue> {
        let priority = new.priority.min(4).to_string();
        let mut args = vec![
            "create",
            "--title",
            new.title.as_str(),
            "--json",
            "--type",
            new.issue_type.as_str(),
            "--priority",
            priority.as_str(),
        ];
        if !new.description.is_empty() {
            args.extend(["-d", new.description.as_str()]);
        }

        let stdout = self.run(&args).await?;
        serde_json::from_slice(&stdout).context("Failed to parse bd create output")
    }

    pub async fn update(&self, id: &str, update: &IssueUpdate) -> Result<()> {
        let priority = update.priority.map(|p| p.min(4).to_string());
        let mut args = vec!["update", id];
        if let Some(status) = update.status {
            args.extend(["--status", status.as_str()]);
        }
        if let Some(priority) = &priority {
            args.extend(["--priority", priority.as_str()]);
        }
        if let Some(title) = &update.title {
            args.extend(["--title", title.as_str()]);
        }
        if let Some(issue_type) = &update.issue_type {
            args.extend(["--type", issue_type.as_str()]);
        }
        if let Some(description) = &update.description {
            args.extend(["-d", description.as_str()]);
        }
        if args.len() == 2 {
            return Ok(());
        }

        self.run(&args).await.map(|_| ())
    }

    pub async fn close(&self, id: &str) -> Result<()> {
        self.run(&["close", id]).await.map(|_| ())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.run(&["delete", id, "--force"]).await.map(|_| ())
    }

    pub async fn add_comment(&self, id: &str, text: &str) -> Result<()> {
        self.run(&["comments", "add", id, text]).await.map(|_| ())
    }

    /// Record that `blocker` blocks `id`.
    pub async fn add_blocker(&self, id: &str, blocker: &str) -> Result<()> {
        self.run(&["dep", "add", id, blocker]).await.map(|_| ())
    }

    pub async fn remove_blocker(&self, id: &str, blocker: &str) -> Result<()> {
        self.run(&["dep", "rm", id, blocker]).await.map(|_| ())
    }

    /// Run a mutation. Returns the new issue's id for `Create`.
    pub async fn apply(&self, mutation: &Mutation) -> Result<Option<String>> {
        tracing::info!("bd: {}", mutation.describe());
        match mutation {
            Mutation::Create(new) => self.create(new).await.map(|issue| Some(issue.id)),
            Mutation::Update { id, update } => self.update(id, update).await.map(|_| None),
            Mutation::Close { id } => self.close(id).await.map(|_| None),
            Mutation::Delete { id } => self.delete(id).await.map(|_| None),
            Mutation::AddComment { id, text } => self.add_comment(id, text).await.map(|_| None),
            Mutation::AddBlocker { id, blocker } => {
                self.add_blocker(id, blocker).await.map(|_| None)
            }
            Mutation::RemoveBlocker { id, blocker } => {
                self.remove_blocker(id, blocker).await.map(|_| None)
            }
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = tokio::process::Command::new(&self.program)
            .args(args)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to run `{}`", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "`{} {}` failed ({}): {}",
                self.program,
                args.first().copied().unwrap_or_default(),
                output.status,
                stderr.trim()
            );
        }

        Ok(output.stdout)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new("bd")
    }
}

/// Parse a `bd --json` issue array. Empty output and `null` mean no issues.
pub fn parse_issues(bytes: &[u8]) -> Result<Vec<Issue>> {
    parse_array(bytes)
}

/// Parse `bd comments --json`, with the same empty/`null` handling.
pub fn parse_comments(bytes: &[u8]) -> Result<Vec<Comment>> {
    parse_array(bytes)
}

fn parse_array<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let items: Option<Vec<T>> = serde_json::from_str(text)?;
    Ok(items.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{IssueType, Status};
    use pretty_assertions::assert_eq;

    const LIST_OUTPUT: &str = r#"[
      {
        "id": "bd-a3f8",
        "title": "Epic: board view",
        "description": "Render **five** columns",
        "status": "open",
        "priority": 1,
        "issue_type": "epic",
        "created_at": "2025-01-05T10:00:00.123456-08:00",
        "updated_at": "2025-01-06T10:00:00Z",
        "labels": ["ui"]
      },
      {
        "id": "bd-a3f8.1",
        "title": "Column layout",
        "status": "in_progress",
        "priority": 2,
        "issue_type": "task",
        "assignee": "sam",
        "created_at": "2025-01-05T11:00:00Z",
        "updated_at": "2025-01-06T11:00:00Z",
        "blocked_by": ["bd-9"]
      },
      {
        "id": "bd-9",
        "title": "Done thing",
        "status": "closed",
        "priority": 3,
        "issue_type": "spike",
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-02T00:00:00Z",
        "closed_at": "2025-01-02T00:00:00Z"
      }
    ]"#;

    #[test]
    fn test_parse_list_output() {
        let issues = parse_issues(LIST_OUTPUT.as_bytes()).unwrap();
        assert_eq!(issues.len(), 3);

        assert_eq!(issues[0].issue_type, IssueType::Epic);
        assert_eq!(issues[0].labels, vec!["ui".to_string()]);
        assert!(issues[0].closed_at.is_none());

        assert_eq!(issues[1].status, Status::InProgress);
        assert_eq!(issues[1].assignee.as_deref(), Some("sam"));
        assert!(issues[1].is_blocked());

        assert_eq!(issues[2].status, Status::Closed);
        assert_eq!(issues[2].issue_type, IssueType::Other("spike".to_string()));
        assert!(issues[2].closed_at.is_some());
    }

    #[test]
    fn test_parse_empty_and_null() {
        assert!(parse_issues(b"").unwrap().is_empty());
        assert!(parse_issues(b"null\n").unwrap().is_empty());
        assert!(parse_issues(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(parse_issues(b"not json").is_err());
    }

    #[test]
    fn test_is_initialized() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!Client::is_initialized(dir.path()));
        std::fs::create_dir(dir.path().join(BEADS_DIR)).unwrap();
        assert!(Client::is_initialized(dir.path()));
    }

    #[tokio::test]
    async fn test_missing_program_is_error() {
        let client = Client::new("lazybeads-definitely-not-installed");
        assert!(client.fetch_all().await.is_err());
    }
}
