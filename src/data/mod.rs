pub mod board;
pub mod filter;
pub mod hierarchy;
pub mod sorting;
pub mod tree;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub use board::{BoardColumn, BoardColumns};
pub use tree::TreeNode;

/// A single beads issue as emitted by `bd list --json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub issue_type: IssueType,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub blocked_by: Vec<String>,
    #[serde(default)]
    pub blocks: Vec<String>,
}

impl Issue {
    /// Minimal constructor, mostly for tests and fixtures.
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: Status) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status,
            priority: 2,
            issue_type: IssueType::Task,
            labels: Vec::new(),
            assignee: None,
            created_at: None,
            updated_at: None,
            closed_at: None,
            blocked_by: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn is_blocked(&self) -> bool {
        !self.blocked_by.is_empty()
    }

    /// "P0".."P4", or "P?" for anything out of range.
    pub fn priority_label(&self) -> &'static str {
        match self.priority {
            0 => "P0",
            1 => "P1",
            2 => "P2",
            3 => "P3",
            4 => "P4",
            _ => "P?",
        }
    }

    pub fn parent_id(&self) -> &str {
        hierarchy::parent_id(&self.id)
    }

    pub fn depth(&self) -> usize {
        hierarchy::depth(&self.id)
    }
}

/// Issue lifecycle state.
///
/// `bd` may grow new states; anything unrecognised is treated as open so the
/// issue still shows up somewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Open, Status::InProgress, Status::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Open => "○",
            Self::InProgress => "◐",
            Self::Closed => "●",
        }
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => Self::Open,
            "in_progress" => Self::InProgress,
            "closed" => Self::Closed,
            other => {
                tracing::debug!("Unknown issue status {:?}, treating as open", other);
                Self::Open
            }
        }
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        value.as_str().to_string()
    }
}

/// Issue kind. Free-form in `bd`, so unknown kinds are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueType {
    #[default]
    Task,
    Bug,
    Feature,
    Epic,
    Chore,
    Other(String),
}

impl IssueType {
    /// The kinds `bd create --type` accepts.
    pub const STANDARD: [IssueType; 5] = [
        IssueType::Task,
        IssueType::Bug,
        IssueType::Feature,
        IssueType::Epic,
        IssueType::Chore,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Epic => "epic",
            Self::Chore => "chore",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for IssueType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "task" | "" => Self::Task,
            "bug" => Self::Bug,
            "feature" => Self::Feature,
            "epic" => Self::Epic,
            "chore" => Self::Chore,
            _ => Self::Other(value),
        }
    }
}

impl From<IssueType> for String {
    fn from(value: IssueType) -> Self {
        value.as_str().to_string()
    }
}

/// A comment from `bd comments <id> --json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Everything fetched in one refresh. Replaced wholesale, never patched.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub issues: Vec<Issue>,
    pub ready_ids: HashSet<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn new(issues: Vec<Issue>, ready_ids: HashSet<String>) -> Self {
        Self {
            issues,
            ready_ids,
            fetched_at: Some(Utc::now()),
        }
    }

    pub fn is_ready(&self, id: &str) -> bool {
        self.ready_ids.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id == id)
    }

    pub fn count_by_status(&self) -> HashMap<Status, usize> {
        let mut counts = HashMap::new();
        for issue in &self.issues {
            *counts.entry(issue.status).or_insert(0) += 1;
        }
        counts
    }
}

/// Ordering applied within each sibling group of the open and in-progress
/// panels. The closed panel always orders by close time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Priority ascending, then most recently updated first
    #[default]
    Default,
    CreatedAsc,
    CreatedDesc,
    Priority,
    Updated,
}

impl SortMode {
    pub fn next(&self) -> Self {
        match self {
            Self::Default => Self::CreatedAsc,
            Self::CreatedAsc => Self::CreatedDesc,
            Self::CreatedDesc => Self::Priority,
            Self::Priority => Self::Updated,
            Self::Updated => Self::Default,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::CreatedAsc => "created ↑",
            Self::CreatedDesc => "created ↓",
            Self::Priority => "priority",
            Self::Updated => "updated",
        }
    }
}

/// Preset filter selected with a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    /// open or in_progress
    Open,
    Closed,
    /// open or in_progress with nothing blocking
    Ready,
}

impl FilterMode {
    /// Pressing the key of the active mode again goes back to `All`.
    pub fn toggled(self, target: FilterMode) -> FilterMode {
        if self == target {
            FilterMode::All
        } else {
            target
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Ready => "ready",
        }
    }
}

/// Identifiers of issues whose children are hidden in the tree.
///
/// Keyed by identifier so it survives snapshot replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseSet {
    collapsed: HashSet<String>,
}

impl CollapseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    /// Flip the state for `id`, returning whether it is now collapsed.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.collapsed.remove(id) {
            false
        } else {
            self.collapsed.insert(id.to_string());
            true
        }
    }

    pub fn collapse(&mut self, id: &str) {
        self.collapsed.insert(id.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }
}

/// User-controlled inputs to the view derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    pub query: String,
    pub filter: FilterMode,
    pub sort: SortMode,
}

/// Derived per-panel orderings plus the board partition.
#[derive(Debug, Clone, Default)]
pub struct Views {
    pub in_progress: Vec<TreeNode>,
    pub open: Vec<TreeNode>,
    pub closed: Vec<TreeNode>,
    pub board: BoardColumns,
}

/// Derive every view from a snapshot.
///
/// Text and preset filters apply before bucketing by status; each bucket is
/// then rebuilt as a tree and flattened. The board always partitions the full
/// snapshot.
pub fn recompute_views(snapshot: &Snapshot, params: &ViewParams, collapse: &CollapseSet) -> Views {
    let mut in_progress = Vec::new();
    let mut open = Vec::new();
    let mut closed = Vec::new();

    for issue in snapshot
        .issues
        .iter()
        .filter(|i| filter::matches(i, &params.query, params.filter))
    {
        match issue.status {
            Status::InProgress => in_progress.push(issue),
            Status::Open => open.push(issue),
            Status::Closed => closed.push(issue),
        }
    }

    let active_cmp = sorting::comparator(params.sort);
    let views = Views {
        in_progress: tree::flatten_bucket(&in_progress, active_cmp, collapse),
        open: tree::flatten_bucket(&open, active_cmp, collapse),
        closed: tree::flatten_bucket(&closed, sorting::compare_closed, collapse),
        board: board::categorize(snapshot, params.sort),
    };

    tracing::debug!(
        "Recomputed views: {} in progress, {} open, {} closed (filter={}, sort={})",
        views.in_progress.len(),
        views.open.len(),
        views.closed.len(),
        params.filter.label(),
        params.sort.label()
    );

    views
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_unknown_string_is_open() {
        assert_eq!(Status::from("blocked".to_string()), Status::Open);
        assert_eq!(Status::from("in_progress".to_string()), Status::InProgress);
    }

    #[test]
    fn test_priority_label_out_of_range() {
        let mut issue = Issue::new("a", "A", Status::Open);
        issue.priority = 0;
        assert_eq!(issue.priority_label(), "P0");
        issue.priority = 9;
        assert_eq!(issue.priority_label(), "P?");
    }

    #[test]
    fn test_filter_toggle_returns_to_all() {
        assert_eq!(FilterMode::All.toggled(FilterMode::Ready), FilterMode::Ready);
        assert_eq!(FilterMode::Ready.toggled(FilterMode::Ready), FilterMode::All);
        assert_eq!(FilterMode::Open.toggled(FilterMode::Closed), FilterMode::Closed);
    }

    #[test]
    fn test_sort_mode_cycle_wraps() {
        let mut mode = SortMode::Default;
        for _ in 0..5 {
            mode = mode.next();
        }
        assert_eq!(mode, SortMode::Default);
    }

    #[test]
    fn test_collapse_toggle() {
        let mut set = CollapseSet::new();
        assert!(set.toggle("X"));
        assert!(set.is_collapsed("X"));
        assert!(!set.toggle("X"));
        assert!(set.is_empty());
    }
}
