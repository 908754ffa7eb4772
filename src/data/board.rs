//! Kanban categorisation into five mutually exclusive columns.

use super::{sorting, Issue, Snapshot, SortMode, Status};

pub const COLUMN_COUNT: usize = 5;

/// Board column, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardColumn {
    Blocked,
    Open,
    Ready,
    InProgress,
    Done,
}

impl BoardColumn {
    pub const ALL: [BoardColumn; COLUMN_COUNT] = [
        BoardColumn::Blocked,
        BoardColumn::Open,
        BoardColumn::Ready,
        BoardColumn::InProgress,
        BoardColumn::Done,
    ];

    pub fn index(&self) -> usize {
        match self {
            Self::Blocked => 0,
            Self::Open => 1,
            Self::Ready => 2,
            Self::InProgress => 3,
            Self::Done => 4,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Blocked => "BLOCKED",
            Self::Open => "OPEN",
            Self::Ready => "READY",
            Self::InProgress => "IN PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Which column an issue lands in. Exactly one column per issue.
    pub fn classify(issue: &Issue, is_ready: bool) -> Self {
        match issue.status {
            Status::Closed => Self::Done,
            Status::InProgress => Self::InProgress,
            Status::Open if issue.is_blocked() => Self::Blocked,
            Status::Open if is_ready => Self::Ready,
            Status::Open => Self::Open,
        }
    }
}

/// The board partition of a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardColumns {
    columns: [Vec<Issue>; COLUMN_COUNT],
}

impl BoardColumns {
    pub fn column(&self, col: BoardColumn) -> &[Issue] {
        &self.columns[col.index()]
    }

    pub fn len(&self, col: BoardColumn) -> usize {
        self.columns[col.index()].len()
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn get(&self, col: BoardColumn, row: usize) -> Option<&Issue> {
        self.columns[col.index()].get(row)
    }

    /// Locate an issue anywhere on the board.
    pub fn find(&self, id: &str) -> Option<(BoardColumn, usize)> {
        BoardColumn::ALL.iter().find_map(|col| {
            self.columns[col.index()]
                .iter()
                .position(|i| i.id == id)
                .map(|row| (*col, row))
        })
    }
}

/// Partition every issue in `snapshot` into its board column.
///
/// Columns are ordered by `sort`, except Done which is ordered by close time.
pub fn categorize(snapshot: &Snapshot, sort: SortMode) -> BoardColumns {
    let mut buckets: [Vec<&Issue>; COLUMN_COUNT] = Default::default();
    for issue in &snapshot.issues {
        let col = BoardColumn::classify(issue, snapshot.is_ready(&issue.id));
        buckets[col.index()].push(issue);
    }

    let mut board = BoardColumns::default();
    for col in BoardColumn::ALL {
        let bucket = &mut buckets[col.index()];
        if col == BoardColumn::Done {
            bucket.sort_by(|a, b| sorting::compare_closed(a, b));
        } else {
            sorting::sort_issues(bucket, sort);
        }
        board.columns[col.index()] = bucket.iter().map(|i| (*i).clone()).collect();
    }
    board
}
