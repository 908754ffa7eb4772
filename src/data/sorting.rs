//! Sibling ordering for tree nodes and board columns.
//!
//! Every comparator here is used with a stable sort, so equal elements keep
//! their snapshot order.

use super::{Issue, SortMode};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

pub type Comparator = fn(&Issue, &Issue) -> Ordering;

/// Comparator for the open and in-progress buckets.
pub fn comparator(mode: SortMode) -> Comparator {
    match mode {
        SortMode::Default => compare_default,
        SortMode::CreatedAsc => compare_created_asc,
        SortMode::CreatedDesc => compare_created_desc,
        SortMode::Priority => compare_priority,
        SortMode::Updated => compare_updated_desc,
    }
}

/// Sort `issues` in place with the comparator for `mode`.
pub fn sort_issues(issues: &mut [&Issue], mode: SortMode) {
    let cmp = comparator(mode);
    issues.sort_by(|a, b| cmp(a, b));
}

pub fn compare_default(a: &Issue, b: &Issue) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| newest_first(a.updated_at, b.updated_at))
}

pub fn compare_priority(a: &Issue, b: &Issue) -> Ordering {
    a.priority.cmp(&b.priority)
}

pub fn compare_created_asc(a: &Issue, b: &Issue) -> Ordering {
    oldest_first(a.created_at, b.created_at)
}

pub fn compare_created_desc(a: &Issue, b: &Issue) -> Ordering {
    newest_first(a.created_at, b.created_at)
}

pub fn compare_updated_desc(a: &Issue, b: &Issue) -> Ordering {
    newest_first(a.updated_at, b.updated_at)
}

/// Most recently closed first; issues without a close time go last.
pub fn compare_closed(a: &Issue, b: &Issue) -> Ordering {
    newest_first(a.closed_at, b.closed_at)
}

// Missing timestamps always sort after present ones, in either direction.
fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn oldest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
