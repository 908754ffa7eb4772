//! Text query and preset filter predicates.

use super::{FilterMode, Issue, Status};

/// True when `issue` passes both the text query and the preset mode.
pub fn matches(issue: &Issue, query: &str, mode: FilterMode) -> bool {
    matches_mode(issue, mode) && matches_query(issue, query)
}

/// Case-insensitive substring match against title or identifier.
/// A blank query matches everything.
pub fn matches_query(issue: &Issue, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    issue.title.to_lowercase().contains(&needle) || issue.id.to_lowercase().contains(&needle)
}

pub fn matches_mode(issue: &Issue, mode: FilterMode) -> bool {
    match mode {
        FilterMode::All => true,
        FilterMode::Open => matches!(issue.status, Status::Open | Status::InProgress),
        FilterMode::Closed => issue.status == Status::Closed,
        FilterMode::Ready => {
            matches!(issue.status, Status::Open | Status::InProgress) && !issue.is_blocked()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_matches_title_case_insensitive() {
        let issue = Issue::new("bd-1", "Fix Login Flow", Status::Open);
        assert!(matches_query(&issue, "login"));
        assert!(matches_query(&issue, "  LOGIN "));
        assert!(!matches_query(&issue, "logout"));
    }

    #[test]
    fn test_query_matches_identifier() {
        let issue = Issue::new("bd-a3f8.2", "Something", Status::Open);
        assert!(matches_query(&issue, "A3F8.2"));
    }

    #[test]
    fn test_empty_query_matches_all() {
        let issue = Issue::new("x", "y", Status::Closed);
        assert!(matches_query(&issue, ""));
        assert!(matches_query(&issue, "   "));
    }

    #[test]
    fn test_ready_excludes_blocked_and_closed() {
        let open = Issue::new("a", "a", Status::Open);
        let mut blocked = Issue::new("b", "b", Status::InProgress);
        blocked.blocked_by.push("a".to_string());
        let closed = Issue::new("c", "c", Status::Closed);

        assert!(matches_mode(&open, FilterMode::Ready));
        assert!(!matches_mode(&blocked, FilterMode::Ready));
        assert!(!matches_mode(&closed, FilterMode::Ready));
        assert!(matches_mode(&blocked, FilterMode::Open));
    }
}
