//! Per-bucket tree reconstruction and pre-order flattening.

use super::{sorting::Comparator, CollapseSet, Issue};
use std::collections::{HashMap, HashSet};

/// One visible row of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub issue: Issue,
    /// Distance from the topmost ancestor present in the same bucket
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

impl TreeNode {
    pub fn id(&self) -> &str {
        &self.issue.id
    }

    /// Marker drawn before the title: ▾ expanded, ▸ collapsed, blank for leaves.
    pub fn fold_marker(&self) -> &'static str {
        match (self.has_children, self.expanded) {
            (true, true) => "▾",
            (true, false) => "▸",
            (false, _) => " ",
        }
    }
}

/// Rebuild the hierarchy inside one status bucket and flatten it.
///
/// An issue whose parent is not in `bucket` becomes a root of the bucket.
/// Sibling groups are sorted independently with `cmp`; children of a
/// collapsed node are omitted.
pub fn flatten_bucket(bucket: &[&Issue], cmp: Comparator, collapse: &CollapseSet) -> Vec<TreeNode> {
    let present: HashSet<&str> = bucket.iter().map(|i| i.id.as_str()).collect();

    let mut groups: HashMap<&str, Vec<&Issue>> = HashMap::new();
    for issue in bucket {
        let parent = issue.parent_id();
        let key = if !parent.is_empty() && present.contains(parent) {
            parent
        } else {
            ""
        };
        groups.entry(key).or_default().push(*issue);
    }

    for siblings in groups.values_mut() {
        siblings.sort_by(|a, b| cmp(a, b));
    }

    let mut out = Vec::with_capacity(bucket.len());
    walk("", 0, &groups, collapse, &mut out);
    out
}

fn walk(
    parent: &str,
    depth: usize,
    groups: &HashMap<&str, Vec<&Issue>>,
    collapse: &CollapseSet,
    out: &mut Vec<TreeNode>,
) {
    let Some(siblings) = groups.get(parent) else {
        return;
    };

    for issue in siblings {
        let has_children = !issue.id.is_empty() && groups.contains_key(issue.id.as_str());
        let expanded = has_children && !collapse.is_collapsed(&issue.id);

        out.push(TreeNode {
            issue: (*issue).clone(),
            depth,
            has_children,
            expanded,
        });

        if expanded {
            walk(&issue.id, depth + 1, groups, collapse, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sorting, Status};

    fn bucket(ids: &[&str]) -> Vec<Issue> {
        ids.iter()
            .map(|id| Issue::new(*id, format!("Issue {}", id), Status::Open))
            .collect()
    }

    fn flat_ids(nodes: &[TreeNode]) -> Vec<(String, usize)> {
        nodes.iter().map(|n| (n.issue.id.clone(), n.depth)).collect()
    }

    #[test]
    fn test_children_follow_parent() {
        let issues = bucket(&["X.2", "X", "Y", "X.1", "X.1.1"]);
        let refs: Vec<&Issue> = issues.iter().collect();
        let nodes = flatten_bucket(&refs, sorting::compare_priority, &CollapseSet::new());

        assert_eq!(
            flat_ids(&nodes),
            vec![
                ("X".to_string(), 0),
                ("X.2".to_string(), 1),
                ("X.1".to_string(), 1),
                ("X.1.1".to_string(), 2),
                ("Y".to_string(), 0),
            ]
        );
        assert!(nodes[0].has_children && nodes[0].expanded);
        assert!(!nodes[4].has_children);
    }

    #[test]
    fn test_orphan_becomes_root() {
        let issues = bucket(&["X.1.1", "Z"]);
        let refs: Vec<&Issue> = issues.iter().collect();
        let nodes = flatten_bucket(&refs, sorting::compare_priority, &CollapseSet::new());

        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.depth == 0));
    }

    #[test]
    fn test_collapsed_hides_descendants() {
        let issues = bucket(&["X", "X.1", "X.1.1", "Y"]);
        let refs: Vec<&Issue> = issues.iter().collect();
        let mut collapse = CollapseSet::new();
        collapse.collapse("X");
        let nodes = flatten_bucket(&refs, sorting::compare_priority, &collapse);

        assert_eq!(flat_ids(&nodes), vec![("X".to_string(), 0), ("Y".to_string(), 0)]);
        assert!(nodes[0].has_children);
        assert!(!nodes[0].expanded);
        assert_eq!(nodes[0].fold_marker(), "▸");
    }
}
