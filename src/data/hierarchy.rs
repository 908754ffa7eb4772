//! Parent/child relationships derived from dot-encoded issue identifiers.
//!
//! `bd-a3f8` is a root, `bd-a3f8.1` its first child, `bd-a3f8.1.2` a
//! grandchild. Nothing here is stored; every answer is a pure function of
//! the identifier text.

/// Identifier of the parent, or `""` when `id` is a root.
pub fn parent_id(id: &str) -> &str {
    match id.rfind('.') {
        Some(idx) => &id[..idx],
        None => "",
    }
}

/// Nesting level: the number of dots in the identifier.
pub fn depth(id: &str) -> usize {
    id.matches('.').count()
}

/// True when `child` sits exactly one level below `parent`.
pub fn is_direct_child_of(child: &str, parent: &str) -> bool {
    if parent.is_empty() {
        return false;
    }
    match child
        .strip_prefix(parent)
        .and_then(|rest| rest.strip_prefix('.'))
    {
        Some(rest) => !rest.contains('.'),
        None => false,
    }
}

/// True when `id` has no parent segment.
pub fn is_root(id: &str) -> bool {
    !id.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_of_root_is_empty() {
        assert_eq!(parent_id("bd-a3f8"), "");
        assert_eq!(depth("bd-a3f8"), 0);
        assert!(is_root("bd-a3f8"));
    }

    #[test]
    fn test_parent_strips_last_segment() {
        assert_eq!(parent_id("bd-a3f8.1"), "bd-a3f8");
        assert_eq!(parent_id("bd-a3f8.1.2"), "bd-a3f8.1");
        assert_eq!(depth("bd-a3f8.1.2"), 2);
    }

    #[test]
    fn test_direct_child() {
        assert!(is_direct_child_of("X.1", "X"));
        assert!(is_direct_child_of("X.1.2", "X.1"));
        assert!(!is_direct_child_of("X.1.2", "X"));
        assert!(!is_direct_child_of("X", "X"));
        assert!(is_direct_child_of("X.", "X"));
        assert!(!is_direct_child_of("XY.1", "X"));
        assert!(!is_direct_child_of("X.1", ""));
    }

    #[test]
    fn test_parent_depth_law() {
        for id in ["a", "a.1", "a.1.7", "bd-x.10.2.3", "X."] {
            if depth(id) > 0 {
                assert_eq!(depth(parent_id(id)), depth(id) - 1);
                assert!(is_direct_child_of(id, parent_id(id)));
            }
        }
    }
}
