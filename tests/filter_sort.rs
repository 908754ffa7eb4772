//! View derivation: filtering before bucketing, per-group sorting, and the
//! fixed ordering of the closed panel.

mod test_utils;

use lazybeads::data::{recompute_views, CollapseSet, FilterMode, SortMode, ViewParams};
use pretty_assertions::assert_eq;
use test_utils::{at, blocked, closed, ids, in_progress, open, snapshot, with_priority};

fn view_ids(nodes: &[lazybeads::data::TreeNode]) -> Vec<String> {
    nodes.iter().map(|n| n.issue.id.clone()).collect()
}

#[test]
fn test_default_sort_priority_then_recently_updated() {
    let snap = snapshot(
        vec![
            with_priority(open("a"), 2, 10),
            with_priority(open("b"), 0, 5),
            with_priority(open("c"), 2, 30),
            with_priority(open("d"), 1, 1),
        ],
        &[],
    );
    let views = recompute_views(&snap, &ViewParams::default(), &CollapseSet::new());

    let priorities: Vec<u8> = views.open.iter().map(|n| n.issue.priority).collect();
    assert_eq!(priorities, vec![0, 1, 2, 2]);
    // c was updated after a
    assert_eq!(view_ids(&views.open), ids(["b", "d", "c", "a"]));
}

#[test]
fn test_open_only_keeps_open_parent_and_child() {
    let snap = snapshot(vec![open("A"), open("A.1"), closed("A.2", 5)], &[]);
    let params = ViewParams {
        filter: FilterMode::Open,
        ..ViewParams::default()
    };
    let views = recompute_views(&snap, &params, &CollapseSet::new());

    assert_eq!(view_ids(&views.open), ids(["A", "A.1"]));
    assert!(views.closed.is_empty());
}

#[test]
fn test_parent_shown_even_when_children_filtered_out() {
    let snap = snapshot(vec![open("A"), closed("A.1", 1)], &[]);
    let params = ViewParams {
        filter: FilterMode::Open,
        ..ViewParams::default()
    };
    let views = recompute_views(&snap, &params, &CollapseSet::new());

    assert_eq!(view_ids(&views.open), ids(["A"]));
    assert!(!views.open[0].has_children);
}

#[test]
fn test_closed_panel_ignores_sort_mode() {
    let mut undated = closed("z", 0);
    undated.closed_at = None;
    let snap = snapshot(vec![closed("x", 5), undated, closed("y", 50)], &[]);

    for sort in [SortMode::Default, SortMode::CreatedAsc, SortMode::Priority] {
        let params = ViewParams {
            sort,
            ..ViewParams::default()
        };
        let views = recompute_views(&snap, &params, &CollapseSet::new());
        assert_eq!(view_ids(&views.closed), ids(["y", "x", "z"]));
    }
}

#[test]
fn test_query_and_preset_combine() {
    let mut login = open("bd-1");
    login.title = "Fix login".to_string();
    let mut logout = blocked(open("bd-2"), "bd-9");
    logout.title = "Fix logout".to_string();
    let snap = snapshot(vec![login, logout, in_progress("bd-3")], &[]);

    let params = ViewParams {
        query: "LOG".to_string(),
        filter: FilterMode::Ready,
        sort: SortMode::Default,
    };
    let views = recompute_views(&snap, &params, &CollapseSet::new());

    assert_eq!(view_ids(&views.open), ids(["bd-1"]));
    assert!(views.in_progress.is_empty());
}

#[test]
fn test_created_sort_orders_each_sibling_group() {
    let mut a = open("A");
    a.created_at = Some(at(30));
    let mut b = open("B");
    b.created_at = Some(at(10));
    let mut a1 = open("A.1");
    a1.created_at = Some(at(50));
    let mut a2 = open("A.2");
    a2.created_at = Some(at(40));
    let snap = snapshot(vec![a, b, a1, a2], &[]);

    let params = ViewParams {
        sort: SortMode::CreatedAsc,
        ..ViewParams::default()
    };
    let views = recompute_views(&snap, &params, &CollapseSet::new());
    assert_eq!(view_ids(&views.open), ids(["B", "A", "A.2", "A.1"]));

    let params = ViewParams {
        sort: SortMode::CreatedDesc,
        ..ViewParams::default()
    };
    let views = recompute_views(&snap, &params, &CollapseSet::new());
    assert_eq!(view_ids(&views.open), ids(["A", "A.1", "A.2", "B"]));
}

#[test]
fn test_filtering_does_not_touch_collapse_set() {
    let snap = snapshot(vec![open("A"), open("A.1")], &[]);
    let mut collapse = CollapseSet::new();
    collapse.collapse("A");
    let before = collapse.clone();

    let params = ViewParams {
        query: "nothing matches".to_string(),
        ..ViewParams::default()
    };
    let views = recompute_views(&snap, &params, &collapse);
    assert!(views.open.is_empty());
    assert_eq!(collapse, before);
}

#[test]
fn test_sort_mode_cycle_returns_to_default() {
    let mut mode = SortMode::Default;
    let mut seen = Vec::new();
    for _ in 0..5 {
        mode = mode.next();
        seen.push(mode);
    }
    assert_eq!(mode, SortMode::Default);
    assert_eq!(seen.len(), 5);
}
