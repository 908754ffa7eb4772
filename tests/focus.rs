//! Panel focus cycling and the Closed panel's summary collapse.

mod test_utils;

use lazybeads::data::{recompute_views, CollapseSet, Snapshot, ViewParams};
use lazybeads::tui::focus::{Direction, FocusController, PanelId, Panels};
use pretty_assertions::assert_eq;
use test_utils::{closed, in_progress, open, snapshot};

fn panels_for(snap: &Snapshot) -> Panels {
    let views = recompute_views(snap, &ViewParams::default(), &CollapseSet::new());
    let mut panels = Panels::new(true);
    panels.get_mut(PanelId::InProgress).set_items(views.in_progress);
    panels.get_mut(PanelId::Open).set_items(views.open);
    panels.get_mut(PanelId::Closed).set_items(views.closed);
    panels
}

#[test]
fn test_initial_focus_skips_empty_in_progress() {
    let mut panels = panels_for(&snapshot(vec![open("a"), closed("b", 1)], &[]));
    let focus = FocusController::initial(&mut panels);
    assert_eq!(focus.focused(), PanelId::Open);
    assert!(panels.get(PanelId::Open).is_focused());
}

#[test]
fn test_initial_focus_defaults_to_in_progress() {
    let mut panels = panels_for(&snapshot(Vec::new(), &[]));
    let focus = FocusController::initial(&mut panels);
    assert_eq!(focus.focused(), PanelId::InProgress);
}

#[test]
fn test_cycle_skips_empty_panel_and_wraps() {
    let mut panels = panels_for(&snapshot(vec![open("a"), closed("b", 1)], &[]));
    let mut focus = FocusController::initial(&mut panels);

    focus.cycle(Direction::Next, &mut panels);
    assert_eq!(focus.focused(), PanelId::Closed);
    focus.cycle(Direction::Next, &mut panels);
    assert_eq!(focus.focused(), PanelId::Open);
    focus.cycle(Direction::Prev, &mut panels);
    assert_eq!(focus.focused(), PanelId::Closed);
}

#[test]
fn test_cycle_from_closed_lands_on_open_when_in_progress_empty() {
    let mut panels = panels_for(&snapshot(vec![open("a"), closed("b", 1)], &[]));
    let mut focus = FocusController::default();
    focus.focus(PanelId::Closed, &mut panels);

    focus.cycle(Direction::Next, &mut panels);
    assert_eq!(focus.focused(), PanelId::Open);
}

#[test]
fn test_cycle_stays_when_only_one_panel_has_items() {
    let mut panels = panels_for(&snapshot(vec![open("a")], &[]));
    let mut focus = FocusController::initial(&mut panels);
    focus.cycle(Direction::Next, &mut panels);
    assert_eq!(focus.focused(), PanelId::Open);
}

#[test]
fn test_closed_panel_expands_only_while_focused() {
    let mut panels = panels_for(&snapshot(
        vec![in_progress("p"), open("a"), closed("b", 1)],
        &[],
    ));
    let mut focus = FocusController::initial(&mut panels);
    assert!(panels.get(PanelId::Closed).is_summary_collapsed());

    focus.focus(PanelId::Closed, &mut panels);
    assert!(!panels.get(PanelId::Closed).is_summary_collapsed());

    focus.cycle(Direction::Next, &mut panels);
    assert_eq!(focus.focused(), PanelId::InProgress);
    assert!(panels.get(PanelId::Closed).is_summary_collapsed());
}

#[test]
fn test_reconcile_leaves_emptied_panel() {
    let mut panels = panels_for(&snapshot(vec![in_progress("p"), open("a")], &[]));
    let mut focus = FocusController::initial(&mut panels);
    assert_eq!(focus.focused(), PanelId::InProgress);

    panels.get_mut(PanelId::InProgress).set_items(Vec::new());
    focus.reconcile(&mut panels);
    assert_eq!(focus.focused(), PanelId::Open);
}
