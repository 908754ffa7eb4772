//! End-to-end message handling on `App` without a terminal.

mod test_utils;

use lazybeads::config::Config;
use lazybeads::data::{FilterMode, Status};
use lazybeads::tui::focus::{Direction, PanelId};
use lazybeads::tui::hit_test::Region;
use lazybeads::tui::panel::NavKey;
use lazybeads::tui::{App, BaseView, Message, RefreshResult, ViewMode};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};
use test_utils::{closed, ids, in_progress, open, snapshot};
#[cfg(unix)]
use test_utils::{fake_config, FakeBd};

/// Polling disabled so ticks never spawn a refresh task.
fn quiet_config() -> Config {
    let mut config = Config::default();
    config.polling.interval_secs = 0;
    config
}

fn loaded_app() -> App {
    let mut app = App::new(quiet_config());
    app.update(Message::Resize {
        width: 70,
        height: 40,
    })
    .unwrap();
    app.apply_snapshot(snapshot(
        vec![
            in_progress("p1"),
            open("A"),
            open("A.1"),
            open("A.2"),
            open("B"),
            closed("C", 5),
        ],
        &["B"],
    ));
    app
}

fn panel_ids(app: &App, id: PanelId) -> Vec<String> {
    app.panels
        .get(id)
        .items()
        .iter()
        .map(|n| n.issue.id.clone())
        .collect()
}

fn selected_id(app: &App) -> Option<String> {
    app.selected_issue().map(|i| i.id.clone())
}

#[test]
fn test_first_snapshot_focuses_first_non_empty_panel() {
    let app = loaded_app();
    assert_eq!(app.focus.focused(), PanelId::InProgress);
    assert_eq!(selected_id(&app), Some("p1".to_string()));
    assert_eq!(panel_ids(&app, PanelId::Open), ids(["A", "A.1", "A.2", "B"]));
}

#[test]
fn test_collapse_survives_refresh() {
    let mut app = loaded_app();
    app.update(Message::CycleFocus(Direction::Next)).unwrap();
    assert_eq!(app.focus.focused(), PanelId::Open);

    app.update(Message::ToggleCollapse).unwrap();
    assert_eq!(panel_ids(&app, PanelId::Open), ids(["A", "B"]));

    app.finish_refresh(RefreshResult::Complete(snapshot(
        vec![open("A"), open("A.1"), open("A.2"), open("A.3"), open("B")],
        &[],
    )));
    assert_eq!(panel_ids(&app, PanelId::Open), ids(["A", "B"]));
    assert_eq!(selected_id(&app), Some("A".to_string()));
}

#[test]
fn test_toggle_collapse_on_leaf_is_noop() {
    let mut app = loaded_app();
    app.update(Message::CycleFocus(Direction::Next)).unwrap();
    app.update(Message::Navigate(NavKey::Bottom)).unwrap();
    assert_eq!(selected_id(&app), Some("B".to_string()));

    app.update(Message::ToggleCollapse).unwrap();
    assert!(app.collapse.is_empty());
}

#[test]
fn test_refresh_error_keeps_previous_state() {
    let mut app = loaded_app();
    app.finish_refresh(RefreshResult::Error("bd exploded".to_string()));

    assert_eq!(panel_ids(&app, PanelId::Open).len(), 4);
    let status = app.status_message.clone().unwrap();
    assert!(status.is_error);
    assert_eq!(status.text, "Refresh failed: bd exploded");

    app.on_tick(status.expires_at + Duration::from_millis(1));
    assert!(app.status_message.is_none());
}

#[test]
fn test_search_filters_and_escape_restores() {
    let mut app = loaded_app();
    app.update(Message::EnterSearch).unwrap();
    for c in "a.2".chars() {
        app.update(Message::SearchInput(c)).unwrap();
    }
    assert_eq!(panel_ids(&app, PanelId::Open), ids(["A.2"]));
    assert!(panel_ids(&app, PanelId::InProgress).is_empty());

    app.update(Message::ExitSearch).unwrap();
    assert!(!app.search_mode);
    assert_eq!(app.params.query, "");
    assert_eq!(panel_ids(&app, PanelId::Open).len(), 4);
}

#[test]
fn test_confirmed_search_cleared_by_back() {
    let mut app = loaded_app();
    app.update(Message::EnterSearch).unwrap();
    app.update(Message::SearchInput('b')).unwrap();
    app.update(Message::ConfirmSearch).unwrap();
    assert_eq!(app.params.query, "b");

    app.update(Message::Back).unwrap();
    assert_eq!(app.params.query, "");
}

#[test]
fn test_filter_toggle_and_clear() {
    let mut app = loaded_app();
    app.update(Message::ToggleFilter(FilterMode::Closed)).unwrap();
    assert_eq!(app.params.filter, FilterMode::Closed);
    assert_eq!(app.focus.focused(), PanelId::Closed);
    assert_eq!(app.status_message.as_ref().unwrap().text, "Filter: closed");

    app.update(Message::ToggleFilter(FilterMode::Closed)).unwrap();
    assert_eq!(app.params.filter, FilterMode::All);

    app.update(Message::ToggleFilter(FilterMode::Ready)).unwrap();
    app.update(Message::ClearFilter).unwrap();
    assert_eq!(app.params.filter, FilterMode::All);
}

#[tokio::test]
async fn test_detail_round_trip() {
    let mut app = loaded_app();
    app.update(Message::OpenDetail).unwrap();
    assert_eq!(
        app.view,
        ViewMode::Detail {
            return_to: BaseView::List
        }
    );
    assert_eq!(app.detail_issue().map(|i| i.id.as_str()), Some("p1"));

    app.update(Message::Wheel(-2)).unwrap();
    assert_eq!(app.detail_scroll, 0);

    app.update(Message::Back).unwrap();
    assert_eq!(app.view, ViewMode::List);
}

#[tokio::test]
async fn test_detail_of_vanished_issue_is_empty() {
    let mut app = loaded_app();
    app.update(Message::OpenDetail).unwrap();
    app.apply_snapshot(snapshot(vec![open("A")], &[]));
    assert!(app.detail_issue().is_none());
}

#[test]
fn test_help_returns_to_board() {
    let mut app = loaded_app();
    app.update(Message::ToggleBoard).unwrap();
    app.update(Message::ToggleHelp).unwrap();
    assert_eq!(
        app.view,
        ViewMode::Help {
            return_to: BaseView::Board
        }
    );
    app.update(Message::ToggleHelp).unwrap();
    assert_eq!(app.view, ViewMode::Board);
}

#[tokio::test]
async fn test_board_double_click_opens_detail() {
    let mut app = loaded_app();
    app.update(Message::ToggleBoard).unwrap();
    // Only two columns fit at this width; scroll over to Ready
    app.update(Message::CycleFocus(Direction::Next)).unwrap();
    app.update(Message::CycleFocus(Direction::Next)).unwrap();

    let hits = app.hit_layout();
    let ready = hits
        .regions()
        .iter()
        .find(|g| g.region == Region::BoardColumn(lazybeads::data::BoardColumn::Ready))
        .expect("ready column on screen")
        .bounds;
    let (x, y) = (ready.x + 2, ready.y + 1);

    let start = Instant::now();
    app.update(Message::Click { x, y, at: start }).unwrap();
    assert_eq!(selected_id(&app), Some("B".to_string()));
    assert_eq!(app.view, ViewMode::Board);

    app.update(Message::Click {
        x,
        y,
        at: start + Duration::from_millis(150),
    })
    .unwrap();
    assert_eq!(
        app.view,
        ViewMode::Detail {
            return_to: BaseView::Board
        }
    );
    assert_eq!(app.detail_issue().map(|i| i.id.as_str()), Some("B"));
}

#[test]
fn test_list_click_focuses_panel_and_selects_row() {
    let mut app = loaded_app();
    let hits = app.hit_layout();
    let open_panel = hits
        .regions()
        .iter()
        .find(|g| g.region == Region::Panel(PanelId::Open))
        .expect("open panel on screen")
        .bounds;

    // Third row inside the border
    app.update(Message::Click {
        x: open_panel.x + 3,
        y: open_panel.y + 3,
        at: Instant::now(),
    })
    .unwrap();
    assert_eq!(app.focus.focused(), PanelId::Open);
    assert_eq!(selected_id(&app), Some("A.2".to_string()));
}

#[test]
fn test_cycle_sort_reports_mode() {
    let mut app = loaded_app();
    app.update(Message::CycleSort).unwrap();
    assert_eq!(app.status_message.as_ref().unwrap().text, "Sort: created ↑");
}

#[test]
fn test_closed_issue_status_counts() {
    let app = loaded_app();
    let counts = app.snapshot.count_by_status();
    assert_eq!(counts.get(&Status::Closed), Some(&1));
    assert_eq!(counts.get(&Status::Open), Some(&4));
}

#[test]
fn test_quit_message() {
    let mut app = App::new(Config::default());
    assert!(app.update(Message::Quit).unwrap());
    assert!(!app.update(Message::None).unwrap());
}

/// Tick the refresh channel until the background fetch lands.
#[cfg(unix)]
async fn wait_for_refresh(app: &mut App) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !app.poll_refresh() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("refresh finished");
}

#[cfg(unix)]
#[tokio::test]
async fn test_second_refresh_while_loading_is_ignored() {
    let fake = FakeBd::new();
    fake.respond(
        "list",
        r#"[{"id": "n1", "title": "Fresh", "status": "open"}, {"id": "n2", "title": "Also fresh", "status": "in_progress"}]"#,
    );
    let mut app = App::new(fake_config(&fake));
    app.apply_snapshot(snapshot(vec![open("old")], &[]));

    app.start_background_refresh();
    app.start_background_refresh();
    assert!(app.is_loading);
    assert!(app.refresh_rx.is_some());

    wait_for_refresh(&mut app).await;
    assert!(!app.is_loading);
    assert!(app.refresh_rx.is_none());
    assert!(app.snapshot.get("old").is_none());
    assert_eq!(panel_ids(&app, PanelId::Open), ids(["n1"]));
    assert_eq!(panel_ids(&app, PanelId::InProgress), ids(["n2"]));

    let lists = fake.calls().iter().filter(|c| c.starts_with("list")).count();
    assert_eq!(lists, 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_requested_refresh_queues_behind_running_one() {
    let fake = FakeBd::new();
    let mut app = App::new(fake_config(&fake));

    app.start_background_refresh();
    app.request_refresh();
    assert!(app.is_refresh_queued());

    // The queued refresh starts as soon as the first one lands
    wait_for_refresh(&mut app).await;
    assert!(!app.is_refresh_queued());
    assert!(app.is_loading);

    wait_for_refresh(&mut app).await;
    assert!(!app.is_loading);
    let lists = fake.calls().iter().filter(|c| c.starts_with("list")).count();
    assert_eq!(lists, 2);
}
