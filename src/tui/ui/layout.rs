//! Layout calculations and text utilities for the TUI.
//!
//! Screen geometry lives here so that drawing and mouse hit-testing agree on
//! where every panel, column and card is.

use crate::data::BoardColumn;
use crate::tui::board::{BoardState, CARD_HEIGHT};
use crate::tui::focus::{PanelId, Panels};
use crate::tui::hit_test::{HitLayout, Region, RegionGeometry};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Title bar, main body, status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub body: Rect,
    pub status: Rect,
}

pub fn screen(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    ScreenLayout {
        title: chunks[0],
        body: chunks[1],
        status: chunks[2],
    }
}

/// Stacked panels plus the optional side detail pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLayout {
    /// Indexed by `PanelId::index()`
    pub panels: [Rect; 3],
    pub detail: Option<Rect>,
}

impl ListLayout {
    pub fn panel(&self, id: PanelId) -> Rect {
        self.panels[id.index()]
    }
}

pub fn list_layout(body: Rect, panels: &Panels, wide_mode_width: u16) -> ListLayout {
    let (list_area, detail) = if body.width >= wide_mode_width {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(body);
        (halves[0], Some(halves[1]))
    } else {
        (body, None)
    };

    let mut constraints: Vec<Constraint> = panels
        .iter()
        .map(|(id, panel)| {
            if panel.is_summary_collapsed() {
                Constraint::Length(1)
            } else if panel.is_empty() && !panel.is_focused() {
                // An idle In Progress panel takes no space at all.
                match id {
                    PanelId::InProgress => Constraint::Length(0),
                    _ => Constraint::Length(3),
                }
            } else {
                Constraint::Fill(1)
            }
        })
        .collect();

    // Leftover height must go to a full panel, never to the summary line.
    if !constraints.iter().any(|c| matches!(c, Constraint::Fill(_))) {
        let fallback = constraints
            .iter()
            .position(|c| *c == Constraint::Length(3))
            .or_else(|| panels.iter().position(|(_, p)| !p.is_summary_collapsed()));
        if let Some(idx) = fallback {
            constraints[idx] = Constraint::Fill(1);
        }
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(list_area);

    ListLayout {
        panels: [chunks[0], chunks[1], chunks[2]],
        detail,
    }
}

/// Rows available for items inside a bordered panel.
pub fn panel_content_rows(area: Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    pub columns: Vec<(BoardColumn, Rect)>,
}

/// Cards that fit in a bordered column of the given body height.
pub fn cards_per_column(body: Rect) -> usize {
    (body.height.saturating_sub(2) / CARD_HEIGHT).max(1) as usize
}

/// Split the body evenly between the columns currently in view.
pub fn board_layout(body: Rect, board: &BoardState) -> BoardLayout {
    let visible: Vec<BoardColumn> = board.visible_columns().collect();
    let count = visible.len().max(1) as u32;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(visible.iter().map(|_| Constraint::Ratio(1, count)))
        .split(body);

    BoardLayout {
        columns: visible.into_iter().zip(chunks.iter().copied()).collect(),
    }
}

pub fn list_hit_layout(layout: &ListLayout, panels: &Panels) -> HitLayout {
    let mut regions: Vec<RegionGeometry> = panels
        .iter()
        .map(|(id, panel)| {
            let summary = panel.is_summary_collapsed();
            RegionGeometry {
                region: Region::Panel(id),
                bounds: layout.panel(id).into(),
                border_rows: if summary { 0 } else { 1 },
                header_rows: 0,
                row_height: 1,
                scroll: panel.scroll(),
                item_count: if summary { 0 } else { panel.len() },
                clamp_to_last: false,
            }
        })
        .collect();

    if let Some(detail) = layout.detail {
        regions.push(RegionGeometry {
            region: Region::DetailPane,
            bounds: detail.into(),
            border_rows: 1,
            header_rows: 0,
            row_height: 1,
            scroll: 0,
            item_count: 0,
            clamp_to_last: false,
        });
    }

    HitLayout::new(regions)
}

pub fn board_hit_layout(layout: &BoardLayout, board: &BoardState) -> HitLayout {
    let regions = layout
        .columns
        .iter()
        .map(|(col, rect)| RegionGeometry {
            region: Region::BoardColumn(*col),
            bounds: (*rect).into(),
            border_rows: 1,
            header_rows: 0,
            row_height: CARD_HEIGHT,
            scroll: board.scroll(*col),
            item_count: board.columns().len(*col),
            clamp_to_last: true,
        })
        .collect();
    HitLayout::new(regions)
}

/// Centered popup rectangle sized by percentage with minimums.
pub fn popup_rect(percent_x: u16, percent_y: u16, min_width: u16, min_height: u16, r: Rect) -> Rect {
    let max_width = r.width.saturating_sub(2).max(1);
    let max_height = r.height.saturating_sub(2).max(1);

    let target_width = (r.width.saturating_mul(percent_x) / 100).max(min_width);
    let target_height = (r.height.saturating_mul(percent_y) / 100).max(min_height);

    let width = target_width.min(max_width);
    let height = target_height.min(max_height);

    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text utilities
// ─────────────────────────────────────────────────────────────────────────────

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > max_width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out
}

/// Truncate text with an ellipsis if it exceeds max width.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 1 {
        return "…".to_string();
    }
    let truncated = truncate_to_width(text, max_width.saturating_sub(1));
    format!("{truncated}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis_wide_chars() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_with_ellipsis("hello world", 6), "hello…");
        assert_eq!(truncate_with_ellipsis("日本語テキスト", 5), "日本…");
        assert_eq!(truncate_with_ellipsis("abc", 1), "…");
    }

    #[test]
    fn test_screen_reserves_title_and_status() {
        let layout = screen(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.title.height, 1);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.status.y, 29);
        assert_eq!(layout.body, Rect::new(0, 1, 100, 28));
    }

    #[test]
    fn test_collapsed_closed_panel_takes_one_row() {
        let panels = Panels::new(true);
        let layout = list_layout(Rect::new(0, 1, 60, 30), &panels, 80);
        assert!(layout.detail.is_none());
        assert_eq!(layout.panel(PanelId::Closed).height, 1);
    }

    #[test]
    fn test_wide_mode_adds_detail_pane() {
        let panels = Panels::new(true);
        let layout = list_layout(Rect::new(0, 1, 120, 30), &panels, 80);
        let detail = layout.detail.unwrap();
        assert_eq!(detail.x, 60);
        assert_eq!(layout.panel(PanelId::Open).width, 60);
    }
}
