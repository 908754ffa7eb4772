//! TUI rendering module.
//!
//! - `layout` - Screen geometry shared with mouse hit-testing, text utilities
//! - `status` - Status styling, title bar, status bar and help popup
//! - `panels` - The stacked In Progress / Open / Closed panels
//! - `board` - Kanban columns and cards
//! - `detail` - Issue detail view and markdown rendering
//! - `modal` - Editing popups

mod board;
pub mod detail;
pub mod layout;
mod modal;
mod panels;
mod status;

use crate::tui::app::{BaseView, ViewMode};
use crate::tui::App;
use ratatui::{layout::Rect, Frame};

/// Main draw function - renders the entire TUI.
pub fn draw(f: &mut Frame, app: &App) {
    let screen = layout::screen(f.area());

    status::draw_title_bar(f, app, screen.title);

    match app.view {
        ViewMode::List => draw_base(f, app, BaseView::List, screen.body),
        ViewMode::Board => draw_base(f, app, BaseView::Board, screen.body),
        ViewMode::Detail { .. } => detail::draw_detail_view(f, app, screen.body),
        ViewMode::Help { return_to } => draw_base(f, app, return_to, screen.body),
    }

    status::draw_status_bar(f, app, screen.status);

    // Overlays
    if matches!(app.view, ViewMode::Help { .. }) {
        status::draw_help_popup(f, app);
    }
    if let Some(editing) = &app.modal {
        modal::draw_modal(f, editing);
    }
}

fn draw_base(f: &mut Frame, app: &App, base: BaseView, body: Rect) {
    match base {
        BaseView::List => {
            let list = layout::list_layout(body, &app.panels, app.config.ui.wide_mode_width);
            panels::draw_panels(f, app, &list);
            if let Some(detail_area) = list.detail {
                detail::draw_detail_pane(f, app, detail_area);
            }
        }
        BaseView::Board => board::draw_board(f, app, body),
    }
}
