//! Kanban board rendering.

use super::layout::{board_layout, truncate_with_ellipsis, BoardLayout};
use super::status::priority_style;
use crate::data::{BoardColumn, Issue};
use crate::tui::board::CARD_HEIGHT;
use crate::tui::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn column_color(col: BoardColumn) -> Color {
    match col {
        BoardColumn::Blocked => Color::Red,
        BoardColumn::Open => Color::White,
        BoardColumn::Ready => Color::Cyan,
        BoardColumn::InProgress => Color::Yellow,
        BoardColumn::Done => Color::Green,
    }
}

pub fn draw_board(f: &mut Frame, app: &App, area: Rect) {
    let layout: BoardLayout = board_layout(area, &app.board);
    for (col, rect) in &layout.columns {
        draw_column(f, app, *col, *rect);
    }
}

fn draw_column(f: &mut Frame, app: &App, col: BoardColumn, area: Rect) {
    let board = &app.board;
    let focused = board.focused_column() == col;
    let issues = board.columns().column(col);

    let color = column_color(col);
    let mut title_style = Style::default().fg(color);
    if focused {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            format!(" {} ({}) ", col.title(), issues.len()),
            title_style,
        ));
    let inner = block.inner(area);
    let width = inner.width as usize;

    let mut lines: Vec<Line> = Vec::new();
    if issues.is_empty() {
        lines.push(Line::from(Span::styled(
            " (empty)",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let scroll = board.scroll(col);
    for (offset, issue) in issues
        .iter()
        .enumerate()
        .skip(scroll)
        .take(board.cards_per_column())
    {
        let selected = focused && offset == board.row();
        lines.extend(card_lines(issue, width, selected));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// A card is [`CARD_HEIGHT`] lines: priority and id, title, type and
/// assignee, then a divider.
fn card_lines(issue: &Issue, width: usize, selected: bool) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);

    let mut header = vec![
        Span::styled(
            issue.priority_label().to_string(),
            priority_style(issue.priority),
        ),
        Span::styled(format!(" {}", issue.id), dim),
    ];
    if issue.is_blocked() {
        header.push(Span::styled(" ⊘", Style::default().fg(Color::Red)));
    }

    let mut meta = issue.issue_type.as_str().to_string();
    if let Some(assignee) = &issue.assignee {
        meta.push_str(&format!(" @{}", assignee));
    }

    let title = truncate_with_ellipsis(&issue.title, width.saturating_sub(1));
    let mut lines = vec![
        Line::from(header),
        Line::from(format!(" {}", title)),
        Line::from(Span::styled(
            format!(" {}", truncate_with_ellipsis(&meta, width.saturating_sub(1))),
            Style::default().fg(Color::Magenta),
        )),
        Line::from(Span::styled("─".repeat(width), dim)),
    ];
    debug_assert_eq!(lines.len(), CARD_HEIGHT as usize);

    if selected {
        let highlight = Style::default().bg(Color::DarkGray);
        for line in lines.iter_mut().take(CARD_HEIGHT as usize - 1) {
            line.style = highlight;
        }
    }
    lines
}
