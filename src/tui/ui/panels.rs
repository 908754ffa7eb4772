//! The three stacked status panels of the list view.

use super::layout::{display_width, truncate_with_ellipsis, ListLayout};
use super::status::{priority_style, StatusConfigurable};
use crate::data::TreeNode;
use crate::tui::focus::PanelId;
use crate::tui::panel::PanelState;
use crate::tui::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_panels(f: &mut Frame, app: &App, layout: &ListLayout) {
    for (id, panel) in app.panels.iter() {
        let area = layout.panel(id);
        if area.height == 0 {
            continue;
        }
        if panel.is_summary_collapsed() {
            draw_summary_line(f, id, panel, area);
        } else {
            draw_panel(f, id, panel, area);
        }
    }
}

/// One-line stand-in for an unfocused collapsible panel.
fn draw_summary_line(f: &mut Frame, id: PanelId, panel: &PanelState, area: Rect) {
    let label = format!(" {} ({}) ", id.title(), panel.len());
    let fill = (area.width as usize).saturating_sub(display_width(&label) + 4);
    let text = format!("╶──{}{}╴", label, "─".repeat(fill));
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        ))),
        area,
    );
}

fn draw_panel(f: &mut Frame, id: PanelId, panel: &PanelState, area: Rect) {
    let border_style = if panel.is_focused() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ({}) ", id.title(), panel.len()));
    let inner = block.inner(area);

    if panel.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            " (no issues)",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let width = inner.width as usize;
    let lines: Vec<Line> = panel
        .visible_items()
        .iter()
        .enumerate()
        .map(|(offset, node)| {
            let selected = panel.is_focused() && panel.scroll() + offset == panel.cursor();
            row_line(node, width, selected)
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// `  ▾ ◐ P1 bd-12 Title…`, indented two columns per depth level.
fn row_line(node: &TreeNode, width: usize, selected: bool) -> Line<'static> {
    let issue = &node.issue;
    let status = issue.status.status_config();

    let indent = "  ".repeat(node.depth);
    let prefix = format!(
        "{}{} {} {} {} ",
        indent,
        node.fold_marker(),
        status.icon,
        issue.priority_label(),
        issue.id
    );
    let title_width = width.saturating_sub(display_width(&prefix));
    let title = truncate_with_ellipsis(&issue.title, title_width);

    let mut spans = vec![
        Span::raw(format!("{}{} ", indent, node.fold_marker())),
        Span::styled(format!("{} ", status.icon), status.style),
        Span::styled(
            issue.priority_label().to_string(),
            priority_style(issue.priority),
        ),
        Span::styled(format!(" {} ", issue.id), Style::default().fg(Color::DarkGray)),
    ];
    let title_style = if issue.is_blocked() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    spans.push(Span::styled(title, title_style));

    let line = Line::from(spans);
    if selected {
        line.style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        line
    }
}
