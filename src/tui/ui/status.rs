//! Status configuration, title bar, status bar and help popup.

use super::layout::{display_width, popup_rect, truncate_to_width};
use crate::config::CommandContext;
use crate::data::Status;
use crate::tui::app::{BaseView, ViewMode};
use crate::tui::keybindings::{self, Mode};
use crate::tui::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Unified status configuration - single source of truth for icon and style.
pub struct StatusConfig {
    pub icon: &'static str,
    pub style: Style,
}

/// Trait for types that can provide their display configuration (icon + style).
pub trait StatusConfigurable {
    fn status_config(&self) -> StatusConfig;
}

impl StatusConfigurable for Status {
    fn status_config(&self) -> StatusConfig {
        match self {
            Status::InProgress => StatusConfig {
                icon: self.icon(),
                style: Style::default().fg(Color::Yellow),
            },
            Status::Open => StatusConfig {
                icon: self.icon(),
                style: Style::default().fg(Color::White),
            },
            Status::Closed => StatusConfig {
                icon: self.icon(),
                style: Style::default().fg(Color::Green),
            },
        }
    }
}

/// Colour for a numeric priority. P0 gets a red background.
pub fn priority_style(priority: u8) -> Style {
    match priority {
        0 => Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
        1 => Style::default().fg(Color::Red),
        2 => Style::default().fg(Color::Yellow),
        3 => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::DarkGray),
    }
}

/// Draw the one-line title bar: name, issue counts, filter state, spinner.
pub fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let counts = app.snapshot.count_by_status();
    let count = |s: Status| counts.get(&s).copied().unwrap_or(0);
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled(
            " lazybeads ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", dim),
    ];

    for status in [Status::InProgress, Status::Open, Status::Closed] {
        let config = status.status_config();
        spans.push(Span::styled(
            format!("{} {} ", config.icon, count(status)),
            config.style,
        ));
    }

    spans.push(Span::styled("│ ", dim));
    spans.push(Span::styled(
        format!("filter: {} ", app.params.filter.label()),
        Style::default().fg(Color::Magenta),
    ));
    spans.push(Span::styled(
        format!("sort: {} ", app.params.sort.label()),
        Style::default().fg(Color::Blue),
    ));

    if !app.params.query.is_empty() && !app.search_mode {
        spans.push(Span::styled(
            format!("/{} ", app.params.query),
            Style::default().fg(Color::Yellow),
        ));
    }

    if app.is_loading {
        spans.push(Span::styled(
            format!("{} ", app.spinner_char()),
            Style::default().fg(Color::Cyan),
        ));
    } else if let Some(at) = app.snapshot.fetched_at {
        spans.push(Span::styled(
            format!("synced {} ", at.with_timezone(&chrono::Local).format("%H:%M:%S")),
            dim,
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status bar at the bottom of the screen.
pub fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;

    let line = if let Some(msg) = &app.status_message {
        let style = if msg.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        Line::from(Span::styled(
            truncate_to_width(&format!(" {}", msg.text), width),
            style,
        ))
    } else if let Some(modal) = &app.modal {
        Line::from(Span::styled(
            truncate_to_width(modal.hint(), width),
            Style::default().fg(Color::Yellow),
        ))
    } else if app.search_mode {
        let prompt = format!(" /{}", app.params.query);
        let hint = keybindings::footer_hints(Mode::Search);
        let mut spans = vec![
            Span::styled(prompt.clone(), Style::default().fg(Color::Yellow)),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ];
        if display_width(&prompt) + 1 + display_width(hint) <= width {
            spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        }
        Line::from(spans)
    } else {
        let hints = keybindings::footer_hints(app.view.keymap_mode());
        let text = if display_width(hints) <= width {
            hints.to_string()
        } else if width >= 10 {
            " ?: help ".to_string()
        } else {
            String::new()
        };
        Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
    };

    f.render_widget(Paragraph::new(line), area);
}

/// Help lines for the view the popup was opened from, plus any custom
/// commands that apply there.
pub fn help_popup_lines(app: &App) -> Vec<Line<'static>> {
    let (mode, context) = match app.view {
        ViewMode::Help { return_to } | ViewMode::Detail { return_to } => match return_to {
            BaseView::List => (Mode::List, CommandContext::List),
            BaseView::Board => (Mode::Board, CommandContext::Board),
        },
        ViewMode::List => (Mode::List, CommandContext::List),
        ViewMode::Board => (Mode::Board, CommandContext::Board),
    };

    let mut lines: Vec<Line<'static>> = keybindings::help_lines(mode)
        .into_iter()
        .map(Line::from)
        .collect();

    let custom: Vec<_> = app
        .config
        .custom_commands
        .iter()
        .filter(|c| c.context.applies_to(context))
        .collect();
    if !custom.is_empty() {
        lines.push(Line::from("  Custom Commands"));
        lines.push(Line::from("  ───────────────"));
        for command in custom {
            lines.push(Line::from(format!(
                "  {:<10}  {} ({})",
                command.key,
                command.description,
                command.context.label()
            )));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "  Esc/?: close",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

/// Draw the help popup.
pub fn draw_help_popup(f: &mut Frame, app: &App) {
    let area = popup_rect(60, 80, 40, 12, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(help_popup_lines(app))
        .block(block)
        .style(Style::default().fg(Color::White));

    f.render_widget(paragraph, area);
}
