//! Issue detail rendering: metadata header, markdown description and
//! comments.
//!
//! Used both by the full-screen detail view and the side pane of the wide
//! list layout.

use super::layout::display_width;
use super::status::{priority_style, StatusConfigurable};
use crate::data::{Comment, Issue};
use crate::tui::App;
use pulldown_cmark::{Event, Parser, Tag};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Every line of the detail view for `issue`, wrapped to `width`.
/// Comments are shown once loaded; `None` leaves the section out.
pub fn detail_lines(
    issue: &Issue,
    comments: Option<&[Comment]>,
    width: usize,
) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let status = issue.status.status_config();

    let mut lines = vec![
        Line::from(Span::styled(
            issue.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("ID        ", label),
            Span::raw(issue.id.clone()),
        ]),
        Line::from(vec![
            Span::styled("Status    ", label),
            Span::styled(format!("{} {}", status.icon, issue.status.label()), status.style),
        ]),
        Line::from(vec![
            Span::styled("Priority  ", label),
            Span::styled(issue.priority_label(), priority_style(issue.priority)),
        ]),
        Line::from(vec![
            Span::styled("Type      ", label),
            Span::raw(issue.issue_type.as_str().to_string()),
        ]),
    ];

    if let Some(assignee) = &issue.assignee {
        lines.push(Line::from(vec![
            Span::styled("Assignee  ", label),
            Span::styled(format!("@{}", assignee), Style::default().fg(Color::Magenta)),
        ]));
    }
    if !issue.labels.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Labels    ", label),
            Span::raw(issue.labels.join(", ")),
        ]));
    }
    if !issue.blocked_by.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Blocked by", label),
            Span::styled(
                format!(" {}", issue.blocked_by.join(", ")),
                Style::default().fg(Color::Red),
            ),
        ]));
    }
    if !issue.blocks.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Blocks    ", label),
            Span::raw(issue.blocks.join(", ")),
        ]));
    }

    let timestamps = [
        ("Created   ", issue.created_at),
        ("Updated   ", issue.updated_at),
        ("Closed    ", issue.closed_at),
    ];
    for (name, at) in timestamps {
        if let Some(at) = at {
            lines.push(Line::from(vec![
                Span::styled(name, label),
                Span::raw(at.format("%Y-%m-%d %H:%M").to_string()),
            ]));
        }
    }

    lines.push(Line::from(""));
    if issue.description.trim().is_empty() {
        lines.push(Line::from(Span::styled("(no description)", label)));
    } else {
        lines.extend(markdown_to_lines(&issue.description, width));
    }

    if let Some(comments) = comments.filter(|c| !c.is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Comments ({})", comments.len()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for comment in comments {
            lines.push(Line::from(""));
            let mut header = vec![Span::styled(
                format!("  {}", comment.author),
                Style::default().fg(Color::Magenta),
            )];
            if let Some(at) = comment.created_at {
                header.push(Span::styled(
                    format!(" ({})", at.format("%Y-%m-%d %H:%M")),
                    label,
                ));
            }
            lines.push(Line::from(header));
            for line in markdown_to_lines(&comment.text, width.saturating_sub(4)) {
                let mut spans = vec![Span::raw("    ")];
                spans.extend(line.spans);
                lines.push(Line::from(spans));
            }
        }
    }
    lines
}

/// Full-screen detail view.
pub fn draw_detail_view(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(issue) = app.detail_issue() else {
        let paragraph = Paragraph::new("Issue is no longer in the tracker").block(block.title(" Detail "));
        f.render_widget(paragraph, area);
        return;
    };

    let block = block.title(format!(" {} ", issue.id));
    let inner = block.inner(area);
    let lines = detail_lines(issue, app.detail_comments(), inner.width as usize);
    let max_scroll = lines.len().saturating_sub(inner.height as usize) as u16;

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.detail_scroll.min(max_scroll), 0));
    f.render_widget(paragraph, area);
}

/// Side pane of the wide list layout, following the list cursor.
pub fn draw_detail_pane(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Detail ");
    let inner = block.inner(area);

    let selected = app
        .panels
        .get(app.focus.focused())
        .selected_item()
        .map(|node| &node.issue);
    let lines = match selected {
        Some(issue) => detail_lines(issue, None, inner.width as usize),
        None => vec![Line::from(Span::styled(
            "No issue selected",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Accumulates spans into word-wrapped lines.
struct LineBuilder {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    width: usize,
    max_width: usize,
    need_space: bool,
}

impl LineBuilder {
    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
        self.width = 0;
        self.need_space = false;
    }

    fn blank(&mut self) {
        self.flush();
        self.lines.push(Line::default());
    }

    fn prefix(&mut self, text: String) {
        self.width += display_width(&text);
        self.spans.push(Span::raw(text));
    }

    fn word(&mut self, word: String, style: Style) {
        let word_width = display_width(&word);
        if self.width > 0 && self.width + word_width + 1 > self.max_width {
            self.flush();
        }
        if self.need_space {
            self.spans.push(Span::raw(" "));
            self.width += 1;
        }
        self.width += word_width;
        self.spans.push(Span::styled(word, style));
        self.need_space = true;
    }
}

/// Render markdown into styled, word-wrapped lines.
pub fn markdown_to_lines(markdown: &str, max_width: usize) -> Vec<Line<'static>> {
    let mut out = LineBuilder {
        lines: Vec::new(),
        spans: Vec::new(),
        width: 0,
        max_width: max_width.max(10),
        need_space: false,
    };

    let mut bold = false;
    let mut italic = false;
    let mut heading = false;
    let mut code_block = false;
    let mut list_depth = 0usize;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Heading(_, _, _) => {
                    out.flush();
                    heading = true;
                }
                Tag::Paragraph | Tag::BlockQuote if list_depth == 0 => out.flush(),
                Tag::Strong => bold = true,
                Tag::Emphasis => italic = true,
                Tag::CodeBlock(_) => {
                    out.flush();
                    code_block = true;
                }
                Tag::List(_) => {
                    out.flush();
                    list_depth += 1;
                }
                Tag::Item => {
                    out.flush();
                    out.prefix(format!("{}• ", "  ".repeat(list_depth.saturating_sub(1))));
                }
                _ => {}
            },
            Event::End(tag) => match tag {
                Tag::Heading(_, _, _) | Tag::CodeBlock(_) => {
                    out.blank();
                    heading = false;
                    code_block = false;
                }
                Tag::Paragraph if list_depth == 0 => out.blank(),
                Tag::Strong => bold = false,
                Tag::Emphasis => italic = false,
                Tag::List(_) => {
                    list_depth = list_depth.saturating_sub(1);
                    if list_depth == 0 {
                        out.blank();
                    }
                }
                Tag::Item => out.flush(),
                _ => {}
            },
            Event::Text(text) => {
                if code_block {
                    for code_line in text.lines() {
                        out.lines.push(Line::from(Span::styled(
                            format!("  {}", code_line),
                            Style::default().fg(Color::Gray),
                        )));
                    }
                    continue;
                }

                let mut style = Style::default();
                if heading {
                    style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
                }
                if bold {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if italic {
                    style = style.add_modifier(Modifier::ITALIC);
                }
                for word in text.split_whitespace() {
                    out.word(word.to_string(), style);
                }
            }
            Event::Code(code) => out.word(code.to_string(), Style::default().fg(Color::Yellow)),
            Event::SoftBreak => out.need_space = true,
            Event::HardBreak => out.flush(),
            _ => {}
        }
    }
    out.flush();

    let mut lines = out.lines;
    while lines
        .last()
        .is_some_and(|l| l.spans.iter().all(|s| s.content.is_empty()))
    {
        lines.pop();
    }
    lines
}
