//! Popup rendering for the editing modals.

use super::layout::popup_rect;
use crate::tui::modal::{FormField, IssueForm, Modal, Picker};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const CURSOR: &str = "█";

pub fn draw_modal(f: &mut Frame, modal: &Modal) {
    let lines = modal_lines(modal);
    let height = lines.len() as u16 + 2;
    let area = popup_rect(50, 0, 44, height, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", modal.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Body of the popup for `modal`.
pub fn modal_lines(modal: &Modal) -> Vec<Line<'static>> {
    match modal {
        Modal::Create(form) => form_lines(form),
        Modal::Input(input) => vec![Line::from(vec![
            Span::raw(format!(" {}", input.value)),
            Span::styled(CURSOR, Style::default().fg(Color::Yellow)),
        ])],
        Modal::Pick(picker) => picker_lines(picker),
        Modal::Confirm(confirm) => vec![
            Line::from(format!(" {}", confirm.prompt)),
            Line::from(""),
            Line::from(Span::styled(
                " (y)es / (n)o",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    }
}

fn form_lines(form: &IssueForm) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let focused = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    FormField::ALL
        .iter()
        .map(|field| {
            let is_focused = *field == form.field;
            let value = match field {
                FormField::Title => form.title.clone(),
                FormField::Description => form.description.clone(),
                FormField::Priority => format!("P{}", form.priority),
                FormField::Type => form.issue_type.as_str().to_string(),
            };
            let mut spans = vec![
                Span::styled(
                    format!(" {:<12}", field.label()),
                    if is_focused { focused } else { label },
                ),
                Span::raw(value),
            ];
            if is_focused {
                let marker = match field {
                    FormField::Title | FormField::Description => CURSOR,
                    FormField::Priority | FormField::Type => " ◂▸",
                };
                spans.push(Span::styled(marker, Style::default().fg(Color::Yellow)));
            }
            Line::from(spans)
        })
        .collect()
}

fn picker_lines(picker: &Picker) -> Vec<Line<'static>> {
    picker
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let shortcut = option
                .shortcut
                .map(|c| format!("[{}] ", c))
                .unwrap_or_default();
            let text = format!(" {}{}", shortcut, option.label);
            if i == picker.selected {
                Line::from(Span::styled(
                    format!("▸{}", text),
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                ))
            } else {
                Line::from(format!(" {}", text))
            }
        })
        .collect()
}
