//! Input dispatch layer for Elm Architecture (TEA) pattern.
//!
//! Maps key and mouse events to messages based on the current view.
//! Handles the `gg` chord with a non-blocking state machine. While a modal
//! is open every key goes to it.

use super::app::ViewMode;
use super::focus::Direction;
use super::modal::ModalKey;
use super::panel::NavKey;
use super::{App, Message};
use crate::commands;
use crate::data::FilterMode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::time::Instant;

/// State machine for handling key chords (gg).
///
/// Instead of blocking with `event::poll()` inline, we track pending keys
/// and check for timeout in the main event loop.
#[derive(Debug, Default)]
pub struct InputState {
    /// The first key of a potential chord sequence
    pub pending: Option<KeyCode>,
    /// When the pending key was pressed (for timeout detection)
    pub pending_since: Option<Instant>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there's a pending chord that has timed out (500ms).
    pub fn has_timed_out(&self) -> bool {
        if let Some(since) = self.pending_since {
            since.elapsed().as_millis() > 500
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
        self.pending_since = None;
    }

    pub fn set_pending(&mut self, key: KeyCode) {
        self.pending = Some(key);
        self.pending_since = Some(Instant::now());
    }
}

/// Map a key event to a message for the current view.
pub fn dispatch(app: &App, input: &mut InputState, key: KeyEvent) -> Message {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Message::Quit;
    }

    if app.modal.is_some() {
        input.clear();
        return dispatch_modal(key);
    }

    // Handle pending chords first
    if let Some(pending) = input.pending.take() {
        input.pending_since = None;
        return handle_chord(pending, key.code);
    }

    if app.search_mode {
        return dispatch_search_mode(key);
    }

    match app.view {
        ViewMode::List | ViewMode::Board => dispatch_main_mode(app, input, key),
        ViewMode::Detail { .. } => dispatch_detail_mode(app, input, key),
        ViewMode::Help { .. } => dispatch_help_mode(key),
    }
}

/// Map a mouse event to a message. `now` timestamps clicks for double-click
/// detection.
pub fn dispatch_mouse(event: MouseEvent, now: Instant) -> Message {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Message::Click {
            x: event.column,
            y: event.row,
            at: now,
        },
        MouseEventKind::ScrollDown => Message::Wheel(1),
        MouseEventKind::ScrollUp => Message::Wheel(-1),
        _ => Message::None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mode-specific dispatch functions
// ─────────────────────────────────────────────────────────────────────────────

/// List and board views share one keymap; the app interprets focus moves
/// per view.
fn dispatch_main_mode(app: &App, input: &mut InputState, key: KeyEvent) -> Message {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('d') if ctrl => Message::Navigate(NavKey::PageDown),
        KeyCode::Char('u') if ctrl => Message::Navigate(NavKey::PageUp),
        KeyCode::Char('q') => Message::Quit,
        KeyCode::Char('j') | KeyCode::Down => Message::Navigate(NavKey::Down),
        KeyCode::Char('k') | KeyCode::Up => Message::Navigate(NavKey::Up),
        KeyCode::Char('G') | KeyCode::End => Message::Navigate(NavKey::Bottom),
        KeyCode::Home => Message::Navigate(NavKey::Top),
        KeyCode::Char('g') => {
            input.set_pending(KeyCode::Char('g'));
            Message::None
        }
        KeyCode::PageDown => Message::Navigate(NavKey::PageDown),
        KeyCode::PageUp => Message::Navigate(NavKey::PageUp),
        KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => Message::CycleFocus(Direction::Next),
        KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => {
            Message::CycleFocus(Direction::Prev)
        }
        KeyCode::Char(' ') => Message::ToggleCollapse,
        KeyCode::Enter => Message::OpenDetail,
        KeyCode::Char('/') => Message::EnterSearch,
        KeyCode::Char('o') => Message::ToggleFilter(FilterMode::Open),
        KeyCode::Char('c') => Message::ToggleFilter(FilterMode::Closed),
        KeyCode::Char('r') => Message::ToggleFilter(FilterMode::Ready),
        KeyCode::Char('A') => Message::ClearFilter,
        KeyCode::Char('s') => Message::CycleSort,
        KeyCode::Char('b') => Message::ToggleBoard,
        KeyCode::Char('R') => Message::Refresh,
        KeyCode::Char('?') => Message::ToggleHelp,
        KeyCode::Esc => Message::Back,
        KeyCode::Char('a') if !ctrl => Message::NewIssue,
        _ => issue_action(key).unwrap_or_else(|| custom_command(app, key)),
    }
}

fn dispatch_detail_mode(app: &App, input: &mut InputState, key: KeyEvent) -> Message {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('d') if ctrl => Message::Navigate(NavKey::PageDown),
        KeyCode::Char('u') if ctrl => Message::Navigate(NavKey::PageUp),
        KeyCode::Esc | KeyCode::Char('q') => Message::Back,
        KeyCode::Char('j') | KeyCode::Down => Message::Navigate(NavKey::Down),
        KeyCode::Char('k') | KeyCode::Up => Message::Navigate(NavKey::Up),
        KeyCode::Char('G') => Message::Navigate(NavKey::Bottom),
        KeyCode::Char('g') => {
            input.set_pending(KeyCode::Char('g'));
            Message::None
        }
        KeyCode::Char('?') => Message::ToggleHelp,
        _ => issue_action(key).unwrap_or_else(|| custom_command(app, key)),
    }
}

fn dispatch_help_mode(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Message::Back,
        KeyCode::Char('?') => Message::ToggleHelp,
        _ => Message::None,
    }
}

fn dispatch_search_mode(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Esc => Message::ExitSearch,
        KeyCode::Enter => Message::ConfirmSearch,
        KeyCode::Backspace => Message::SearchBackspace,
        KeyCode::Down => Message::Navigate(NavKey::Down),
        KeyCode::Up => Message::Navigate(NavKey::Up),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Message::SearchInput(c)
        }
        _ => Message::None,
    }
}

/// Keys acting on the selected issue, shared by the main and detail views.
fn issue_action(key: KeyEvent) -> Option<Message> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    let msg = match key.code {
        KeyCode::Char('e') => Message::EditTitle,
        KeyCode::Char('S') => Message::EditStatus,
        KeyCode::Char('p') => Message::EditPriority,
        KeyCode::Char('t') => Message::EditType,
        KeyCode::Char('d') => Message::EditDescription,
        KeyCode::Char('C') => Message::AddComment,
        KeyCode::Char('B') => Message::AddBlocker,
        KeyCode::Char('D') => Message::RemoveBlocker,
        KeyCode::Char('X') => Message::CloseIssue,
        KeyCode::Char('x') => Message::DeleteIssue,
        KeyCode::Char('y') => Message::CopyId,
        _ => return None,
    };
    Some(msg)
}

fn dispatch_modal(key: KeyEvent) -> Message {
    let modal_key = match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => ModalKey::Char(c),
        KeyCode::Backspace => ModalKey::Backspace,
        KeyCode::Up => ModalKey::Up,
        KeyCode::Down => ModalKey::Down,
        KeyCode::Left => ModalKey::Left,
        KeyCode::Right => ModalKey::Right,
        KeyCode::Tab => ModalKey::Tab,
        KeyCode::BackTab => ModalKey::BackTab,
        KeyCode::Enter => ModalKey::Enter,
        KeyCode::Esc => ModalKey::Esc,
        _ => return Message::None,
    };
    Message::ModalKey(modal_key)
}

/// Handle the second key of a chord.
fn handle_chord(first: KeyCode, second: KeyCode) -> Message {
    match (first, second) {
        (KeyCode::Char('g'), KeyCode::Char('g')) => Message::Navigate(NavKey::Top),
        _ => Message::None,
    }
}

/// Textual form used by custom command bindings: `x` or `ctrl+x`.
pub fn key_string(key: &KeyEvent) -> Option<String> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(format!("ctrl+{}", c.to_ascii_lowercase()))
        }
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

fn custom_command(app: &App, key: KeyEvent) -> Message {
    let (Some(context), Some(key)) = (app.view.command_context(), key_string(&key)) else {
        return Message::None;
    };
    commands::find(&app.config.custom_commands, &key, context)
        .map(Message::RunCustomCommand)
        .unwrap_or(Message::None)
}
