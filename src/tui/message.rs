//! Message enum for Elm Architecture (TEA) pattern.
//!
//! All user actions are represented as messages. Key and mouse events are
//! mapped to messages in `input.rs` and processed by `App::update()`.

use super::focus::Direction;
use super::modal::ModalKey;
use super::panel::NavKey;
use crate::beads::Mutation;
use crate::data::{Comment, FilterMode};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ─────────────────────────────────────────────────────────────────────────
    // App lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Quit the application
    Quit,
    /// Start a background refresh of data
    Refresh,
    /// Terminal was resized
    Resize { width: u16, height: u16 },

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Cursor movement in the focused panel or board column
    Navigate(NavKey),
    /// List view: cycle panels. Board view: move between columns.
    CycleFocus(Direction),

    // ─────────────────────────────────────────────────────────────────────────
    // Tree
    // ─────────────────────────────────────────────────────────────────────────
    /// Collapse or expand the children of the selected issue
    ToggleCollapse,

    // ─────────────────────────────────────────────────────────────────────────
    // Search mode
    // ─────────────────────────────────────────────────────────────────────────
    EnterSearch,
    /// Leave search mode and restore the previous query
    ExitSearch,
    /// Leave search mode keeping the typed query
    ConfirmSearch,
    SearchInput(char),
    SearchBackspace,

    // ─────────────────────────────────────────────────────────────────────────
    // Filter & sort
    // ─────────────────────────────────────────────────────────────────────────
    /// Switch to a preset filter, or back to All if it is already active
    ToggleFilter(FilterMode),
    /// Show everything
    ClearFilter,
    CycleSort,

    // ─────────────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────────────
    OpenDetail,
    ToggleBoard,
    ToggleHelp,
    /// Esc: leave the current overlay view
    Back,

    // ─────────────────────────────────────────────────────────────────────────
    // Mouse
    // ─────────────────────────────────────────────────────────────────────────
    /// Left click at a screen cell
    Click { x: u16, y: u16, at: Instant },
    /// Wheel movement, positive is down
    Wheel(i32),

    // ─────────────────────────────────────────────────────────────────────────
    // Issue actions (all act on the selected issue except NewIssue)
    // ─────────────────────────────────────────────────────────────────────────
    NewIssue,
    EditTitle,
    EditStatus,
    EditPriority,
    EditType,
    /// Open the description in `$EDITOR`
    EditDescription,
    AddComment,
    AddBlocker,
    RemoveBlocker,
    /// Ask, then close
    CloseIssue,
    /// Ask, then delete
    DeleteIssue,
    CopyId,
    /// Keystroke for the open modal
    ModalKey(ModalKey),

    // ─────────────────────────────────────────────────────────────────────────
    // Background results
    // ─────────────────────────────────────────────────────────────────────────
    /// A `bd` write finished. `Ok` carries the id of a created issue.
    MutationDone {
        mutation: Mutation,
        result: Result<Option<String>, String>,
    },
    CommentsLoaded {
        id: String,
        result: Result<Vec<Comment>, String>,
    },
    /// `$EDITOR` exited. `Ok` carries the saved text.
    EditorFinished {
        id: String,
        result: Result<String, String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Custom commands
    // ─────────────────────────────────────────────────────────────────────────
    /// Run the configured custom command at this index
    RunCustomCommand(usize),

    // ─────────────────────────────────────────────────────────────────────────
    // No-op
    // ─────────────────────────────────────────────────────────────────────────
    /// No operation (for unhandled keys or pending chords)
    None,
}
