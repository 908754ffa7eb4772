//! Cursor and scroll state for one stacked list panel.

use crate::data::TreeNode;

/// Rows moved by a page up/down.
pub const PAGE_SIZE: usize = 10;

/// Navigation keys shared by panels and the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Top,
    Bottom,
    PageUp,
    PageDown,
}

/// One flattened view plus cursor, scroll window and focus.
///
/// Invariant: `cursor < items.len()` whenever the panel is non-empty, and 0
/// otherwise.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    items: Vec<TreeNode>,
    cursor: usize,
    scroll: usize,
    viewport_rows: usize,
    focused: bool,
    /// Shrinks to a one-line summary while unfocused
    collapsible: bool,
    summary_collapsed: bool,
}

impl PanelState {
    pub fn new(collapsible: bool) -> Self {
        Self {
            viewport_rows: 1,
            collapsible,
            summary_collapsed: collapsible,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[TreeNode] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_summary_collapsed(&self) -> bool {
        self.summary_collapsed
    }

    /// Rows currently inside the scroll window.
    pub fn visible_items(&self) -> &[TreeNode] {
        let end = (self.scroll + self.viewport_rows).min(self.items.len());
        &self.items[self.scroll.min(end)..end]
    }

    /// Replace the contents, keeping the cursor on the same issue if it
    /// survived, otherwise on the nearest valid index.
    pub fn set_items(&mut self, items: Vec<TreeNode>) {
        let previous_id = self.selected_item().map(|n| n.issue.id.clone());
        let previous_index = self.cursor;
        self.items = items;

        self.cursor = previous_id
            .and_then(|id| self.items.iter().position(|n| n.issue.id == id))
            .unwrap_or(previous_index);
        self.clamp_cursor();
        self.keep_cursor_visible();
    }

    pub fn selected_item(&self) -> Option<&TreeNode> {
        self.items.get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta);
        self.clamp_cursor();
        self.keep_cursor_visible();
    }

    pub fn jump_top(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = 0;
        self.keep_cursor_visible();
    }

    pub fn jump_bottom(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = self.items.len() - 1;
        self.keep_cursor_visible();
    }

    pub fn page_up(&mut self) {
        self.move_cursor(-(PAGE_SIZE as isize));
    }

    pub fn page_down(&mut self) {
        self.move_cursor(PAGE_SIZE as isize);
    }

    /// Select by absolute index. Out-of-range indexes are ignored.
    pub fn select_index(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.cursor = index;
        self.keep_cursor_visible();
        true
    }

    /// Mouse wheel movement.
    pub fn scroll_by(&mut self, delta: isize) {
        self.move_cursor(delta);
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
        self.keep_cursor_visible();
    }

    /// Focus changes also drive the summary collapse of collapsible panels.
    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
        if self.collapsible {
            self.summary_collapsed = !focused;
        }
    }

    /// Apply a navigation key. Only the focused panel reacts, and only to
    /// vertical movement.
    pub fn handle_key(&mut self, key: NavKey) -> bool {
        if !self.focused {
            return false;
        }
        match key {
            NavKey::Up => self.move_cursor(-1),
            NavKey::Down => self.move_cursor(1),
            NavKey::Top => self.jump_top(),
            NavKey::Bottom => self.jump_bottom(),
            NavKey::PageUp => self.page_up(),
            NavKey::PageDown => self.page_down(),
            NavKey::Left | NavKey::Right => return false,
        }
        true
    }

    fn clamp_cursor(&mut self) {
        self.cursor = match self.items.len() {
            0 => 0,
            len => self.cursor.min(len - 1),
        };
    }

    fn keep_cursor_visible(&mut self) {
        let rows = self.viewport_rows.max(1);
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + rows {
            self.scroll = self.cursor + 1 - rows;
        }
        let max_scroll = self.items.len().saturating_sub(rows);
        self.scroll = self.scroll.min(max_scroll);
    }
}
