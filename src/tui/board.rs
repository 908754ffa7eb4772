//! Two-dimensional cursor over the Kanban board.

use super::panel::{NavKey, PAGE_SIZE};
use crate::data::board::COLUMN_COUNT;
use crate::data::{BoardColumn, BoardColumns, Issue};

/// Lines per card: three content lines plus a divider.
pub const CARD_HEIGHT: u16 = 4;

#[derive(Debug, Clone)]
pub struct BoardState {
    columns: BoardColumns,
    column: usize,
    row: usize,
    column_offset: usize,
    /// First visible card of each column
    scroll: [usize; COLUMN_COUNT],
    width: u16,
    min_column_width: u16,
    cards_per_column: usize,
}

impl BoardState {
    pub fn new(min_column_width: u16) -> Self {
        Self {
            columns: BoardColumns::default(),
            column: 0,
            row: 0,
            column_offset: 0,
            scroll: [0; COLUMN_COUNT],
            width: 0,
            min_column_width: min_column_width.max(1),
            cards_per_column: 1,
        }
    }

    pub fn columns(&self) -> &BoardColumns {
        &self.columns
    }

    pub fn focused_column(&self) -> BoardColumn {
        BoardColumn::ALL[self.column]
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column_offset(&self) -> usize {
        self.column_offset
    }

    pub fn scroll(&self, col: BoardColumn) -> usize {
        self.scroll[col.index()]
    }

    pub fn cards_per_column(&self) -> usize {
        self.cards_per_column
    }

    /// How many columns fit side by side at the current width.
    pub fn visible_count(&self) -> usize {
        let fit = (self.width / self.min_column_width) as usize;
        fit.clamp(1, COLUMN_COUNT)
    }

    /// Columns currently on screen, left to right.
    pub fn visible_columns(&self) -> impl Iterator<Item = BoardColumn> + '_ {
        BoardColumn::ALL
            .into_iter()
            .skip(self.column_offset)
            .take(self.visible_count())
    }

    pub fn selected_issue(&self) -> Option<&Issue> {
        self.columns.get(self.focused_column(), self.row)
    }

    /// Replace the columns, following the selected issue if it still exists
    /// anywhere on the board.
    pub fn set_columns(&mut self, columns: BoardColumns) {
        let previous_id = self.selected_issue().map(|i| i.id.clone());
        self.columns = columns;

        if let Some((col, row)) = previous_id.and_then(|id| self.columns.find(&id)) {
            self.column = col.index();
            self.row = row;
        }
        self.clamp_row();
        for col in BoardColumn::ALL {
            self.clamp_scroll(col);
        }
        self.ensure_column_visible();
        self.ensure_row_visible();
    }

    /// Width of the board area and how many cards fit in a column.
    pub fn set_viewport(&mut self, width: u16, cards_per_column: usize) {
        self.width = width;
        self.cards_per_column = cards_per_column.max(1);
        for col in BoardColumn::ALL {
            self.clamp_scroll(col);
        }
        self.ensure_column_visible();
        self.ensure_row_visible();
    }

    pub fn move_column(&mut self, delta: isize) {
        let last = COLUMN_COUNT - 1;
        self.column = self.column.saturating_add_signed(delta).min(last);
        self.clamp_row();
        self.ensure_column_visible();
        self.ensure_row_visible();
    }

    pub fn move_row(&mut self, delta: isize) {
        self.row = self.row.saturating_add_signed(delta);
        self.clamp_row();
        self.ensure_row_visible();
    }

    pub fn jump_top(&mut self) {
        self.row = 0;
        self.ensure_row_visible();
    }

    pub fn jump_bottom(&mut self) {
        self.row = self.current_len().saturating_sub(1);
        self.ensure_row_visible();
    }

    /// Mouse selection. Rows past the end land on the last card.
    pub fn select_cell(&mut self, col: BoardColumn, row: usize) {
        self.column = col.index();
        self.row = row;
        self.clamp_row();
        self.ensure_column_visible();
        self.ensure_row_visible();
    }

    pub fn handle_key(&mut self, key: NavKey) -> bool {
        match key {
            NavKey::Up => self.move_row(-1),
            NavKey::Down => self.move_row(1),
            NavKey::Left => self.move_column(-1),
            NavKey::Right => self.move_column(1),
            NavKey::Top => self.jump_top(),
            NavKey::Bottom => self.jump_bottom(),
            NavKey::PageUp => self.move_row(-(PAGE_SIZE as isize)),
            NavKey::PageDown => self.move_row(PAGE_SIZE as isize),
        }
        true
    }

    /// Keep the focused column inside `[offset, offset + visible_count)`.
    pub fn ensure_column_visible(&mut self) {
        let visible = self.visible_count();
        if self.column < self.column_offset {
            self.column_offset = self.column;
        }
        if self.column >= self.column_offset + visible {
            self.column_offset = self.column + 1 - visible;
        }
        self.column_offset = self.column_offset.min(COLUMN_COUNT - visible);
    }

    fn ensure_row_visible(&mut self) {
        let rows = self.cards_per_column;
        let scroll = &mut self.scroll[self.column];
        if self.row < *scroll {
            *scroll = self.row;
        } else if self.row >= *scroll + rows {
            *scroll = self.row + 1 - rows;
        }
    }

    fn current_len(&self) -> usize {
        self.columns.len(self.focused_column())
    }

    fn clamp_row(&mut self) {
        self.row = match self.current_len() {
            0 => 0,
            len => self.row.min(len - 1),
        };
    }

    fn clamp_scroll(&mut self, col: BoardColumn) {
        let max = self.columns.len(col).saturating_sub(self.cards_per_column);
        let scroll = &mut self.scroll[col.index()];
        *scroll = (*scroll).min(max);
    }
}
