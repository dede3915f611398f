//! Table editing.
//!
//! A table is a [`BlockKind::Table`] whose children are
//! [`BlockKind::TableRow`] containers of [`BlockKind::TableCell`] leaves.

use super::selection::Point;
use super::state::EditorState;
use super::transform::Transform;
use super::types::{Block, BlockKind, Key, Text};

/// Where the selection start sits inside its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TablePosition {
    pub table: Key,
    pub row: usize,
    pub column: usize,
    pub rows: usize,
    pub columns: usize,
}

impl TablePosition {
    pub const fn is_last_cell(&self) -> bool {
        self.row + 1 == self.rows && self.column + 1 == self.columns
    }
}

pub fn table_position(state: &EditorState) -> Option<TablePosition> {
    position_of(state, state.start().key)
}

fn position_of(state: &EditorState, cell: Key) -> Option<TablePosition> {
    let document = state.document();
    let row = document.closest(cell, |block| block.kind == BlockKind::TableRow)?;
    let table = document.closest(cell, |block| block.kind == BlockKind::Table)?;
    let column = row.children().iter().position(|block| block.key == cell)?;
    let row_index = table.children().iter().position(|block| block.key == row.key)?;
    Some(TablePosition {
        table: table.key,
        row: row_index,
        column,
        rows: table.children().len(),
        columns: row.children().len(),
    })
}

pub fn is_selection_in_table(state: &EditorState) -> bool {
    table_position(state).is_some()
}

fn cell_at(state: &EditorState, table: Key, row: usize, column: usize) -> Option<&Block> {
    let table = state.document().find(table)?;
    let row = table.children().get(row)?;
    row.children().get(column)
}

fn empty_cell() -> Block {
    Block::leaf(BlockKind::TableCell, Text::default())
}

impl Transform {
    /// Insert an empty `columns` × `rows` table at the cursor.
    pub fn insert_table(self, columns: usize, rows: usize) -> Self {
        if columns == 0 || rows == 0 {
            return self;
        }
        self.insert_block(Block::table(columns, rows))
    }

    /// Remove the table around the cursor.
    pub fn remove_table(self) -> Self {
        match table_position(self.state()) {
            Some(position) => self.remove_node(position.table, false),
            None => self,
        }
    }

    /// Insert an empty row below the current one and move into it, keeping
    /// the column.
    pub fn insert_row(mut self) -> Self {
        let Some(position) = table_position(self.state()) else {
            return self;
        };
        let Some(row) = cell_at(self.state(), position.table, position.row, 0)
            .and_then(|cell| self.state().document().parent(cell.key))
            .map(|row| row.key)
        else {
            return self;
        };
        let Some(path) = self.state().document().path_of(row) else {
            return self;
        };
        let cells = (0..position.columns).map(|_| empty_cell()).collect();
        let mut new_row = Block::container(BlockKind::TableRow, cells);
        self.document_mut().rekey(&mut new_row);
        let target = new_row.children().get(position.column).map(|cell| cell.key);
        if self.insert_beside(&path, 1, new_row)
            && let Some(target) = target
        {
            self.collapse_to(Point::new(target, 0));
        }
        self
    }

    /// Insert an empty column right of the current one, in every row.
    pub fn insert_column(mut self) -> Self {
        let Some(position) = table_position(self.state()) else {
            return self;
        };
        let Some(table_path) = self.state().document().path_of(position.table) else {
            return self;
        };
        let at = position.column + 1;
        let mut target = None;
        for row_index in 0..position.rows {
            let mut cell = empty_cell();
            self.document_mut().rekey(&mut cell);
            if row_index == position.row {
                target = Some(cell.key);
            }
            let mut row_path = table_path.clone();
            row_path.push(row_index);
            if let Some(row) = self.document_mut().get_mut(&row_path)
                && let Some(cells) = row.children_mut()
            {
                let at = at.min(cells.len());
                cells.insert(at, cell);
            }
        }
        if let Some(target) = target {
            self.collapse_to(Point::new(target, 0));
        }
        self
    }

    /// Move to the next cell, adding a row when leaving the last one.
    pub fn select_next_cell(self) -> Self {
        let Some(position) = table_position(self.state()) else {
            return self;
        };
        if position.is_last_cell() {
            let this = self.insert_row();
            let first = table_position(this.state())
                .and_then(|next| cell_at(this.state(), next.table, next.row, 0))
                .map(|cell| cell.key);
            return match first {
                Some(key) => this.select(Point::new(key, 0)),
                None => this,
            };
        }
        let (row, column) = if position.column + 1 < position.columns {
            (position.row, position.column + 1)
        } else {
            (position.row + 1, 0)
        };
        self.select_cell(position.table, row, column)
    }

    /// Move to the previous cell. Does nothing in the first cell.
    pub fn select_previous_cell(self) -> Self {
        let Some(position) = table_position(self.state()) else {
            return self;
        };
        let (row, column) = match (position.row, position.column) {
            (0, 0) => return self,
            (row, 0) => {
                let previous_len = cell_at(self.state(), position.table, row - 1, 0)
                    .and_then(|cell| self.state().document().parent(cell.key))
                    .map_or(1, |row| row.children().len());
                (row - 1, previous_len.saturating_sub(1))
            }
            (row, column) => (row, column - 1),
        };
        self.select_cell(position.table, row, column)
    }

    fn select_cell(self, table: Key, row: usize, column: usize) -> Self {
        let target = cell_at(self.state(), table, row, column).map(|cell| Point::new(cell.key, cell.text_len()));
        match target {
            Some(point) => self.select(point),
            None => self,
        }
    }
}
