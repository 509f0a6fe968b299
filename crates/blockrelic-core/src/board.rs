//! The 6x6 play grid.
//!
//! This module contains:
//! - The `Board` value type (every mutation returns a new board)
//! - Piece placement with validation
//! - Line completion detection and the union of cells a clear removes
//! - The two halves of committing a clear: stamping blessings and emptying cells

use crate::cell::{Buff, Cell, Pattern, Position, Seal};
use crate::piece::Piece;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Board width and height
pub const BOARD_SIZE: usize = 6;

/// Errors that can occur when placing a piece
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BoardError {
    #[error("Piece does not fit inside the board at ({row}, {col})")]
    OutOfBounds { row: usize, col: usize },

    #[error("Cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },
}

/// Which rows and columns are completely filled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedLines {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

impl CompletedLines {
    pub fn total(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn contains_row(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    pub fn contains_col(&self, col: usize) -> bool {
        self.cols.contains(&col)
    }

    /// Union of every cell in a completed row or column.
    ///
    /// A cell at the intersection of a completed row and column is counted once.
    pub fn cells_to_remove(&self) -> BTreeSet<Position> {
        let mut cells = BTreeSet::new();
        for &row in &self.rows {
            cells.extend((0..BOARD_SIZE).map(|col| Position::new(row, col)));
        }
        for &col in &self.cols {
            cells.extend((0..BOARD_SIZE).map(|row| Position::new(row, col)));
        }
        cells
    }
}

/// The play grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Every position on the board, row-major
    pub fn positions() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position::new(row, col)))
    }

    pub fn in_bounds(pos: Position) -> bool {
        pos.row < BOARD_SIZE && pos.col < BOARD_SIZE
    }

    /// Get a cell, or `None` when out of bounds
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(pos.row).and_then(|row| row.get(pos.col))
    }

    /// Get a cell; panics when out of bounds
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.row][pos.col]
    }

    /// Return a board with one cell replaced
    pub fn with_cell(&self, pos: Position, cell: Cell) -> Self {
        debug_assert!(Self::in_bounds(pos), "position {pos:?} outside the board");
        let mut next = self.clone();
        next.cells[pos.row][pos.col] = cell;
        next
    }

    /// Iterate over all cells with their positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        Self::positions().map(move |pos| (pos, self.cell(pos)))
    }

    /// Number of filled cells
    pub fn fill_count(&self) -> usize {
        self.iter().filter(|(_, c)| c.filled).count()
    }

    pub fn is_empty(&self) -> bool {
        self.fill_count() == 0
    }

    /// Filled cells carrying `pattern`
    pub fn count_pattern(&self, pattern: Pattern) -> usize {
        self.iter()
            .filter(|(_, c)| c.filled && c.pattern == Some(pattern))
            .count()
    }

    /// Filled cells carrying `seal`
    pub fn count_seal(&self, seal: Seal) -> usize {
        self.iter()
            .filter(|(_, c)| c.filled && c.seal == Some(seal))
            .count()
    }

    /// Filled orthogonal neighbours of `pos`
    pub fn filled_neighbors(&self, pos: Position) -> usize {
        let (row, col) = (pos.row as isize, pos.col as isize);
        [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(|(dr, dc)| {
                let (r, c) = (row + dr, col + dc);
                if r < 0 || c < 0 {
                    return None;
                }
                self.get(Position::new(r as usize, c as usize))
            })
            .filter(|cell| cell.filled)
            .count()
    }

    /// Check a placement without performing it
    pub fn check_placement(&self, piece: &Piece, row: usize, col: usize) -> Result<(), BoardError> {
        for block in piece.blocks() {
            let Some(pos) = block_position(row, col, block.offset) else {
                return Err(BoardError::OutOfBounds { row, col });
            };
            match self.get(pos) {
                None => return Err(BoardError::OutOfBounds { row, col }),
                Some(cell) if cell.filled => {
                    return Err(BoardError::Occupied {
                        row: pos.row,
                        col: pos.col,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn can_place(&self, piece: &Piece, row: usize, col: usize) -> bool {
        self.check_placement(piece, row, col).is_ok()
    }

    /// All origins where `piece` fits
    pub fn valid_placements(&self, piece: &Piece) -> Vec<Position> {
        Self::positions()
            .filter(|pos| self.can_place(piece, pos.row, pos.col))
            .collect()
    }

    /// Place a piece with its top-left corner at (`row`, `col`).
    ///
    /// Every charge cell already on the board gains one charge before the
    /// new blocks land. Buffs under the new blocks are kept.
    pub fn place(&self, piece: &Piece, row: usize, col: usize) -> Result<Self, BoardError> {
        self.check_placement(piece, row, col)?;

        let mut next = self.clone();
        for line in next.cells.iter_mut() {
            for cell in line.iter_mut() {
                if cell.filled && cell.pattern == Some(Pattern::Charge) {
                    cell.charge += 1;
                }
            }
        }

        for block in piece.blocks() {
            let Some(cell) = block_position(row, col, block.offset)
                .and_then(|pos| next.cells.get_mut(pos.row)?.get_mut(pos.col))
            else {
                return Err(BoardError::OutOfBounds { row, col });
            };
            *cell = Cell {
                buff: cell.buff,
                ..Cell::filled_with(block.tags)
            };
        }
        Ok(next)
    }

    /// Rows and columns whose every cell is filled, tags ignored
    pub fn find_completed_lines(&self) -> CompletedLines {
        let rows = (0..BOARD_SIZE)
            .filter(|&row| self.cells[row].iter().all(|c| c.filled))
            .collect();
        let cols = (0..BOARD_SIZE)
            .filter(|&col| (0..BOARD_SIZE).all(|row| self.cells[row][col].filled))
            .collect();
        CompletedLines { rows, cols }
    }

    /// Completed lines holding at least one clearable cell.
    ///
    /// A line filled only with stones and obstacles never empties, so it is
    /// left out and cannot score again on every later placement.
    pub fn find_clearable_lines(&self) -> CompletedLines {
        let CompletedLines { rows, cols } = self.find_completed_lines();
        CompletedLines {
            rows: rows
                .into_iter()
                .filter(|&row| self.cells[row].iter().any(Cell::is_clearable))
                .collect(),
            cols: cols
                .into_iter()
                .filter(|&col| (0..BOARD_SIZE).any(|row| self.cells[row][col].is_clearable()))
                .collect(),
        }
    }

    /// Drop cells that a clear cannot remove (stone seals, negative patterns).
    ///
    /// Such cells stay filled, so their line may be complete without ever emptying.
    pub fn filter_clearable(&self, cells: &BTreeSet<Position>) -> BTreeSet<Position> {
        cells
            .iter()
            .copied()
            .filter(|&pos| self.get(pos).is_some_and(Cell::is_clearable))
            .collect()
    }

    /// Empty exactly the given cells, keeping their buffs
    pub fn clear<'a>(&self, cells: impl IntoIterator<Item = &'a Position>) -> Self {
        let mut next = self.clone();
        for &pos in cells {
            debug_assert!(Self::in_bounds(pos), "clear outside the board: {pos:?}");
            if let Some(cell) = next.cells.get_mut(pos.row).and_then(|r| r.get_mut(pos.col)) {
                *cell = cell.emptied();
            }
        }
        next
    }

    /// Turn blessings on the given cells into buffs
    pub fn stamp_blessings<'a>(&self, cells: impl IntoIterator<Item = &'a Position>) -> Self {
        let mut next = self.clone();
        for &pos in cells {
            debug_assert!(Self::in_bounds(pos), "stamp outside the board: {pos:?}");
            let Some(cell) = next.cells.get_mut(pos.row).and_then(|r| r.get_mut(pos.col)) else {
                continue;
            };
            if let Some(blessing) = cell.blessing {
                let kind = blessing.buff_kind();
                cell.buff = Some(match cell.buff {
                    Some(buff) => buff.stamped(kind),
                    None => Buff::new(kind),
                });
            }
        }
        next
    }

    /// Empty the whole board, keeping buffs
    pub fn reset(&self) -> Self {
        let all: Vec<Position> = Self::positions().collect();
        self.clear(&all)
    }
}

/// Board position of a block at `offset` from the origin, `None` on overflow
fn block_position(row: usize, col: usize, offset: Position) -> Option<Position> {
    Some(Position::new(
        row.checked_add(offset.row)?,
        col.checked_add(offset.col)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Blessing, BuffKind, CellTags};

    fn full_board() -> Board {
        Board::positions().fold(Board::new(), |b, pos| b.with_cell(pos, Cell::block()))
    }

    fn fill_row(board: &Board, row: usize) -> Board {
        (0..BOARD_SIZE).fold(board.clone(), |b, col| {
            b.with_cell(Position::new(row, col), Cell::block())
        })
    }

    fn fill_col(board: &Board, col: usize) -> Board {
        (0..BOARD_SIZE).fold(board.clone(), |b, row| {
            b.with_cell(Position::new(row, col), Cell::block())
        })
    }

    #[test]
    fn test_full_board_completes_every_line() {
        let lines = full_board().find_completed_lines();
        assert_eq!(lines.rows, (0..BOARD_SIZE).collect::<Vec<_>>());
        assert_eq!(lines.cols, (0..BOARD_SIZE).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_board_has_no_lines() {
        assert!(Board::new().find_completed_lines().is_empty());
    }

    #[test]
    fn test_intersection_counted_once() {
        let board = fill_col(&fill_row(&Board::new(), 2), 3);
        let lines = board.find_completed_lines();
        assert_eq!(lines.rows, vec![2]);
        assert_eq!(lines.cols, vec![3]);
        assert_eq!(lines.cells_to_remove().len(), 11);
    }

    #[test]
    fn test_stone_stays_after_clear() {
        let board = fill_row(&Board::new(), 0).with_cell(
            Position::new(0, 4),
            Cell::filled_with(CellTags {
                seal: Some(Seal::Stone),
                ..CellTags::default()
            }),
        );
        let lines = board.find_completed_lines();
        assert_eq!(lines.rows, vec![0]);

        let clearable = board.filter_clearable(&lines.cells_to_remove());
        assert_eq!(clearable.len(), 5);
        assert!(!clearable.contains(&Position::new(0, 4)));

        let after = board.clear(&clearable);
        assert_eq!(after.fill_count(), 1);
        // Only the stone remains
        assert!(after.find_completed_lines().is_empty());
    }

    #[test]
    fn test_place_rejects_out_of_bounds_and_overlap() {
        let board = Board::new();
        let bar = Piece::bar(3);
        assert_eq!(
            board.place(&bar, 0, 4),
            Err(BoardError::OutOfBounds { row: 0, col: 4 })
        );

        let board = board.place(&bar, 0, 0).unwrap();
        assert_eq!(
            board.place(&Piece::column(2), 0, 1),
            Err(BoardError::Occupied { row: 0, col: 1 })
        );
    }

    #[test]
    fn test_place_rejects_origin_that_overflows() {
        let offset = Piece::from_rows(&[".", "#"]);
        assert_eq!(
            Board::new().place(&offset, usize::MAX, 0),
            Err(BoardError::OutOfBounds {
                row: usize::MAX,
                col: 0
            })
        );
        assert!(!Board::new().can_place(&Piece::bar(2), 0, usize::MAX));
    }

    #[test]
    fn test_unclearable_line_is_not_clearable() {
        let obstacle_row = Piece::bar(6).with_pattern(Pattern::Obstacle);
        let board = Board::new().place(&obstacle_row, 0, 0).unwrap();
        assert_eq!(board.find_completed_lines().rows, vec![0]);
        assert!(board.find_clearable_lines().is_empty());

        // One ordinary block is enough to make the line clear
        let board = Board::new()
            .place(&Piece::bar(5).with_pattern(Pattern::Obstacle), 1, 0)
            .unwrap()
            .place(&Piece::bar(1), 1, 5)
            .unwrap();
        assert_eq!(board.find_clearable_lines().rows, vec![1]);
    }

    #[test]
    fn test_place_charges_existing_charge_cells() {
        let charged = Piece::bar(2).with_pattern(Pattern::Charge);
        let board = Board::new().place(&charged, 0, 0).unwrap();
        assert_eq!(board.cell(Position::new(0, 0)).charge, 1);

        let board = board.place(&Piece::bar(1), 5, 5).unwrap();
        let board = board.place(&Piece::bar(1), 4, 5).unwrap();
        assert_eq!(board.cell(Position::new(0, 0)).charge, 3);
        assert_eq!(board.cell(Position::new(0, 1)).charge, 3);
    }

    #[test]
    fn test_blessing_becomes_buff_that_outlives_clear() {
        let piece = Piece::bar(6).with_blessing_at(0, 2, Blessing::Enhancement);
        let board = Board::new().place(&piece, 1, 0).unwrap();
        let cells = board.find_completed_lines().cells_to_remove();

        let after = board.stamp_blessings(&cells).clear(&cells);
        let cell = after.cell(Position::new(1, 2));
        assert!(!cell.filled);
        assert_eq!(cell.buff, Some(Buff::new(BuffKind::Enhancement)));

        // Placing over an enchanted empty cell keeps the buff
        let again = after.place(&piece, 1, 0).unwrap();
        let cells = again.find_completed_lines().cells_to_remove();
        let after = again.stamp_blessings(&cells).clear(&cells);
        assert_eq!(after.cell(Position::new(1, 2)).buff.unwrap().level, 2);
    }

    #[test]
    fn test_filled_neighbors_at_corner() {
        let board = Board::new()
            .with_cell(Position::new(0, 1), Cell::block())
            .with_cell(Position::new(1, 0), Cell::block());
        assert_eq!(board.filled_neighbors(Position::new(0, 0)), 2);
        assert_eq!(board.filled_neighbors(Position::new(5, 5)), 0);
    }
}
