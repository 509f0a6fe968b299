//! Placeable pieces.
//!
//! A piece is a boolean shape matrix plus the tags each occupied block
//! carries. Pieces are copied by value into the board on placement.

use crate::cell::{Blessing, CellTags, Pattern, Position, Seal};
use serde::{Deserialize, Serialize};

/// One occupied block of a piece, at an offset from the piece origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceBlock {
    pub offset: Position,
    pub tags: CellTags,
}

/// A placeable piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    shape: Vec<Vec<bool>>,
    blocks: Vec<PieceBlock>,
}

impl Piece {
    /// Create an untagged piece from a shape matrix
    pub fn new(shape: Vec<Vec<bool>>) -> Self {
        let blocks = shape
            .iter()
            .enumerate()
            .flat_map(|(row, line)| {
                line.iter()
                    .enumerate()
                    .filter(|(_, &occupied)| occupied)
                    .map(move |(col, _)| PieceBlock {
                        offset: Position::new(row, col),
                        tags: CellTags::default(),
                    })
            })
            .collect();
        Self { shape, blocks }
    }

    /// Build a piece from text rows, where `#` marks an occupied block.
    ///
    /// ```
    /// use blockrelic_core::Piece;
    /// let l = Piece::from_rows(&["#.", "#.", "##"]);
    /// assert_eq!(l.block_count(), 4);
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.chars().map(|c| c == '#').collect())
                .collect(),
        )
    }

    /// A horizontal bar of `len` blocks
    pub fn bar(len: usize) -> Self {
        Self::new(vec![vec![true; len]])
    }

    /// A vertical bar of `len` blocks
    pub fn column(len: usize) -> Self {
        Self::new(vec![vec![true]; len])
    }

    pub fn shape(&self) -> &[Vec<bool>] {
        &self.shape
    }

    pub fn blocks(&self) -> &[PieceBlock] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn height(&self) -> usize {
        self.shape.len()
    }

    pub fn width(&self) -> usize {
        self.shape.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Give every block the same pattern
    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        for block in &mut self.blocks {
            block.tags.pattern = Some(pattern);
        }
        self
    }

    /// Seal the block at local offset (`row`, `col`); ignored if unoccupied
    pub fn with_seal_at(mut self, row: usize, col: usize, seal: Seal) -> Self {
        if let Some(block) = self.block_mut(row, col) {
            block.tags.seal = Some(seal);
        }
        self
    }

    /// Bless the block at local offset (`row`, `col`); ignored if unoccupied
    pub fn with_blessing_at(mut self, row: usize, col: usize, blessing: Blessing) -> Self {
        if let Some(block) = self.block_mut(row, col) {
            block.tags.blessing = Some(blessing);
        }
        self
    }

    fn block_mut(&mut self, row: usize, col: usize) -> Option<&mut PieceBlock> {
        self.blocks
            .iter_mut()
            .find(|b| b.offset == Position::new(row, col))
    }
}
