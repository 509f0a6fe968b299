//! Board cells and the tags they carry.
//!
//! This module contains:
//! - Patterns (shared by every block of a placed piece)
//! - Seals (stamped on individual blocks)
//! - Blessings and the buffs they leave behind after a clear
//! - The `Cell` record itself

use serde::{Deserialize, Serialize};

/// Highest level a buff can reach on a single cell
pub const MAX_BUFF_LEVEL: u8 = 3;

/// A row/column position on the board
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Piece-wide pattern tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// Flat bonus block points per block
    Enhanced,
    /// Grows by one every time another piece is placed
    Charge,
    /// Scores for every filled neighbour
    Aura,
    /// Scores for every moss cell on the board
    Moss,
    /// Rolls for a line-points doubling
    Lucky,
    /// Junk block that never clears
    Obstacle,
}

impl Pattern {
    /// All pattern types
    pub const ALL: [Pattern; 6] = [
        Pattern::Enhanced,
        Pattern::Charge,
        Pattern::Aura,
        Pattern::Moss,
        Pattern::Lucky,
        Pattern::Obstacle,
    ];

    /// Negative patterns keep their cell on the board even when its line completes
    pub fn is_negative(&self) -> bool {
        matches!(self, Pattern::Obstacle)
    }
}

/// Per-block seal tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seal {
    /// Pays gold when cleared
    Gold,
    /// Block counts twice
    Multi,
    /// Block can never be cleared
    Stone,
    /// Flat score after the multiplication
    Score,
    /// Bonus when its row completes
    ArrowRow,
    /// Bonus when its column completes
    ArrowColumn,
}

impl Seal {
    /// All seal types
    pub const ALL: [Seal; 6] = [
        Seal::Gold,
        Seal::Multi,
        Seal::Stone,
        Seal::Score,
        Seal::ArrowRow,
        Seal::ArrowColumn,
    ];

    pub fn prevents_clearing(&self) -> bool {
        matches!(self, Seal::Stone)
    }
}

/// Blessing carried by a block; turns into a buff on the cell when cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blessing {
    Enhancement,
    Pulsation,
    Prosperity,
}

impl Blessing {
    /// The buff this blessing leaves on its cell
    pub fn buff_kind(&self) -> BuffKind {
        match self {
            Blessing::Enhancement => BuffKind::Enhancement,
            Blessing::Pulsation => BuffKind::Pulsation,
            Blessing::Prosperity => BuffKind::Prosperity,
        }
    }
}

/// Kinds of cell buffs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffKind {
    /// Extra block points for every block cleared on top of it
    Enhancement,
    /// Extra line points for every block cleared on top of it
    Pulsation,
    /// Gold for every block cleared on top of it
    Prosperity,
}

/// A leveled buff sitting on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buff {
    pub kind: BuffKind,
    pub level: u8,
}

impl Buff {
    pub fn new(kind: BuffKind) -> Self {
        Self { kind, level: 1 }
    }

    /// Stamp another blessing of `kind` onto this buff.
    ///
    /// The same kind levels up (capped at [`MAX_BUFF_LEVEL`]); a different
    /// kind replaces the buff at level 1.
    pub fn stamped(self, kind: BuffKind) -> Self {
        if self.kind == kind {
            Self {
                kind,
                level: (self.level + 1).min(MAX_BUFF_LEVEL),
            }
        } else {
            Self::new(kind)
        }
    }
}

/// Tags a piece block carries onto the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellTags {
    pub pattern: Option<Pattern>,
    pub seal: Option<Seal>,
    pub blessing: Option<Blessing>,
}

/// A single board cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub filled: bool,
    pub pattern: Option<Pattern>,
    pub seal: Option<Seal>,
    /// Accumulated charge (only meaningful for `Pattern::Charge`)
    pub charge: u32,
    pub blessing: Option<Blessing>,
    /// Survives the cell being emptied
    pub buff: Option<Buff>,
}

impl Cell {
    /// A filled cell carrying `tags`
    pub fn filled_with(tags: CellTags) -> Self {
        Self {
            filled: true,
            pattern: tags.pattern,
            seal: tags.seal,
            charge: if tags.pattern == Some(Pattern::Charge) { 1 } else { 0 },
            blessing: tags.blessing,
            buff: None,
        }
    }

    /// A plain filled cell with no tags
    pub fn block() -> Self {
        Self::filled_with(CellTags::default())
    }

    /// Empty the cell, keeping any buff
    pub fn emptied(&self) -> Self {
        Self {
            buff: self.buff,
            ..Self::default()
        }
    }

    /// Whether a line clear may remove this cell
    pub fn is_clearable(&self) -> bool {
        self.filled
            && !self.seal.is_some_and(|s| s.prevents_clearing())
            && !self.pattern.is_some_and(|p| p.is_negative())
    }

    /// Buff level if the cell sits on a buff of `kind`
    pub fn buff_level(&self, kind: BuffKind) -> u8 {
        match self.buff {
            Some(buff) if buff.kind == kind => buff.level,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emptied_keeps_buff_only() {
        let mut cell = Cell::filled_with(CellTags {
            pattern: Some(Pattern::Enhanced),
            seal: Some(Seal::Gold),
            blessing: Some(Blessing::Pulsation),
        });
        cell.buff = Some(Buff::new(BuffKind::Enhancement));

        let empty = cell.emptied();
        assert!(!empty.filled);
        assert_eq!(empty.pattern, None);
        assert_eq!(empty.seal, None);
        assert_eq!(empty.blessing, None);
        assert_eq!(empty.buff, Some(Buff::new(BuffKind::Enhancement)));
    }

    #[test]
    fn test_stone_and_obstacle_not_clearable() {
        let stone = Cell::filled_with(CellTags {
            seal: Some(Seal::Stone),
            ..CellTags::default()
        });
        let obstacle = Cell::filled_with(CellTags {
            pattern: Some(Pattern::Obstacle),
            ..CellTags::default()
        });
        assert!(!stone.is_clearable());
        assert!(!obstacle.is_clearable());
        assert!(Cell::block().is_clearable());
        assert!(!Cell::default().is_clearable());
    }

    #[test]
    fn test_buff_levels_cap() {
        let mut buff = Buff::new(BuffKind::Pulsation);
        for _ in 0..5 {
            buff = buff.stamped(BuffKind::Pulsation);
        }
        assert_eq!(buff.level, MAX_BUFF_LEVEL);

        let replaced = buff.stamped(BuffKind::Prosperity);
        assert_eq!(replaced, Buff::new(BuffKind::Prosperity));
    }

    #[test]
    fn test_charge_cells_start_at_one() {
        let cell = Cell::filled_with(CellTags {
            pattern: Some(Pattern::Charge),
            ..CellTags::default()
        });
        assert_eq!(cell.charge, 1);
        assert_eq!(Cell::block().charge, 0);
    }
}
