//! Pattern, seal and buff effect handlers.
//!
//! Each handler is a pure function over the board as it stood when the lines
//! were detected and the set of cells the clear will remove. Obstacle and
//! stone cells never appear in that set (see [`Board::filter_clearable`]).

use crate::board::{Board, CompletedLines};
use crate::cell::{BuffKind, Cell, Pattern, Position, Seal};
use crate::rng::RandomSource;
use crate::rules::ScoringRules;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Scalar contributions of the cleared cells' tags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellEffects {
    pub enhanced_bonus: u32,
    pub charge_bonus: u32,
    pub aura_bonus: u32,
    pub moss_bonus: u32,
    pub buff_enhancement_bonus: u32,
    pub multi_seal_bonus: u32,
    pub arrow_bonus: u32,
    /// Line points track
    pub buff_pulsation_bonus: f64,
    /// Flat score, added after the multiplication
    pub score_seal_bonus: u32,
    /// Currency, never part of the score
    pub gold_seal_count: u32,
    pub prosperity_gold: u32,
}

impl CellEffects {
    /// Everything that feeds block points, arrow bonus included
    pub fn block_points(&self) -> u32 {
        self.enhanced_bonus
            + self.charge_bonus
            + self.aura_bonus
            + self.moss_bonus
            + self.buff_enhancement_bonus
            + self.multi_seal_bonus
            + self.arrow_bonus
    }

    pub fn gold(&self, rules: &ScoringRules) -> u32 {
        self.gold_seal_count * rules.gold_per_seal + self.prosperity_gold
    }
}

/// Outcome of the lucky-pattern rolls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckyRoll {
    pub lucky_blocks: u32,
    pub successes: u32,
}

impl LuckyRoll {
    pub fn succeeded(&self) -> bool {
        self.successes > 0
    }
}

fn cleared<'a>(
    board: &'a Board,
    cells: &'a BTreeSet<Position>,
) -> impl Iterator<Item = (Position, &'a Cell)> + 'a {
    cells
        .iter()
        .filter_map(move |&pos| board.get(pos).map(|cell| (pos, cell)))
        .filter(|(_, cell)| cell.filled)
}

fn count_where(board: &Board, cells: &BTreeSet<Position>, pred: impl Fn(&Cell) -> bool) -> u32 {
    cleared(board, cells).filter(|(_, c)| pred(c)).count() as u32
}

pub fn enhanced_bonus(board: &Board, cells: &BTreeSet<Position>, rules: &ScoringRules) -> u32 {
    count_where(board, cells, |c| c.pattern == Some(Pattern::Enhanced)) * rules.enhanced_bonus
}

/// Sum of the charge stored in every cleared charge block
pub fn charge_bonus(board: &Board, cells: &BTreeSet<Position>) -> u32 {
    cleared(board, cells)
        .filter(|(_, c)| c.pattern == Some(Pattern::Charge))
        .map(|(_, c)| c.charge)
        .sum()
}

pub fn aura_bonus(board: &Board, cells: &BTreeSet<Position>, rules: &ScoringRules) -> u32 {
    cleared(board, cells)
        .filter(|(_, c)| c.pattern == Some(Pattern::Aura))
        .map(|(pos, _)| board.filled_neighbors(pos) as u32 * rules.aura_bonus)
        .sum()
}

pub fn moss_bonus(board: &Board, cells: &BTreeSet<Position>, rules: &ScoringRules) -> u32 {
    let moss_on_board = board.count_pattern(Pattern::Moss) as u32;
    count_where(board, cells, |c| c.pattern == Some(Pattern::Moss)) * moss_on_board * rules.moss_bonus
}

pub fn buff_enhancement_bonus(
    board: &Board,
    cells: &BTreeSet<Position>,
    rules: &ScoringRules,
) -> u32 {
    cleared(board, cells)
        .map(|(_, c)| c.buff_level(BuffKind::Enhancement) as u32)
        .sum::<u32>()
        * rules.buff_enhancement_per_level
}

pub fn buff_pulsation_bonus(
    board: &Board,
    cells: &BTreeSet<Position>,
    rules: &ScoringRules,
) -> f64 {
    let levels: u32 = cleared(board, cells)
        .map(|(_, c)| c.buff_level(BuffKind::Pulsation) as u32)
        .sum();
    levels as f64 * rules.buff_pulsation_per_level
}

pub fn prosperity_gold(board: &Board, cells: &BTreeSet<Position>, rules: &ScoringRules) -> u32 {
    cleared(board, cells)
        .map(|(_, c)| c.buff_level(BuffKind::Prosperity) as u32)
        .sum::<u32>()
        * rules.prosperity_gold_per_level
}

/// Each multi-sealed block counts a second time
pub fn multi_seal_bonus(board: &Board, cells: &BTreeSet<Position>) -> u32 {
    count_where(board, cells, |c| c.seal == Some(Seal::Multi))
}

pub fn score_seal_bonus(board: &Board, cells: &BTreeSet<Position>, rules: &ScoringRules) -> u32 {
    count_where(board, cells, |c| c.seal == Some(Seal::Score)) * rules.score_seal_bonus
}

/// Arrow seals pay only when a completed line of their own orientation runs through them
pub fn arrow_bonus(
    board: &Board,
    cells: &BTreeSet<Position>,
    completed: &CompletedLines,
    rules: &ScoringRules,
) -> u32 {
    cleared(board, cells)
        .filter(|(pos, c)| match c.seal {
            Some(Seal::ArrowRow) => completed.contains_row(pos.row),
            Some(Seal::ArrowColumn) => completed.contains_col(pos.col),
            _ => false,
        })
        .count() as u32
        * rules.arrow_bonus
}

pub fn gold_seal_count(board: &Board, cells: &BTreeSet<Position>) -> u32 {
    count_where(board, cells, |c| c.seal == Some(Seal::Gold))
}

/// Run every deterministic handler
pub fn compute_cell_effects(
    board: &Board,
    cells: &BTreeSet<Position>,
    completed: &CompletedLines,
    rules: &ScoringRules,
) -> CellEffects {
    CellEffects {
        enhanced_bonus: enhanced_bonus(board, cells, rules),
        charge_bonus: charge_bonus(board, cells),
        aura_bonus: aura_bonus(board, cells, rules),
        moss_bonus: moss_bonus(board, cells, rules),
        buff_enhancement_bonus: buff_enhancement_bonus(board, cells, rules),
        multi_seal_bonus: multi_seal_bonus(board, cells),
        arrow_bonus: arrow_bonus(board, cells, completed, rules),
        buff_pulsation_bonus: buff_pulsation_bonus(board, cells, rules),
        score_seal_bonus: score_seal_bonus(board, cells, rules),
        gold_seal_count: gold_seal_count(board, cells),
        prosperity_gold: prosperity_gold(board, cells, rules),
    }
}

/// One independent draw per cleared lucky block, in row-major order
pub fn roll_lucky(
    board: &Board,
    cells: &BTreeSet<Position>,
    rules: &ScoringRules,
    rng: &mut dyn RandomSource,
) -> LuckyRoll {
    let mut roll = LuckyRoll::default();
    for _ in cleared(board, cells).filter(|(_, c)| c.pattern == Some(Pattern::Lucky)) {
        roll.lucky_blocks += 1;
        if rng.next_f64() < rules.lucky_chance {
            roll.successes += 1;
        }
    }
    roll
}
