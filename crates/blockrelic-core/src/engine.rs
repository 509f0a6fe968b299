//! Engine entry points.
//!
//! A clear happens in two phases. [`Engine::resolve_clear`] runs right after a
//! piece lands: it detects lines, notifies relics and scores. Once the host
//! has finished animating, [`Engine::commit_clear`] empties the cells and
//! [`Engine::lines_cleared_event`] builds the event relics see afterwards.

use crate::board::{Board, CompletedLines};
use crate::cell::{Pattern, Position, Seal};
use crate::dispatch::{self, LifecycleOutcome, PendingRequest};
use crate::relic::{RelicEffectContext, RelicEvent, RelicInventory, RelicRegistry};
use crate::rng::RandomSource;
use crate::rules::ScoringRules;
use crate::scoring::{compose_score, ClearScope, ScoreBreakdown};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Lines and cells a resolved clear will remove
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearEvent {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub cells: Vec<Position>,
}

impl ClearEvent {
    pub fn total_lines(&self) -> u32 {
        (self.rows.len() + self.cols.len()) as u32
    }
}

/// Run counters a host tracks outside the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSnapshot {
    /// Blocks in the piece that triggered the clear
    pub placed_block_count: u32,
    pub hands_remaining: u32,
    pub discards_remaining: u32,
    pub deck_size: u32,
    pub round: u32,
    pub gold: u32,
}

/// First phase of a clear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearResolution {
    pub clear_event: ClearEvent,
    pub breakdown: ScoreBreakdown,
    /// Inventory after `lines_detected`
    pub inventory: RelicInventory,
    pub requests: Vec<PendingRequest>,
}

/// Relic registry plus scoring constants
#[derive(Debug)]
pub struct Engine {
    registry: RelicRegistry,
    rules: ScoringRules,
}

impl Default for Engine {
    fn default() -> Self {
        Self::standard()
    }
}

impl Engine {
    pub fn new(registry: RelicRegistry, rules: ScoringRules) -> Self {
        Self { registry, rules }
    }

    /// Every catalog relic with the default rules
    pub fn standard() -> Self {
        Self::new(RelicRegistry::standard(), ScoringRules::default())
    }

    pub fn registry(&self) -> &RelicRegistry {
        &self.registry
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Snapshot a clear for relic activation checks
    pub fn build_context(
        &self,
        board: &Board,
        completed: &CompletedLines,
        cells: &BTreeSet<Position>,
        inventory: &RelicInventory,
        snapshot: &RunSnapshot,
    ) -> RelicEffectContext {
        let mut pattern_counts: BTreeMap<Pattern, u32> = BTreeMap::new();
        let mut seal_counts: BTreeMap<Seal, u32> = BTreeMap::new();
        for cell in cells.iter().filter_map(|&pos| board.get(pos)) {
            if let Some(pattern) = cell.pattern {
                *pattern_counts.entry(pattern).or_default() += 1;
            }
            if let Some(seal) = cell.seal {
                *seal_counts.entry(seal).or_default() += 1;
            }
        }

        RelicEffectContext {
            lines_cleared: completed.total() as u32,
            rows_cleared: completed.rows.len() as u32,
            cols_cleared: completed.cols.len() as u32,
            placed_block_count: snapshot.placed_block_count,
            cleared_block_count: cells.len() as u32,
            pattern_counts,
            seal_counts,
            stones_on_board: board.count_seal(Seal::Stone) as u32,
            hands_remaining: snapshot.hands_remaining,
            discards_remaining: snapshot.discards_remaining,
            deck_size: snapshot.deck_size,
            board_fill_count: board.fill_count() as u32,
            round: snapshot.round,
            gold: snapshot.gold,
            relic_count: inventory.len() as u32,
        }
    }

    /// Detect, notify and score. `None` when no completed line has a cell
    /// the clear could remove.
    pub fn resolve_clear(
        &self,
        board: &Board,
        inventory: &RelicInventory,
        snapshot: &RunSnapshot,
        rng: &mut dyn RandomSource,
    ) -> Option<ClearResolution> {
        let completed = board.find_clearable_lines();
        if completed.is_empty() {
            return None;
        }
        let cells = board.filter_clearable(&completed.cells_to_remove());
        if cells.is_empty() {
            return None;
        }

        let detected = RelicEvent::LinesDetected {
            total_lines: completed.total() as u32,
            row_lines: completed.rows.len() as u32,
            col_lines: completed.cols.len() as u32,
        };
        let LifecycleOutcome {
            inventory,
            requests,
        } = self.advance_lifecycle(inventory, &detected);

        let ctx = self.build_context(board, &completed, &cells, &inventory, snapshot);
        let scope = ClearScope {
            board,
            completed: &completed,
            cells: &cells,
        };
        let breakdown = compose_score(&self.registry, &inventory, scope, &ctx, &self.rules, rng);
        tracing::debug!(
            rows = ?completed.rows,
            cols = ?completed.cols,
            cells = cells.len(),
            score = breakdown.final_score,
            "clear resolved"
        );

        Some(ClearResolution {
            clear_event: ClearEvent {
                rows: completed.rows,
                cols: completed.cols,
                cells: cells.into_iter().collect(),
            },
            breakdown,
            inventory,
            requests,
        })
    }

    pub fn advance_lifecycle(
        &self,
        inventory: &RelicInventory,
        event: &RelicEvent,
    ) -> LifecycleOutcome {
        dispatch::advance_lifecycle(&self.registry, inventory, event)
    }

    /// Second phase: stamp blessings into buffs, then empty the cells
    pub fn commit_clear(&self, board: &Board, clear_event: &ClearEvent) -> Board {
        board
            .stamp_blessings(&clear_event.cells)
            .clear(&clear_event.cells)
    }

    /// The event relics see once a clear is committed
    pub fn lines_cleared_event(&self, board_before: &Board, clear_event: &ClearEvent) -> RelicEvent {
        let patterns: Vec<Pattern> = clear_event
            .cells
            .iter()
            .filter_map(|&pos| board_before.get(pos).and_then(|c| c.pattern))
            .collect();
        let kinds: BTreeSet<Pattern> = patterns.iter().copied().collect();

        RelicEvent::LinesCleared {
            total_lines: clear_event.total_lines(),
            pattern_block_count: patterns.len() as u32,
            cleared_pattern_types: kinds.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Blessing;
    use crate::piece::Piece;
    use crate::relic::RelicType;
    use crate::rng::ScriptedRolls;

    #[test]
    fn test_no_lines_no_resolution() {
        let engine = Engine::standard();
        let board = Board::new().place(&Piece::bar(5), 0, 0).unwrap();
        let resolution = engine.resolve_clear(
            &board,
            &RelicInventory::new(),
            &RunSnapshot::default(),
            &mut ScriptedRolls::new(vec![]),
        );
        assert!(resolution.is_none());
    }

    #[test]
    fn test_resolve_dispatches_lines_detected() {
        let engine = Engine::standard();
        let inventory =
            RelicInventory::from_relics(engine.registry(), &[RelicType::Streak]).unwrap();
        let board = Board::new().place(&Piece::bar(6), 3, 0).unwrap();

        let resolution = engine
            .resolve_clear(
                &board,
                &inventory,
                &RunSnapshot::default(),
                &mut ScriptedRolls::new(vec![]),
            )
            .unwrap();
        assert_eq!(resolution.clear_event.rows, vec![3]);
        assert!(resolution.clear_event.cols.is_empty());
        assert_eq!(resolution.clear_event.cells.len(), 6);
        assert_eq!(resolution.inventory.state(RelicType::Streak).streak().count, 1);
        assert_eq!(resolution.breakdown.final_score, 6);
    }

    #[test]
    fn test_stone_and_obstacle_line_never_resolves() {
        let engine = Engine::standard();
        let inventory =
            RelicInventory::from_relics(engine.registry(), &[RelicType::Streak]).unwrap();
        let board = Board::new()
            .place(&Piece::bar(5).with_pattern(Pattern::Obstacle), 2, 0)
            .unwrap()
            .place(&Piece::bar(1).with_seal_at(0, 0, Seal::Stone), 2, 5)
            .unwrap();
        assert_eq!(board.find_completed_lines().rows, vec![2]);

        let resolution = engine.resolve_clear(
            &board,
            &inventory,
            &RunSnapshot::default(),
            &mut ScriptedRolls::new(vec![]),
        );
        assert!(resolution.is_none());
    }

    #[test]
    fn test_context_counts_cleared_tags() {
        let engine = Engine::standard();
        let board = Board::new()
            .place(
                &Piece::bar(6)
                    .with_pattern(Pattern::Moss)
                    .with_seal_at(0, 4, Seal::Gold),
                0,
                0,
            )
            .unwrap();
        let completed = board.find_completed_lines();
        let cells = board.filter_clearable(&completed.cells_to_remove());
        let ctx = engine.build_context(
            &board,
            &completed,
            &cells,
            &RelicInventory::new(),
            &RunSnapshot {
                hands_remaining: 1,
                ..RunSnapshot::default()
            },
        );

        assert_eq!(ctx.pattern_count(Pattern::Moss), 6);
        assert_eq!(ctx.seal_count(Seal::Gold), 1);
        assert_eq!(ctx.cleared_block_count, 6);
        assert!(ctx.clears_board());
        assert_eq!(ctx.hands_remaining, 1);
    }

    #[test]
    fn test_commit_clear_stamps_then_clears() {
        let engine = Engine::standard();
        let board = Board::new()
            .place(
                &Piece::bar(6).with_blessing_at(0, 2, Blessing::Enhancement),
                5,
                0,
            )
            .unwrap();
        let resolution = engine
            .resolve_clear(
                &board,
                &RelicInventory::new(),
                &RunSnapshot::default(),
                &mut ScriptedRolls::new(vec![]),
            )
            .unwrap();

        let after = engine.commit_clear(&board, &resolution.clear_event);
        assert!(after.is_empty());
        let cell = after.cell(Position::new(5, 2));
        assert!(!cell.filled);
        assert_eq!(cell.buff_level(crate::cell::BuffKind::Enhancement), 1);
    }

    #[test]
    fn test_lines_cleared_event_lists_pattern_kinds() {
        let engine = Engine::standard();
        let board = Board::new()
            .place(&Piece::bar(3).with_pattern(Pattern::Aura), 0, 0)
            .unwrap()
            .place(&Piece::bar(3).with_pattern(Pattern::Enhanced), 0, 3)
            .unwrap();
        let clear_event = ClearEvent {
            rows: vec![0],
            cols: vec![],
            cells: (0..6).map(|col| Position::new(0, col)).collect(),
        };

        assert_eq!(
            engine.lines_cleared_event(&board, &clear_event),
            RelicEvent::LinesCleared {
                total_lines: 1,
                pattern_block_count: 6,
                cleared_pattern_types: vec![Pattern::Enhanced, Pattern::Aura],
            }
        );
    }
}
