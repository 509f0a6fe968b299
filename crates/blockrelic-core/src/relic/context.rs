//! Read-only snapshot handed to relic activation checks.

use crate::cell::{Pattern, Seal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything a relic may look at when deciding whether it fires.
///
/// Counts of patterns and seals cover the cleared set only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelicEffectContext {
    pub lines_cleared: u32,
    pub rows_cleared: u32,
    pub cols_cleared: u32,
    /// Blocks in the piece that triggered this clear
    pub placed_block_count: u32,
    pub cleared_block_count: u32,
    pub pattern_counts: BTreeMap<Pattern, u32>,
    pub seal_counts: BTreeMap<Seal, u32>,
    /// Stone seals anywhere on the board
    pub stones_on_board: u32,
    pub hands_remaining: u32,
    pub discards_remaining: u32,
    pub deck_size: u32,
    /// Filled cells before the clear is committed
    pub board_fill_count: u32,
    pub round: u32,
    pub gold: u32,
    pub relic_count: u32,
}

impl RelicEffectContext {
    pub fn pattern_count(&self, pattern: Pattern) -> u32 {
        self.pattern_counts.get(&pattern).copied().unwrap_or(0)
    }

    pub fn seal_count(&self, seal: Seal) -> u32 {
        self.seal_counts.get(&seal).copied().unwrap_or(0)
    }

    /// Distinct pattern kinds among the cleared blocks
    pub fn distinct_patterns(&self) -> u32 {
        self.pattern_counts.values().filter(|&&n| n > 0).count() as u32
    }

    pub fn patterned_block_count(&self) -> u32 {
        self.pattern_counts.values().sum()
    }

    pub fn sealed_block_count(&self) -> u32 {
        self.seal_counts.values().sum()
    }

    /// Whether the clear empties the board entirely
    pub fn clears_board(&self) -> bool {
        self.board_fill_count > 0 && self.board_fill_count == self.cleared_block_count
    }

    /// Whether this is the last hand of the round
    pub fn is_last_hand(&self) -> bool {
        self.hands_remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_default_to_zero() {
        let ctx = RelicEffectContext::default();
        assert_eq!(ctx.pattern_count(Pattern::Lucky), 0);
        assert_eq!(ctx.seal_count(Seal::Gold), 0);
        assert_eq!(ctx.distinct_patterns(), 0);
        assert!(!ctx.clears_board());
    }

    #[test]
    fn test_distinct_patterns_ignores_zero_entries() {
        let ctx = RelicEffectContext {
            pattern_counts: BTreeMap::from([
                (Pattern::Lucky, 2),
                (Pattern::Moss, 0),
                (Pattern::Aura, 1),
            ]),
            ..RelicEffectContext::default()
        };
        assert_eq!(ctx.distinct_patterns(), 2);
        assert_eq!(ctx.patterned_block_count(), 3);
    }
}
