//! Relics that add score after the block x line multiplication.

use crate::cell::Seal;
use crate::relic::{
    Rarity, RelicActivation, RelicDefinition, RelicEffectContext, RelicModule, RelicState,
    RelicType, ScoreEffect,
};

/// Cleared blocks x5 as flat score on clears of 12 blocks or more
pub struct Megaclear;

const MEGACLEAR_MIN_BLOCKS: u32 = 12;
const MEGACLEAR_PER_BLOCK: f64 = 5.0;

impl RelicModule for Megaclear {
    fn relic_type(&self) -> RelicType {
        RelicType::Megaclear
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Megaclear",
            description: "+5 score per cleared block when 12 or more blocks clear at once",
            rarity: Rarity::Rare,
            price: 7,
            icon: "explosion",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Flat
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let value = ctx.cleared_block_count as f64 * MEGACLEAR_PER_BLOCK;
        RelicActivation::when(
            ctx.cleared_block_count >= MEGACLEAR_MIN_BLOCKS,
            value,
            format!("+{value} score"),
        )
    }
}

/// +25 score per gold seal once two or more clear together
pub struct Jackpot;

impl RelicModule for Jackpot {
    fn relic_type(&self) -> RelicType {
        RelicType::Jackpot
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Jackpot",
            description: "+25 score per gold seal when 2 or more gold seals clear at once",
            rarity: Rarity::Uncommon,
            price: 6,
            icon: "slot",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Flat
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let gold = ctx.seal_count(Seal::Gold);
        let value = gold as f64 * 25.0;
        RelicActivation::when(gold >= 2, value, format!("+{value} score"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_megaclear_threshold() {
        let small = RelicEffectContext {
            cleared_block_count: 11,
            ..RelicEffectContext::default()
        };
        let big = RelicEffectContext {
            cleared_block_count: 20,
            ..RelicEffectContext::default()
        };
        assert!(!Megaclear.check_activation(&small, &RelicState::Stateless).active);
        assert_eq!(
            Megaclear.check_activation(&big, &RelicState::Stateless).value,
            100.0
        );
    }

    #[test]
    fn test_jackpot_needs_two_gold_seals() {
        let one = RelicEffectContext {
            seal_counts: BTreeMap::from([(Seal::Gold, 1)]),
            ..RelicEffectContext::default()
        };
        let three = RelicEffectContext {
            seal_counts: BTreeMap::from([(Seal::Gold, 3)]),
            ..RelicEffectContext::default()
        };
        assert!(!Jackpot.check_activation(&one, &RelicState::Stateless).active);
        assert_eq!(
            Jackpot.check_activation(&three, &RelicState::Stateless).value,
            75.0
        );
    }
}
