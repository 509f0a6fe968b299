//! Relics that add block points.

use crate::cell::Pattern;
use crate::relic::{
    Rarity, RelicActivation, RelicDefinition, RelicEffectContext, RelicModule, RelicState,
    RelicType, ScoreEffect,
};

/// +10 when the placed piece has 5 or more blocks
pub struct HeavyBlock;

impl RelicModule for HeavyBlock {
    fn relic_type(&self) -> RelicType {
        RelicType::HeavyBlock
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Heavy Block",
            description: "+10 block points when the placed piece has 5 or more blocks",
            rarity: Rarity::Common,
            price: 4,
            icon: "anvil",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Additive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::when(ctx.placed_block_count >= 5, 10.0, "+10")
    }
}

/// +8 when the placed piece has at most 2 blocks
pub struct SmallWonder;

impl RelicModule for SmallWonder {
    fn relic_type(&self) -> RelicType {
        RelicType::SmallWonder
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Small Wonder",
            description: "+8 block points when the placed piece has 2 or fewer blocks",
            rarity: Rarity::Common,
            price: 4,
            icon: "pebble",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Additive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::when(
            ctx.placed_block_count > 0 && ctx.placed_block_count <= 2,
            8.0,
            "+8",
        )
    }
}

pub struct Enhancer;

impl RelicModule for Enhancer {
    fn relic_type(&self) -> RelicType {
        RelicType::Enhancer
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Enhancer",
            description: "+3 block points for every enhanced block cleared",
            rarity: Rarity::Common,
            price: 5,
            icon: "spark",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Additive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let count = ctx.pattern_count(Pattern::Enhanced);
        let value = count as f64 * 3.0;
        RelicActivation::when(count > 0, value, format!("+{value}"))
    }
}

pub struct SealCollector;

impl RelicModule for SealCollector {
    fn relic_type(&self) -> RelicType {
        RelicType::SealCollector
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Seal Collector",
            description: "+2 block points for every sealed block cleared",
            rarity: Rarity::Uncommon,
            price: 6,
            icon: "wax",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Additive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let count = ctx.sealed_block_count();
        let value = count as f64 * 2.0;
        RelicActivation::when(count > 0, value, format!("+{value}"))
    }
}

/// +4 for each distinct pattern kind in the clear
pub struct Prism;

impl RelicModule for Prism {
    fn relic_type(&self) -> RelicType {
        RelicType::Prism
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Prism",
            description: "+4 block points for every distinct pattern among cleared blocks",
            rarity: Rarity::Uncommon,
            price: 6,
            icon: "prism",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Additive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let kinds = ctx.distinct_patterns();
        let value = kinds as f64 * 4.0;
        RelicActivation::when(kinds > 0, value, format!("+{value}"))
    }
}

pub struct LastStand;

impl RelicModule for LastStand {
    fn relic_type(&self) -> RelicType {
        RelicType::LastStand
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Last Stand",
            description: "+20 block points on the last hand of the round",
            rarity: Rarity::Uncommon,
            price: 5,
            icon: "flag",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Additive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::when(ctx.is_last_hand(), 20.0, "+20")
    }
}

/// +2 for every card the deck is short of 15
pub struct ThinDeck;

const THIN_DECK_THRESHOLD: u32 = 15;

impl RelicModule for ThinDeck {
    fn relic_type(&self) -> RelicType {
        RelicType::ThinDeck
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Thin Deck",
            description: "+2 block points for every card below 15 left in the deck",
            rarity: Rarity::Uncommon,
            price: 5,
            icon: "cards",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Additive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let missing = THIN_DECK_THRESHOLD.saturating_sub(ctx.deck_size);
        let value = missing as f64 * 2.0;
        RelicActivation::when(missing > 0, value, format!("+{value}"))
    }
}

/// +1 for every filled cell beyond 18 when the lines are detected
pub struct CrowdedHouse;

const CROWDED_THRESHOLD: u32 = 18;

impl RelicModule for CrowdedHouse {
    fn relic_type(&self) -> RelicType {
        RelicType::CrowdedHouse
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Crowded House",
            description: "+1 block point for every filled cell beyond 18",
            rarity: Rarity::Common,
            price: 4,
            icon: "house",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Additive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let extra = ctx.board_fill_count.saturating_sub(CROWDED_THRESHOLD);
        RelicActivation::when(extra > 0, extra as f64, format!("+{extra}"))
    }
}

pub struct ChargeCoil;

impl RelicModule for ChargeCoil {
    fn relic_type(&self) -> RelicType {
        RelicType::ChargeCoil
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Charge Coil",
            description: "+2 block points for every charge block cleared",
            rarity: Rarity::Common,
            price: 4,
            icon: "coil",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Additive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let count = ctx.pattern_count(Pattern::Charge);
        let value = count as f64 * 2.0;
        RelicActivation::when(count > 0, value, format!("+{value}"))
    }
}

pub struct Gardener;

impl RelicModule for Gardener {
    fn relic_type(&self) -> RelicType {
        RelicType::Gardener
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Gardener",
            description: "+3 block points for every moss block cleared",
            rarity: Rarity::Common,
            price: 4,
            icon: "trowel",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Additive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let count = ctx.pattern_count(Pattern::Moss);
        let value = count as f64 * 3.0;
        RelicActivation::when(count > 0, value, format!("+{value}"))
    }
}

/// +15 while owning 3 relics or fewer (itself included)
pub struct Minimalist;

impl RelicModule for Minimalist {
    fn relic_type(&self) -> RelicType {
        RelicType::Minimalist
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Minimalist",
            description: "+15 block points while you own 3 relics or fewer",
            rarity: Rarity::Uncommon,
            price: 5,
            icon: "circle",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Additive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::when(ctx.relic_count <= 3, 15.0, "+15")
    }
}

/// +1 for every 5 gold held
pub struct Goldsmith;

impl RelicModule for Goldsmith {
    fn relic_type(&self) -> RelicType {
        RelicType::Goldsmith
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Goldsmith",
            description: "+1 block point for every 5 gold you hold",
            rarity: Rarity::Rare,
            price: 7,
            icon: "ingot",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Additive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let value = (ctx.gold / 5) as f64;
        RelicActivation::when(value > 0.0, value, format!("+{value}"))
    }
}
