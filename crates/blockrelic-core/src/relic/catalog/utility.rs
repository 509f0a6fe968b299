//! Economy and utility relics. None of these ever change the score.

use crate::cell::Seal;
use crate::relic::state::{CopyState, PieceCounterState};
use crate::relic::{
    Rarity, RelicActivation, RelicDefinition, RelicEffectContext, RelicEvent, RelicModule,
    RelicRequest, RelicState, RelicType, RewardKind, ScoreEffect,
};

/// +1 gold per gold seal cleared
pub struct GoldenTouch;

impl RelicModule for GoldenTouch {
    fn relic_type(&self) -> RelicType {
        RelicType::GoldenTouch
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Golden Touch",
            description: "Gold seals pay 1 extra gold when cleared",
            rarity: Rarity::Common,
            price: 5,
            icon: "hand",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::None
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let gold = ctx.seal_count(Seal::Gold);
        RelicActivation::when(gold > 0, gold as f64, format!("+{gold} gold"))
    }

    fn reward(&self) -> RewardKind {
        RewardKind::Gold
    }
}

/// +3 gold at the start of every round
pub struct PiggyBank;

const PIGGY_BANK_GOLD: u32 = 3;

impl RelicModule for PiggyBank {
    fn relic_type(&self) -> RelicType {
        RelicType::PiggyBank
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Piggy Bank",
            description: "Gain 3 gold at the start of every round",
            rarity: Rarity::Common,
            price: 4,
            icon: "piggy",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::None
    }

    fn check_activation(&self, _ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::inactive()
    }

    fn on_round_start(&self, _state: &RelicState) -> Option<RelicRequest> {
        Some(RelicRequest::GrantGold {
            amount: PIGGY_BANK_GOLD,
        })
    }
}

pub struct ExtraHand;

impl RelicModule for ExtraHand {
    fn relic_type(&self) -> RelicType {
        RelicType::ExtraHand
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Extra Hand",
            description: "+1 hand every round",
            rarity: Rarity::Rare,
            price: 8,
            icon: "glove",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::None
    }

    fn check_activation(&self, _ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::inactive()
    }

    fn on_round_start(&self, _state: &RelicState) -> Option<RelicRequest> {
        Some(RelicRequest::GrantHands { amount: 1 })
    }
}

/// Every 5th piece placed in a round injects a bonus piece into the hand
pub struct BonusPiece;

const BONUS_PIECE_EVERY: u32 = 5;

impl RelicModule for BonusPiece {
    fn relic_type(&self) -> RelicType {
        RelicType::BonusPiece
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Bonus Piece",
            description: "Every 5th piece placed in a round adds a bonus piece to your hand",
            rarity: Rarity::Uncommon,
            price: 6,
            icon: "gift",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::None
    }

    fn check_activation(&self, _ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::inactive()
    }

    fn initial_state(&self) -> RelicState {
        RelicState::PieceCounter(PieceCounterState::default())
    }

    fn update_state(&self, state: &RelicState, event: &RelicEvent) -> RelicState {
        match event {
            RelicEvent::HandConsumed { .. } => RelicState::PieceCounter(PieceCounterState {
                placed: state.piece_counter().placed + 1,
            }),
            _ => state.clone(),
        }
    }

    fn on_piece_placed(&self, state: &RelicState, _placed_block_size: u32) -> Option<RelicRequest> {
        let placed = state.piece_counter().placed;
        (placed > 0 && placed % BONUS_PIECE_EVERY == 0).then_some(RelicRequest::InjectBonusPiece)
    }
}

/// +1 gold per line on clears of 2 lines or more
pub struct Scavenger;

impl RelicModule for Scavenger {
    fn relic_type(&self) -> RelicType {
        RelicType::Scavenger
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Scavenger",
            description: "Gain 1 gold per line when 2 or more lines clear at once",
            rarity: Rarity::Common,
            price: 4,
            icon: "magnet",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::None
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::when(
            ctx.lines_cleared >= 2,
            ctx.lines_cleared as f64,
            format!("+{} gold", ctx.lines_cleared),
        )
    }

    fn reward(&self) -> RewardKind {
        RewardKind::Gold
    }
}

/// Mirrors the relic directly before it in display order.
///
/// Copy contributes nothing by itself; the scoring pipeline resolves its
/// mirrored activation through [`crate::relic::copy`].
pub struct CopyRelic;

impl RelicModule for CopyRelic {
    fn relic_type(&self) -> RelicType {
        RelicType::Copy
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Copy",
            description: "Copies the effect of the relic to its left",
            rarity: Rarity::Legendary,
            price: 10,
            icon: "mirror",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::None
    }

    fn check_activation(&self, _ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::inactive()
    }

    fn initial_state(&self) -> RelicState {
        RelicState::Copy(CopyState::default())
    }
}
