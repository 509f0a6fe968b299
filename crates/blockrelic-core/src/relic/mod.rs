//! Relics: persistent upgrades that modify scoring.
//!
//! Every relic is a [`RelicModule`] implementation registered under its
//! [`RelicType`]. The scoring pipeline and the lifecycle dispatcher only ever
//! talk to the trait, so adding a relic means adding one catalog entry.
//!
//! # Modules
//!
//! - [`context`]: read-only snapshot handed to activation checks
//! - [`event`]: lifecycle events that drive relic state
//! - [`state`]: typed per-relic state and the state store
//! - [`inventory`]: owned relics in display order
//! - [`registry`]: lookup table from relic type to module
//! - [`copy`]: the Copy relic's mirroring rules
//! - [`catalog`]: the concrete relics

pub mod catalog;
pub mod context;
pub mod copy;
pub mod event;
pub mod inventory;
pub mod registry;
pub mod state;

use serde::{Deserialize, Serialize};

pub use context::RelicEffectContext;
pub use event::RelicEvent;
pub use inventory::{InventoryError, RelicInventory};
pub use registry::RelicRegistry;
pub use state::{RelicState, RelicStates};

/// Every relic kind in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelicType {
    // ==================== Block points ====================
    HeavyBlock,
    SmallWonder,
    Enhancer,
    SealCollector,
    Prism,
    LastStand,
    ThinDeck,
    CrowdedHouse,
    ChargeCoil,
    Gardener,
    Minimalist,
    Goldsmith,

    // ==================== Line points ====================
    TwinLines,
    RowSpecialist,
    ColumnSpecialist,
    Crossroads,
    PatternScholar,
    Veteran,
    LuckyCharm,
    Arrowhead,

    // ==================== Multipliers ====================
    Streak,
    Combo,
    Overdrive,
    GlassCannon,
    Desperado,
    CleanSweep,
    Stoneheart,
    Snowball,
    Purist,
    HandSaver,

    // ==================== Flat score ====================
    Megaclear,
    Jackpot,

    // ==================== Economy and utility ====================
    GoldenTouch,
    PiggyBank,
    ExtraHand,
    BonusPiece,
    Scavenger,
    Copy,
}

impl RelicType {
    /// All relic types in catalog order
    pub const ALL: [RelicType; 38] = [
        RelicType::HeavyBlock,
        RelicType::SmallWonder,
        RelicType::Enhancer,
        RelicType::SealCollector,
        RelicType::Prism,
        RelicType::LastStand,
        RelicType::ThinDeck,
        RelicType::CrowdedHouse,
        RelicType::ChargeCoil,
        RelicType::Gardener,
        RelicType::Minimalist,
        RelicType::Goldsmith,
        RelicType::TwinLines,
        RelicType::RowSpecialist,
        RelicType::ColumnSpecialist,
        RelicType::Crossroads,
        RelicType::PatternScholar,
        RelicType::Veteran,
        RelicType::LuckyCharm,
        RelicType::Arrowhead,
        RelicType::Streak,
        RelicType::Combo,
        RelicType::Overdrive,
        RelicType::GlassCannon,
        RelicType::Desperado,
        RelicType::CleanSweep,
        RelicType::Stoneheart,
        RelicType::Snowball,
        RelicType::Purist,
        RelicType::HandSaver,
        RelicType::Megaclear,
        RelicType::Jackpot,
        RelicType::GoldenTouch,
        RelicType::PiggyBank,
        RelicType::ExtraHand,
        RelicType::BonusPiece,
        RelicType::Scavenger,
        RelicType::Copy,
    ];
}

/// Which scalar a relic's value feeds, and with which operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreEffect {
    /// Never touches the score
    None,
    /// Added to block points
    Additive,
    /// Multiplies line points
    Multiplicative,
    /// Added to line points
    LineAdditive,
    /// Added to the final score after the multiplication
    Flat,
}

/// What the session does with a `ScoreEffect::None` relic's active value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Nothing,
    Gold,
    Hands,
}

/// Shop rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// Display metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelicDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub price: u32,
    pub icon: &'static str,
}

/// Result of a relic's activation check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelicActivation {
    pub active: bool,
    pub value: f64,
    pub label: String,
}

impl RelicActivation {
    pub fn inactive() -> Self {
        Self {
            active: false,
            value: 0.0,
            label: String::new(),
        }
    }

    pub fn active(value: f64, label: impl Into<String>) -> Self {
        Self {
            active: true,
            value,
            label: label.into(),
        }
    }

    /// Active with `value` when `condition` holds, inactive otherwise
    pub fn when(condition: bool, value: f64, label: impl Into<String>) -> Self {
        if condition {
            Self::active(value, label)
        } else {
            Self::inactive()
        }
    }
}

/// How the Copy relic reads state when mirroring this relic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorPolicy {
    /// Copy evaluates against the original's state
    SharedState,
    /// Copy keeps and advances its own counter
    OwnCounter,
}

/// A side effect a relic asks the host to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelicRequest {
    InjectBonusPiece,
    GrantHands { amount: u32 },
    GrantGold { amount: u32 },
}

/// The contract every relic implements
pub trait RelicModule: Send + Sync {
    fn relic_type(&self) -> RelicType;

    fn definition(&self) -> RelicDefinition;

    fn score_effect(&self) -> ScoreEffect;

    /// Pure check against the current snapshot and this relic's state
    fn check_activation(&self, ctx: &RelicEffectContext, state: &RelicState) -> RelicActivation;

    fn initial_state(&self) -> RelicState {
        RelicState::Stateless
    }

    /// Fold a lifecycle event into the state; unknown events pass through
    fn update_state(&self, state: &RelicState, _event: &RelicEvent) -> RelicState {
        state.clone()
    }

    /// Called after `hand_consumed` has been folded into `state`
    fn on_piece_placed(&self, _state: &RelicState, _placed_block_size: u32) -> Option<RelicRequest> {
        None
    }

    /// Called with the state the round ended with, before any reset
    fn on_round_start(&self, _state: &RelicState) -> Option<RelicRequest> {
        None
    }

    /// Relics that keep their state through `round_start`
    fn persists_across_rounds(&self) -> bool {
        false
    }

    fn mirror_policy(&self) -> MirrorPolicy {
        MirrorPolicy::SharedState
    }

    fn reward(&self) -> RewardKind {
        RewardKind::Nothing
    }
}
