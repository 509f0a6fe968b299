//! The concrete relics, grouped by the score track they feed.

pub mod block;
pub mod flat;
pub mod line;
pub mod multiplier;
pub mod utility;

use crate::relic::RelicModule;

/// One module per relic type, in catalog order
pub fn standard_modules() -> Vec<Box<dyn RelicModule>> {
    vec![
        Box::new(block::HeavyBlock),
        Box::new(block::SmallWonder),
        Box::new(block::Enhancer),
        Box::new(block::SealCollector),
        Box::new(block::Prism),
        Box::new(block::LastStand),
        Box::new(block::ThinDeck),
        Box::new(block::CrowdedHouse),
        Box::new(block::ChargeCoil),
        Box::new(block::Gardener),
        Box::new(block::Minimalist),
        Box::new(block::Goldsmith),
        Box::new(line::TwinLines),
        Box::new(line::RowSpecialist),
        Box::new(line::ColumnSpecialist),
        Box::new(line::Crossroads),
        Box::new(line::PatternScholar),
        Box::new(line::Veteran),
        Box::new(line::LuckyCharm),
        Box::new(line::Arrowhead),
        Box::new(multiplier::Streak),
        Box::new(multiplier::Combo),
        Box::new(multiplier::Overdrive),
        Box::new(multiplier::GlassCannon),
        Box::new(multiplier::Desperado),
        Box::new(multiplier::CleanSweep),
        Box::new(multiplier::Stoneheart),
        Box::new(multiplier::Snowball),
        Box::new(multiplier::Purist),
        Box::new(multiplier::HandSaver),
        Box::new(flat::Megaclear),
        Box::new(flat::Jackpot),
        Box::new(utility::GoldenTouch),
        Box::new(utility::PiggyBank),
        Box::new(utility::ExtraHand),
        Box::new(utility::BonusPiece),
        Box::new(utility::Scavenger),
        Box::new(utility::CopyRelic),
    ]
}
