//! Tunable scoring constants.

use serde::{Deserialize, Serialize};

/// Scoring constants shared by the cell effect handlers and the pipeline.
///
/// Missing fields deserialize to their defaults, so a config file only needs
/// to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Block points per enhanced block
    pub enhanced_bonus: u32,
    /// Block points per filled neighbour of an aura block
    pub aura_bonus: u32,
    /// Block points per moss cell on the board, for each moss block cleared
    pub moss_bonus: u32,
    /// Block points per arrow seal whose line orientation matched
    pub arrow_bonus: u32,
    /// Flat score per score seal, added after the multiplication
    pub score_seal_bonus: u32,
    /// Gold per gold seal cleared
    pub gold_per_seal: u32,
    /// Chance each lucky block's roll succeeds
    pub lucky_chance: f64,
    /// Line points multiplier when any lucky roll succeeds
    pub lucky_multiplier: f64,
    /// Block points per level of an enhancement buff
    pub buff_enhancement_per_level: u32,
    /// Line points per level of a pulsation buff
    pub buff_pulsation_per_level: f64,
    /// Gold per level of a prosperity buff
    pub prosperity_gold_per_level: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            enhanced_bonus: 2,
            aura_bonus: 1,
            moss_bonus: 1,
            arrow_bonus: 3,
            score_seal_bonus: 20,
            gold_per_seal: 1,
            lucky_chance: 0.25,
            lucky_multiplier: 2.0,
            buff_enhancement_per_level: 1,
            buff_pulsation_per_level: 0.5,
            prosperity_gold_per_level: 1,
        }
    }
}
