//! Relics that add line points.

use crate::cell::{Pattern, Seal};
use crate::relic::state::{LineTallyState, PatternLogState};
use crate::relic::{
    Rarity, RelicActivation, RelicDefinition, RelicEffectContext, RelicEvent, RelicModule,
    RelicState, RelicType, ScoreEffect,
};

pub struct TwinLines;

impl RelicModule for TwinLines {
    fn relic_type(&self) -> RelicType {
        RelicType::TwinLines
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Twin Lines",
            description: "+2 line points when 2 or more lines clear at once",
            rarity: Rarity::Common,
            price: 4,
            icon: "twins",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::LineAdditive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::when(ctx.lines_cleared >= 2, 2.0, "+2 lines")
    }
}

pub struct RowSpecialist;

impl RelicModule for RowSpecialist {
    fn relic_type(&self) -> RelicType {
        RelicType::RowSpecialist
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Row Specialist",
            description: "+1 line point per row when only rows clear",
            rarity: Rarity::Common,
            price: 4,
            icon: "rows",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::LineAdditive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let rows = ctx.rows_cleared as f64;
        RelicActivation::when(
            ctx.rows_cleared > 0 && ctx.cols_cleared == 0,
            rows,
            format!("+{rows} lines"),
        )
    }
}

pub struct ColumnSpecialist;

impl RelicModule for ColumnSpecialist {
    fn relic_type(&self) -> RelicType {
        RelicType::ColumnSpecialist
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Column Specialist",
            description: "+1 line point per column when only columns clear",
            rarity: Rarity::Common,
            price: 4,
            icon: "columns",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::LineAdditive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let cols = ctx.cols_cleared as f64;
        RelicActivation::when(
            ctx.cols_cleared > 0 && ctx.rows_cleared == 0,
            cols,
            format!("+{cols} lines"),
        )
    }
}

pub struct Crossroads;

impl RelicModule for Crossroads {
    fn relic_type(&self) -> RelicType {
        RelicType::Crossroads
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Crossroads",
            description: "+3 line points when rows and columns clear together",
            rarity: Rarity::Uncommon,
            price: 6,
            icon: "signpost",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::LineAdditive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::when(
            ctx.rows_cleared > 0 && ctx.cols_cleared > 0,
            3.0,
            "+3 lines",
        )
    }
}

/// +0.5 line points per distinct pattern kind cleared this round
pub struct PatternScholar;

const SCHOLAR_PER_PATTERN: f64 = 0.5;

impl RelicModule for PatternScholar {
    fn relic_type(&self) -> RelicType {
        RelicType::PatternScholar
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Pattern Scholar",
            description: "+0.5 line points for every distinct pattern cleared this round",
            rarity: Rarity::Rare,
            price: 7,
            icon: "book",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::LineAdditive
    }

    fn check_activation(&self, _ctx: &RelicEffectContext, state: &RelicState) -> RelicActivation {
        let seen = state.pattern_log().seen.len();
        let value = seen as f64 * SCHOLAR_PER_PATTERN;
        RelicActivation::when(seen > 0, value, format!("+{value} lines"))
    }

    fn initial_state(&self) -> RelicState {
        RelicState::PatternLog(PatternLogState::default())
    }

    fn update_state(&self, state: &RelicState, event: &RelicEvent) -> RelicState {
        match event {
            RelicEvent::LinesCleared {
                cleared_pattern_types,
                ..
            } => {
                let mut log = state.pattern_log();
                log.seen.extend(
                    cleared_pattern_types
                        .iter()
                        .copied()
                        .filter(|p| !p.is_negative()),
                );
                RelicState::PatternLog(log)
            }
            _ => state.clone(),
        }
    }
}

/// +0.5 line points per 10 lines ever cleared; never resets
pub struct Veteran;

const VETERAN_LINES_PER_STEP: u32 = 10;
const VETERAN_PER_STEP: f64 = 0.5;

impl RelicModule for Veteran {
    fn relic_type(&self) -> RelicType {
        RelicType::Veteran
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Veteran",
            description: "+0.5 line points for every 10 lines cleared this run",
            rarity: Rarity::Rare,
            price: 8,
            icon: "medal",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::LineAdditive
    }

    fn check_activation(&self, _ctx: &RelicEffectContext, state: &RelicState) -> RelicActivation {
        let steps = state.line_tally().lines / VETERAN_LINES_PER_STEP;
        let value = steps as f64 * VETERAN_PER_STEP;
        RelicActivation::when(steps > 0, value, format!("+{value} lines"))
    }

    fn initial_state(&self) -> RelicState {
        RelicState::LineTally(LineTallyState::default())
    }

    fn update_state(&self, state: &RelicState, event: &RelicEvent) -> RelicState {
        match event {
            RelicEvent::LinesCleared { total_lines, .. } => {
                let tally = state.line_tally();
                RelicState::LineTally(LineTallyState {
                    lines: tally.lines + total_lines,
                })
            }
            _ => state.clone(),
        }
    }

    fn persists_across_rounds(&self) -> bool {
        true
    }
}

pub struct LuckyCharm;

impl RelicModule for LuckyCharm {
    fn relic_type(&self) -> RelicType {
        RelicType::LuckyCharm
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Lucky Charm",
            description: "+1 line point for every lucky block cleared",
            rarity: Rarity::Uncommon,
            price: 5,
            icon: "clover",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::LineAdditive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let count = ctx.pattern_count(Pattern::Lucky);
        RelicActivation::when(count > 0, count as f64, format!("+{count} lines"))
    }
}

pub struct Arrowhead;

impl RelicModule for Arrowhead {
    fn relic_type(&self) -> RelicType {
        RelicType::Arrowhead
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Arrowhead",
            description: "+1 line point for every arrow-sealed block cleared",
            rarity: Rarity::Uncommon,
            price: 5,
            icon: "arrow",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::LineAdditive
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let count = ctx.seal_count(Seal::ArrowRow) + ctx.seal_count(Seal::ArrowColumn);
        RelicActivation::when(count > 0, count as f64, format!("+{count} lines"))
    }
}
