//! Score composition.
//!
//! A clear scores `floor(A) x floor(B) + floor(F)` where A is block points,
//! B is line points and F is flat score. The steps run in a fixed order:
//!
//! 1. A = cleared blocks, B = completed lines
//! 2. A += pattern, seal and buff block bonuses (arrow included)
//! 3. additive relics
//! 4. B x lucky multiplier when any lucky roll succeeds
//! 5. B += pulsation buffs
//! 6. line-additive relics
//! 7. multiplicative relics
//! 8. F = score seals + flat relics
//! 9. floor each factor, multiply, add
//!
//! Relics within a track run in display order. Copy's mirrored step lands
//! right after its target because the target always sits directly before it.
//! Every relic's activation is computed once per clear.

use crate::board::{Board, CompletedLines};
use crate::cell::Position;
use crate::effects::{compute_cell_effects, roll_lucky, CellEffects, LuckyRoll};
use crate::relic::copy::resolve_copy;
use crate::relic::{
    RelicActivation, RelicEffectContext, RelicInventory, RelicRegistry, RelicType, RewardKind,
    ScoreEffect,
};
use crate::rng::RandomSource;
use crate::rules::ScoringRules;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// The cells a clear removes, and why
#[derive(Debug, Clone, Copy)]
pub struct ClearScope<'a> {
    /// Board as it stood when the lines were detected
    pub board: &'a Board,
    pub completed: &'a CompletedLines,
    /// Clearable cells of the completed lines
    pub cells: &'a BTreeSet<Position>,
}

/// One relic's contribution to the score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStep {
    pub relic: RelicType,
    /// Set on Copy's step to the relic it mirrored
    pub mirrored_from: Option<RelicType>,
    pub effect: ScoreEffect,
    pub value: f64,
    pub label: String,
    /// Running totals after this step
    pub block_points: f64,
    pub line_points: f64,
    pub flat_bonus: f64,
}

/// An active relic that does not touch the score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideEffect {
    pub relic: RelicType,
    pub mirrored_from: Option<RelicType>,
    pub reward: RewardKind,
    pub activation: RelicActivation,
}

/// Everything that went into one clear's score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_blocks: u32,
    pub base_lines: u32,
    pub cell_effects: CellEffects,
    pub lucky: LuckyRoll,
    pub steps: Vec<ScoreStep>,
    pub side_effects: Vec<SideEffect>,
    pub block_points: f64,
    pub line_points: f64,
    pub flat_bonus: f64,
    pub final_score: u64,
    /// Seals, prosperity buffs and gold-reward relics
    pub gold_earned: u32,
    pub hands_earned: u32,
}

struct Evaluated {
    relic: RelicType,
    mirrored_from: Option<RelicType>,
    effect: ScoreEffect,
    reward: RewardKind,
    activation: RelicActivation,
}

/// Evaluate every owned relic once, Copy in its slot
fn evaluate(
    registry: &RelicRegistry,
    inventory: &RelicInventory,
    ctx: &RelicEffectContext,
) -> Vec<Evaluated> {
    let mut evaluated = Vec::with_capacity(inventory.len());
    for &relic in inventory.display_order() {
        let Some(module) = registry.get(relic) else {
            continue;
        };

        if relic == RelicType::Copy {
            if let Some(copy) = resolve_copy(registry, inventory, ctx) {
                let reward = registry
                    .get(copy.target)
                    .map(|m| m.reward())
                    .unwrap_or(RewardKind::Nothing);
                evaluated.push(Evaluated {
                    relic,
                    mirrored_from: Some(copy.target),
                    effect: copy.score_effect,
                    reward,
                    activation: copy.activation,
                });
            }
            continue;
        }

        evaluated.push(Evaluated {
            relic,
            mirrored_from: None,
            effect: module.score_effect(),
            reward: module.reward(),
            activation: module.check_activation(ctx, inventory.state(relic)),
        });
    }
    evaluated
}

struct Accumulator {
    block_points: f64,
    line_points: f64,
    flat_bonus: f64,
    steps: Vec<ScoreStep>,
}

impl Accumulator {
    fn apply_track(&mut self, evaluated: &[Evaluated], effect: ScoreEffect) {
        for e in evaluated
            .iter()
            .filter(|e| e.effect == effect && e.activation.active)
        {
            let value = e.activation.value;
            match effect {
                ScoreEffect::Additive => self.block_points += value,
                ScoreEffect::LineAdditive => self.line_points += value,
                ScoreEffect::Multiplicative => self.line_points *= value,
                ScoreEffect::Flat => self.flat_bonus += value,
                ScoreEffect::None => continue,
            }
            debug!(
                relic = ?e.relic,
                mirrored_from = ?e.mirrored_from,
                ?effect,
                value,
                block_points = self.block_points,
                line_points = self.line_points,
                "relic applied"
            );
            self.steps.push(ScoreStep {
                relic: e.relic,
                mirrored_from: e.mirrored_from,
                effect,
                value,
                label: e.activation.label.clone(),
                block_points: self.block_points,
                line_points: self.line_points,
                flat_bonus: self.flat_bonus,
            });
        }
    }
}

fn floor_factor(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}

/// Compose the score of one clear
pub fn compose_score(
    registry: &RelicRegistry,
    inventory: &RelicInventory,
    scope: ClearScope<'_>,
    ctx: &RelicEffectContext,
    rules: &ScoringRules,
    rng: &mut dyn RandomSource,
) -> ScoreBreakdown {
    let base_blocks = scope.cells.len() as u32;
    let base_lines = scope.completed.total() as u32;
    let cell_effects = compute_cell_effects(scope.board, scope.cells, scope.completed, rules);
    let evaluated = evaluate(registry, inventory, ctx);

    let mut acc = Accumulator {
        block_points: f64::from(base_blocks + cell_effects.block_points()),
        line_points: f64::from(base_lines),
        flat_bonus: 0.0,
        steps: Vec::new(),
    };
    debug!(
        base_blocks,
        base_lines,
        block_points = acc.block_points,
        "base and cell effects"
    );

    acc.apply_track(&evaluated, ScoreEffect::Additive);

    let lucky = roll_lucky(scope.board, scope.cells, rules, rng);
    if lucky.succeeded() {
        acc.line_points *= rules.lucky_multiplier;
        debug!(successes = lucky.successes, line_points = acc.line_points, "lucky");
    }

    acc.line_points += cell_effects.buff_pulsation_bonus;
    acc.apply_track(&evaluated, ScoreEffect::LineAdditive);
    acc.apply_track(&evaluated, ScoreEffect::Multiplicative);

    acc.flat_bonus += f64::from(cell_effects.score_seal_bonus);
    acc.apply_track(&evaluated, ScoreEffect::Flat);

    let final_score = floor_factor(acc.block_points) * floor_factor(acc.line_points)
        + floor_factor(acc.flat_bonus);

    let side_effects: Vec<SideEffect> = evaluated
        .iter()
        .filter(|e| e.effect == ScoreEffect::None && e.activation.active)
        .map(|e| SideEffect {
            relic: e.relic,
            mirrored_from: e.mirrored_from,
            reward: e.reward,
            activation: e.activation.clone(),
        })
        .collect();
    let reward_total = |kind: RewardKind| -> u32 {
        side_effects
            .iter()
            .filter(|s| s.reward == kind)
            .map(|s| floor_factor(s.activation.value) as u32)
            .sum()
    };
    let gold_earned = cell_effects.gold(rules) + reward_total(RewardKind::Gold);
    let hands_earned = reward_total(RewardKind::Hands);

    debug!(
        block_points = acc.block_points,
        line_points = acc.line_points,
        flat_bonus = acc.flat_bonus,
        final_score,
        gold_earned,
        "score composed"
    );

    ScoreBreakdown {
        base_blocks,
        base_lines,
        cell_effects,
        lucky,
        steps: acc.steps,
        side_effects,
        block_points: acc.block_points,
        line_points: acc.line_points,
        flat_bonus: acc.flat_bonus,
        final_score,
        gold_earned,
        hands_earned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Pattern, Seal};
    use crate::piece::Piece;
    use crate::rng::ScriptedRolls;

    struct Fixture {
        board: Board,
        completed: CompletedLines,
        cells: BTreeSet<Position>,
    }

    impl Fixture {
        fn new(board: Board) -> Self {
            let completed = board.find_completed_lines();
            let cells = board.filter_clearable(&completed.cells_to_remove());
            Self {
                board,
                completed,
                cells,
            }
        }

        fn scope(&self) -> ClearScope<'_> {
            ClearScope {
                board: &self.board,
                completed: &self.completed,
                cells: &self.cells,
            }
        }

        fn ctx(&self) -> RelicEffectContext {
            RelicEffectContext {
                lines_cleared: self.completed.total() as u32,
                rows_cleared: self.completed.rows.len() as u32,
                cols_cleared: self.completed.cols.len() as u32,
                cleared_block_count: self.cells.len() as u32,
                board_fill_count: self.board.fill_count() as u32,
                hands_remaining: 2,
                ..RelicEffectContext::default()
            }
        }

        fn score(&self, relics: &[RelicType]) -> ScoreBreakdown {
            let registry = RelicRegistry::standard();
            let inventory = RelicInventory::from_relics(&registry, relics).unwrap();
            compose_score(
                &registry,
                &inventory,
                self.scope(),
                &self.ctx(),
                &ScoringRules::default(),
                &mut ScriptedRolls::new(vec![0.99]),
            )
        }
    }

    fn single_row() -> Fixture {
        Fixture::new(Board::new().place(&Piece::bar(6), 0, 0).unwrap())
    }

    #[test]
    fn test_single_row_scores_six() {
        let breakdown = single_row().score(&[]);
        assert_eq!(breakdown.base_blocks, 6);
        assert_eq!(breakdown.base_lines, 1);
        assert_eq!(breakdown.final_score, 6);
        assert!(breakdown.steps.is_empty());
    }

    #[test]
    fn test_two_rows_two_cols_scores_eighty() {
        let board = [0, 1]
            .into_iter()
            .fold(Board::new(), |b, row| b.place(&Piece::bar(6), row, 0).unwrap());
        let board = [0, 1]
            .into_iter()
            .fold(board, |b, col| b.place(&Piece::column(4), 2, col).unwrap());
        let breakdown = Fixture::new(board).score(&[]);
        assert_eq!(breakdown.base_blocks, 20);
        assert_eq!(breakdown.base_lines, 4);
        assert_eq!(breakdown.final_score, 80);
    }

    #[test]
    fn test_multiplier_floors_line_points_at_the_end() {
        let breakdown = single_row().score(&[RelicType::GlassCannon]);
        assert_eq!(breakdown.line_points, 1.5);
        assert_eq!(breakdown.final_score, 6);
    }

    #[test]
    fn test_none_relics_leave_score_alone() {
        let plain = single_row().score(&[]);
        let with_utility = single_row().score(&[
            RelicType::GoldenTouch,
            RelicType::PiggyBank,
            RelicType::Scavenger,
            RelicType::BonusPiece,
        ]);
        assert_eq!(plain.final_score, with_utility.final_score);
        assert!(with_utility.steps.is_empty());
    }

    #[test]
    fn test_additive_runs_before_multiplicative() {
        let board = Board::new()
            .place(&Piece::bar(6), 0, 0)
            .unwrap()
            .place(&Piece::bar(6), 1, 0)
            .unwrap();
        let breakdown = Fixture::new(board).score(&[
            RelicType::Overdrive,
            RelicType::TwinLines,
            RelicType::Minimalist,
        ]);
        // A = 12 + 15, B = 2 + 2; overdrive needs 3 lines
        assert_eq!(breakdown.block_points, 27.0);
        assert_eq!(breakdown.line_points, 4.0);
        assert_eq!(breakdown.final_score, 108);
        let order: Vec<RelicType> = breakdown.steps.iter().map(|s| s.relic).collect();
        assert_eq!(order, vec![RelicType::Minimalist, RelicType::TwinLines]);
    }

    #[test]
    fn test_copy_step_follows_target() {
        let breakdown = single_row().score(&[
            RelicType::GlassCannon,
            RelicType::Copy,
            RelicType::Minimalist,
        ]);
        let steps: Vec<(RelicType, Option<RelicType>)> = breakdown
            .steps
            .iter()
            .map(|s| (s.relic, s.mirrored_from))
            .collect();
        assert_eq!(
            steps,
            vec![
                (RelicType::Minimalist, None),
                (RelicType::GlassCannon, None),
                (RelicType::Copy, Some(RelicType::GlassCannon)),
            ]
        );
        assert_eq!(breakdown.line_points, 2.25);
        // 21 x 2
        assert_eq!(breakdown.final_score, 42);
    }

    #[test]
    fn test_lucky_success_doubles_line_points() {
        let board = Board::new()
            .place(&Piece::bar(6).with_pattern(Pattern::Lucky), 0, 0)
            .unwrap();
        let fixture = Fixture::new(board);
        let registry = RelicRegistry::standard();
        let mut rolls = ScriptedRolls::new(vec![0.9, 0.1, 0.9, 0.9, 0.9, 0.9]);
        let breakdown = compose_score(
            &registry,
            &RelicInventory::new(),
            fixture.scope(),
            &fixture.ctx(),
            &ScoringRules::default(),
            &mut rolls,
        );
        assert_eq!(rolls.draws(), 6);
        assert_eq!(breakdown.lucky.successes, 1);
        assert_eq!(breakdown.line_points, 2.0);
        assert_eq!(breakdown.final_score, 12);
    }

    #[test]
    fn test_score_seal_and_flat_relics_feed_flat_bonus() {
        let board = Board::new()
            .place(
                &Piece::bar(6)
                    .with_seal_at(0, 0, Seal::Score)
                    .with_seal_at(0, 1, Seal::Gold)
                    .with_seal_at(0, 2, Seal::Gold),
                0,
                0,
            )
            .unwrap();
        let fixture = Fixture::new(board);
        let mut ctx = fixture.ctx();
        ctx.seal_counts.insert(Seal::Gold, 2);
        ctx.seal_counts.insert(Seal::Score, 1);

        let registry = RelicRegistry::standard();
        let inventory =
            RelicInventory::from_relics(&registry, &[RelicType::Jackpot, RelicType::GoldenTouch])
                .unwrap();
        let breakdown = compose_score(
            &registry,
            &inventory,
            fixture.scope(),
            &ctx,
            &ScoringRules::default(),
            &mut ScriptedRolls::new(vec![]),
        );
        assert_eq!(breakdown.flat_bonus, 70.0);
        assert_eq!(breakdown.final_score, 6 + 70);
        // Two seals plus golden touch
        assert_eq!(breakdown.gold_earned, 4);
        assert_eq!(breakdown.side_effects.len(), 1);
    }
}
