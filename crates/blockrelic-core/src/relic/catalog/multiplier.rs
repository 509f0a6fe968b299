//! Relics that multiply line points.
//!
//! `Streak` and `Combo` are counter relics: their multiplier depends on the
//! shape of recent clears, folded in at `lines_detected` time. The Copy relic
//! keeps its own instance of their counters.

use crate::relic::event::ClearOrientation;
use crate::relic::state::{ComboState, RoundTallyState, StreakState};
use crate::relic::{
    MirrorPolicy, Rarity, RelicActivation, RelicDefinition, RelicEffectContext, RelicEvent,
    RelicModule, RelicState, RelicType, ScoreEffect,
};

/// x(1 + 0.5 per repeat) for consecutive clears in the same orientation.
///
/// A cross clear (rows and columns at once) breaks the streak.
pub struct Streak;

const STREAK_STEP: f64 = 0.5;

impl RelicModule for Streak {
    fn relic_type(&self) -> RelicType {
        RelicType::Streak
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Streak",
            description: "x0.5 more line points for each consecutive clear in the same direction; \
                          clearing rows and columns together resets it",
            rarity: Rarity::Rare,
            price: 8,
            icon: "flame",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Multiplicative
    }

    fn check_activation(&self, _ctx: &RelicEffectContext, state: &RelicState) -> RelicActivation {
        let streak = state.streak();
        let value = 1.0 + STREAK_STEP * streak.count.saturating_sub(1) as f64;
        RelicActivation::when(streak.count >= 2, value, format!("x{value}"))
    }

    fn initial_state(&self) -> RelicState {
        RelicState::Streak(StreakState::default())
    }

    fn update_state(&self, state: &RelicState, event: &RelicEvent) -> RelicState {
        let current = state.streak();
        let next = match event.orientation() {
            None => return state.clone(),
            Some(ClearOrientation::Cross) => StreakState::default(),
            Some(orientation) if current.orientation == Some(orientation) => StreakState {
                orientation: Some(orientation),
                count: current.count + 1,
            },
            Some(orientation) => StreakState {
                orientation: Some(orientation),
                count: 1,
            },
        };
        RelicState::Streak(next)
    }

    fn mirror_policy(&self) -> MirrorPolicy {
        MirrorPolicy::OwnCounter
    }
}

/// x(1 + 0.25 per extra hand) while every hand keeps clearing
pub struct Combo;

const COMBO_STEP: f64 = 0.25;

impl RelicModule for Combo {
    fn relic_type(&self) -> RelicType {
        RelicType::Combo
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Combo",
            description: "x0.25 more line points for each consecutive hand that clears a line",
            rarity: Rarity::Uncommon,
            price: 6,
            icon: "chain",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Multiplicative
    }

    fn check_activation(&self, _ctx: &RelicEffectContext, state: &RelicState) -> RelicActivation {
        let combo = state.combo();
        let value = 1.0 + COMBO_STEP * combo.chain.saturating_sub(1) as f64;
        RelicActivation::when(combo.chain >= 2, value, format!("x{value}"))
    }

    fn initial_state(&self) -> RelicState {
        RelicState::Combo(ComboState::default())
    }

    fn update_state(&self, state: &RelicState, event: &RelicEvent) -> RelicState {
        let combo = state.combo();
        match event {
            RelicEvent::HandConsumed { .. } => RelicState::Combo(ComboState {
                chain: if combo.cleared_this_hand { combo.chain } else { 0 },
                cleared_this_hand: false,
            }),
            RelicEvent::LinesDetected { total_lines, .. } if *total_lines > 0 => {
                RelicState::Combo(ComboState {
                    chain: combo.chain + 1,
                    cleared_this_hand: true,
                })
            }
            _ => state.clone(),
        }
    }

    fn mirror_policy(&self) -> MirrorPolicy {
        MirrorPolicy::OwnCounter
    }
}

pub struct Overdrive;

impl RelicModule for Overdrive {
    fn relic_type(&self) -> RelicType {
        RelicType::Overdrive
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Overdrive",
            description: "x2 line points when 3 or more lines clear at once",
            rarity: Rarity::Rare,
            price: 8,
            icon: "gauge",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Multiplicative
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::when(ctx.lines_cleared >= 3, 2.0, "x2")
    }
}

pub struct GlassCannon;

impl RelicModule for GlassCannon {
    fn relic_type(&self) -> RelicType {
        RelicType::GlassCannon
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Glass Cannon",
            description: "x1.5 line points on every clear",
            rarity: Rarity::Uncommon,
            price: 7,
            icon: "cannon",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Multiplicative
    }

    fn check_activation(&self, _ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::active(1.5, "x1.5")
    }
}

pub struct Desperado;

impl RelicModule for Desperado {
    fn relic_type(&self) -> RelicType {
        RelicType::Desperado
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Desperado",
            description: "x3 line points on the last hand of the round",
            rarity: Rarity::Rare,
            price: 8,
            icon: "revolver",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Multiplicative
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::when(ctx.is_last_hand(), 3.0, "x3")
    }
}

pub struct CleanSweep;

impl RelicModule for CleanSweep {
    fn relic_type(&self) -> RelicType {
        RelicType::CleanSweep
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Clean Sweep",
            description: "x2 line points when the clear empties the board",
            rarity: Rarity::Rare,
            price: 7,
            icon: "broom",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Multiplicative
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::when(ctx.clears_board(), 2.0, "x2")
    }
}

/// x(1 + 0.2 per stone seal on the board)
pub struct Stoneheart;

impl RelicModule for Stoneheart {
    fn relic_type(&self) -> RelicType {
        RelicType::Stoneheart
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Stoneheart",
            description: "x0.2 more line points for every stone-sealed block on the board",
            rarity: Rarity::Uncommon,
            price: 6,
            icon: "boulder",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Multiplicative
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let value = 1.0 + 0.2 * ctx.stones_on_board as f64;
        RelicActivation::when(ctx.stones_on_board > 0, value, format!("x{value}"))
    }
}

/// x(1 + 0.1 per round started); never resets
pub struct Snowball;

const SNOWBALL_STEP: f64 = 0.1;

impl RelicModule for Snowball {
    fn relic_type(&self) -> RelicType {
        RelicType::Snowball
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Snowball",
            description: "x0.1 more line points for every round survived while owned",
            rarity: Rarity::Legendary,
            price: 10,
            icon: "snowflake",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Multiplicative
    }

    fn check_activation(&self, _ctx: &RelicEffectContext, state: &RelicState) -> RelicActivation {
        let rounds = state.round_tally().rounds;
        let value = 1.0 + SNOWBALL_STEP * rounds as f64;
        RelicActivation::when(rounds > 0, value, format!("x{value:.1}"))
    }

    fn initial_state(&self) -> RelicState {
        RelicState::RoundTally(RoundTallyState::default())
    }

    fn update_state(&self, state: &RelicState, event: &RelicEvent) -> RelicState {
        match event {
            RelicEvent::RoundStart => RelicState::RoundTally(RoundTallyState {
                rounds: state.round_tally().rounds + 1,
            }),
            _ => state.clone(),
        }
    }

    fn persists_across_rounds(&self) -> bool {
        true
    }
}

/// x1.5 when no cleared block carries a pattern or seal
pub struct Purist;

impl RelicModule for Purist {
    fn relic_type(&self) -> RelicType {
        RelicType::Purist
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Purist",
            description: "x1.5 line points when no cleared block has a pattern or seal",
            rarity: Rarity::Common,
            price: 5,
            icon: "lily",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Multiplicative
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        RelicActivation::when(
            ctx.patterned_block_count() == 0 && ctx.sealed_block_count() == 0,
            1.5,
            "x1.5",
        )
    }
}

/// x(1 + 0.25 per hand left)
pub struct HandSaver;

impl RelicModule for HandSaver {
    fn relic_type(&self) -> RelicType {
        RelicType::HandSaver
    }

    fn definition(&self) -> RelicDefinition {
        RelicDefinition {
            name: "Hand Saver",
            description: "x0.25 more line points for every hand left this round",
            rarity: Rarity::Uncommon,
            price: 6,
            icon: "hourglass",
        }
    }

    fn score_effect(&self) -> ScoreEffect {
        ScoreEffect::Multiplicative
    }

    fn check_activation(&self, ctx: &RelicEffectContext, _state: &RelicState) -> RelicActivation {
        let value = 1.0 + 0.25 * ctx.hands_remaining as f64;
        RelicActivation::when(ctx.hands_remaining > 0, value, format!("x{value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detected(row_lines: u32, col_lines: u32) -> RelicEvent {
        RelicEvent::LinesDetected {
            total_lines: row_lines + col_lines,
            row_lines,
            col_lines,
        }
    }

    fn run(module: &dyn RelicModule, events: &[RelicEvent]) -> RelicState {
        events
            .iter()
            .fold(module.initial_state(), |state, event| {
                module.update_state(&state, event)
            })
    }

    #[test]
    fn test_streak_grows_in_one_orientation() {
        let state = run(&Streak, &[detected(1, 0), detected(2, 0), detected(1, 0)]);
        assert_eq!(state.streak().count, 3);
        let activation = Streak.check_activation(&RelicEffectContext::default(), &state);
        assert_eq!(activation.value, 2.0);
    }

    #[test]
    fn test_streak_switching_orientation_restarts() {
        let state = run(&Streak, &[detected(1, 0), detected(1, 0), detected(0, 1)]);
        assert_eq!(
            state.streak(),
            StreakState {
                orientation: Some(ClearOrientation::Columns),
                count: 1
            }
        );
        assert!(!Streak
            .check_activation(&RelicEffectContext::default(), &state)
            .active);
    }

    #[test]
    fn test_streak_cross_clear_resets() {
        let state = run(&Streak, &[detected(1, 0), detected(1, 0), detected(1, 1)]);
        assert_eq!(state.streak(), StreakState::default());
    }

    #[test]
    fn test_streak_ignores_other_events() {
        let state = run(
            &Streak,
            &[
                detected(1, 0),
                RelicEvent::HandConsumed {
                    placed_block_size: 3,
                },
                detected(1, 0),
            ],
        );
        assert_eq!(state.streak().count, 2);
    }

    #[test]
    fn test_combo_breaks_on_dry_hand() {
        let hand = RelicEvent::HandConsumed {
            placed_block_size: 2,
        };
        let state = run(
            &Combo,
            &[hand.clone(), detected(1, 0), hand.clone(), detected(0, 1)],
        );
        assert_eq!(state.combo().chain, 2);
        let activation = Combo.check_activation(&RelicEffectContext::default(), &state);
        assert_eq!(activation.value, 1.25);

        // A hand that never cleared, followed by another hand
        let state = run(&Combo, &[hand.clone(), detected(1, 0), hand.clone(), hand]);
        assert_eq!(state.combo().chain, 0);
    }

    #[test]
    fn test_snowball_counts_round_starts() {
        let state = run(&Snowball, &[RelicEvent::RoundStart, RelicEvent::RoundStart]);
        assert_eq!(state.round_tally().rounds, 2);
        let activation = Snowball.check_activation(&RelicEffectContext::default(), &state);
        assert!((activation.value - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_conditional_multipliers() {
        let ctx = RelicEffectContext {
            lines_cleared: 3,
            cleared_block_count: 16,
            board_fill_count: 16,
            stones_on_board: 2,
            hands_remaining: 2,
            ..RelicEffectContext::default()
        };
        let none = RelicState::Stateless;
        assert_eq!(Overdrive.check_activation(&ctx, &none).value, 2.0);
        assert_eq!(CleanSweep.check_activation(&ctx, &none).value, 2.0);
        assert!((Stoneheart.check_activation(&ctx, &none).value - 1.4).abs() < 1e-9);
        assert_eq!(HandSaver.check_activation(&ctx, &none).value, 1.5);
        assert_eq!(Purist.check_activation(&ctx, &none).value, 1.5);
        assert!(!Desperado.check_activation(&ctx, &none).active);
    }
}
