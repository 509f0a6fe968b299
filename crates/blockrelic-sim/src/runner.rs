//! The simulation loop.

use crate::config::SimConfig;
use crate::player::{choose_placement, PieceDealer};
use anyhow::Context;
use blockrelic_core::{
    Engine, RelicRegistry, RelicType, SeededRandom, Session, SessionAction, SessionEvent,
};
use rand::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

const SHOP_OFFERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub round: u32,
    pub score: u64,
    pub clears: u32,
    pub best_clear: u64,
    pub hands_left: u32,
    pub gold: u32,
    pub bought: Option<RelicType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub total_score: u64,
    /// Bonus pieces placed on top of the dealt hands
    pub bonus_pieces: u32,
    pub relics: Vec<RelicType>,
    pub rounds: Vec<RoundSummary>,
}

/// Play `config.rounds` rounds and report what happened
pub fn run(config: &SimConfig) -> anyhow::Result<RunSummary> {
    let seed = config.seed.unwrap_or_else(rand::random);
    let engine = Engine::new(RelicRegistry::standard(), config.rules.clone());
    let dealer = PieceDealer::new(config);
    let mut rng = SeededRandom::new(seed);
    let mut session = Session::new(
        config.hands_per_round,
        config.discards_per_round,
        config.deck_size,
    );
    info!(seed, rounds = config.rounds, strategy = ?config.strategy, "simulation starting");

    for &relic in &config.relics {
        session
            .apply(&engine, SessionAction::AcquireRelic(relic), &mut rng)
            .with_context(|| format!("acquiring starting relic {relic:?}"))?;
    }

    let mut rounds = Vec::new();
    let mut bonus_pieces = 0;
    for _ in 0..config.rounds {
        session.apply(
            &engine,
            SessionAction::StartRound {
                hands: config.hands_per_round,
            },
            &mut rng,
        )?;
        let start_score = session.total_score;
        let mut clears = 0;
        let mut best_clear = 0;

        while session.hands_remaining > 0 || session.bonus_pieces > 0 {
            let bonus = session.bonus_pieces > 0;
            let piece = dealer.deal(rng.rng_mut());
            let Some(origin) =
                choose_placement(&session.board, &piece, config.strategy, rng.rng_mut())
            else {
                if bonus {
                    debug!(round = session.round, "no room for the bonus piece");
                    session.apply(&engine, SessionAction::SkipBonusPiece, &mut rng)?;
                    continue;
                }
                if session.discards_remaining > 0 {
                    session.apply(&engine, SessionAction::Discard, &mut rng)?;
                    continue;
                }
                warn!(round = session.round, "no room for the dealt piece, ending round early");
                break;
            };

            let (row, col) = (origin.row, origin.col);
            let action = if bonus {
                bonus_pieces += 1;
                SessionAction::PlaceBonusPiece { piece, row, col }
            } else {
                SessionAction::PlacePiece { piece, row, col }
            };
            let events = session.apply(&engine, action, &mut rng)?;
            for event in &events {
                if let SessionEvent::ClearResolved { breakdown, .. } = event {
                    clears += 1;
                    best_clear = best_clear.max(breakdown.final_score);
                }
            }
            if session.pending_clear.is_some() {
                session.apply(&engine, SessionAction::FinishClearAnimation, &mut rng)?;
            }
        }

        let bought = if config.shop {
            visit_shop(&engine, &mut session, &mut rng)?
        } else {
            None
        };

        let summary = RoundSummary {
            round: session.round,
            score: session.total_score - start_score,
            clears,
            best_clear,
            hands_left: session.hands_remaining,
            gold: session.gold,
            bought,
        };
        info!(
            round = summary.round,
            score = summary.score,
            clears,
            total = session.total_score,
            "round finished"
        );
        rounds.push(summary);
    }

    Ok(RunSummary {
        seed,
        total_score: session.total_score,
        bonus_pieces,
        relics: session.inventory.display_order().to_vec(),
        rounds,
    })
}

/// Offer a few unowned relics and buy the cheapest affordable one
fn visit_shop(
    engine: &Engine,
    session: &mut Session,
    rng: &mut SeededRandom,
) -> anyhow::Result<Option<RelicType>> {
    let offers: Vec<RelicType> = engine
        .registry()
        .iter()
        .map(|m| m.relic_type())
        .filter(|&r| !session.inventory.owns(r))
        .choose_multiple(rng.rng_mut(), SHOP_OFFERS);

    let pick = offers
        .into_iter()
        .filter_map(|r| engine.registry().get(r).map(|m| (r, m.definition().price)))
        .filter(|&(_, price)| price <= session.gold)
        .min_by_key(|&(_, price)| price);

    let Some((relic, price)) = pick else {
        debug!(gold = session.gold, "nothing affordable in the shop");
        return Ok(None);
    };
    session.gold -= price;
    session.apply(engine, SessionAction::AcquireRelic(relic), rng)?;
    info!(?relic, price, gold = session.gold, "bought relic");
    Ok(Some(relic))
}
