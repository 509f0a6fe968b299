//! A thin reducer over the engine.
//!
//! `Session` holds the run state a host would otherwise track itself and
//! turns [`SessionAction`]s into [`SessionEvent`]s. All scoring goes through
//! [`Engine`]; the session only sequences the phases and applies the relic
//! requests it understands.

use crate::actions::{SessionAction, SessionEvent};
use crate::board::{Board, BoardError};
use crate::dispatch::PendingRequest;
use crate::engine::{ClearEvent, Engine, RunSnapshot};
use crate::piece::Piece;
use crate::relic::{InventoryError, RelicEvent, RelicInventory, RelicRequest};
use crate::rng::RandomSource;
use crate::scoring::ScoreBreakdown;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when applying an action
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("A clear is still animating")]
    ClearPending,
    #[error("No clear is waiting to be committed")]
    NoClearPending,
    #[error("No hands remaining this round")]
    NoHandsRemaining,
    #[error("No discards remaining this round")]
    NoDiscardsRemaining,
    #[error("No bonus piece is queued")]
    NoBonusPiece,
    #[error("Invalid placement: {0}")]
    Placement(#[from] BoardError),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Where a placed piece came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PieceSource {
    /// Dealt from the deck; spends a hand
    Hand,
    /// Injected by a relic; spends a queued bonus piece
    Bonus,
}

/// A resolved clear waiting on the host's animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingClear {
    pub clear_event: ClearEvent,
    pub breakdown: ScoreBreakdown,
}

/// Complete state of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub board: Board,
    pub inventory: RelicInventory,
    pub round: u32,
    pub hands_per_round: u32,
    pub hands_remaining: u32,
    pub discards_per_round: u32,
    pub discards_remaining: u32,
    pub deck_size: u32,
    pub gold: u32,
    pub total_score: u64,
    /// Bonus pieces relics have injected and the host has not yet played
    pub bonus_pieces: u32,
    pub pending_clear: Option<PendingClear>,
}

impl Session {
    /// A run that has not started its first round yet
    pub fn new(hands_per_round: u32, discards_per_round: u32, deck_size: u32) -> Self {
        Self {
            board: Board::new(),
            inventory: RelicInventory::new(),
            round: 0,
            hands_per_round,
            hands_remaining: 0,
            discards_per_round,
            discards_remaining: 0,
            deck_size,
            gold: 0,
            total_score: 0,
            bonus_pieces: 0,
            pending_clear: None,
        }
    }

    pub fn snapshot(&self, placed_block_count: u32) -> RunSnapshot {
        RunSnapshot {
            placed_block_count,
            hands_remaining: self.hands_remaining,
            discards_remaining: self.discards_remaining,
            deck_size: self.deck_size,
            round: self.round,
            gold: self.gold,
        }
    }

    /// Out of hands with no bonus piece left to play and nothing animating
    pub fn is_round_over(&self) -> bool {
        self.round > 0
            && self.hands_remaining == 0
            && self.bonus_pieces == 0
            && self.pending_clear.is_none()
    }

    /// Apply an action to the session
    pub fn apply(
        &mut self,
        engine: &Engine,
        action: SessionAction,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let mut events = Vec::new();

        match action {
            // ==================== Round flow ====================
            SessionAction::StartRound { hands } => {
                if self.pending_clear.is_some() {
                    return Err(SessionError::ClearPending);
                }
                self.round += 1;
                self.hands_per_round = hands;
                self.hands_remaining = hands;
                self.discards_remaining = self.discards_per_round;
                self.bonus_pieces = 0;
                self.board = self.board.reset();
                events.push(SessionEvent::RoundStarted {
                    round: self.round,
                    hands,
                });
                info!(round = self.round, hands, "round started");

                let outcome = engine.advance_lifecycle(&self.inventory, &RelicEvent::RoundStart);
                self.inventory = outcome.inventory;
                self.apply_requests(outcome.requests, &mut events);
            }

            SessionAction::PlacePiece { piece, row, col } => {
                self.place_piece(engine, &piece, (row, col), PieceSource::Hand, rng, &mut events)?;
            }

            SessionAction::PlaceBonusPiece { piece, row, col } => {
                self.place_piece(engine, &piece, (row, col), PieceSource::Bonus, rng, &mut events)?;
            }

            SessionAction::SkipBonusPiece => {
                if self.pending_clear.is_some() {
                    return Err(SessionError::ClearPending);
                }
                if self.bonus_pieces == 0 {
                    return Err(SessionError::NoBonusPiece);
                }
                self.bonus_pieces -= 1;
                events.push(SessionEvent::BonusPieceUsed {
                    placed: false,
                    bonus_pieces_remaining: self.bonus_pieces,
                });
                self.push_round_over(&mut events);
            }

            SessionAction::FinishClearAnimation => {
                let pending = self.pending_clear.take().ok_or(SessionError::NoClearPending)?;
                let board_before = self.board.clone();
                self.board = engine.commit_clear(&board_before, &pending.clear_event);

                let cleared = engine.lines_cleared_event(&board_before, &pending.clear_event);
                let outcome = engine.advance_lifecycle(&self.inventory, &cleared);
                self.inventory = outcome.inventory;
                events.push(SessionEvent::ClearCommitted {
                    lines: pending.clear_event.total_lines(),
                    cells: pending.clear_event.cells.len() as u32,
                });
                self.apply_requests(outcome.requests, &mut events);
                self.push_round_over(&mut events);
            }

            SessionAction::Discard => {
                if self.pending_clear.is_some() {
                    return Err(SessionError::ClearPending);
                }
                if self.discards_remaining == 0 {
                    return Err(SessionError::NoDiscardsRemaining);
                }
                self.discards_remaining -= 1;
                events.push(SessionEvent::Discarded {
                    discards_remaining: self.discards_remaining,
                });
            }

            // ==================== Relics ====================
            SessionAction::AcquireRelic(relic) => {
                self.inventory = self.inventory.acquire(engine.registry(), relic)?;
                events.push(SessionEvent::RelicAcquired(relic));
            }

            SessionAction::RemoveRelic(relic) => {
                self.inventory = self.inventory.remove(engine.registry(), relic)?;
                events.push(SessionEvent::RelicRemoved(relic));
            }

            SessionAction::ReorderRelics(order) => {
                self.inventory = self.inventory.reorder(engine.registry(), order)?;
                events.push(SessionEvent::RelicsReordered(
                    self.inventory.display_order().to_vec(),
                ));
            }
        }

        Ok(events)
    }

    fn place_piece(
        &mut self,
        engine: &Engine,
        piece: &Piece,
        (row, col): (usize, usize),
        source: PieceSource,
        rng: &mut dyn RandomSource,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), SessionError> {
        if self.pending_clear.is_some() {
            return Err(SessionError::ClearPending);
        }
        match source {
            PieceSource::Hand if self.hands_remaining == 0 => {
                return Err(SessionError::NoHandsRemaining)
            }
            PieceSource::Bonus if self.bonus_pieces == 0 => return Err(SessionError::NoBonusPiece),
            _ => {}
        }
        let board = self.board.place(piece, row, col)?;

        let blocks = piece.block_count() as u32;
        self.board = board;
        match source {
            PieceSource::Hand => {
                self.hands_remaining -= 1;
                self.deck_size = self.deck_size.saturating_sub(1);
            }
            PieceSource::Bonus => {
                self.bonus_pieces -= 1;
                events.push(SessionEvent::BonusPieceUsed {
                    placed: true,
                    bonus_pieces_remaining: self.bonus_pieces,
                });
            }
        }
        events.push(SessionEvent::PiecePlaced {
            row,
            col,
            blocks,
            hands_remaining: self.hands_remaining,
        });

        let consumed = RelicEvent::HandConsumed {
            placed_block_size: blocks,
        };
        let outcome = engine.advance_lifecycle(&self.inventory, &consumed);
        self.inventory = outcome.inventory;
        self.apply_requests(outcome.requests, events);

        let snapshot = self.snapshot(blocks);
        match engine.resolve_clear(&self.board, &self.inventory, &snapshot, rng) {
            Some(resolution) => {
                self.inventory = resolution.inventory;
                self.apply_requests(resolution.requests, events);

                let breakdown = resolution.breakdown;
                self.total_score += breakdown.final_score;
                if breakdown.gold_earned > 0 {
                    self.gold += breakdown.gold_earned;
                    events.push(SessionEvent::GoldEarned {
                        amount: breakdown.gold_earned,
                    });
                }
                if breakdown.hands_earned > 0 {
                    self.hands_remaining += breakdown.hands_earned;
                    events.push(SessionEvent::HandsGranted {
                        amount: breakdown.hands_earned,
                    });
                }
                debug!(
                    score = breakdown.final_score,
                    total_score = self.total_score,
                    "clear scored"
                );

                events.push(SessionEvent::ClearResolved {
                    clear_event: resolution.clear_event.clone(),
                    breakdown: Box::new(breakdown.clone()),
                });
                self.pending_clear = Some(PendingClear {
                    clear_event: resolution.clear_event,
                    breakdown,
                });
            }
            None => self.push_round_over(events),
        }
        Ok(())
    }

    fn apply_requests(&mut self, requests: Vec<PendingRequest>, events: &mut Vec<SessionEvent>) {
        for pending in requests {
            match pending.request {
                RelicRequest::GrantGold { amount } => {
                    self.gold += amount;
                    events.push(SessionEvent::GoldEarned { amount });
                }
                RelicRequest::GrantHands { amount } => {
                    self.hands_remaining += amount;
                    events.push(SessionEvent::HandsGranted { amount });
                }
                RelicRequest::InjectBonusPiece => self.bonus_pieces += 1,
            }
            debug!(relic = ?pending.relic, request = ?pending.request, "relic request applied");
            events.push(SessionEvent::RelicRequested(pending));
        }
    }

    fn push_round_over(&self, events: &mut Vec<SessionEvent>) {
        if self.is_round_over() {
            info!(round = self.round, total_score = self.total_score, "round over");
            events.push(SessionEvent::RoundOver {
                round: self.round,
                total_score: self.total_score,
            });
        }
    }
}
