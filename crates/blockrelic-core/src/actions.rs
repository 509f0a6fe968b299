//! Session actions and the events they produce.

use crate::dispatch::PendingRequest;
use crate::engine::ClearEvent;
use crate::piece::Piece;
use crate::relic::RelicType;
use crate::scoring::ScoreBreakdown;
use serde::{Deserialize, Serialize};

/// Everything a host can ask a session to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionAction {
    // ==================== Round flow ====================
    /// Start the next round with a fresh board and `hands` hands
    StartRound { hands: u32 },
    /// Place a piece with its top-left block at (row, col)
    PlacePiece { piece: Piece, row: usize, col: usize },
    /// Place a queued bonus piece; costs no hand
    PlaceBonusPiece { piece: Piece, row: usize, col: usize },
    /// Drop a queued bonus piece that has nowhere to go
    SkipBonusPiece,
    /// The clear animation finished; remove the cleared cells
    FinishClearAnimation,
    /// Spend one discard
    Discard,

    // ==================== Relics ====================
    AcquireRelic(RelicType),
    RemoveRelic(RelicType),
    ReorderRelics(Vec<RelicType>),
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    RoundStarted {
        round: u32,
        hands: u32,
    },

    PiecePlaced {
        row: usize,
        col: usize,
        blocks: u32,
        hands_remaining: u32,
    },

    /// Lines were detected and scored; waiting on the animation
    ClearResolved {
        clear_event: ClearEvent,
        breakdown: Box<ScoreBreakdown>,
    },

    ClearCommitted {
        lines: u32,
        cells: u32,
    },

    Discarded {
        discards_remaining: u32,
    },

    BonusPieceUsed {
        placed: bool,
        bonus_pieces_remaining: u32,
    },

    GoldEarned {
        amount: u32,
    },

    HandsGranted {
        amount: u32,
    },

    /// A relic asked for a side effect
    RelicRequested(PendingRequest),

    RelicAcquired(RelicType),
    RelicRemoved(RelicType),
    RelicsReordered(Vec<RelicType>),

    /// The last hand of the round was played and nothing is pending
    RoundOver {
        round: u32,
        total_score: u64,
    },
}
