//! Blockrelic - scoring and relic engine for a 6x6 block-clearing roguelike
//!
//! This crate provides the core game logic for Blockrelic, including:
//! - The board model with patterns, seals, blessings and buffs
//! - Pattern and seal effect handlers
//! - Relics: a trait-based catalog, typed state and lifecycle dispatch
//! - The Copy relic's mirroring rules
//! - The score pipeline, `floor(A) x floor(B) + floor(F)`
//!
//! # Architecture
//!
//! The engine is platform-agnostic and synchronous. Every operation is a pure
//! transition from old state to new state; the only randomness comes from an
//! injected [`RandomSource`]. It can be compiled to:
//! - Native Rust for simulations and tests
//! - WebAssembly for a browser client (`wasm` feature)
//!
//! # Modules
//!
//! - [`cell`]: cells, patterns, seals, blessings and buffs
//! - [`piece`]: placeable pieces
//! - [`board`]: the 6x6 grid, placement and line detection
//! - [`effects`]: pattern, seal and buff handlers
//! - [`relic`]: the relic contract, catalog, state and Copy resolver
//! - [`dispatch`]: lifecycle events to relic state
//! - [`scoring`]: score composition
//! - [`engine`]: the two-phase clear entry points
//! - [`session`]: a reducer over the engine for hosts

pub mod actions;
pub mod board;
pub mod cell;
pub mod dispatch;
pub mod effects;
pub mod engine;
pub mod piece;
pub mod relic;
pub mod rng;
pub mod rules;
pub mod scoring;
pub mod session;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{SessionAction, SessionEvent};
pub use board::{Board, BoardError, CompletedLines, BOARD_SIZE};
pub use cell::{Blessing, Buff, BuffKind, Cell, CellTags, Pattern, Position, Seal};
pub use dispatch::{advance_lifecycle, LifecycleOutcome, PendingRequest};
pub use effects::{CellEffects, LuckyRoll};
pub use engine::{ClearEvent, ClearResolution, Engine, RunSnapshot};
pub use piece::{Piece, PieceBlock};
pub use relic::{
    RelicActivation, RelicEffectContext, RelicEvent, RelicInventory, RelicModule, RelicRegistry,
    RelicRequest, RelicState, RelicType, ScoreEffect,
};
pub use rng::{RandomSource, ScriptedRolls, SeededRandom};
pub use rules::ScoringRules;
pub use scoring::{compose_score, ScoreBreakdown, ScoreStep, SideEffect};
pub use session::{Session, SessionError};
