//! Typed per-relic state.
//!
//! Each stateful relic owns one variant of [`RelicState`]; the store keys
//! states by [`RelicType`] so a relic only ever sees the state it created.

use crate::cell::Pattern;
use crate::relic::event::ClearOrientation;
use crate::relic::RelicType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

static STATELESS: RelicState = RelicState::Stateless;

/// Consecutive clears in one orientation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub orientation: Option<ClearOrientation>,
    pub count: u32,
}

/// Consecutive hands that cleared at least one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboState {
    pub chain: u32,
    /// Whether the hand in progress has cleared yet
    pub cleared_this_hand: bool,
}

impl Default for ComboState {
    fn default() -> Self {
        // No hand in progress yet, so the first hand_consumed must not break the chain
        Self {
            chain: 0,
            cleared_this_hand: true,
        }
    }
}

/// Pattern kinds seen in committed clears
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternLogState {
    pub seen: BTreeSet<Pattern>,
}

/// Lines committed so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTallyState {
    pub lines: u32,
}

/// Rounds started so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTallyState {
    pub rounds: u32,
}

/// Pieces placed so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceCounterState {
    pub placed: u32,
}

/// The Copy relic's own bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyState {
    /// The relic Copy was mirroring when `mirrored` was last reset
    pub target: Option<RelicType>,
    /// Copy's independent instance of the target's counter
    pub mirrored: Box<RelicState>,
}

impl Default for CopyState {
    fn default() -> Self {
        Self {
            target: None,
            mirrored: Box::new(RelicState::Stateless),
        }
    }
}

/// State of one owned relic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RelicState {
    #[default]
    Stateless,
    Streak(StreakState),
    Combo(ComboState),
    PatternLog(PatternLogState),
    LineTally(LineTallyState),
    RoundTally(RoundTallyState),
    PieceCounter(PieceCounterState),
    Copy(CopyState),
}

impl RelicState {
    pub fn streak(&self) -> StreakState {
        match self {
            RelicState::Streak(s) => *s,
            _ => StreakState::default(),
        }
    }

    pub fn combo(&self) -> ComboState {
        match self {
            RelicState::Combo(s) => *s,
            _ => ComboState::default(),
        }
    }

    pub fn pattern_log(&self) -> PatternLogState {
        match self {
            RelicState::PatternLog(s) => s.clone(),
            _ => PatternLogState::default(),
        }
    }

    pub fn line_tally(&self) -> LineTallyState {
        match self {
            RelicState::LineTally(s) => *s,
            _ => LineTallyState::default(),
        }
    }

    pub fn round_tally(&self) -> RoundTallyState {
        match self {
            RelicState::RoundTally(s) => *s,
            _ => RoundTallyState::default(),
        }
    }

    pub fn piece_counter(&self) -> PieceCounterState {
        match self {
            RelicState::PieceCounter(s) => *s,
            _ => PieceCounterState::default(),
        }
    }

    pub fn copy(&self) -> CopyState {
        match self {
            RelicState::Copy(s) => s.clone(),
            _ => CopyState::default(),
        }
    }
}

/// State store for every owned relic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelicStates(BTreeMap<RelicType, RelicState>);

impl RelicStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `relic`, `Stateless` when it has none
    pub fn get(&self, relic: RelicType) -> &RelicState {
        self.0.get(&relic).unwrap_or(&STATELESS)
    }

    pub fn contains(&self, relic: RelicType) -> bool {
        self.0.contains_key(&relic)
    }

    pub fn insert(&mut self, relic: RelicType, state: RelicState) {
        self.0.insert(relic, state);
    }

    pub fn remove(&mut self, relic: RelicType) -> Option<RelicState> {
        self.0.remove(&relic)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RelicType, &RelicState)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
