//! Lifecycle events that drive relic state.
//!
//! Per player action the events arrive in a fixed order:
//! `HandConsumed` when the piece lands, `LinesDetected` right after line
//! detection (before scoring), and `LinesCleared` once the clear animation has
//! finished and the cells are actually gone. `RoundStart` arrives between rounds.

use crate::cell::Pattern;
use serde::{Deserialize, Serialize};

/// Orientation of a single clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearOrientation {
    Rows,
    Columns,
    Cross,
}

/// A lifecycle event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelicEvent {
    HandConsumed {
        placed_block_size: u32,
    },
    LinesDetected {
        total_lines: u32,
        row_lines: u32,
        col_lines: u32,
    },
    LinesCleared {
        total_lines: u32,
        pattern_block_count: u32,
        cleared_pattern_types: Vec<Pattern>,
    },
    RoundStart,
}

impl RelicEvent {
    /// Orientation of a `LinesDetected` event with at least one line
    pub fn orientation(&self) -> Option<ClearOrientation> {
        match self {
            RelicEvent::LinesDetected {
                row_lines,
                col_lines,
                ..
            } => match (*row_lines > 0, *col_lines > 0) {
                (true, true) => Some(ClearOrientation::Cross),
                (true, false) => Some(ClearOrientation::Rows),
                (false, true) => Some(ClearOrientation::Columns),
                (false, false) => None,
            },
            _ => None,
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            RelicEvent::HandConsumed { .. } => "hand_consumed",
            RelicEvent::LinesDetected { .. } => "lines_detected",
            RelicEvent::LinesCleared { .. } => "lines_cleared",
            RelicEvent::RoundStart => "round_start",
        }
    }
}
