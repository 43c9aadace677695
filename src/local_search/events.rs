//! Structured events emitted by the 2-Opt engine.

use serde::{Deserialize, Serialize};

use crate::tour::Tour;
use crate::utils::RunStatistics;

/// One accepted edge exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapEvent {
    pub edge_removed_1: (usize, usize),
    pub edge_removed_2: (usize, usize),
    pub edge_added_1: (usize, usize),
    pub edge_added_2: (usize, usize),
    /// Tour positions `(i, j)` of the two removed edges `(i, i + 1)` and `(j, j + 1)`
    pub positions: (usize, usize),
    /// Change in tour length, always below `-epsilon`
    pub delta: f64,
    /// Tour length after the swap
    pub length: f64,
    pub tour_snapshot: Tour,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    SwapApplied(SwapEvent),
    PassCompleted {
        improving: bool,
    },
    RunFinished {
        final_tour: Tour,
        statistics: RunStatistics,
    },
}

impl EngineEvent {
    pub fn is_finished(&self) -> bool {
        matches!(self, EngineEvent::RunFinished { .. })
    }

    pub fn as_swap(&self) -> Option<&SwapEvent> {
        match self {
            EngineEvent::SwapApplied(swap) => Some(swap),
            _ => None,
        }
    }
}
