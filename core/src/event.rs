//! Table events: everything a host needs to render or audit a session.
//!
//! Variants are append only.

use crate::{
    settlement::SettlementKind,
    types::{Cents, SpinId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpinEvent {
    SpinStarted {
        spin_id: SpinId,
        at_ms: u64,
        stake: Cents,
        outer_label: String,
        inner_label: String,
        outer_target_degrees: f64,
        inner_target_degrees: f64,
        reveal_at_ms: u64,
    },
    SpinRejected {
        at_ms: u64,
        stake: Cents,
        reason: RejectReason,
    },
    SpinRevealed {
        spin_id: SpinId,
        at_ms: u64,
        kind: SettlementKind,
        /// Reported settlement, never clamped.
        delta: Cents,
        /// What the balance actually moved by.
        applied: Cents,
        balance_after: Cents,
    },
    RevealCancelled {
        spin_id: SpinId,
        at_ms: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    SpinInProgress,
    InvalidStake,
    InsufficientBalance,
}

impl SpinEvent {
    /// Stable name used in logs and the IPC stream.
    pub fn type_name(&self) -> &'static str {
        match self {
            SpinEvent::SpinStarted { .. } => "spin_started",
            SpinEvent::SpinRejected { .. } => "spin_rejected",
            SpinEvent::SpinRevealed { .. } => "spin_revealed",
            SpinEvent::RevealCancelled { .. } => "reveal_cancelled",
        }
    }
}
