//! The spin table: one player's session at the wheel.
//!
//! PHASES (per spin):
//!   Idle → Spinning → Settled → Idle
//!
//! RULES:
//!   - The outcome and settlement are fixed the moment a spin starts.
//!     Only their disclosure waits for the reveal timer.
//!   - A spin is never accepted while another is Spinning.
//!   - The settlement reaches the wallet exactly once, when the reveal fires.
//!   - Teardown cancels a pending reveal; a cancelled spin never settles.
//!   - The rotation state survives every spin and every teardown.

use crate::{
    config::WheelConfig,
    error::{WheelError, WheelResult},
    event::{RejectReason, SpinEvent},
    geometry::RotationState,
    resolver::{resolve_spin, SpinResult},
    reveal::RevealTimer,
    ring::Ring,
    rng::RandomSource,
    types::{Cents, SpinId},
    wallet::{apply_settlement, BalanceStore},
};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinPhase {
    Idle,
    Spinning,
    Settled,
}

struct PendingSpin {
    spin_id: SpinId,
    result: SpinResult,
    timer: RevealTimer,
}

/// A spin whose result has been disclosed and applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevealedSpin {
    pub spin_id: SpinId,
    pub result: SpinResult,
    /// Balance change actually applied; differs from the reported delta
    /// only when a loss was clamped at zero.
    pub applied: Cents,
    pub balance_after: Cents,
}

pub struct SpinTable {
    outer: Ring,
    inner: Ring,
    rotation: RotationState,
    reveal_delay: Duration,
    phase: SpinPhase,
    pending: Option<PendingSpin>,
    last_revealed: Option<RevealedSpin>,
    events: Vec<SpinEvent>,
}

fn millis(d: Duration) -> u64 {
    d.as_millis().min(u64::MAX as u128) as u64
}

impl SpinTable {
    pub fn new(outer: Ring, inner: Ring, reveal_delay: Duration) -> Self {
        Self {
            outer,
            inner,
            rotation: RotationState::default(),
            reveal_delay,
            phase: SpinPhase::Idle,
            pending: None,
            last_revealed: None,
            events: Vec::new(),
        }
    }

    /// Build a table from validated configuration.
    pub fn from_config(config: &WheelConfig) -> WheelResult<Self> {
        let (outer, inner) = config.build_rings()?;
        Ok(Self::new(outer, inner, config.reveal_delay()))
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn outer_ring(&self) -> &Ring {
        &self.outer
    }

    pub fn inner_ring(&self) -> &Ring {
        &self.inner
    }

    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    pub fn last_revealed(&self) -> Option<&RevealedSpin> {
        self.last_revealed.as_ref()
    }

    /// When the pending reveal is due, if a spin is in flight.
    pub fn reveal_due_at(&self) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.timer.due_at())
    }

    pub fn events(&self) -> &[SpinEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SpinEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start a spin. The result (labels and rotation targets) is returned
    /// immediately for animation; the settlement is applied by `poll` once
    /// the reveal delay has elapsed.
    pub fn start_spin<W, R>(
        &mut self,
        stake: Cents,
        wallet: &W,
        rng: &mut R,
        now: Duration,
    ) -> WheelResult<SpinResult>
    where
        W: BalanceStore + ?Sized,
        R: RandomSource + ?Sized,
    {
        if self.phase == SpinPhase::Spinning {
            self.reject(stake, now, RejectReason::SpinInProgress);
            return Err(WheelError::SpinInProgress);
        }
        if stake <= 0 {
            self.reject(stake, now, RejectReason::InvalidStake);
            return Err(WheelError::InvalidStake { stake });
        }
        let balance = wallet.current_balance()?;
        if stake > balance {
            self.reject(stake, now, RejectReason::InsufficientBalance);
            return Err(WheelError::InsufficientBalance { stake, balance });
        }

        // Settled → Idle happens implicitly on the next spin.
        self.phase = SpinPhase::Idle;

        let result = resolve_spin(stake, &self.outer, &self.inner, &mut self.rotation, rng);
        let spin_id = uuid::Uuid::new_v4().to_string();
        let timer = RevealTimer::schedule(now, self.reveal_delay);

        self.events.push(SpinEvent::SpinStarted {
            spin_id: spin_id.clone(),
            at_ms: millis(now),
            stake,
            outer_label: result.outer_label(),
            inner_label: result.inner_label(),
            outer_target_degrees: result.outer_rotation.target_degrees,
            inner_target_degrees: result.inner_rotation.target_degrees,
            reveal_at_ms: millis(timer.due_at()),
        });
        log::debug!("spin {spin_id} started, reveal at {}ms", millis(timer.due_at()));

        self.pending = Some(PendingSpin {
            spin_id,
            result: result.clone(),
            timer,
        });
        self.phase = SpinPhase::Spinning;
        Ok(result)
    }

    /// Reveal and settle the pending spin if its timer is due.
    pub fn poll<W>(&mut self, wallet: &mut W, now: Duration) -> WheelResult<Option<RevealedSpin>>
    where
        W: BalanceStore + ?Sized,
    {
        let due = match self.pending.as_mut() {
            Some(p) => p.timer.fire_if_due(now),
            None => false,
        };
        if !due {
            return Ok(None);
        }
        let Some(PendingSpin { spin_id, result, .. }) = self.pending.take() else {
            return Ok(None);
        };

        let applied = apply_settlement(wallet, &result.settlement)?;
        let balance_after = wallet.current_balance()?;

        self.events.push(SpinEvent::SpinRevealed {
            spin_id: spin_id.clone(),
            at_ms: millis(now),
            kind: result.settlement.kind,
            delta: result.settlement.delta,
            applied,
            balance_after,
        });
        log::debug!(
            "spin {spin_id} revealed: {} / {} delta={} applied={applied} balance={balance_after}",
            result.outer_label(),
            result.inner_label(),
            result.settlement.delta,
        );

        let revealed = RevealedSpin {
            spin_id,
            result,
            applied,
            balance_after,
        };
        self.last_revealed = Some(revealed.clone());
        self.phase = SpinPhase::Settled;
        Ok(Some(revealed))
    }

    /// Settled → Idle. No effect in other phases.
    pub fn dismiss(&mut self) {
        if self.phase == SpinPhase::Settled {
            self.phase = SpinPhase::Idle;
        }
    }

    /// Tear the table down: cancel any pending reveal and go Idle.
    /// Returns true if a reveal was cancelled.
    pub fn teardown(&mut self, now: Duration) -> bool {
        self.phase = SpinPhase::Idle;
        let Some(mut pending) = self.pending.take() else {
            return false;
        };
        if !pending.timer.cancel() {
            return false;
        }
        log::warn!("spin {} torn down before reveal; settlement discarded", pending.spin_id);
        self.events.push(SpinEvent::RevealCancelled {
            spin_id: pending.spin_id,
            at_ms: millis(now),
        });
        true
    }

    fn reject(&mut self, stake: Cents, now: Duration, reason: RejectReason) {
        log::debug!("spin rejected: stake={stake} reason={reason:?}");
        self.events.push(SpinEvent::SpinRejected {
            at_ms: millis(now),
            stake,
            reason,
        });
    }
}
