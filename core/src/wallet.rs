//! Balance collaborators.
//!
//! The engine never owns a balance. It asks a BalanceStore to debit or
//! credit the settlement delta once the spin is revealed.

use crate::{error::WheelResult, settlement::Settlement, types::Cents};

pub trait BalanceStore {
    fn current_balance(&self) -> WheelResult<Cents>;

    /// Remove up to `amount`, never taking the balance below zero.
    /// Returns the amount actually removed.
    fn debit(&mut self, amount: Cents) -> WheelResult<Cents>;

    fn credit(&mut self, amount: Cents) -> WheelResult<()>;
}

/// Apply a settlement to a balance store.
/// Returns the balance change that actually happened, which differs from
/// `settlement.delta` only when a loss is clamped at zero.
pub fn apply_settlement<W: BalanceStore + ?Sized>(
    wallet: &mut W,
    settlement: &Settlement,
) -> WheelResult<Cents> {
    if settlement.delta < 0 {
        let removed = wallet.debit(-settlement.delta)?;
        if removed < -settlement.delta {
            log::debug!(
                "loss of {} clamped to {removed} at zero balance",
                -settlement.delta
            );
        }
        Ok(-removed)
    } else {
        wallet.credit(settlement.delta)?;
        Ok(settlement.delta)
    }
}

/// An in-process balance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryWallet {
    balance: Cents,
}

impl MemoryWallet {
    pub fn new(balance: Cents) -> Self {
        Self { balance: balance.max(0) }
    }

    pub fn balance(&self) -> Cents {
        self.balance
    }
}

impl BalanceStore for MemoryWallet {
    fn current_balance(&self) -> WheelResult<Cents> {
        Ok(self.balance)
    }

    fn debit(&mut self, amount: Cents) -> WheelResult<Cents> {
        let removed = amount.clamp(0, self.balance);
        self.balance -= removed;
        Ok(removed)
    }

    fn credit(&mut self, amount: Cents) -> WheelResult<()> {
        self.balance = self.balance.saturating_add(amount.max(0));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::SettlementKind;

    #[test]
    fn loss_larger_than_balance_floors_at_zero() {
        let mut wallet = MemoryWallet::new(150);
        let loss = Settlement { kind: SettlementKind::Loss, delta: -400 };
        let applied = apply_settlement(&mut wallet, &loss).unwrap();
        assert_eq!(applied, -150);
        assert_eq!(wallet.balance(), 0);
        assert_eq!(loss.delta, -400, "reported delta stays unclamped");
    }

    #[test]
    fn win_credits_full_delta() {
        let mut wallet = MemoryWallet::new(100);
        let win = Settlement { kind: SettlementKind::Win, delta: 1500 };
        assert_eq!(apply_settlement(&mut wallet, &win).unwrap(), 1500);
        assert_eq!(wallet.balance(), 1600);
    }
}
