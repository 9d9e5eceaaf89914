//! In-memory host for tests and the local service.

use super::traits::{CircuitBreaker, Clock, Custody, CustodyError};
use crate::protocol::PrincipalId;
use std::collections::HashMap;

/// Simulated host: a settable clock, a pause flag and per-principal wallets.
#[derive(Clone, Debug, Default)]
pub struct SimulatedHost {
    height: u64,
    paused: bool,
    /// Wallet balances outside the engine
    wallets: HashMap<PrincipalId, u64>,
    /// Value held in custody on behalf of the engine
    held: u64,
    /// Wallets are not checked on deposit when false
    enforce_wallets: bool,
    fail_next_payout: bool,
}

impl SimulatedHost {
    /// Host whose deposits draw from funded wallets
    pub fn new(start_height: u64) -> Self {
        Self {
            height: start_height,
            enforce_wallets: true,
            ..Self::default()
        }
    }

    /// Host that accepts any deposit, for tests that don't care about wallets
    pub fn unbounded(start_height: u64) -> Self {
        Self {
            height: start_height,
            enforce_wallets: false,
            ..Self::default()
        }
    }

    /// Advance the clock by `blocks`
    pub fn advance(&mut self, blocks: u64) -> u64 {
        self.height = self.height.saturating_add(blocks);
        self.height
    }

    /// Move the clock forward to `height`. Never moves it back.
    pub fn set_height(&mut self, height: u64) {
        self.height = self.height.max(height);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Add value to a wallet outside the engine
    pub fn fund(&mut self, principal: PrincipalId, amount: u64) {
        let wallet = self.wallets.entry(principal).or_insert(0);
        *wallet = wallet.saturating_add(amount);
    }

    pub fn wallet_balance(&self, principal: &PrincipalId) -> u64 {
        self.wallets.get(principal).copied().unwrap_or(0)
    }

    /// Make the next payout fail once
    pub fn fail_next_payout(&mut self) {
        self.fail_next_payout = true;
    }
}

impl Clock for SimulatedHost {
    fn current_height(&self) -> u64 {
        self.height
    }
}

impl CircuitBreaker for SimulatedHost {
    fn is_operational(&self) -> bool {
        !self.paused
    }
}

impl Custody for SimulatedHost {
    fn accept_deposit(&mut self, from: &PrincipalId, amount: u64) -> Result<(), CustodyError> {
        if amount == 0 {
            return Ok(());
        }

        if self.enforce_wallets {
            let wallet = self.wallets.entry(*from).or_insert(0);
            if *wallet < amount {
                return Err(CustodyError::InsufficientFunds {
                    need: amount,
                    available: *wallet,
                });
            }
            *wallet -= amount;
        }

        self.held = self.held.saturating_add(amount);
        Ok(())
    }

    fn pay_out(&mut self, to: &PrincipalId, amount: u64) -> Result<(), CustodyError> {
        if std::mem::take(&mut self.fail_next_payout) {
            return Err(CustodyError::PayoutFailed("injected failure".to_string()));
        }

        if self.held < amount {
            return Err(CustodyError::InsufficientFunds {
                need: amount,
                available: self.held,
            });
        }

        self.held -= amount;
        self.fund(*to, amount);
        Ok(())
    }

    fn held(&self) -> u64 {
        self.held
    }
}
