//! Pull-payment balance ledger.
//!
//! Settlement never pushes value out of the engine. It credits an entry here,
//! and the owner pulls it with a withdrawal.

use crate::protocol::PrincipalId;
use std::collections::HashMap;

/// Per-principal withdrawable balances
#[derive(Clone, Debug, Default)]
pub struct BalanceLedger {
    balances: HashMap<PrincipalId, u64>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance, zero for unknown principals
    pub fn balance(&self, principal: &PrincipalId) -> u64 {
        self.balances.get(principal).copied().unwrap_or(0)
    }

    /// Add to a principal's entry, creating it on first credit.
    pub fn credit(&mut self, principal: PrincipalId, amount: u64) {
        if amount == 0 {
            return;
        }
        let entry = self.balances.entry(principal).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Take `amount` out of an entry. Returns false, leaving it unchanged,
    /// when the entry holds less.
    pub fn try_debit(&mut self, principal: &PrincipalId, amount: u64) -> bool {
        if amount == 0 {
            return true;
        }
        match self.balances.get_mut(principal) {
            Some(balance) if *balance >= amount => {
                *balance -= amount;
                if *balance == 0 {
                    self.balances.remove(principal);
                }
                true
            }
            _ => false,
        }
    }

    /// Zero an entry and return what it held.
    pub fn debit_all(&mut self, principal: &PrincipalId) -> u64 {
        self.balances.remove(principal).unwrap_or(0)
    }

    /// Pay out a principal's whole balance.
    ///
    /// The entry is zeroed before `pay` runs, so anything `pay` calls back
    /// into sees an empty balance. If `pay` fails the entry is restored and
    /// the error is returned. Returns `Ok(None)` for an empty entry without
    /// calling `pay`.
    pub fn withdraw_with<E, F>(&mut self, principal: &PrincipalId, pay: F) -> Result<Option<u64>, E>
    where
        F: FnOnce(u64) -> Result<(), E>,
    {
        let amount = self.debit_all(principal);
        if amount == 0 {
            return Ok(None);
        }

        match pay(amount) {
            Ok(()) => Ok(Some(amount)),
            Err(e) => {
                self.credit(*principal, amount);
                Err(e)
            }
        }
    }

    /// Sum of all entries
    pub fn total(&self) -> u64 {
        self.balances.values().fold(0u64, |acc, b| acc.saturating_add(*b))
    }
}
