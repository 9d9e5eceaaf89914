//! Host runtime collaborator traits.

use crate::protocol::PrincipalId;
use thiserror::Error;

/// Errors from the host's custody primitives
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CustodyError {
    #[error("Insufficient funds: need {need}, have {available}")]
    InsufficientFunds { need: u64, available: u64 },

    #[error("Payout failed: {0}")]
    PayoutFailed(String),
}

/// Monotonically non-decreasing logical clock
pub trait Clock {
    fn current_height(&self) -> u64;
}

/// Administrative pause gate
pub trait CircuitBreaker {
    fn is_operational(&self) -> bool;
}

/// Escrow custody of the value backing games and balances.
///
/// Implementations either complete a call fully or return an error with no
/// effect; the engine relies on that to keep operations atomic.
pub trait Custody {
    /// Take `amount` from `from` into custody
    fn accept_deposit(&mut self, from: &PrincipalId, amount: u64) -> Result<(), CustodyError>;

    /// Transfer `amount` out of custody to `to`
    fn pay_out(&mut self, to: &PrincipalId, amount: u64) -> Result<(), CustodyError>;

    /// Value currently held in custody
    fn held(&self) -> u64;
}

/// Everything the engine consumes from its host.
pub trait Host: Clock + CircuitBreaker + Custody {}

impl<T: Clock + CircuitBreaker + Custody> Host for T {}
