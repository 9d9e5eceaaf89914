//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Reveal window granted once player 2 has bet, in blocks
pub const DEFAULT_GRACE_PERIOD: u64 = 100;

/// How player 2 may cover the stake
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BetPayment {
    /// Deposit plus existing ledger balance; any excess comes back as change
    #[default]
    LedgerAssisted,
    /// Deposit must equal the bet value
    Exact,
}

impl FromStr for BetPayment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ledger" | "ledger-assisted" => Ok(BetPayment::LedgerAssisted),
            "exact" => Ok(BetPayment::Exact),
            other => Err(format!("unknown bet payment mode: {}", other)),
        }
    }
}

/// When player 1 may cancel an unanswered game
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CancelPolicy {
    /// Any time before player 2 bets
    #[default]
    BeforeBet,
    /// Only after the bet deadline has passed
    AfterDeadline,
}

impl FromStr for CancelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before-bet" => Ok(CancelPolicy::BeforeBet),
            "after-deadline" => Ok(CancelPolicy::AfterDeadline),
            other => Err(format!("unknown cancel policy: {}", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grace_period: u64,
    pub bet_payment: BetPayment,
    pub cancel_policy: CancelPolicy,
    /// Reject reveals after the reveal deadline instead of letting them race
    /// player 2's timeout claim
    pub enforce_reveal_deadline: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            bet_payment: BetPayment::default(),
            cancel_policy: CancelPolicy::default(),
            enforce_reveal_deadline: false,
        }
    }
}
