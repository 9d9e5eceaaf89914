//! Protocol types.

use crate::crypto::Commitment;
use crate::games::Choice;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Authenticated identity of a caller, supplied by the host runtime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    /// Create a new random principal ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Get bytes representation for hashing
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for PrincipalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrincipalId({})", self.0)
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game identifier. The creator's commitment doubles as the key.
pub type GameId = Commitment;

/// Deadline value marking a fully settled game.
pub const TERMINAL_DEADLINE: u64 = 0;

/// How a game reached its terminal state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Revealed,
    Cancelled,
    UnplayedClaimed,
    UnrevealedClaimed,
}

/// Lifecycle phase, derived from a record's fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "resolution")]
pub enum GamePhase {
    AwaitingBet,
    AwaitingReveal,
    Resolved(Option<Resolution>),
}

impl GamePhase {
    pub fn is_live(&self) -> bool {
        !matches!(self, GamePhase::Resolved(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::AwaitingBet => "awaiting_bet",
            GamePhase::AwaitingReveal => "awaiting_reveal",
            GamePhase::Resolved(_) => "resolved",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Committing principal (creator)
    pub player1: PrincipalId,
    /// Only principal allowed to bet
    pub player2: PrincipalId,
    /// Stake each side puts up
    pub bet_value: u64,
    /// Player 2's open choice, `None` until the bet lands
    pub p2_choice: Option<Choice>,
    /// Bet deadline before the bet, reveal deadline after it,
    /// [`TERMINAL_DEADLINE`] once settled
    pub valid_until_block: u64,
    /// Set together with the terminal deadline
    pub resolution: Option<Resolution>,
}

impl GameRecord {
    pub fn new(player1: PrincipalId, player2: PrincipalId, bet_value: u64, valid_until_block: u64) -> Self {
        Self {
            player1,
            player2,
            bet_value,
            p2_choice: None,
            valid_until_block,
            resolution: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.valid_until_block == TERMINAL_DEADLINE {
            GamePhase::Resolved(self.resolution)
        } else if self.p2_choice.is_none() {
            GamePhase::AwaitingBet
        } else {
            GamePhase::AwaitingReveal
        }
    }

    pub fn is_live(&self) -> bool {
        self.valid_until_block != TERMINAL_DEADLINE
    }

    /// Value the engine holds for this game right now.
    pub fn escrowed(&self) -> u64 {
        match self.phase() {
            GamePhase::AwaitingBet => self.bet_value,
            GamePhase::AwaitingReveal => self.bet_value.saturating_mul(2),
            GamePhase::Resolved(_) => 0,
        }
    }

    /// Combined stake of both seats.
    pub fn pot(&self) -> u64 {
        self.bet_value.saturating_mul(2)
    }

    /// Move to the terminal state.
    pub(crate) fn settle(&mut self, resolution: Resolution) {
        self.valid_until_block = TERMINAL_DEADLINE;
        self.resolution = Some(resolution);
    }
}
