//! Engine error taxonomy.

use crate::crypto::Commitment;
use crate::host::CustodyError;
use crate::protocol::GamePhase;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Rejections surfaced by engine operations.
///
/// A failed operation leaves the registry, the ledger and custody untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("System is paused")]
    SystemPaused,

    #[error("Invalid choice tag: {0}")]
    InvalidChoice(u8),

    #[error("Game already exists: {0}")]
    DuplicateGame(Commitment),

    #[error("Commitment was already used for this opponent")]
    DuplicateSecretUse,

    #[error("Cannot play against yourself")]
    SelfPlay,

    #[error("Game not found: {0}")]
    GameNotFound(Commitment),

    #[error("Caller is not authorized for this operation")]
    Unauthorized,

    #[error("Wrong game state: expected {expected}, found {actual}")]
    WrongState { expected: GamePhase, actual: GamePhase },

    #[error("Game expired at height {deadline} (current height {height})")]
    GameExpired { deadline: u64, height: u64 },

    #[error("Timeout not reached: deadline {deadline}, current height {height}")]
    TimeoutNotReached { deadline: u64, height: u64 },

    #[error("Revealed choice and secret do not match the commitment")]
    RevealMismatch,

    #[error("Insufficient stake: need {need}, have {available}")]
    InsufficientStake { need: u64, available: u64 },

    #[error("Stake must equal the bet value: expected {expected}, provided {provided}")]
    StakeMismatch { expected: u64, provided: u64 },

    #[error("No balance to withdraw")]
    NoBalance,

    #[error("Deadline is out of range")]
    InvalidDeadline,

    #[error("Amount overflows the pot")]
    AmountOverflow,

    #[error("Malformed commitment: {0}")]
    MalformedCommitment(String),

    #[error("Custody error: {0}")]
    Custody(#[from] CustodyError),
}

impl EngineError {
    /// Stable variant name for API consumers
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::SystemPaused => "SystemPaused",
            EngineError::InvalidChoice(_) => "InvalidChoice",
            EngineError::DuplicateGame(_) => "DuplicateGame",
            EngineError::DuplicateSecretUse => "DuplicateSecretUse",
            EngineError::SelfPlay => "SelfPlay",
            EngineError::GameNotFound(_) => "GameNotFound",
            EngineError::Unauthorized => "Unauthorized",
            EngineError::WrongState { .. } => "WrongState",
            EngineError::GameExpired { .. } => "GameExpired",
            EngineError::TimeoutNotReached { .. } => "TimeoutNotReached",
            EngineError::RevealMismatch => "RevealMismatch",
            EngineError::InsufficientStake { .. } => "InsufficientStake",
            EngineError::StakeMismatch { .. } => "StakeMismatch",
            EngineError::NoBalance => "NoBalance",
            EngineError::InvalidDeadline => "InvalidDeadline",
            EngineError::AmountOverflow => "AmountOverflow",
            EngineError::MalformedCommitment(_) => "MalformedCommitment",
            EngineError::Custody(_) => "Custody",
        }
    }
}
