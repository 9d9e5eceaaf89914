//! RPS Escrow Core Library
//!
//! Escrow-backed commit-reveal Rock-Paper-Scissors between two principals:
//! the commitment codec, the pull-payment balance ledger, the game registry
//! and the lifecycle engine that ties them together.

pub mod crypto;
pub mod engine;
pub mod error;
pub mod games;
pub mod host;
pub mod ledger;
pub mod protocol;
pub mod registry;

pub use crypto::{compute_commitment, Commitment, Secret};
pub use engine::{BetPayment, CancelPolicy, EngineConfig, GameEngine, DEFAULT_GRACE_PERIOD};
pub use error::{EngineError, Result};
pub use games::{resolve, Choice, Outcome};
pub use host::{CircuitBreaker, Clock, Custody, CustodyError, Host, SimulatedHost};
pub use ledger::BalanceLedger;
pub use protocol::{GameEvent, GameId, GamePhase, GameRecord, PrincipalId, Resolution};
pub use registry::GameRegistry;
