//! Protocol types and notification records.

mod events;
mod types;

pub use events::GameEvent;
pub use types::{GameId, GamePhase, GameRecord, PrincipalId, Resolution, TERMINAL_DEADLINE};
