//! Notification records emitted by the engine.

use crate::protocol::{GameId, PrincipalId};
use serde::{Deserialize, Serialize};

/// One emitted notification.
///
/// Identity fields are what an observer filters on, see
/// [`GameEvent::involves`] and [`GameEvent::game_id`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    GameCreated {
        player1: PrincipalId,
        player2: PrincipalId,
        game_id: GameId,
        bet_value: u64,
    },
    GameReadyForReveal {
        player1: PrincipalId,
        player2: PrincipalId,
        game_id: GameId,
    },
    /// `winner` is `None` on a draw.
    GameResolved {
        game_id: GameId,
        winner: Option<PrincipalId>,
        prize: u64,
    },
    GameCancelled {
        cancelled_by: PrincipalId,
        game_id: GameId,
    },
    UnplayedGameReclaimed {
        claimed_by: PrincipalId,
        game_id: GameId,
    },
    UnrevealedGameClaimed {
        claimed_by: PrincipalId,
        game_id: GameId,
    },
    Withdrawal {
        who: PrincipalId,
        amount: u64,
    },
}

impl GameEvent {
    /// Game this event is about, if any
    pub fn game_id(&self) -> Option<&GameId> {
        match self {
            GameEvent::GameCreated { game_id, .. }
            | GameEvent::GameReadyForReveal { game_id, .. }
            | GameEvent::GameResolved { game_id, .. }
            | GameEvent::GameCancelled { game_id, .. }
            | GameEvent::UnplayedGameReclaimed { game_id, .. }
            | GameEvent::UnrevealedGameClaimed { game_id, .. } => Some(game_id),
            GameEvent::Withdrawal { .. } => None,
        }
    }

    /// Does any indexed identity field name this principal?
    pub fn involves(&self, principal: &PrincipalId) -> bool {
        match self {
            GameEvent::GameCreated { player1, player2, .. }
            | GameEvent::GameReadyForReveal { player1, player2, .. } => {
                player1 == principal || player2 == principal
            }
            GameEvent::GameResolved { winner, .. } => winner.as_ref() == Some(principal),
            GameEvent::GameCancelled { cancelled_by, .. } => cancelled_by == principal,
            GameEvent::UnplayedGameReclaimed { claimed_by, .. }
            | GameEvent::UnrevealedGameClaimed { claimed_by, .. } => claimed_by == principal,
            GameEvent::Withdrawal { who, .. } => who == principal,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::GameCreated { .. } => "GameCreated",
            GameEvent::GameReadyForReveal { .. } => "GameReadyForReveal",
            GameEvent::GameResolved { .. } => "GameResolved",
            GameEvent::GameCancelled { .. } => "GameCancelled",
            GameEvent::UnplayedGameReclaimed { .. } => "UnplayedGameReclaimed",
            GameEvent::UnrevealedGameClaimed { .. } => "UnrevealedGameClaimed",
            GameEvent::Withdrawal { .. } => "Withdrawal",
        }
    }
}
