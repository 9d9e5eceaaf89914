//! Keyed store of game records.

use crate::crypto::Commitment;
use crate::protocol::GameRecord;
use std::collections::{HashMap, HashSet};

/// Games keyed by commitment, plus every commitment ever accepted.
///
/// Settled records stay in `games` so they can still be queried. The
/// `used` set is kept apart from it and is never pruned, so a commitment
/// cannot come back even if settled records are dropped later.
#[derive(Clone, Debug, Default)]
pub struct GameRegistry {
    games: HashMap<Commitment, GameRecord>,
    used: HashSet<Commitment>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &Commitment) -> Option<&GameRecord> {
        self.games.get(id)
    }

    pub fn get_mut(&mut self, id: &Commitment) -> Option<&mut GameRecord> {
        self.games.get_mut(id)
    }

    /// Is `id` the key of a game that has not settled yet?
    pub fn is_live(&self, id: &Commitment) -> bool {
        self.games.get(id).is_some_and(GameRecord::is_live)
    }

    /// Has `id` ever keyed a game?
    pub fn was_used(&self, id: &Commitment) -> bool {
        self.used.contains(id)
    }

    /// Store a new game and burn its commitment.
    ///
    /// Callers check [`is_live`](Self::is_live) and
    /// [`was_used`](Self::was_used) first.
    pub fn insert(&mut self, id: Commitment, record: GameRecord) {
        self.used.insert(id);
        self.games.insert(id, record);
    }

    pub fn live(&self) -> impl Iterator<Item = (&Commitment, &GameRecord)> {
        self.games.iter().filter(|(_, g)| g.is_live())
    }

    /// Drop settled records. Their commitments stay burned.
    pub fn prune_settled(&mut self) -> usize {
        let before = self.games.len();
        self.games.retain(|_, g| g.is_live());
        before - self.games.len()
    }

    /// Stored records, settled or not
    pub fn count(&self) -> usize {
        self.games.len()
    }
}
