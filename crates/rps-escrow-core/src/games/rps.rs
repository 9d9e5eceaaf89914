//! Rock-Paper-Scissors choices and the outcome resolver.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag reserved for "no choice made yet".
pub const UNSET_TAG: u8 = 0;

/// A hand in Rock-Paper-Scissors.
///
/// Each variant carries the integer tag used on the wire and inside the
/// commitment digest. Tag 0 is reserved for "unset" and never decodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Choice {
    Rock = 1,
    Paper = 2,
    Scissors = 3,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// Integer tag in {1, 2, 3}
    pub fn tag(&self) -> u8 {
        *self as u8
    }

    /// Decode a wire tag. `0` (unset) and anything above 3 are rejected.
    pub fn from_tag(tag: u8) -> Result<Self, EngineError> {
        match tag {
            1 => Ok(Choice::Rock),
            2 => Ok(Choice::Paper),
            3 => Ok(Choice::Scissors),
            other => Err(EngineError::InvalidChoice(other)),
        }
    }

    /// Check if this choice beats the other
    pub fn beats(&self, other: &Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Rock, Choice::Scissors)
                | (Choice::Scissors, Choice::Paper)
                | (Choice::Paper, Choice::Rock)
        )
    }
}

impl TryFrom<u8> for Choice {
    type Error = EngineError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Choice::from_tag(tag)
    }
}

impl From<Choice> for u8 {
    fn from(choice: Choice) -> Self {
        choice.tag()
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Rock => write!(f, "Rock"),
            Choice::Paper => write!(f, "Paper"),
            Choice::Scissors => write!(f, "Scissors"),
        }
    }
}

/// Result of one round, seen from the seats rather than the identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Player1Wins,
    Player2Wins,
    Draw,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Player1Wins => "player 1 wins",
            Outcome::Player2Wins => "player 2 wins",
            Outcome::Draw => "draw",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map a pair of revealed choices to the round's outcome.
pub fn resolve(p1: Choice, p2: Choice) -> Outcome {
    if p1 == p2 {
        Outcome::Draw
    } else if p1.beats(&p2) {
        Outcome::Player1Wins
    } else {
        Outcome::Player2Wins
    }
}
