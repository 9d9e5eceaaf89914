//! Commitment and Secret for the commit-reveal scheme.

use crate::error::{EngineError, Result};
use crate::games::Choice;
use crate::protocol::PrincipalId;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Secret phrase mixed into a commitment
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Create a new random 32-byte secret
    pub fn random() -> Self {
        let mut bytes = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Use a human-chosen phrase as the secret
    pub fn from_phrase(phrase: &str) -> Self {
        Self(phrase.as_bytes().to_vec())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({} bytes)", self.0.len())
    }
}

/// Commitment = H(choice || opponent || secret || committer)
///
/// Also serves as the game identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// Bind a choice to an opponent, a secret and the committing principal.
    ///
    /// Both identities are fixed width, so the variable-length secret between
    /// them cannot be shifted into a neighbouring field.
    pub fn new(choice: Choice, opponent: &PrincipalId, secret: &Secret, committer: &PrincipalId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update([choice.tag()]);
        hasher.update(opponent.as_bytes());
        hasher.update(secret.as_bytes());
        hasher.update(committer.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify that the revealed inputs reproduce this commitment
    pub fn verify(&self, choice: Choice, opponent: &PrincipalId, secret: &Secret, committer: &PrincipalId) -> bool {
        *self == Self::new(choice, opponent, secret, committer)
    }
}

/// Compute a commitment from a raw choice tag.
///
/// This is the view a prospective player 1 calls before creating a game.
pub fn compute_commitment(
    choice: u8,
    opponent: &PrincipalId,
    secret: &Secret,
    caller: &PrincipalId,
) -> Result<Commitment> {
    let choice = Choice::from_tag(choice)?;
    Ok(Commitment::new(choice, opponent, secret, caller))
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Commitment {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| EngineError::MalformedCommitment(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        hex::encode(self.0).serialize(s)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let hex_str = String::deserialize(d)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}
