//! Cryptographic primitives for the commit-reveal scheme.

mod commitment;

pub use commitment::{compute_commitment, Commitment, Secret};
