//! Game definitions and logic.

mod rps;

pub use rps::{resolve, Choice, Outcome, UNSET_TAG};
