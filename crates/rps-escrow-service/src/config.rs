//! Service configuration from the environment.

use rps_escrow_core::{BetPayment, CancelPolicy, EngineConfig};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    /// Height the simulated clock starts at
    pub start_height: u64,
    pub engine: EngineConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            start_height: 1,
            engine: EngineConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys keep their defaults, unparseable
    /// ones are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let engine = EngineConfig {
            grace_period: parse_or(&lookup, "RPS_GRACE_PERIOD", defaults.engine.grace_period),
            bet_payment: parse_or::<BetPayment>(&lookup, "RPS_BET_PAYMENT", defaults.engine.bet_payment),
            cancel_policy: parse_or::<CancelPolicy>(
                &lookup,
                "RPS_CANCEL_POLICY",
                defaults.engine.cancel_policy,
            ),
            enforce_reveal_deadline: parse_or(
                &lookup,
                "RPS_ENFORCE_REVEAL_DEADLINE",
                defaults.engine.enforce_reveal_deadline,
            ),
        };

        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            start_height: parse_or(&lookup, "RPS_START_HEIGHT", defaults.start_height),
            engine,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Ignoring {}={:?}: {}", key, raw, e);
            default
        }),
        None => default,
    }
}
