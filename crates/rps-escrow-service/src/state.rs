//! Application state management.

use rps_escrow_core::{EngineConfig, GameEngine, SimulatedHost};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared application state.
///
/// One engine behind one mutex: each request runs its operation to
/// completion while holding the lock, which totally orders transactions.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<GameEngine<SimulatedHost>>>,
}

impl AppState {
    pub fn new(start_height: u64, config: EngineConfig) -> Self {
        Self::with_host(SimulatedHost::new(start_height), config)
    }

    pub fn with_host(host: SimulatedHost, config: EngineConfig) -> Self {
        Self {
            engine: Arc::new(Mutex::new(GameEngine::with_config(host, config))),
        }
    }

    /// Lock the engine for one transaction.
    pub fn engine(&self) -> MutexGuard<'_, GameEngine<SimulatedHost>> {
        // Operations validate before they mutate, so poisoned state is still consistent.
        self.engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(1, EngineConfig::default())
    }
}
