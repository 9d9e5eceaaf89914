//! Host runtime abstraction: clock, pause gate and escrow custody.

mod simulated;
mod traits;

pub use simulated::SimulatedHost;
pub use traits::{CircuitBreaker, Clock, Custody, CustodyError, Host};
