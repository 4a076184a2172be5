//! The connection singleton.
//!
//! This module handles:
//! * Lazy, create-once acquisition of the shared handle
//! * Deduplication of concurrent connect attempts
//! * Close and replace lifecycle operations
//! * Callback-style adapters over the async surface

mod callback;
mod gate;
mod options;
mod state;

pub use gate::PoolGate;
pub use options::{ConnectOptions, ConnectRequest};
pub use state::GatePhase;
