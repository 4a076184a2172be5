//! # poolgate
//!
//! A lazy, race-safe front door to one shared database connection.
//!
//! Modern database drivers pool transport connections behind a single
//! cheap-to-clone client handle, so an application wants exactly one of
//! those handles: created on first use, shared everywhere, replaced or
//! released deliberately. [`PoolGate`] owns that handle. The first caller
//! dials the driver; callers that arrive during the dial join the in-flight
//! attempt and observe the same result; callers that arrive after get the
//! stored handle back without touching the driver. However many tasks ask,
//! the driver connects once.
//!
//! The driver itself stays opaque behind the [`Driver`] trait: transport,
//! authentication, and pooling internals are its business. The gate only
//! decides when its connect and close run and who shares their results.
//!
//! ## Example
//!
//! ```
//! use poolgate::driver::MemoryDriver;
//! use poolgate::{ConnectRequest, PoolGate};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gate = PoolGate::new(MemoryDriver::new());
//!
//! // First call dials.
//! let handle = gate
//!     .get_connection(ConnectRequest::to("memory://primary").pool_size(3))
//!     .await?;
//!
//! // Ten more calls, zero more connects.
//! for _ in 0..10 {
//!     let again = gate.get_connection(ConnectRequest::reuse()).await?;
//!     assert_eq!(again, handle);
//! }
//! assert_eq!(gate.driver().stats().connects, 1);
//!
//! gate.close_pool(false).await?;
//! assert!(gate.db().is_none());
//! # Ok(())
//! # }
//! ```

pub mod driver;
pub mod error;
pub mod gate;
pub mod metrics;

pub use driver::Driver;
pub use error::{Error, Result};
pub use gate::{ConnectOptions, ConnectRequest, GatePhase, PoolGate};
