//! Driver boundary.
//!
//! The gate never speaks a wire protocol itself. Everything transport-shaped
//! * dialing and authentication
//! * pooling internals
//! * releasing connections
//!
//! lives behind the [`Driver`] trait; the gate only decides *when* those
//! calls happen and who shares their results.

mod memory;

pub use memory::{MemoryCollection, MemoryDriver, MemoryError, MemoryHandle, MemoryStats};

use async_trait::async_trait;

use crate::gate::ConnectOptions;

/// Contract the gate requires from a backing driver.
///
/// Implementations wrap a concrete client library. `connect` is expected to
/// hand back the library's cheap-to-clone front door (a pool handle or
/// client object) rather than a raw socket; the gate shares clones of it
/// freely across tasks.
#[async_trait]
pub trait Driver: Send + Sync + 'static {
    /// Established-connection handle.
    ///
    /// Cloning must be cheap, and every clone must refer to the same
    /// underlying connection or pool front door.
    type Handle: Clone + Send + Sync + 'static;

    /// Named sub-resource projected from a handle (a collection, table, or
    /// keyspace reference).
    type Collection;

    /// Driver-defined error, surfaced to gate callers verbatim.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Establish a connection to `uri`.
    ///
    /// `options` ride through from the caller unchanged; the gate never
    /// interprets them.
    async fn connect(
        &self,
        uri: &str,
        options: &ConnectOptions,
    ) -> Result<Self::Handle, Self::Error>;

    /// Release `handle`. The caller's force-close flag passes through
    /// unchanged.
    async fn close(&self, handle: Self::Handle, force: bool) -> Result<(), Self::Error>;

    /// Project the named sub-resource out of `handle`. Must not perform I/O.
    fn collection(&self, handle: &Self::Handle, name: &str) -> Self::Collection;
}
