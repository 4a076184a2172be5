//! Callback-style adapters.
//!
//! One async primitive does the real work; these shims spawn it on the
//! ambient Tokio runtime and hand its result to a callback. Semantics are
//! identical to the async surface because the same code runs underneath.

use super::gate::PoolGate;
use super::options::ConnectRequest;
use crate::driver::Driver;
use crate::error::Result;

impl<D: Driver> PoolGate<D> {
    /// Callback-style [`get_connection`](Self::get_connection).
    ///
    /// Must be called from within a Tokio runtime; the callback runs on a
    /// spawned task once the connection resolves.
    pub fn get_connection_with<F>(&self, request: ConnectRequest, callback: F)
    where
        F: FnOnce(Result<D::Handle, D::Error>) + Send + 'static,
    {
        let gate = self.clone();
        tokio::spawn(async move {
            callback(gate.get_connection(request).await);
        });
    }

    /// Callback-style [`close_pool`](Self::close_pool).
    pub fn close_pool_with<F>(&self, force: bool, callback: F)
    where
        F: FnOnce(Result<(), D::Error>) + Send + 'static,
    {
        let gate = self.clone();
        tokio::spawn(async move {
            callback(gate.close_pool(force).await);
        });
    }

    /// Synchronous peek overload.
    ///
    /// Invokes the callback immediately with the stored handle or `None`.
    /// No side effects, no connect, no suspension.
    pub fn peek_connection<F, T>(&self, callback: F) -> T
    where
        F: FnOnce(Option<D::Handle>) -> T,
    {
        callback(self.db())
    }
}

#[cfg(test)]
mod tests {
    use crate::driver::MemoryDriver;
    use crate::{ConnectRequest, PoolGate};

    #[tokio::test]
    async fn test_peek_never_connects() {
        let gate = PoolGate::new(MemoryDriver::new());

        let peeked = gate.peek_connection(|handle| handle);

        assert!(peeked.is_none());
        assert_eq!(gate.driver().stats().connects, 0);
    }

    #[tokio::test]
    async fn test_peek_sees_stored_handle() {
        let gate = PoolGate::new(MemoryDriver::new());
        let handle = gate
            .get_connection(ConnectRequest::to("memory://primary"))
            .await
            .expect("connect failed");

        let peeked = gate.peek_connection(|handle| handle).expect("peek empty");

        assert_eq!(peeked, handle);
    }
}
