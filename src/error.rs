//! Gate error types.
//!
//! Driver-level failures pass through unmodified: the gate names which
//! operation the driver was performing but never rewrites the error itself.

use std::sync::Arc;

use thiserror::Error;

/// Convenience alias; `E` is the wrapped driver's error type.
pub type Result<T, E> = std::result::Result<T, Error<E>>;

/// Errors surfaced by a [`PoolGate`](crate::PoolGate).
///
/// Querying the gate before any connect is *not* an error: `db()` and
/// `collection()` return `None` for that case, since callers legitimately
/// poll before connecting.
#[derive(Debug, Error)]
pub enum Error<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The driver rejected or could not establish the connection.
    ///
    /// Every caller waiting on the same connect attempt receives this exact
    /// driver error (shared, not re-created per waiter). The gate is empty
    /// again once this is returned; a later call may retry.
    #[error("connect failed: {0}")]
    Connect(#[source] Arc<E>),

    /// The driver failed to release the connection cleanly.
    ///
    /// The gate has already forgotten the handle by the time this is
    /// returned, so a subsequent connect starts fresh rather than reusing a
    /// half-closed handle.
    #[error("close failed: {0}")]
    Close(#[source] E),

    /// A connect-shaped call carried no URI while nothing was connected and
    /// no attempt was in flight, leaving the gate nothing to reuse, join, or
    /// dial.
    #[error("no connection established and no uri to dial")]
    MissingUri,
}

impl<E> Error<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The driver error behind a [`Error::Connect`] or [`Error::Close`], if
    /// this is one of those.
    pub fn driver_error(&self) -> Option<&E> {
        match self {
            Self::Connect(e) => Some(e),
            Self::Close(e) => Some(e),
            Self::MissingUri => None,
        }
    }
}
