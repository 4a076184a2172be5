//! In-memory driver for demos and tests.
//!
//! Connects never touch the network: each successful connect mints a fresh
//! [`MemoryHandle`] and bumps shared counters that callers can assert on.
//! Failures can be scripted with [`MemoryDriver::fail_next`], and a synthetic
//! connect latency widens race windows on demand.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::Driver;
use crate::gate::ConnectOptions;

/// Error produced by [`MemoryDriver`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("memory driver: {0}")]
pub struct MemoryError(pub String);

#[derive(Debug, Default)]
struct Ledger {
    connects: AtomicU64,
    open: AtomicU64,
    forced_closes: AtomicU64,
}

/// Snapshot of driver activity.
///
/// The in-memory stand-in for asking a real server how many clients it sees.
/// With one gate in front, `connects` stays at 1 no matter how many tasks
/// ask for the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    /// Total connects ever performed.
    pub connects: u64,
    /// Handles currently open.
    pub open: u64,
    /// Closes requested with the force flag set.
    pub forced_closes: u64,
}

/// An in-memory [`Driver`].
///
/// # Examples
///
/// ```
/// use poolgate::driver::{Driver, MemoryDriver};
/// use poolgate::ConnectOptions;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let driver = MemoryDriver::new();
/// let handle = driver
///     .connect("memory://primary", &ConnectOptions::new())
///     .await
///     .unwrap();
///
/// assert_eq!(handle.uri(), "memory://primary");
/// assert_eq!(driver.stats().connects, 1);
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryDriver {
    ledger: Arc<Ledger>,
    fail_queue: Mutex<VecDeque<String>>,
    latency: Option<Duration>,
    next_id: AtomicU64,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(Ledger::default()),
            fail_queue: Mutex::new(VecDeque::new()),
            latency: None,
            next_id: AtomicU64::new(1),
        }
    }

    /// Like [`new`](Self::new), but every connect sleeps for `latency`
    /// before completing.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::new()
        }
    }

    /// Queue a failure for an upcoming connect.
    ///
    /// Each call queues one failure; connects consume the queue in order
    /// before succeeding again.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.fail_queue
            .lock()
            .expect("fail queue lock poisoned")
            .push_back(message.into());
    }

    /// Current activity counters.
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            connects: self.ledger.connects.load(Ordering::SeqCst),
            open: self.ledger.open.load(Ordering::SeqCst),
            forced_closes: self.ledger.forced_closes.load(Ordering::SeqCst),
        }
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle minted by [`MemoryDriver::connect`].
///
/// Clones share the handle identity; two handles compare equal exactly when
/// they came from the same connect.
#[derive(Debug, Clone)]
pub struct MemoryHandle {
    id: u64,
    uri: Arc<str>,
    pool_size: Option<u32>,
    ledger: Arc<Ledger>,
}

impl MemoryHandle {
    /// Identity of the connect that minted this handle.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// URI this handle was dialed with.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Pool size requested at connect time, if any.
    pub fn pool_size(&self) -> Option<u32> {
        self.pool_size
    }

    /// Driver-wide activity counters, observed through the handle.
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            connects: self.ledger.connects.load(Ordering::SeqCst),
            open: self.ledger.open.load(Ordering::SeqCst),
            forced_closes: self.ledger.forced_closes.load(Ordering::SeqCst),
        }
    }
}

impl PartialEq for MemoryHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MemoryHandle {}

/// Named sub-resource projected from a [`MemoryHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCollection {
    handle_id: u64,
    name: String,
}

impl MemoryCollection {
    /// Name the collection was projected under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity of the handle this collection was projected from.
    pub fn handle_id(&self) -> u64 {
        self.handle_id
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    type Handle = MemoryHandle;
    type Collection = MemoryCollection;
    type Error = MemoryError;

    async fn connect(
        &self,
        uri: &str,
        options: &ConnectOptions,
    ) -> Result<MemoryHandle, MemoryError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let scripted = self
            .fail_queue
            .lock()
            .expect("fail queue lock poisoned")
            .pop_front();
        if let Some(message) = scripted {
            return Err(MemoryError(message));
        }

        self.ledger.connects.fetch_add(1, Ordering::SeqCst);
        self.ledger.open.fetch_add(1, Ordering::SeqCst);

        Ok(MemoryHandle {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            uri: uri.into(),
            pool_size: options.pool_size,
            ledger: Arc::clone(&self.ledger),
        })
    }

    async fn close(&self, _handle: MemoryHandle, force: bool) -> Result<(), MemoryError> {
        self.ledger.open.fetch_sub(1, Ordering::SeqCst);
        if force {
            self.ledger.forced_closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn collection(&self, handle: &MemoryHandle, name: &str) -> MemoryCollection {
        MemoryCollection {
            handle_id: handle.id,
            name: name.to_string(),
        }
    }
}
