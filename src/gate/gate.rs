//! PoolGate implementation

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::Instrument;

use super::options::{ConnectOptions, ConnectRequest};
use super::state::GatePhase;
use crate::driver::Driver;
use crate::error::{Error, Result};

/// Result every waiter on one connect attempt shares. The error is behind an
/// `Arc` so waiters receive the driver's error itself, not a copy.
type AttemptResult<D> = std::result::Result<<D as Driver>::Handle, Arc<<D as Driver>::Error>>;

/// The in-flight marker: a shared future all concurrent callers clone and
/// await, so the driver connect runs at most once per attempt.
type Attempt<D> = Shared<BoxFuture<'static, AttemptResult<D>>>;

enum GateState<D: Driver> {
    Empty,
    Connecting { epoch: u64, attempt: Attempt<D> },
    Connected { handle: D::Handle },
}

impl<D: Driver> GateState<D> {
    fn phase(&self) -> GatePhase {
        match self {
            Self::Empty => GatePhase::Empty,
            Self::Connecting { .. } => GatePhase::Connecting,
            Self::Connected { .. } => GatePhase::Connected,
        }
    }
}

/// Previous occupant of the gate, retired at the start of a replacing
/// attempt's future.
enum Retired<D: Driver> {
    Handle(D::Handle),
    Attempt(Attempt<D>),
}

struct GateInner<D: Driver> {
    driver: D,
    state: Mutex<GateState<D>>,
    /// Source of attempt epochs. A settling attempt only writes the gate
    /// state while its epoch is still the one stored in `Connecting`.
    epochs: AtomicU64,
}

/// Front door to one shared driver handle.
///
/// The gate owns at most one live handle and at most one in-flight connect
/// attempt at a time. The first caller dials; callers that arrive during the
/// dial join it and observe the same result; callers that arrive after get
/// the stored handle back without touching the driver. Cloning the gate is
/// cheap and every clone fronts the same handle.
///
/// An owned instance, passed to whoever needs it. Nothing here is a global.
///
/// # Examples
///
/// ```
/// use poolgate::driver::MemoryDriver;
/// use poolgate::{ConnectRequest, PoolGate};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let gate = PoolGate::new(MemoryDriver::new());
///
/// // First call dials the driver.
/// let handle = gate
///     .get_connection(ConnectRequest::to("memory://primary").pool_size(3))
///     .await?;
///
/// // Later calls reuse it, whatever parameters they carry.
/// let again = gate.get_connection(ConnectRequest::reuse()).await?;
/// assert_eq!(handle, again);
/// assert_eq!(gate.driver().stats().connects, 1);
/// # Ok(())
/// # }
/// ```
pub struct PoolGate<D: Driver> {
    inner: Arc<GateInner<D>>,
}

impl<D: Driver> Clone for PoolGate<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Driver> fmt::Debug for PoolGate<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolGate")
            .field("phase", &self.phase())
            .finish()
    }
}

impl<D: Driver> PoolGate<D> {
    /// Create an empty gate in front of `driver`. No connection is made
    /// until the first connect-shaped call.
    pub fn new(driver: D) -> Self {
        Self {
            inner: Arc::new(GateInner {
                driver,
                state: Mutex::new(GateState::Empty),
                epochs: AtomicU64::new(0),
            }),
        }
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &D {
        &self.inner.driver
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> GatePhase {
        self.inner
            .state
            .lock()
            .expect("gate state lock poisoned")
            .phase()
    }

    /// Get the shared handle, connecting lazily if needed.
    ///
    /// A stored handle is returned without suspending; the request's
    /// uri/options are ignored in that case, so parameterless
    /// ([`ConnectRequest::reuse`]) calls work whenever anything is connected
    /// or connecting. If an attempt is in flight the caller joins it and
    /// receives its result, success or failure, without a second dial. Only
    /// on an empty gate does the request's URI get dialed; an empty gate and
    /// no URI is [`Error::MissingUri`].
    ///
    /// A failed attempt leaves the gate empty again, so the next call
    /// retries.
    pub async fn get_connection(&self, request: ConnectRequest) -> Result<D::Handle, D::Error> {
        let attempt = {
            let mut state = self.inner.state.lock().expect("gate state lock poisoned");
            match &*state {
                GateState::Connected { handle } => {
                    crate::metrics::counters::handle_reused();
                    tracing::debug!("reusing stored handle");
                    return Ok(handle.clone());
                }
                GateState::Connecting { attempt, .. } => {
                    crate::metrics::counters::connect_joined();
                    tracing::debug!("joining in-flight connect attempt");
                    attempt.clone()
                }
                GateState::Empty => {
                    let Some(uri) = request.uri else {
                        return Err(Error::MissingUri);
                    };
                    self.begin_attempt(uri, request.options, None, &mut state)
                }
            }
        };

        attempt.await.map_err(Error::Connect)
    }

    /// Alias of [`get_connection`](Self::get_connection).
    ///
    /// Non-destructive: an existing handle or in-flight attempt always wins
    /// over the request's parameters. Use [`reconnect`](Self::reconnect) to
    /// repoint the gate at a different backing resource.
    pub async fn connect(&self, request: ConnectRequest) -> Result<D::Handle, D::Error> {
        self.get_connection(request).await
    }

    /// Discard whatever the gate holds and dial the request's URI.
    ///
    /// The swap is atomic from other callers' point of view: the gate moves
    /// straight to a new in-flight attempt, so a concurrent
    /// [`get_connection`](Self::get_connection) joins the new attempt rather
    /// than observing an empty gate and dialing its own. The new attempt
    /// first retires the previous occupant (closes a stored handle, or
    /// drains a superseded pending attempt and closes the handle it
    /// produced), then dials. Waiters already on a superseded attempt still
    /// receive that attempt's own result.
    ///
    /// Unlike `get_connection`, a URI is always required.
    pub async fn reconnect(&self, request: ConnectRequest) -> Result<D::Handle, D::Error> {
        let Some(uri) = request.uri else {
            return Err(Error::MissingUri);
        };

        let attempt = {
            let mut state = self.inner.state.lock().expect("gate state lock poisoned");
            let retired = match std::mem::replace(&mut *state, GateState::Empty) {
                GateState::Empty => None,
                GateState::Connected { handle } => Some(Retired::Handle(handle)),
                GateState::Connecting { attempt, .. } => Some(Retired::Attempt(attempt)),
            };
            self.begin_attempt(uri, request.options, retired, &mut state)
        };

        attempt.await.map_err(Error::Connect)
    }

    /// The stored handle, if any. Never blocks, never connects.
    pub fn db(&self) -> Option<D::Handle> {
        match &*self.inner.state.lock().expect("gate state lock poisoned") {
            GateState::Connected { handle } => Some(handle.clone()),
            _ => None,
        }
    }

    /// Project the named sub-resource from the stored handle.
    ///
    /// Pure projection via [`Driver::collection`]; `None` while not
    /// connected.
    pub fn collection(&self, name: &str) -> Option<D::Collection> {
        let handle = self.db()?;
        Some(self.inner.driver.collection(&handle, name))
    }

    /// Release the stored handle, if any.
    ///
    /// The gate forgets the handle before the driver close runs, so even a
    /// failed close ([`Error::Close`]) leaves the gate empty and a later
    /// connect starts fresh instead of reusing a half-closed handle. On an
    /// empty gate this is a no-op, including while a connect attempt is
    /// still in flight (there is no handle to release yet; the attempt
    /// settles normally).
    pub async fn close_pool(&self, force: bool) -> Result<(), D::Error> {
        let handle = {
            let mut state = self.inner.state.lock().expect("gate state lock poisoned");
            match std::mem::replace(&mut *state, GateState::Empty) {
                GateState::Connected { handle } => Some(handle),
                other => {
                    *state = other;
                    None
                }
            }
        };

        let Some(handle) = handle else {
            tracing::debug!("close_pool on empty gate, nothing to release");
            return Ok(());
        };

        crate::metrics::counters::pool_closed(force);
        tracing::debug!(force, "releasing stored handle");
        self.inner.driver.close(handle, force).await.map_err(|error| {
            crate::metrics::counters::close_failed();
            tracing::warn!("driver close failed: {}", error);
            Error::Close(error)
        })
    }

    /// Install a fresh in-flight attempt. Called with the state lock held;
    /// the gate is `Connecting` before the lock is released, so no caller
    /// can slip in between the old state and the new attempt.
    fn begin_attempt(
        &self,
        uri: String,
        options: ConnectOptions,
        retired: Option<Retired<D>>,
        state: &mut GateState<D>,
    ) -> Attempt<D> {
        let epoch = self.inner.epochs.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        let span = tracing::debug_span!("connect_attempt", %uri, epoch);

        let future = async move {
            if let Some(previous) = retired {
                retire(&inner, previous).await;
            }

            crate::metrics::counters::connect_attempted();
            let started = Instant::now();
            let result = inner.driver.connect(&uri, &options).await;

            // Settle under the lock: waiters released by this future never
            // observe a success the gate has not stored yet. `current` is
            // false when a replacing attempt has taken over in the meantime;
            // that attempt owns the state now.
            let mut state = inner.state.lock().expect("gate state lock poisoned");
            let current =
                matches!(&*state, GateState::Connecting { epoch: e, .. } if *e == epoch);
            match result {
                Ok(handle) => {
                    crate::metrics::counters::connect_succeeded();
                    crate::metrics::histograms::connect_duration(
                        started.elapsed().as_millis() as u64,
                    );
                    if current {
                        debug_assert!(state.phase().can_transition_to(GatePhase::Connected));
                        *state = GateState::Connected {
                            handle: handle.clone(),
                        };
                        tracing::debug!("connect succeeded, handle stored");
                    } else {
                        tracing::debug!("connect succeeded but attempt was superseded");
                    }
                    Ok(handle)
                }
                Err(error) => {
                    crate::metrics::counters::connect_failed(
                        crate::metrics::labels::REASON_DRIVER,
                    );
                    if current {
                        debug_assert!(state.phase().can_transition_to(GatePhase::Empty));
                        *state = GateState::Empty;
                    }
                    tracing::debug!("connect failed: {}", error);
                    Err(Arc::new(error))
                }
            }
        };

        let attempt = future.instrument(span).boxed().shared();
        debug_assert!(state.phase().can_transition_to(GatePhase::Connecting));
        *state = GateState::Connecting {
            epoch,
            attempt: attempt.clone(),
        };
        attempt
    }
}

/// Close out the previous occupant of the gate before a replacing dial. A
/// superseded pending attempt is drained first; its error, if any, already
/// went to its own waiters and needs nothing from us.
async fn retire<D: Driver>(inner: &GateInner<D>, previous: Retired<D>) {
    let handle = match previous {
        Retired::Handle(handle) => Some(handle),
        Retired::Attempt(attempt) => attempt.await.ok(),
    };

    if let Some(handle) = handle {
        crate::metrics::counters::pool_closed(false);
        tracing::debug!("closing replaced handle");
        if let Err(error) = inner.driver.close(handle, false).await {
            crate::metrics::counters::close_failed();
            tracing::warn!("failed to close replaced handle: {}", error);
        }
    }
}
