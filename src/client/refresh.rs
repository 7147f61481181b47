//! Credential refresh with single-flight coordination.
//!
//! A [`Refresh`] pairs a trigger status with an async operation that renews
//! credentials. The executor runs it through a [`RefreshCoordinator`], which
//! guarantees that at most one refresh is in flight per coordinator:
//!
//! 1. The first caller to see the trigger status spawns the operation and
//!    stores a shared handle to it.
//! 2. Callers arriving while it is pending await that same handle and observe
//!    the same success or the same failure.
//! 3. The handle is cleared when the spawned task finishes, whether the
//!    operation succeeds, fails or panics, so the next trigger after
//!    settlement starts a fresh refresh.
//!
//! The operation runs as its own tokio task, so dropping a waiting caller
//! never cancels a refresh that other callers are joined to.

use crate::error::{BoxError, RefreshError};
use crate::protocol::Status;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type RefreshAction = Arc<dyn Fn() -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;
type SharedRefresh = Shared<BoxFuture<'static, Result<(), RefreshError>>>;

/// Refresh descriptor: trigger status plus the operation to run.
///
/// # Examples
///
/// ```
/// use netman::{Refresh, Status};
///
/// let refresh = Refresh::new(Status::Unauthorized, || async {
///     // exchange the refresh token here
///     Ok::<_, std::io::Error>(())
/// });
/// assert_eq!(refresh.status(), Status::Unauthorized);
/// ```
#[derive(Clone)]
pub struct Refresh {
    status: Status,
    action: RefreshAction,
}

impl Refresh {
    /// Run `action` whenever a refresh-eligible request receives `status`.
    pub fn new<F, Fut, E>(status: Status, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Refresh {
            status,
            action: Arc::new(move || {
                action()
                    .map(|result| result.map_err(|e| -> BoxError { e.into() }))
                    .boxed()
            }),
        }
    }

    /// Status that triggers the refresh.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether a response with `code` triggers the refresh.
    pub fn is_triggered_by(&self, code: u16) -> bool {
        self.status.code() == code
    }
}

impl fmt::Debug for Refresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refresh")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

struct InFlight {
    generation: u64,
    handle: SharedRefresh,
}

#[derive(Default)]
struct Slot {
    next_generation: u64,
    in_flight: Option<InFlight>,
}

/// Runs a [`Refresh`] with at most one operation in flight.
pub struct RefreshCoordinator {
    refresh: Refresh,
    slot: Arc<Mutex<Slot>>,
}

impl RefreshCoordinator {
    /// Coordinator for `refresh`.
    pub fn new(refresh: Refresh) -> Self {
        RefreshCoordinator {
            refresh,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// The coordinated descriptor.
    pub fn refresh(&self) -> &Refresh {
        &self.refresh
    }

    /// Whether a refresh is currently pending.
    pub fn is_in_flight(&self) -> bool {
        self.slot.lock().in_flight.is_some()
    }

    /// Join the pending refresh or start a new one, then wait for it.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn run(&self) -> Result<(), RefreshError> {
        self.join_or_start().await
    }

    fn join_or_start(&self) -> SharedRefresh {
        let mut slot = self.slot.lock();
        if let Some(in_flight) = &slot.in_flight {
            tracing::debug!(generation = in_flight.generation, "joining in-flight credential refresh");
            return in_flight.handle.clone();
        }

        let generation = slot.next_generation;
        slot.next_generation += 1;
        tracing::info!(generation, trigger = %self.refresh.status, "starting credential refresh");

        let action = Arc::clone(&self.refresh.action);
        let shared_slot = Arc::clone(&self.slot);
        // The slot lock is held until the handle is stored, so the task
        // cannot clear it before it exists.
        let task = tokio::spawn(async move {
            let _clear = ClearOnSettle {
                slot: shared_slot,
                generation,
            };
            action().await.map_err(RefreshError::from)
        });

        let handle = async move {
            match task.await {
                Ok(result) => result,
                Err(join_error) => Err(Arc::new(join_error) as RefreshError),
            }
        }
        .boxed()
        .shared();

        slot.in_flight = Some(InFlight {
            generation,
            handle: handle.clone(),
        });
        handle
    }
}

/// Empties the slot when the refresh task ends. Runs on unwind and on abort
/// too, so a panicking operation cannot leave a settled handle behind.
struct ClearOnSettle {
    slot: Arc<Mutex<Slot>>,
    generation: u64,
}

impl Drop for ClearOnSettle {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        if slot
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.generation == self.generation)
        {
            slot.in_flight = None;
        }
    }
}

impl fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refresh", &self.refresh)
            .field("in_flight", &self.is_in_flight())
            .finish()
    }
}
