//! Per-endpoint rate gate
//!
//! The [`RateGate`] decides when a request for a given [`EndpointKey`] may
//! hit the network. Every key owns an independent gate with:
//!
//! - a FIFO admission queue, so requests leave in the order they arrived;
//! - a concurrency limit (1 until the server reports a larger quota);
//! - a permit counter and a reset deadline fed from response headers.
//!
//! When the permit counter is exhausted, admission sleeps until the reset
//! deadline instead of firing a request that is already known to be
//! rejected. Replenishment is lazy: the deadline is checked at the next
//! admission, so no timers outlive a gate.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use yunite_api::{endpoint::EndpointKey, gate::RateGate};
//!
//! # async fn example() {
//! let gate = RateGate::new();
//! let key = EndpointKey::new("/app");
//! let answer = gate.enqueue(&key, || async { 42 }).await;
//! gate.update_rate_limit(&key, Duration::from_secs(2));
//! gate.update_concurrency(&key, 5);
//! # }
//! ```

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use dashmap::DashMap;
use tokio::{
    sync::{watch, Mutex as AsyncMutex},
    time::Instant,
};
use tracing::debug;

use crate::endpoint::EndpointKey;

// ============================================================================
// GateState
// ============================================================================

/// Mutable bookkeeping for one endpoint, protected by a Mutex.
#[derive(Debug)]
struct GateState {
    /// Requests allowed in flight at once
    concurrency_limit: u32,
    /// Permits left before the reset deadline; may dip below zero transiently
    available_permits: i64,
    /// When permits return to `concurrency_limit`; `None` if no window is open
    reset_deadline: Option<Instant>,
    /// Requests admitted and not yet finished
    in_flight: u32,
}

impl GateState {
    fn new() -> Self {
        Self {
            concurrency_limit: 1,
            available_permits: 1,
            reset_deadline: None,
            in_flight: 0,
        }
    }

    /// Refills permits once the window is over.
    ///
    /// An exhausted counter without an open window belongs to a route the
    /// server does not meter, and is refilled immediately.
    fn refresh(&mut self, now: Instant) {
        match self.reset_deadline {
            Some(deadline) if now >= deadline => {
                self.available_permits = i64::from(self.concurrency_limit);
                self.reset_deadline = None;
            }
            None if self.available_permits <= 0 => {
                self.available_permits = i64::from(self.concurrency_limit);
            }
            _ => {}
        }
    }
}

/// Point-in-time view of an endpoint's gate, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSnapshot {
    pub concurrency_limit: u32,
    pub available_permits: i64,
    /// Time left until the reset deadline, if a window is open
    pub reset_in: Option<Duration>,
    pub in_flight: u32,
}

/// What an admission attempt has to wait for.
enum Wait {
    /// A running request must finish, or the limit must rise
    Slot,
    /// The permit window must reset
    Deadline(Instant),
}

// ============================================================================
// EndpointGate
// ============================================================================

/// Gate for a single endpoint.
#[derive(Debug)]
struct EndpointGate {
    state: Mutex<GateState>,
    /// Held while a request waits for admission; tokio's Mutex is FIFO-fair,
    /// which is what orders requests for this endpoint.
    admission: AsyncMutex<()>,
    /// Bumped on every state change so a waiting admission re-evaluates.
    changed: watch::Sender<()>,
}

impl EndpointGate {
    fn new() -> Self {
        let (changed, _) = watch::channel(());
        Self {
            state: Mutex::new(GateState::new()),
            admission: AsyncMutex::new(()),
            changed,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.changed.send_replace(());
    }

    /// Waits for this request's turn, a free slot and a permit, then spends
    /// the permit. The returned guard frees the slot when dropped.
    async fn admit(self: &Arc<Self>, key: &EndpointKey) -> InFlight {
        let _turn = self.admission.lock().await;

        loop {
            // Subscribe before inspecting state so no change is missed.
            let mut changes = self.changed.subscribe();

            let wait = {
                let mut state = self.lock_state();
                state.refresh(Instant::now());

                if state.in_flight >= state.concurrency_limit {
                    Wait::Slot
                } else if state.available_permits <= 0 {
                    match state.reset_deadline {
                        Some(deadline) => Wait::Deadline(deadline),
                        None => Wait::Slot,
                    }
                } else {
                    state.available_permits -= 1;
                    state.in_flight += 1;
                    debug!(
                        endpoint = %key,
                        permits_left = state.available_permits,
                        in_flight = state.in_flight,
                        "Request admitted"
                    );
                    return InFlight {
                        gate: Arc::clone(self),
                    };
                }
            };

            match wait {
                Wait::Slot => {
                    debug!(endpoint = %key, "Waiting for an in-flight request to finish");
                    let _ = changes.changed().await;
                }
                Wait::Deadline(deadline) => {
                    debug!(
                        endpoint = %key,
                        wait_ms = deadline.saturating_duration_since(Instant::now()).as_millis(),
                        "Permits exhausted, holding request until reset"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep_until(deadline) => {}
                        _ = changes.changed() => {}
                    }
                }
            }
        }
    }
}

/// An admitted request. Dropping it, whether the request completed or was
/// cancelled, returns its concurrency slot. The permit stays spent.
#[derive(Debug)]
struct InFlight {
    gate: Arc<EndpointGate>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        {
            let mut state = self.gate.lock_state();
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        self.gate.notify();
    }
}

// ============================================================================
// RateGate
// ============================================================================

/// Registry of per-endpoint gates.
///
/// Gates are created on first use and live as long as the registry. Keys
/// never contend with each other. Thread-safe; share it by reference or
/// through an `Arc`.
#[derive(Debug, Default)]
pub struct RateGate {
    gates: DashMap<EndpointKey, Arc<EndpointGate>>,
}

impl RateGate {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets or creates the gate for `key`.
    fn gate_for(&self, key: &EndpointKey) -> Arc<EndpointGate> {
        if let Some(gate) = self.gates.get(key) {
            return Arc::clone(gate.value());
        }

        let entry = self.gates.entry(key.clone()).or_insert_with(|| {
            debug!(endpoint = %key, "Creating rate gate for endpoint");
            Arc::new(EndpointGate::new())
        });
        Arc::clone(entry.value())
    }

    /// Runs `task` once `key` admits it and returns its output.
    ///
    /// Tasks for one key start in the order `enqueue` was called. With the
    /// default limit of 1 each task runs to completion before the next one
    /// starts. If the key's permits are exhausted the task is held until
    /// the reset deadline. Starting the task spends a permit, whatever the
    /// task's outcome.
    pub async fn enqueue<F, Fut, T>(&self, key: &EndpointKey, task: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let gate = self.gate_for(key);
        let _slot = gate.admit(key).await;
        task().await
    }

    /// Records a server-reported window: no permits until `reset_in` has
    /// elapsed, then a full refill to the concurrency limit.
    pub fn update_rate_limit(&self, key: &EndpointKey, reset_in: Duration) {
        let gate = self.gate_for(key);
        {
            let mut state = gate.lock_state();
            state.reset_deadline = Some(deadline_after(Instant::now(), reset_in));
            state.available_permits = 0;
        }
        debug!(
            endpoint = %key,
            reset_in_ms = reset_in.as_millis(),
            "Rate limit window updated"
        );
        gate.notify();
    }

    /// Records the server-reported number of permits left in the window.
    ///
    /// A positive count becomes both the concurrency limit and the available
    /// permits. Zero or negative reports are ignored: an exhausted window
    /// stays exhausted until its deadline.
    pub fn update_concurrency(&self, key: &EndpointKey, permits: i64) {
        if permits <= 0 {
            return;
        }

        let gate = self.gate_for(key);
        {
            let mut state = gate.lock_state();
            state.concurrency_limit = u32::try_from(permits).unwrap_or(u32::MAX);
            state.available_permits = permits;
        }
        debug!(endpoint = %key, permits, "Concurrency updated from server");
        gate.notify();
    }

    /// Returns the current state of `key`'s gate, or `None` if the key has
    /// never been used.
    pub fn snapshot(&self, key: &EndpointKey) -> Option<GateSnapshot> {
        let gate = self.gates.get(key)?;
        let state = gate.lock_state();
        let now = Instant::now();
        Some(GateSnapshot {
            concurrency_limit: state.concurrency_limit,
            available_permits: state.available_permits,
            reset_in: state
                .reset_deadline
                .map(|deadline| deadline.saturating_duration_since(now)),
            in_flight: state.in_flight,
        })
    }

    /// Number of endpoints seen so far.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

/// Upper bound for a window that does not fit in an `Instant` (about 30 years)
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

fn deadline_after(now: Instant, reset_in: Duration) -> Instant {
    now.checked_add(reset_in)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}
