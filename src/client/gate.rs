//! Session gate: uninitialized until a ready state is published.
//!
//! The ready state pairs the session with the transport built for it and is
//! published in one atomic store, so readers see either nothing or both.
//! Concurrent `initialize` calls share a single in-flight future; a later
//! call after it settles starts a fresh one that replaces the published state.
//!
//! The in-flight slot is freed by the shared future itself when it settles,
//! and by the last waiter when every caller has gone away before that. An
//! abandoned initialization is dropped unpolled and never publishes.

use crate::auth::Session;
use crate::transport::RemoteInvoke;
use crate::{Error, Result};
use arc_swap::ArcSwapOption;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

pub(crate) struct Ready {
    pub(crate) session: Session,
    pub(crate) transport: Arc<dyn RemoteInvoke>,
}

type Outcome = std::result::Result<Arc<Ready>, Arc<Error>>;
type SharedInit = Shared<BoxFuture<'static, Outcome>>;

struct InFlight {
    generation: u64,
    future: SharedInit,
    waiters: usize,
}

type Slot = Mutex<Option<InFlight>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<InFlight>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Forget the in-flight entry of `generation`, if it is still the current one.
fn release(slot: &Slot, generation: u64) {
    let mut guard = lock(slot);
    if guard.as_ref().is_some_and(|e| e.generation == generation) {
        *guard = None;
    }
}

/// Registered caller of one in-flight initialization. The last one to be
/// dropped before the initialization settles discards it.
struct Waiter<'a> {
    slot: &'a Slot,
    generation: u64,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        let mut guard = lock(self.slot);
        let abandoned = match guard.as_mut() {
            Some(entry) if entry.generation == self.generation => {
                entry.waiters -= 1;
                entry.waiters == 0
            }
            _ => false,
        };
        if abandoned {
            debug!(generation = self.generation, "initialization abandoned by all callers");
            *guard = None;
        }
    }
}

pub(crate) struct AuthGate {
    ready: Arc<ArcSwapOption<Ready>>,
    in_flight: Arc<Slot>,
    generations: AtomicU64,
}

impl AuthGate {
    pub(crate) fn new() -> Self {
        Self {
            ready: Arc::new(ArcSwapOption::empty()),
            in_flight: Arc::new(Mutex::new(None)),
            generations: AtomicU64::new(0),
        }
    }

    pub(crate) fn require_ready(&self) -> Result<Arc<Ready>> {
        self.ready.load_full().ok_or(Error::NotInitialized)
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.ready.load().is_some()
    }

    #[cfg(test)]
    fn has_in_flight(&self) -> bool {
        lock(&self.in_flight).is_some()
    }

    /// Run `init` unless an initialization is already in flight, in which
    /// case wait for that one instead. On success the result is published
    /// before any waiter resumes. On failure the previous state is kept.
    pub(crate) async fn initialize(
        &self,
        init: BoxFuture<'static, Result<Ready>>,
    ) -> Result<Arc<Ready>> {
        let (generation, future) = {
            let mut slot = lock(&self.in_flight);
            match slot.as_mut() {
                Some(entry) => {
                    debug!(generation = entry.generation, "joining in-flight initialization");
                    entry.waiters += 1;
                    (entry.generation, entry.future.clone())
                }
                None => {
                    let generation = self.generations.fetch_add(1, Ordering::Relaxed);
                    let published = Arc::clone(&self.ready);
                    let owner = Arc::clone(&self.in_flight);
                    let future = async move {
                        let outcome = match init.await {
                            Ok(ready) => {
                                let ready = Arc::new(ready);
                                published.store(Some(Arc::clone(&ready)));
                                info!(identity = ?ready.session.identity(), "session ready");
                                Ok(ready)
                            }
                            Err(e) => Err(Arc::new(e)),
                        };
                        release(&owner, generation);
                        outcome
                    }
                    .boxed()
                    .shared();
                    *slot = Some(InFlight {
                        generation,
                        future: future.clone(),
                        waiters: 1,
                    });
                    (generation, future)
                }
            }
        };

        let _waiter = Waiter {
            slot: &self.in_flight,
            generation,
        };
        future.await.map_err(Error::Initialization)
    }
}
