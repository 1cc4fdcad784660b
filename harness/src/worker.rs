//! Background search worker with generation-checked publication.
//!
//! Each [`SearchWorkerV1::start`] bumps the generation, raises the cancel
//! flag of the run it replaces, and spawns a thread. A finished thread
//! publishes into the shared slot only while its generation is still the
//! current one, so a restarted search never surfaces a stale result.
//!
//! The world is shared as `Arc<WorldV1>` and only ever read.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use starpath_kernel::world::WorldV1;
use starpath_search::{solve_cancellable, SearchError, SearchPolicyV1, SolveOutcomeV1};

/// A completed run, tagged with the generation that produced it.
#[derive(Debug, Clone)]
pub struct PublishedV1 {
    pub generation: u64,
    pub outcome: Result<SolveOutcomeV1, SearchError>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    result: Option<PublishedV1>,
}

type Shared = Arc<(Mutex<Slot>, Condvar)>;

/// Owns at most one live search at a time.
#[derive(Debug, Default)]
pub struct SearchWorkerV1 {
    shared: Shared,
    cancel: Option<Arc<AtomicBool>>,
    threads: Vec<JoinHandle<()>>,
}

impl SearchWorkerV1 {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search, superseding any run in flight. Returns its generation.
    pub fn start(&mut self, world: Arc<WorldV1>, policy: SearchPolicyV1) -> u64 {
        self.cancel();
        self.threads.retain(|handle| !handle.is_finished());

        let generation = {
            let mut slot = lock(&self.shared);
            slot.generation += 1;
            slot.result = None;
            slot.generation
        };

        let cancel = Arc::new(AtomicBool::new(false));
        self.cancel = Some(Arc::clone(&cancel));
        let shared = Arc::clone(&self.shared);

        tracing::debug!(generation, "starting background search");
        self.threads.push(std::thread::spawn(move || {
            let outcome = solve_cancellable(&world, &policy, &cancel);
            publish(&shared, PublishedV1 {
                generation,
                outcome,
            });
        }));
        generation
    }

    /// Raise the cancel flag of the current run, if any.
    ///
    /// The run still publishes (with a `cancelled` termination) unless a
    /// newer start has superseded it.
    pub fn cancel(&self) {
        if let Some(flag) = &self.cancel {
            flag.store(true, Ordering::Relaxed);
        }
    }

    /// Generation of the most recent start; 0 before the first.
    #[must_use]
    pub fn generation(&self) -> u64 {
        lock(&self.shared).generation
    }

    /// The current generation's result, if it has been published.
    #[must_use]
    pub fn poll(&self) -> Option<PublishedV1> {
        lock(&self.shared).result.clone()
    }

    /// Block until the current generation publishes.
    ///
    /// Returns `None` if nothing was ever started.
    #[must_use]
    pub fn wait(&self) -> Option<PublishedV1> {
        let (mutex, ready) = &*self.shared;
        let mut slot = mutex.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.generation == 0 {
            return None;
        }
        while slot.result.is_none() {
            slot = ready.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
        slot.result.clone()
    }

    /// As [`wait`](Self::wait), giving up after `timeout`.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> Option<PublishedV1> {
        let (mutex, ready) = &*self.shared;
        let slot = mutex.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.generation == 0 {
            return None;
        }
        let (slot, _) = ready
            .wait_timeout_while(slot, timeout, |slot| slot.result.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        slot.result.clone()
    }
}

impl Drop for SearchWorkerV1 {
    fn drop(&mut self) {
        self.cancel();
        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("search thread panicked");
            }
        }
    }
}

fn lock(shared: &Shared) -> MutexGuard<'_, Slot> {
    shared.0.lock().unwrap_or_else(PoisonError::into_inner)
}

fn publish(shared: &Shared, published: PublishedV1) {
    let (mutex, ready) = &**shared;
    let mut slot = mutex.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.generation != published.generation {
        tracing::debug!(
            stale = published.generation,
            current = slot.generation,
            "discarding stale search result"
        );
        return;
    }
    slot.result = Some(published);
    ready.notify_all();
}
