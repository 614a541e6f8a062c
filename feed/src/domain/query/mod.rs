//! Keyed cache of remote read results shared by independent components.
//!
//! Each key owns one slot holding the latest [`QuerySnapshot`], the fetcher
//! that refreshes it, and its subscribers (receivers of a
//! `tokio::sync::watch` channel). The cache guarantees:
//!
//! - at most one fetch per slot is in flight; concurrent readers join it,
//! - invalidation is published to subscribers before any later result,
//! - a subscriber that mounts on an invalidated slot never observes the
//!   superseded value.
//!
//! The cache is owned behind an `Arc` and handed to every component that
//! reads, subscribes to, or invalidates a slot.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

mod key;
mod state;

pub use key::{QueryKey, QueryKeyValidationError};
pub use state::{QuerySnapshot, QueryStatus};

type Fetcher<T, E> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

struct Slot<T, E> {
    key: QueryKey,
    state: watch::Sender<QuerySnapshot<T, E>>,
    fetcher: Mutex<Option<Fetcher<T, E>>>,
}

impl<T, E> Slot<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + fmt::Display + 'static,
{
    fn new(key: QueryKey) -> Self {
        let (state, _) = watch::channel(QuerySnapshot::default());
        Self {
            key,
            state,
            fetcher: Mutex::new(None),
        }
    }

    fn fetcher(&self) -> Option<Fetcher<T, E>> {
        self.fetcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Mark the slot as fetching unless a fetch is already in flight.
    ///
    /// Returns the invalidation generation the new fetch answers to.
    fn claim(&self) -> Option<u64> {
        let mut claimed = None;
        self.state.send_if_modified(|snapshot| {
            if snapshot.is_fetching {
                return false;
            }
            snapshot.is_fetching = true;
            claimed = Some(snapshot.generation);
            true
        });
        claimed
    }

    async fn run(&self, fetcher: Fetcher<T, E>, generation: u64) {
        debug!(key = %self.key, generation, "fetching");
        let mut guard = FetchGuard::new(self);
        let outcome = fetcher().await;
        guard.disarm();
        if let Err(error) = &outcome {
            warn!(key = %self.key, %error, "fetch failed");
        }
        self.state.send_modify(|snapshot| {
            snapshot.is_fetching = false;
            match outcome {
                Ok(data) => {
                    snapshot.data = Some(data);
                    snapshot.error = None;
                }
                Err(error) => snapshot.error = Some(error),
            }
            snapshot.is_stale = snapshot.generation != generation;
        });
    }

    /// Resolve the slot cache-first: return a fresh result, join an
    /// in-flight fetch, or start one.
    async fn ensure(self: Arc<Self>) -> QuerySnapshot<T, E> {
        loop {
            let current = self.state.borrow().clone();
            if current.is_fetching {
                debug!(key = %self.key, "joining in-flight fetch");
                let mut receiver = self.state.subscribe();
                let finished = receiver.wait_for(|s| !s.is_fetching).await.is_ok();
                if !finished {
                    return current;
                }
                continue;
            }
            if current.has_fresh_result() {
                return current;
            }
            let Some(fetcher) = self.fetcher() else {
                debug!(key = %self.key, "no fetcher registered");
                return current;
            };
            if let Some(generation) = self.claim() {
                self.run(fetcher, generation).await;
            }
        }
    }
}

/// Clears `is_fetching` when a claimed fetch is dropped before completing.
struct FetchGuard<'a, T, E> {
    slot: &'a Slot<T, E>,
    armed: bool,
}

impl<'a, T, E> FetchGuard<'a, T, E> {
    const fn new(slot: &'a Slot<T, E>) -> Self {
        Self { slot, armed: true }
    }

    const fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<T, E> Drop for FetchGuard<'_, T, E> {
    fn drop(&mut self) {
        if self.armed {
            debug!(key = %self.slot.key, "fetch cancelled, releasing slot");
            self.slot.state.send_modify(|snapshot| snapshot.is_fetching = false);
        }
    }
}

fn spawn_ensure<T, E>(slot: Arc<Slot<T, E>>)
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + fmt::Display + 'static,
{
    match Handle::try_current() {
        Ok(handle) => drop(handle.spawn(async move {
            slot.ensure().await;
        })),
        Err(_) => debug!(key = %slot.key, "no runtime, fetch deferred to the next read"),
    }
}

/// Keyed store of cached reads.
///
/// # Examples
/// ```
/// use feed::domain::query::{QueryCache, QueryKey, QueryStatus};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let cache: QueryCache<Vec<u32>, String> = QueryCache::new();
/// let key = QueryKey::procedure("numbers.list");
/// cache.register(&key, || async { Ok(vec![1, 2, 3]) });
///
/// let snapshot = cache.ensure(&key).await;
/// assert_eq!(snapshot.status(), QueryStatus::Success);
/// assert_eq!(snapshot.data(), Some(&vec![1, 2, 3]));
/// # });
/// ```
pub struct QueryCache<T, E> {
    slots: Mutex<HashMap<QueryKey, Arc<Slot<T, E>>>>,
}

impl<T, E> Default for QueryCache<T, E> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<T, E> QueryCache<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + fmt::Display + 'static,
{
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &QueryKey) -> Arc<Slot<T, E>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            slots
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Slot::new(key.clone()))),
        )
    }

    fn existing(&self, key: &QueryKey) -> Option<Arc<Slot<T, E>>> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Attach the operation that fills `key`.
    ///
    /// The first registration wins: one key names one operation, so later
    /// registrations from other components are redundant.
    pub fn register<F, Fut>(&self, key: &QueryKey, fetcher: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let slot = self.slot(key);
        let mut current = slot.fetcher.lock().unwrap_or_else(PoisonError::into_inner);
        if current.is_none() {
            *current = Some(Arc::new(move || fetcher().boxed()));
        }
    }

    /// Resolve `key` cache-first and return the settled snapshot.
    ///
    /// Returns the current (pending) snapshot when no fetcher is registered.
    pub async fn ensure(&self, key: &QueryKey) -> QuerySnapshot<T, E> {
        self.slot(key).ensure().await
    }

    /// Start resolving `key` in the background without waiting.
    ///
    /// Outside a Tokio runtime this only creates the slot; the next
    /// [`QueryCache::ensure`] performs the fetch.
    pub fn prefetch(&self, key: &QueryKey) {
        spawn_ensure(self.slot(key));
    }

    /// Subscribe to `key` and start resolving it.
    pub fn subscribe(&self, key: &QueryKey) -> QuerySubscription<T, E> {
        let slot = self.slot(key);
        let receiver = slot.state.subscribe();
        spawn_ensure(slot);
        QuerySubscription::new(receiver)
    }

    /// Mark `key` stale.
    ///
    /// Mounted subscribers see the stale flag immediately and a refetch is
    /// started for them. Without subscribers the slot is only marked; the
    /// next subscriber or read refetches. Unknown keys are ignored.
    pub fn invalidate(&self, key: &QueryKey) {
        let Some(slot) = self.existing(key) else {
            debug!(%key, "invalidate on an empty slot");
            return;
        };
        slot.state.send_modify(|snapshot| {
            snapshot.generation = snapshot.generation.wrapping_add(1);
            snapshot.is_stale = true;
        });
        let subscribers = slot.state.receiver_count();
        debug!(%key, subscribers, "invalidated");
        if subscribers > 0 {
            spawn_ensure(slot);
        }
    }

    /// Current snapshot of `key` without triggering a fetch.
    pub fn snapshot(&self, key: &QueryKey) -> QuerySnapshot<T, E> {
        self.existing(key)
            .map(|slot| slot.state.borrow().clone())
            .unwrap_or_default()
    }

    /// Number of mounted subscribers for `key`.
    pub fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.existing(key)
            .map_or(0, |slot| slot.state.receiver_count())
    }
}

/// A mounted reader of one cache slot.
///
/// Dropping the subscription unmounts it.
pub struct QuerySubscription<T, E> {
    receiver: watch::Receiver<QuerySnapshot<T, E>>,
    seen_fresh: AtomicBool,
}

impl<T, E> QuerySubscription<T, E>
where
    T: Clone,
    E: Clone,
{
    fn new(receiver: watch::Receiver<QuerySnapshot<T, E>>) -> Self {
        Self {
            receiver,
            seen_fresh: AtomicBool::new(false),
        }
    }

    /// The slot as this subscriber may render it.
    ///
    /// Until the subscriber has seen a fresh result, results superseded by
    /// an invalidation are withheld and the snapshot reads as pending.
    pub fn snapshot(&self) -> QuerySnapshot<T, E> {
        let snapshot = self.receiver.borrow().clone();
        if snapshot.has_fresh_result() {
            self.seen_fresh.store(true, Ordering::Relaxed);
            return snapshot;
        }
        if self.seen_fresh.load(Ordering::Relaxed) {
            snapshot
        } else {
            snapshot.without_result()
        }
    }

    /// Wait for the next published change. Returns `false` once the cache
    /// has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Wait until the slot holds a fresh result and no fetch is in flight.
    pub async fn settled(&mut self) -> QuerySnapshot<T, E> {
        if let Err(error) = self
            .receiver
            .wait_for(|snapshot| !snapshot.is_fetching && snapshot.has_fresh_result())
            .await
        {
            debug!(%error, "query cache dropped while waiting");
        }
        self.snapshot()
    }
}
