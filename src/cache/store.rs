use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

/// Process-wide reactive container for the last known snapshot of a remote
/// collection.
///
/// The full current snapshot is re-emitted on every change; subscribers
/// never see deltas or partially applied mutations. Mutations go through
/// `watch::Sender::send_modify`, which applies each closure under the
/// channel's own lock, so concurrent writers are serialized and an `append`
/// always lands on the snapshot current at call time.
///
/// A cache starts out empty *and unpopulated*: until the first successful
/// fetch or mutation, the empty sequence means "nothing loaded yet", not
/// "no data exists". Callers that need the distinction check
/// [`is_populated`](Self::is_populated).
pub struct EntityCache<T> {
    state: watch::Sender<Vec<T>>,
    populated: AtomicBool,
}

impl<T: Clone> EntityCache<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Vec::new());
        Self {
            state,
            populated: AtomicBool::new(false),
        }
    }

    /// Subscribe to snapshot changes. The receiver immediately holds the
    /// current snapshot, so late subscribers observe the same state as
    /// everyone else.
    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.state.subscribe()
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> Vec<T> {
        self.state.borrow().clone()
    }

    /// Whether at least one fetch or mutation has populated the cache.
    /// Never resets; an empty snapshot after a fetch is real data.
    pub fn is_populated(&self) -> bool {
        self.populated.load(Ordering::Acquire)
    }

    /// Swap in a freshly fetched collection.
    pub fn replace(&self, items: Vec<T>) {
        self.populated.store(true, Ordering::Release);
        self.state.send_replace(items);
    }

    /// Append a confirmed new item to the current snapshot.
    pub fn append(&self, item: T) {
        self.populated.store(true, Ordering::Release);
        self.state.send_modify(|items| items.push(item));
    }

    /// Drop every item matching the predicate.
    pub fn remove(&self, predicate: impl Fn(&T) -> bool) {
        self.populated.store(true, Ordering::Release);
        self.state.send_modify(|items| items.retain(|item| !predicate(item)));
    }

    /// Replace the first item matching the predicate in place, preserving
    /// its position. Returns false (emitting nothing new beyond the
    /// unchanged snapshot) when no item matches.
    pub fn replace_where(&self, predicate: impl Fn(&T) -> bool, replacement: T) -> bool {
        self.populated.store(true, Ordering::Release);
        let mut replaced = false;
        self.state.send_modify(|items| {
            if let Some(slot) = items.iter_mut().find(|item| predicate(item)) {
                *slot = replacement;
                replaced = true;
            }
        });
        replaced
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }
}

impl<T: Clone> Default for EntityCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
