// Subscribe/notify registry shared by every store
// A store queues each new snapshot while it still holds its state lock, releases it, then flushes

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

struct Delivery<T> {
    pending: VecDeque<Arc<T>>,
    flushing: bool,
}

pub struct Observers<T> {
    next_id: AtomicU64,
    callbacks: Mutex<Vec<(SubscriptionId, Callback<T>)>>,
    delivery: Mutex<Delivery<T>>,
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: Mutex::new(Vec::new()),
            delivery: Mutex::new(Delivery {
                pending: VecDeque::new(),
                flushing: false,
            }),
        }
    }
}

impl<T> Observers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.callbacks.lock().push((id, Arc::new(callback)));
        id
    }

    // Returns false if the id was never registered or was already removed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.callbacks.lock();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    pub fn len(&self) -> usize {
        self.callbacks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queues `snapshot` for delivery.
    ///
    /// Stores call this while still holding their state lock, so the queue
    /// order is the order in which snapshots were published.
    pub fn enqueue(&self, snapshot: Arc<T>) {
        self.delivery.lock().pending.push_back(snapshot);
    }

    /// Delivers queued snapshots, oldest first, to every observer in
    /// registration order.
    ///
    /// Only one flush runs at a time. A flush started while another is in
    /// progress (from a callback mutating the store, or from another thread)
    /// returns at once and its snapshots are delivered by the running one, so
    /// every observer sees snapshots in publication order and the last one it
    /// sees is the latest. No lock is held while callbacks run.
    pub fn flush(&self) {
        {
            let mut delivery = self.delivery.lock();
            if delivery.flushing {
                return;
            }
            delivery.flushing = true;
        }

        loop {
            let snapshot = {
                let mut delivery = self.delivery.lock();
                match delivery.pending.pop_front() {
                    Some(snapshot) => snapshot,
                    None => {
                        delivery.flushing = false;
                        return;
                    }
                }
            };

            let callbacks: Vec<Callback<T>> = self
                .callbacks
                .lock()
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect();

            for callback in callbacks {
                callback(&snapshot);
            }
        }
    }

    pub fn notify(&self, snapshot: &Arc<T>) {
        self.enqueue(Arc::clone(snapshot));
        self.flush();
    }
}
