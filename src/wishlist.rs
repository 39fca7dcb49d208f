// Wishlist store: the set of hotel ids marked as favourites

use crate::observer::{Observers, SubscriptionId};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

pub type WishlistSnapshot = BTreeSet<String>;

pub struct WishlistStore {
    ids: RwLock<Arc<WishlistSnapshot>>,
    observers: Observers<WishlistSnapshot>,
}

impl Default for WishlistStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WishlistStore {
    pub fn new() -> Self {
        Self {
            ids: RwLock::new(Arc::new(BTreeSet::new())),
            observers: Observers::new(),
        }
    }

    pub fn snapshot(&self) -> Arc<WishlistSnapshot> {
        Arc::clone(&self.ids.read())
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.read().iter().cloned().collect()
    }

    pub fn contains(&self, hotel_id: &str) -> bool {
        self.ids.read().contains(hotel_id)
    }

    pub fn len(&self) -> usize {
        self.ids.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.read().is_empty()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Arc<WishlistSnapshot>) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // true if the id was not present before
    pub fn add(&self, hotel_id: &str) -> bool {
        let added = self.mutate(|ids| {
            if ids.contains(hotel_id) {
                return false;
            }
            ids.insert(hotel_id.to_string())
        });
        if added {
            debug!("Hotel {} added to wishlist", hotel_id);
        }
        added
    }

    // true if the id was present before
    pub fn remove(&self, hotel_id: &str) -> bool {
        let removed = self.mutate(|ids| {
            if !ids.contains(hotel_id) {
                return false;
            }
            ids.remove(hotel_id)
        });
        if removed {
            debug!("Hotel {} removed from wishlist", hotel_id);
        }
        removed
    }

    /// Flips membership of `hotel_id` and returns whether it is now in the wishlist.
    pub fn toggle(&self, hotel_id: &str) -> bool {
        let mut now_present = false;
        self.mutate(|ids| {
            if !ids.remove(hotel_id) {
                ids.insert(hotel_id.to_string());
                now_present = true;
            }
            true
        });
        now_present
    }

    // Copy-on-write: snapshots already handed out are never modified
    fn mutate<F>(&self, change: F) -> bool
    where
        F: FnOnce(&mut WishlistSnapshot) -> bool,
    {
        {
            let mut ids = self.ids.write();
            let mut next = WishlistSnapshot::clone(&ids);
            if !change(&mut next) {
                return false;
            }
            *ids = Arc::new(next);
            self.observers.enqueue(Arc::clone(&ids));
        }
        self.observers.flush();
        true
    }
}
