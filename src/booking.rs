// Booking store: the session's reservations plus the active hotel search filters
// Bookings are append-only; after creation only their status moves, confirmed -> cancelled

use crate::ids::generate_id;
use crate::observer::{Observers, SubscriptionId};
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_MAX_PRICE: f64 = 20000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    // Never produced here; kept so records coming from elsewhere still decode
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub hotel_id: String,
    pub hotel_name: String,
    pub hotel_image: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
}

impl Booking {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }
}

// Everything the caller supplies; id, booking date and status are assigned on creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub hotel_id: String,
    pub hotel_name: String,
    pub hotel_image: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
}

/// Inclusive nightly price bounds, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange(pub f64, pub f64);

impl PriceRange {
    pub fn min(&self) -> f64 {
        self.0
    }

    pub fn max(&self) -> f64 {
        self.1
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.0 && price <= self.1
    }

    pub fn is_ordered(&self) -> bool {
        self.0 <= self.1
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange(0.0, DEFAULT_MAX_PRICE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilters {
    pub location: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub price_range: PriceRange,
    pub star_rating: BTreeSet<u8>,
    pub amenities: BTreeSet<String>,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            location: String::new(),
            check_in: String::new(),
            check_out: String::new(),
            guests: 1,
            price_range: PriceRange::default(),
            star_rating: BTreeSet::new(),
            amenities: BTreeSet::new(),
        }
    }
}

/// Partial filter update.
///
/// Present fields overwrite the current value. Collections are replaced as a
/// whole, never merged element by element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FiltersUpdate {
    pub location: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub guests: Option<u32>,
    pub price_range: Option<PriceRange>,
    pub star_rating: Option<BTreeSet<u8>>,
    pub amenities: Option<BTreeSet<String>>,
}

impl FiltersUpdate {
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn dates(mut self, check_in: impl Into<String>, check_out: impl Into<String>) -> Self {
        self.check_in = Some(check_in.into());
        self.check_out = Some(check_out.into());
        self
    }

    pub fn guests(mut self, guests: u32) -> Self {
        self.guests = Some(guests);
        self
    }

    pub fn price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = Some(PriceRange(min, max));
        self
    }

    pub fn star_rating<I: IntoIterator<Item = u8>>(mut self, stars: I) -> Self {
        self.star_rating = Some(stars.into_iter().collect());
        self
    }

    pub fn amenities<I, S>(mut self, amenities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.amenities = Some(amenities.into_iter().map(Into::into).collect());
        self
    }

    pub(crate) fn apply_to(self, filters: &mut SearchFilters) {
        if let Some(location) = self.location {
            filters.location = location;
        }
        if let Some(check_in) = self.check_in {
            filters.check_in = check_in;
        }
        if let Some(check_out) = self.check_out {
            filters.check_out = check_out;
        }
        if let Some(guests) = self.guests {
            filters.guests = guests;
        }
        if let Some(price_range) = self.price_range {
            filters.price_range = price_range;
        }
        if let Some(star_rating) = self.star_rating {
            filters.star_rating = star_rating;
        }
        if let Some(amenities) = self.amenities {
            filters.amenities = amenities;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingState {
    pub bookings: Vec<Booking>,
    pub search_filters: SearchFilters,
}

impl BookingState {
    pub fn booking(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id == id)
    }
}

pub struct BookingStore {
    state: RwLock<Arc<BookingState>>,
    observers: Observers<BookingState>,
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Arc::new(BookingState::default())),
            observers: Observers::new(),
        }
    }

    pub fn snapshot(&self) -> Arc<BookingState> {
        Arc::clone(&self.state.read())
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.state.read().bookings.clone()
    }

    pub fn booking(&self, id: &str) -> Option<Booking> {
        self.state.read().booking(id).cloned()
    }

    pub fn confirmed(&self) -> Vec<Booking> {
        self.state
            .read()
            .bookings
            .iter()
            .filter(|booking| booking.status == BookingStatus::Confirmed)
            .cloned()
            .collect()
    }

    pub fn filters(&self) -> SearchFilters {
        self.state.read().search_filters.clone()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Arc<BookingState>) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // No validation of dates, guests or price happens here
    pub fn add_booking(&self, draft: BookingDraft) -> Booking {
        let booking = Booking {
            id: generate_id("booking"),
            hotel_id: draft.hotel_id,
            hotel_name: draft.hotel_name,
            hotel_image: draft.hotel_image,
            check_in: draft.check_in,
            check_out: draft.check_out,
            guests: draft.guests,
            total_price: draft.total_price,
            booking_date: Utc::now(),
            status: BookingStatus::Confirmed,
        };

        let created = booking.clone();
        self.mutate(move |state| {
            state.bookings.push(booking);
            true
        });
        debug!("Booking {} added for hotel {}", created.id, created.hotel_id);
        created
    }

    /// Marks a booking as cancelled.
    ///
    /// Unknown ids and bookings that are already cancelled are ignored;
    /// the return value tells whether anything changed.
    pub fn cancel_booking(&self, id: &str) -> bool {
        let changed = self.mutate(|state| {
            match state
                .bookings
                .iter_mut()
                .find(|booking| booking.id == id && booking.status != BookingStatus::Cancelled)
            {
                Some(booking) => {
                    booking.status = BookingStatus::Cancelled;
                    true
                }
                None => false,
            }
        });
        if changed {
            debug!("Booking {} cancelled", id);
        }
        changed
    }

    pub fn update_search_filters(&self, update: FiltersUpdate) {
        self.mutate(|state| {
            let before = state.search_filters.clone();
            update.apply_to(&mut state.search_filters);
            state.search_filters != before
        });
    }

    pub fn reset_filters(&self) {
        self.mutate(|state| {
            if state.search_filters == SearchFilters::default() {
                return false;
            }
            state.search_filters = SearchFilters::default();
            true
        });
    }

    // Applies `change` to a private copy; the copy is published and observers
    // are notified only when `change` reports that it modified something
    fn mutate<F>(&self, change: F) -> bool
    where
        F: FnOnce(&mut BookingState) -> bool,
    {
        {
            let mut state = self.state.write();
            let mut next = BookingState::clone(&state);
            if !change(&mut next) {
                return false;
            }
            *state = Arc::new(next);
            self.observers.enqueue(Arc::clone(&state));
        }
        self.observers.flush();
        true
    }
}
