// Session facade: wires the three stores to the catalog and the payment gateway
// It owns no state of its own; cross-store views are assembled from store snapshots

use crate::booking::{Booking, BookingDraft, BookingState, BookingStore};
use crate::catalog::{Catalog, Hotel};
use crate::config::SessionConfig;
use crate::identity::{AuthBackend, AuthState, IdentityStore, MockAuthBackend};
use crate::payment::{MockPaymentGateway, PaymentDetails, PaymentError, PaymentGateway, PaymentReceipt};
use crate::validation::{validate_payment, validate_stay, ValidationError};
use crate::wishlist::WishlistStore;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Unknown hotel: {0}")]
    UnknownHotel(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub hotel_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub payment: PaymentDetails,
}

#[derive(Debug, Clone)]
pub struct Confirmation {
    pub booking: Booking,
    pub receipt: PaymentReceipt,
}

// Everything a profile screen shows, read together
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub auth: Arc<AuthState>,
    pub bookings: Arc<BookingState>,
    pub wishlist_hotels: Vec<Hotel>,
}

pub struct Session {
    identity: Arc<IdentityStore>,
    bookings: Arc<BookingStore>,
    wishlist: Arc<WishlistStore>,
    catalog: Arc<Catalog>,
    payments: Arc<dyn PaymentGateway>,
}

impl Session {
    // A session backed by the mock authentication and payment services
    pub fn new(config: SessionConfig, catalog: Arc<Catalog>) -> Self {
        Self::with_backends(
            catalog,
            Arc::new(MockAuthBackend::new(config.auth_latency())),
            Arc::new(MockPaymentGateway::new(config.payment_latency())),
        )
    }

    pub fn with_backends(
        catalog: Arc<Catalog>,
        auth: Arc<dyn AuthBackend>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        info!(
            "Session started with {} hotels in catalog",
            catalog.hotels().len()
        );
        Self {
            identity: Arc::new(IdentityStore::new(auth)),
            bookings: Arc::new(BookingStore::new()),
            wishlist: Arc::new(WishlistStore::new()),
            catalog,
            payments,
        }
    }

    pub fn identity(&self) -> &Arc<IdentityStore> {
        &self.identity
    }

    pub fn bookings(&self) -> &Arc<BookingStore> {
        &self.bookings
    }

    pub fn wishlist(&self) -> &Arc<WishlistStore> {
        &self.wishlist
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn wishlist_hotels(&self) -> Vec<Hotel> {
        let ids = self.wishlist.snapshot();
        self.catalog
            .resolve(ids.iter().map(String::as_str))
            .into_iter()
            .cloned()
            .collect()
    }

    // Catalog hotels matching the current search filters
    pub fn search_hotels(&self) -> Vec<Hotel> {
        let state = self.bookings.snapshot();
        self.catalog
            .search(&state.search_filters)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn profile(&self) -> ProfileView {
        ProfileView {
            auth: self.identity.snapshot(),
            bookings: self.bookings.snapshot(),
            wishlist_hotels: self.wishlist_hotels(),
        }
    }

    /// Price of a stay: number of nights times the hotel's nightly rate.
    ///
    /// Fails for hotels missing from the catalog and for stays that do not
    /// span at least one night.
    pub fn quote(
        &self,
        hotel_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<f64, CheckoutError> {
        let hotel = self
            .catalog
            .hotel(hotel_id)
            .ok_or_else(|| CheckoutError::UnknownHotel(hotel_id.to_string()))?;
        validate_stay(check_in, check_out, 1)?;

        let nights = (check_out - check_in).num_days();
        Ok(hotel.price * nights as f64)
    }

    // Validates, charges, then records the booking; nothing is recorded if any step fails
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<Confirmation, CheckoutError> {
        let hotel = self
            .catalog
            .hotel(&request.hotel_id)
            .ok_or_else(|| CheckoutError::UnknownHotel(request.hotel_id.clone()))?;

        if let Err(e) = validate_stay(request.check_in, request.check_out, request.guests)
            .and_then(|_| validate_payment(&request.payment))
        {
            warn!("Checkout for hotel {} rejected: {}", hotel.id, e);
            return Err(e.into());
        }

        let total_price = self.quote(&hotel.id, request.check_in, request.check_out)?;
        let receipt = match self.payments.charge(total_price, &request.payment).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!("Payment for hotel {} failed: {}", hotel.id, e);
                return Err(e.into());
            }
        };

        let booking = self.bookings.add_booking(BookingDraft {
            hotel_id: hotel.id.clone(),
            hotel_name: hotel.name.clone(),
            hotel_image: hotel.cover_image().to_string(),
            check_in: request.check_in,
            check_out: request.check_out,
            guests: request.guests,
            total_price,
        });
        info!(
            "Booking {} confirmed for {} (payment {})",
            booking.id, booking.hotel_name, receipt.reference
        );

        Ok(Confirmation { booking, receipt })
    }
}
