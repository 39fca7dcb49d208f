// In-memory session state for the hotel booking client

pub mod booking;
pub mod catalog;
pub mod config;
pub mod identity;
mod ids;
pub mod observer;
pub mod payment;
pub mod session;
pub mod validation;
pub mod wishlist;

// Re-export key types for convenience
pub use booking::{
    Booking, BookingDraft, BookingState, BookingStatus, BookingStore, FiltersUpdate, PriceRange,
    SearchFilters,
};
pub use catalog::{Catalog, CatalogError, Destination, Hotel};
pub use config::SessionConfig;
pub use identity::{
    AuthBackend, AuthError, AuthState, Identity, IdentityStore, MockAuthBackend, ProfileUpdate,
    Registration,
};
pub use observer::SubscriptionId;
pub use payment::{
    MockPaymentGateway, PaymentDetails, PaymentError, PaymentGateway, PaymentReceipt,
};
pub use session::{CheckoutError, CheckoutRequest, Confirmation, ProfileView, Session};
pub use validation::ValidationError;
pub use wishlist::WishlistStore;
