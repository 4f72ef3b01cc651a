//! Trait abstractions for the store's external collaborators.
//!
//! These seams allow the registry, scheduler, and storage layers to be
//! tested with deterministic implementations.

pub mod currency;
pub mod ids;
pub mod pricing;
pub mod time;

pub use currency::{CurrencyProvider, NullCurrency};
pub use ids::{IdSource, ListingId, PlayerId, SystemIds};
pub use pricing::{NullOracle, PricingOracle};
pub use time::{SystemClock, TimeProvider};
