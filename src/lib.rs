//! Marketplace listing/transaction store.
//!
//! Sellers publish time-limited fixed-price listings; buyers purchase
//! them. This crate owns the correctness of concurrent mutation,
//! exactly-once semantics for money-moving operations, durable state
//! across restarts, and periodic background repricing. Presentation,
//! command parsing, and the real currency/pricing backends live outside
//! and plug in through the traits in [`traits`].

pub mod config;
pub mod error;
pub mod marketplace;
pub mod mocks;
pub mod registry;
pub mod scheduler;
pub mod storage;
pub mod traits;
pub mod util;

pub use config::MarketConfig;
pub use error::{DenyReason, MarketError, MarketResult};
pub use marketplace::{round_currency, ItemSnapshot, Listing, TransactionRecord};
pub use registry::{AuctionHouse, PurchaseOutcome};
pub use scheduler::Scheduler;
pub use storage::{StorageManager, SCHEMA_VERSION};
pub use traits::{
    CurrencyProvider, IdSource, ListingId, NullCurrency, NullOracle, PlayerId, PricingOracle,
    SystemClock, SystemIds, TimeProvider,
};
