//! Pricing oracle abstraction.
//!
//! An external shop integration may suggest sale prices for items. An
//! absent oracle is a normal state, not an error: the store selects a
//! concrete implementation at startup and never probes for one at runtime.

use crate::marketplace::ItemSnapshot;
use crate::traits::ids::PlayerId;

/// External price-suggestion collaborator.
pub trait PricingOracle: Send + Sync {
    /// Whether the integration is present and enabled.
    fn is_active(&self) -> bool;

    /// Suggested sale price for the item, if one is available.
    ///
    /// `buyer` is passed for per-purchase refreshes where the backing shop
    /// prices per account; sweeps pass `None`. The store never retries and
    /// treats `None` as "no dynamic price available".
    fn suggest_price(&self, item: &ItemSnapshot, buyer: Option<PlayerId>) -> Option<f64>;
}

/// Absent pricing integration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOracle;

impl NullOracle {
    pub const fn new() -> Self {
        Self
    }
}

impl PricingOracle for NullOracle {
    fn is_active(&self) -> bool {
        false
    }

    fn suggest_price(&self, _item: &ItemSnapshot, _buyer: Option<PlayerId>) -> Option<f64> {
        None
    }
}
