//! Currency provider abstraction.
//!
//! The store moves money through an external provider and treats any
//! `false` return as a hard stop requiring compensation; it never assumes
//! partial success.

use crate::traits::ids::PlayerId;

/// External currency/economy collaborator.
pub trait CurrencyProvider: Send + Sync {
    /// Whether the provider is connected and usable.
    fn is_ready(&self) -> bool;

    /// Whether the account's balance covers `amount`.
    fn has(&self, account: PlayerId, amount: f64) -> bool;

    /// Withdraw `amount` from the account. Returns false on any failure.
    fn withdraw(&self, account: PlayerId, amount: f64) -> bool;

    /// Deposit `amount` into the account. Returns false on any failure.
    fn deposit(&self, account: PlayerId, amount: f64) -> bool;

    /// Render an amount for display.
    fn format(&self, amount: f64) -> String {
        format!("{amount:.2}")
    }
}

/// Absent currency integration: never ready, every movement fails.
///
/// Selected at startup when no economy backend is wired in; purchases are
/// rejected with `CurrencyUnavailable` before any state changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCurrency;

impl NullCurrency {
    pub const fn new() -> Self {
        Self
    }
}

impl CurrencyProvider for NullCurrency {
    fn is_ready(&self) -> bool {
        false
    }

    fn has(&self, _account: PlayerId, _amount: f64) -> bool {
        false
    }

    fn withdraw(&self, _account: PlayerId, _amount: f64) -> bool {
        false
    }

    fn deposit(&self, _account: PlayerId, _amount: f64) -> bool {
        false
    }
}
