/// Domain-specific error types for the bazaar store.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("operation denied: {0}")]
    Denied(#[from] DenyReason),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias.
pub type MarketResult<T> = Result<T, MarketError>;

/// Stable, enumerable rejection codes for registry operations.
///
/// The presentation layer maps these to localized messages; the store never
/// surfaces raw errors for an ordinary rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum DenyReason {
    /// The item payload is empty or has a zero amount.
    #[error("item is empty or invalid")]
    EmptyItem,

    /// The price is not a finite positive number after rounding.
    #[error("price must be a positive amount")]
    InvalidPrice,

    /// The item metadata exceeds the configured safety bounds.
    #[error("item metadata exceeds safety bounds")]
    UnsafeMetadata,

    /// The seller already holds the maximum number of active listings.
    #[error("active listing limit reached")]
    TooManyListings,

    /// The listing does not exist or has expired.
    #[error("listing not found")]
    NotFound,

    /// The operation id was already processed within the idempotency window.
    #[error("duplicate operation, try again")]
    DuplicateOperation,

    /// A seller attempted to buy their own listing.
    #[error("cannot buy your own listing")]
    SelfPurchase,

    /// The currency provider is not ready.
    #[error("currency provider unavailable")]
    CurrencyUnavailable,

    /// The buyer's balance does not cover the price.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// A money movement failed partway; completed steps were reversed.
    #[error("payment failed")]
    PaymentFailed,

    /// The listing changed concurrently; the operation was rolled back.
    #[error("listing changed, try again")]
    TryAgain,
}

impl DenyReason {
    /// True for rejections where an immediate retry by the caller may succeed.
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::DuplicateOperation | Self::PaymentFailed | Self::TryAgain
        )
    }
}
