use serde::{Deserialize, Serialize};

use crate::traits::ids::{ListingId, PlayerId};

/// Record of a completed purchase. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionRecord {
    /// Id of the listing that was sold.
    pub auction_id: ListingId,
    pub buyer: PlayerId,
    pub buyer_name: String,
    pub seller: PlayerId,
    pub seller_name: String,
    /// Final price paid.
    pub price: f64,
    /// Unix timestamp in milliseconds of the purchase.
    pub at: u64,
}

impl TransactionRecord {
    /// Whether the given player took part in this transaction.
    pub fn involves(&self, player: PlayerId) -> bool {
        self.buyer == player || self.seller == player
    }
}
