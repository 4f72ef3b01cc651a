//! Persisted document codec.
//!
//! The full store state serializes to one structured key-value document.
//! A document is only trusted for restore when its schema version matches
//! and its commit marker is set; the marker proves a prior save completed
//! rather than merely started.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};
use crate::marketplace::{ItemSnapshot, Listing, TransactionRecord};
use crate::traits::ids::{ListingId, PlayerId};

/// Schema version this engine reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

/// One listing as stored on disk. The listing id is the map key, so rows
/// carry only the remaining fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListingRow {
    pub seller: PlayerId,
    pub seller_name: String,
    pub item: ItemSnapshot,
    pub price: f64,
    pub created_at: u64,
    pub expires_at: u64,
}

impl ListingRow {
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            seller: listing.seller,
            seller_name: listing.seller_name.clone(),
            item: listing.item.clone(),
            price: listing.price,
            created_at: listing.created_at,
            expires_at: listing.expires_at,
        }
    }

    pub fn into_listing(self, id: ListingId) -> Listing {
        Listing {
            id,
            seller: self.seller,
            seller_name: self.seller_name,
            item: self.item,
            price: self.price,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

/// Full persisted state of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StoreDocument {
    pub schema_version: u32,
    pub commit_marker: bool,
    /// Unix millis when this document was produced.
    pub updated_at: u64,
    #[serde(default)]
    pub listings: BTreeMap<String, ListingRow>,
    /// Newest first.
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

impl StoreDocument {
    /// A fully-written, finalized document.
    pub fn new(updated_at: u64) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            commit_marker: true,
            updated_at,
            listings: BTreeMap::new(),
            transactions: Vec::new(),
        }
    }

    /// Whether this document may replace in-memory state.
    pub fn is_trusted(&self) -> bool {
        self.schema_version == SCHEMA_VERSION && self.commit_marker
    }

    pub fn encode(&self) -> MarketResult<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| MarketError::Serialization(format!("document encode failed: {e}")))
    }

    pub fn decode(bytes: &[u8]) -> MarketResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| MarketError::Serialization(format!("document decode failed: {e}")))
    }
}
