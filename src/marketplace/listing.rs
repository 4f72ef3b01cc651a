use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::SafetyBounds;
use crate::traits::ids::{ListingId, PlayerId};

/// Round a currency amount to two decimals, half away from zero.
///
/// Non-finite input collapses to zero so it always fails the positive-price
/// check downstream.
pub fn round_currency(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Snapshot of a traded item.
///
/// The store treats the payload as opaque apart from the type name (used
/// for search) and the size-bounded metadata checked at listing time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ItemSnapshot {
    /// Item type identifier, e.g. a material name.
    pub type_name: String,

    /// Stack size being sold.
    pub amount: u32,

    /// Custom display name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Descriptive lore lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<String>,

    /// Auxiliary tagged key/value pairs carried by the item.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl ItemSnapshot {
    pub fn new(type_name: impl Into<String>, amount: u32) -> Self {
        Self {
            type_name: type_name.into(),
            amount,
            display_name: None,
            lore: Vec::new(),
            tags: BTreeMap::new(),
        }
    }

    /// An item with no type or a zero amount cannot be listed.
    pub fn is_empty(&self) -> bool {
        self.type_name.trim().is_empty() || self.amount == 0
    }

    /// Check metadata against the configured safety bounds.
    pub fn meta_within(&self, bounds: &SafetyBounds) -> bool {
        if let Some(name) = &self.display_name {
            if name.chars().count() > bounds.display_name_limit() {
                return false;
            }
        }
        if self.lore.len() > bounds.lore_lines_limit() {
            return false;
        }
        if self
            .lore
            .iter()
            .any(|line| line.chars().count() > bounds.lore_line_length_limit())
        {
            return false;
        }
        self.tags.len() <= bounds.tag_keys_limit()
    }
}

/// An active sell offer: item plus fixed price plus expiry.
///
/// Only the price is ever mutated after creation (by the repricing job);
/// identity and time fields are immutable for the listing's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Listing {
    pub id: ListingId,
    pub seller: PlayerId,
    pub seller_name: String,
    pub item: ItemSnapshot,
    pub price: f64,
    /// Unix timestamp in milliseconds when the listing was created.
    pub created_at: u64,
    /// Unix timestamp in milliseconds when the listing expires.
    pub expires_at: u64,
}

impl Listing {
    /// A listing is active while `now` is strictly before its expiry.
    pub const fn is_active_at(&self, now: u64) -> bool {
        now < self.expires_at
    }

    pub const fn is_expired_at(&self, now: u64) -> bool {
        !self.is_active_at(now)
    }

    /// Milliseconds until expiry (0 once expired).
    pub const fn remaining_millis_at(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}
