//! Identity generation for listings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a marketplace participant (buyer or seller).
pub type PlayerId = Uuid;

/// Opaque unique id of a listing. Generated at creation, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Uuid);

impl ListingId {
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ListingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Trait for producing fresh listing ids.
///
/// Injectable so tests can generate deterministic ids.
pub trait IdSource: Send + Sync {
    fn next_listing_id(&self) -> ListingId;
}

/// Production implementation backed by random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIds;

impl SystemIds {
    pub const fn new() -> Self {
        Self
    }
}

impl IdSource for SystemIds {
    fn next_listing_id(&self) -> ListingId {
        ListingId(Uuid::new_v4())
    }
}
