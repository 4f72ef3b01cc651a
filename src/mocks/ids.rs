//! Deterministic id source for testing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use crate::traits::{IdSource, ListingId};

/// Id source producing sequential, predictable listing ids. Clones share
/// the counter.
#[derive(Debug, Clone)]
pub struct MockIds {
    counter: Arc<AtomicU64>,
}

impl MockIds {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(1)),
        }
    }

    /// The id that corresponds to sequence number `n`.
    pub fn nth(n: u64) -> ListingId {
        ListingId::from_uuid(Uuid::from_u128(n as u128))
    }
}

impl Default for MockIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for MockIds {
    fn next_listing_id(&self) -> ListingId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Self::nth(n)
    }
}
