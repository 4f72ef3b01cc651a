//! The authoritative listing registry.
//!
//! `AuctionHouse` owns all listing and transaction state behind a single
//! mutex: foreground operations and background jobs all serialize through
//! it, so operations observe a strict total order and a reader never sees
//! a half-applied purchase. Callers receive copies, never live records.

pub mod guard;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::config::MarketConfig;
use crate::error::DenyReason;
use crate::marketplace::{round_currency, ItemSnapshot, Listing, TransactionRecord};
use crate::storage::document::{ListingRow, StoreDocument};
use crate::traits::{CurrencyProvider, IdSource, ListingId, PlayerId, PricingOracle, TimeProvider};

use guard::OperationGuard;

/// Successful purchase: the listing that changed hands and the recorded
/// transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOutcome {
    pub listing: Listing,
    pub transaction: TransactionRecord,
}

#[derive(Debug)]
struct HouseState {
    listings: HashMap<ListingId, Listing>,
    /// Newest first, capped at the configured maximum.
    transactions: Vec<TransactionRecord>,
    guard: OperationGuard,
}

/// The marketplace registry. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct AuctionHouse {
    state: Arc<Mutex<HouseState>>,
    config: Arc<MarketConfig>,
    clock: Arc<dyn TimeProvider>,
    ids: Arc<dyn IdSource>,
    currency: Arc<dyn CurrencyProvider>,
    oracle: Arc<dyn PricingOracle>,
}

impl AuctionHouse {
    pub fn new(
        config: Arc<MarketConfig>,
        clock: Arc<dyn TimeProvider>,
        ids: Arc<dyn IdSource>,
        currency: Arc<dyn CurrencyProvider>,
        oracle: Arc<dyn PricingOracle>,
    ) -> Self {
        let guard = OperationGuard::new(config.idempotency.ttl_millis());
        Self {
            state: Arc::new(Mutex::new(HouseState {
                listings: HashMap::new(),
                transactions: Vec::new(),
                guard,
            })),
            config,
            clock,
            ids,
            currency,
            oracle,
        }
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Search length bound for the command layer.
    pub fn max_search_length(&self) -> usize {
        self.config.limits.max_search_length()
    }

    /// Whether the pricing oracle currently reports itself available.
    pub fn oracle_active(&self) -> bool {
        self.oracle.is_active()
    }

    /// Create a new listing for `seller`.
    pub fn create_listing(
        &self,
        seller: PlayerId,
        seller_name: &str,
        item: ItemSnapshot,
        price: f64,
    ) -> Result<Listing, DenyReason> {
        if item.is_empty() {
            return Err(DenyReason::EmptyItem);
        }
        let price = round_currency(price);
        if price <= 0.0 {
            return Err(DenyReason::InvalidPrice);
        }
        if !item.meta_within(&self.config.safety) {
            return Err(DenyReason::UnsafeMetadata);
        }

        let mut state = self.state.lock();
        let active = state
            .listings
            .values()
            .filter(|l| l.seller == seller)
            .count();
        if active >= self.config.limits.max_active_per_seller {
            return Err(DenyReason::TooManyListings);
        }

        let now = self.clock.now_millis();
        let listing = Listing {
            id: self.ids.next_listing_id(),
            seller,
            seller_name: seller_name.to_string(),
            item,
            price,
            created_at: now,
            expires_at: now + self.config.limits.listing_duration().as_millis() as u64,
        };
        state.listings.insert(listing.id, listing.clone());

        info!(listing = %listing.id, seller = %seller_name, price, "listing created");
        Ok(listing)
    }

    /// Purchase a listing.
    ///
    /// Structured as reserve funds -> pay seller -> commit removal, each
    /// step reversed if the next one fails: the item and the money must
    /// never both vanish without the other arriving.
    pub fn purchase(
        &self,
        listing_id: ListingId,
        buyer: PlayerId,
        buyer_name: &str,
        operation_id: &str,
    ) -> Result<PurchaseOutcome, DenyReason> {
        let mut state = self.state.lock();
        let now = self.clock.now_millis();

        if state.guard.seen(operation_id, now) {
            return Err(DenyReason::DuplicateOperation);
        }

        if self.config.repricing.enabled
            && self.config.repricing.refresh_before_purchase
            && self.oracle.is_active()
        {
            self.refresh_listing_price(&mut state, listing_id, Some(buyer));
        }

        let (price, seller) = match state.listings.get(&listing_id) {
            Some(listing) if listing.is_active_at(now) => (listing.price, listing.seller),
            Some(_) => {
                // Expired listings are evicted on sight.
                state.listings.remove(&listing_id);
                return Err(DenyReason::NotFound);
            }
            None => return Err(DenyReason::NotFound),
        };

        if seller == buyer {
            return Err(DenyReason::SelfPurchase);
        }
        if !self.currency.is_ready() {
            return Err(DenyReason::CurrencyUnavailable);
        }
        if !self.currency.has(buyer, price) {
            return Err(DenyReason::InsufficientFunds);
        }

        if !self.currency.withdraw(buyer, price) {
            return Err(DenyReason::InsufficientFunds);
        }

        if !self.currency.deposit(seller, price) {
            warn!(listing = %listing_id, "seller deposit failed, refunding buyer");
            if !self.currency.deposit(buyer, price) {
                error!(listing = %listing_id, amount = price, "refund after failed deposit also failed, funds stuck");
            }
            return Err(DenyReason::PaymentFailed);
        }

        let Some(removed) = state.listings.remove(&listing_id) else {
            // Listing vanished between validation and commit: reverse both
            // money movements and let the caller retry.
            warn!(listing = %listing_id, "listing gone at commit, reversing payment");
            if !self.currency.deposit(buyer, price) {
                error!(listing = %listing_id, amount = price, "buyer refund failed during reversal, funds stuck");
            }
            if !self.currency.withdraw(seller, price) {
                error!(listing = %listing_id, amount = price, "seller clawback failed during reversal, funds stuck");
            }
            return Err(DenyReason::TryAgain);
        };

        let transaction = TransactionRecord {
            auction_id: removed.id,
            buyer,
            buyer_name: buyer_name.to_string(),
            seller: removed.seller,
            seller_name: removed.seller_name.clone(),
            price: removed.price,
            at: now,
        };
        Self::push_transaction(&mut state, transaction.clone(), self.config.limits.transactions_max);
        state.guard.mark(operation_id, now);

        info!(listing = %listing_id, buyer = %buyer_name, price = removed.price, "listing purchased");
        Ok(PurchaseOutcome {
            listing: removed,
            transaction,
        })
    }

    /// Remove a listing owned by `owner`.
    pub fn remove_own_listing(
        &self,
        listing_id: ListingId,
        owner: PlayerId,
        operation_id: &str,
    ) -> Result<(), DenyReason> {
        let mut state = self.state.lock();
        let now = self.clock.now_millis();

        if state.guard.seen(operation_id, now) {
            return Err(DenyReason::DuplicateOperation);
        }

        match state.listings.get(&listing_id) {
            Some(listing) if listing.seller == owner => {}
            _ => return Err(DenyReason::NotFound),
        }
        state.listings.remove(&listing_id);
        state.guard.mark(operation_id, now);

        info!(listing = %listing_id, "listing removed by owner");
        Ok(())
    }

    /// All active listings matching `query`, newest first.
    ///
    /// The query is matched case-insensitively against the item type name
    /// and the seller name; a blank query matches everything.
    pub fn active_listings(&self, query: &str) -> Vec<Listing> {
        let mut state = self.state.lock();
        self.sweep_expired(&mut state);

        let search = query.trim().to_lowercase();
        let mut found: Vec<Listing> = state
            .listings
            .values()
            .filter(|l| {
                search.is_empty()
                    || l.item.type_name.to_lowercase().contains(&search)
                    || l.seller_name.to_lowercase().contains(&search)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        found
    }

    /// All active listings owned by `owner`, newest first.
    pub fn my_listings(&self, owner: PlayerId) -> Vec<Listing> {
        let mut state = self.state.lock();
        self.sweep_expired(&mut state);

        let mut found: Vec<Listing> = state
            .listings
            .values()
            .filter(|l| l.seller == owner)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        found
    }

    pub fn get(&self, id: ListingId) -> Option<Listing> {
        let mut state = self.state.lock();
        self.sweep_expired(&mut state);
        state.listings.get(&id).cloned()
    }

    /// Administrative removal, no ownership or idempotency checks.
    pub fn remove(&self, id: ListingId) -> Option<Listing> {
        let mut state = self.state.lock();
        self.sweep_expired(&mut state);
        state.listings.remove(&id)
    }

    pub fn add_transaction(&self, record: TransactionRecord) {
        let mut state = self.state.lock();
        Self::push_transaction(&mut state, record, self.config.limits.transactions_max);
    }

    /// Transactions where the player is buyer or seller, newest first.
    pub fn transactions_for(&self, player: PlayerId) -> Vec<TransactionRecord> {
        self.state
            .lock()
            .transactions
            .iter()
            .filter(|tx| tx.involves(player))
            .cloned()
            .collect()
    }

    pub fn listing_count(&self) -> usize {
        self.state.lock().listings.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.state.lock().transactions.len()
    }

    /// Re-ask the oracle for every listing's price and apply suggestions
    /// that clear the epsilon. Returns the number of listings repriced.
    ///
    /// Identity and time fields are never touched; only the price moves.
    pub fn reprice_all(&self) -> usize {
        if !self.config.repricing.enabled || !self.oracle.is_active() {
            return 0;
        }

        let mut state = self.state.lock();
        if state.listings.is_empty() {
            return 0;
        }

        let epsilon = self.config.repricing.epsilon;
        let mut updated = 0;
        for listing in state.listings.values_mut() {
            let Some(suggested) = self.oracle.suggest_price(&listing.item, None) else {
                continue;
            };
            if Self::apply_suggestion(listing, suggested, epsilon) {
                updated += 1;
            }
        }
        if updated > 0 {
            info!(updated, "dynamic repricing applied");
        }
        updated
    }

    /// Copy the full state into a finalized document. Holds the lock only
    /// for the copy; serialization and disk I/O happen elsewhere.
    pub fn snapshot(&self) -> StoreDocument {
        let state = self.state.lock();
        let mut doc = StoreDocument::new(self.clock.now_millis());
        for (id, listing) in &state.listings {
            doc.listings
                .insert(id.to_string(), ListingRow::from_listing(listing));
        }
        doc.transactions = state.transactions.clone();
        doc
    }

    /// Replace in-memory state with a trusted document's contents.
    ///
    /// Rows that fail to parse are skipped, and listings already expired
    /// at restore time are dropped.
    pub fn restore(&self, doc: StoreDocument) {
        let now = self.clock.now_millis();
        let mut state = self.state.lock();
        state.listings.clear();
        state.transactions.clear();

        for (key, row) in doc.listings {
            let id: ListingId = match key.parse() {
                Ok(id) => id,
                Err(_) => {
                    warn!(key, "skipping listing with unparseable id");
                    continue;
                }
            };
            let listing = row.into_listing(id);
            if listing.is_active_at(now) {
                state.listings.insert(id, listing);
            }
        }
        state.transactions = doc.transactions;

        info!(
            listings = state.listings.len(),
            transactions = state.transactions.len(),
            "state restored"
        );
    }

    /// Drop all listings, transactions, and guard entries.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.listings.clear();
        state.transactions.clear();
        state.guard.clear();
    }

    fn refresh_listing_price(
        &self,
        state: &mut HouseState,
        listing_id: ListingId,
        buyer: Option<PlayerId>,
    ) {
        let epsilon = self.config.repricing.epsilon;
        if let Some(listing) = state.listings.get_mut(&listing_id) {
            if let Some(suggested) = self.oracle.suggest_price(&listing.item, buyer) {
                Self::apply_suggestion(listing, suggested, epsilon);
            }
        }
    }

    fn apply_suggestion(listing: &mut Listing, suggested: f64, epsilon: f64) -> bool {
        if !suggested.is_finite() || suggested <= 0.0 {
            return false;
        }
        let rounded = round_currency(suggested);
        if rounded <= 0.0 || (rounded - listing.price).abs() <= epsilon {
            return false;
        }
        listing.price = rounded;
        true
    }

    fn sweep_expired(&self, state: &mut HouseState) {
        let now = self.clock.now_millis();
        state.listings.retain(|_, listing| listing.is_active_at(now));
    }

    fn push_transaction(state: &mut HouseState, record: TransactionRecord, max: usize) {
        state.transactions.insert(0, record);
        state.transactions.truncate(max);
    }
}
