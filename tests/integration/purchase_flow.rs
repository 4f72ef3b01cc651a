//! End-to-end purchase scenarios.

use std::sync::Arc;

use bazaar::DenyReason;

use crate::common::harness::{MarketHarness, HOUR_MS};

#[test]
fn insufficient_funds_then_top_up_and_retry() {
    let h = MarketHarness::new();
    let seller = MarketHarness::player(1);
    let buyer = MarketHarness::player(2);

    let listing = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("EMERALD"), 10.0)
        .unwrap();

    h.currency.set_balance(buyer, 5.0);
    assert_eq!(
        h.house.purchase(listing.id, buyer, "bob", "op-1"),
        Err(DenyReason::InsufficientFunds)
    );
    assert_eq!(h.currency.balance_of(buyer), 5.0);
    assert!(h.house.get(listing.id).is_some());

    h.currency.set_balance(buyer, 10.0);
    let outcome = h.house.purchase(listing.id, buyer, "bob", "op-2").unwrap();

    assert_eq!(outcome.transaction.price, 10.0);
    assert!(h.house.get(listing.id).is_none());
    assert_eq!(h.currency.balance_of(buyer), 0.0);
    assert_eq!(h.currency.balance_of(seller), 10.0);

    let history = h.house.transactions_for(buyer);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].price, 10.0);
}

#[test]
fn duplicate_operation_id_debits_funds_exactly_once() {
    let h = MarketHarness::new();
    let seller = MarketHarness::player(1);
    let buyer = MarketHarness::player(2);
    h.currency.set_balance(buyer, 50.0);

    let first = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("EMERALD"), 10.0)
        .unwrap();
    let second = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("EMERALD"), 10.0)
        .unwrap();

    assert!(h.house.purchase(first.id, buyer, "bob", "op-1").is_ok());
    assert_eq!(
        h.house.purchase(second.id, buyer, "bob", "op-1"),
        Err(DenyReason::DuplicateOperation)
    );

    assert_eq!(h.currency.balance_of(buyer), 40.0);
    assert_eq!(h.currency.withdrawal_count(), 1);
    assert_eq!(h.house.transactions_for(buyer).len(), 1);
}

#[test]
fn expired_listing_is_invisible_everywhere() {
    let h = MarketHarness::new();
    let seller = MarketHarness::player(1);
    let buyer = MarketHarness::player(2);
    h.currency.set_balance(buyer, 100.0);

    let listing = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("EMERALD"), 10.0)
        .unwrap();

    h.clock.advance(25 * HOUR_MS);

    assert!(h.house.active_listings("").is_empty());
    assert!(h.house.get(listing.id).is_none());
    assert_eq!(
        h.house.purchase(listing.id, buyer, "bob", "op-1"),
        Err(DenyReason::NotFound)
    );
    assert_eq!(h.currency.balance_of(buyer), 100.0);
}

#[test]
fn concurrent_purchases_of_one_listing_have_one_winner() {
    let h = MarketHarness::new();
    let seller = MarketHarness::player(1);

    let listing = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("EMERALD"), 10.0)
        .unwrap();

    let successes = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let mut handles = Vec::new();
    for i in 0..8u128 {
        let house = h.house.clone();
        let currency = h.currency.clone();
        let successes = Arc::clone(&successes);
        handles.push(std::thread::spawn(move || {
            let buyer = MarketHarness::player(100 + i);
            currency.set_balance(buyer, 100.0);
            if house
                .purchase(listing.id, buyer, "buyer", &format!("op-{i}"))
                .is_ok()
            {
                successes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(successes.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(h.house.get(listing.id).is_none());
    // One withdrawal, one deposit: money moved exactly once.
    assert_eq!(h.currency.withdrawal_count(), 1);
    assert_eq!(h.currency.balance_of(seller), 10.0);
    assert_eq!(h.house.transactions_for(seller).len(), 1);
}

#[test]
fn deposit_failure_leaves_listing_and_refunds_buyer() {
    let h = MarketHarness::new();
    let seller = MarketHarness::player(1);
    let buyer = MarketHarness::player(2);
    h.currency.set_balance(buyer, 30.0);
    h.currency.fail_deposits_for(seller);

    let listing = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("EMERALD"), 10.0)
        .unwrap();

    assert_eq!(
        h.house.purchase(listing.id, buyer, "bob", "op-1"),
        Err(DenyReason::PaymentFailed)
    );
    assert_eq!(h.currency.balance_of(buyer), 30.0);
    assert_eq!(h.currency.balance_of(seller), 0.0);
    assert!(h.house.get(listing.id).is_some());
}

#[test]
fn owner_removal_and_purchase_cannot_both_succeed() {
    let h = MarketHarness::new();
    let seller = MarketHarness::player(1);
    let buyer = MarketHarness::player(2);
    h.currency.set_balance(buyer, 100.0);

    let listing = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("EMERALD"), 10.0)
        .unwrap();

    h.house.remove_own_listing(listing.id, seller, "op-rm").unwrap();
    assert_eq!(
        h.house.purchase(listing.id, buyer, "bob", "op-buy"),
        Err(DenyReason::NotFound)
    );
    assert_eq!(h.currency.balance_of(buyer), 100.0);
}
