//! Dynamic repricing behavior against the scripted oracle.

use bazaar::MarketConfig;

use crate::common::harness::MarketHarness;

#[test]
fn sweep_applies_suggestions_and_preserves_identity() {
    let h = MarketHarness::new();
    h.oracle.set_active(true);
    let seller = MarketHarness::player(1);

    let emerald = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("EMERALD"), 10.0)
        .unwrap();
    let stone = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("STONE"), 1.0)
        .unwrap();

    h.oracle.set_price("EMERALD", 12.346);
    // No suggestion for STONE.

    assert_eq!(h.house.reprice_all(), 1);

    let updated = h.house.get(emerald.id).unwrap();
    assert_eq!(updated.price, 12.35); // rounded to 2 decimals
    assert_eq!(updated.id, emerald.id);
    assert_eq!(updated.seller, emerald.seller);
    assert_eq!(updated.created_at, emerald.created_at);
    assert_eq!(updated.expires_at, emerald.expires_at);

    assert_eq!(h.house.get(stone.id).unwrap().price, 1.0);
}

#[test]
fn sweep_is_gated_on_policy_and_oracle() {
    // Oracle inactive: nothing happens even with a scripted price.
    let h = MarketHarness::new();
    let seller = MarketHarness::player(1);
    h.oracle.set_price("EMERALD", 99.0);
    let listing = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("EMERALD"), 10.0)
        .unwrap();
    assert_eq!(h.house.reprice_all(), 0);
    assert_eq!(h.house.get(listing.id).unwrap().price, 10.0);

    // Feature disabled: same.
    let mut config = MarketConfig::default();
    config.repricing.enabled = false;
    let h = MarketHarness::with_config(config);
    h.oracle.set_active(true);
    h.oracle.set_price("EMERALD", 99.0);
    let listing = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("EMERALD"), 10.0)
        .unwrap();
    assert_eq!(h.house.reprice_all(), 0);
    assert_eq!(h.house.get(listing.id).unwrap().price, 10.0);
}

#[test]
fn epsilon_suppresses_noise_updates() {
    let mut config = MarketConfig::default();
    config.repricing.epsilon = 0.5;
    let h = MarketHarness::with_config(config);
    h.oracle.set_active(true);
    let seller = MarketHarness::player(1);

    let listing = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("EMERALD"), 10.0)
        .unwrap();

    h.oracle.set_price("EMERALD", 10.4);
    assert_eq!(h.house.reprice_all(), 0);

    // A delta of exactly epsilon is still suppressed.
    h.oracle.set_price("EMERALD", 10.5);
    assert_eq!(h.house.reprice_all(), 0);

    h.oracle.set_price("EMERALD", 10.6);
    assert_eq!(h.house.reprice_all(), 1);
    assert_eq!(h.house.get(listing.id).unwrap().price, 10.6);
}

#[test]
fn purchase_refresh_charges_the_refreshed_price() {
    let h = MarketHarness::new();
    h.oracle.set_active(true);
    let seller = MarketHarness::player(1);
    let buyer = MarketHarness::player(2);
    h.currency.set_balance(buyer, 100.0);

    let listing = h
        .house
        .create_listing(seller, "alice", MarketHarness::item("EMERALD"), 10.0)
        .unwrap();
    h.oracle.set_price("EMERALD", 14.0);

    let outcome = h.house.purchase(listing.id, buyer, "bob", "op-1").unwrap();
    assert_eq!(outcome.transaction.price, 14.0);
    assert_eq!(h.currency.balance_of(buyer), 86.0);
    assert_eq!(h.currency.balance_of(seller), 14.0);
}
