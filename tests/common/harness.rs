//! Test harness wiring the store to its mock collaborators.

use std::path::Path;
use std::sync::Arc;

use bazaar::mocks::{MockClock, MockCurrency, MockIds, MockOracle};
use bazaar::{AuctionHouse, ItemSnapshot, MarketConfig, PlayerId, StorageManager};
use uuid::Uuid;

pub const HOUR_MS: u64 = 3_600_000;

/// A fully mocked store: controllable clock, scripted economy and oracle.
pub struct MarketHarness {
    pub house: AuctionHouse,
    pub clock: MockClock,
    pub currency: MockCurrency,
    pub oracle: MockOracle,
}

#[allow(dead_code)]
impl MarketHarness {
    pub fn new() -> Self {
        Self::with_config(MarketConfig::default())
    }

    pub fn with_config(config: MarketConfig) -> Self {
        let clock = MockClock::new(1_000_000);
        let currency = MockCurrency::new();
        let oracle = MockOracle::new();
        oracle.set_active(false);

        let house = AuctionHouse::new(
            Arc::new(config),
            Arc::new(clock.clone()),
            Arc::new(MockIds::new()),
            Arc::new(currency.clone()),
            Arc::new(oracle.clone()),
        );
        Self {
            house,
            clock,
            currency,
            oracle,
        }
    }

    /// A fresh house sharing this harness's clock and providers, as after
    /// a process restart (empty state, reset idempotency guard).
    pub fn restarted_house(&self) -> AuctionHouse {
        AuctionHouse::new(
            Arc::new(MarketConfig::default()),
            Arc::new(self.clock.clone()),
            Arc::new(MockIds::new()),
            Arc::new(self.currency.clone()),
            Arc::new(self.oracle.clone()),
        )
    }

    /// Storage manager rooted in `dir`, sharing the harness clock.
    pub fn storage_in(&self, dir: &Path) -> StorageManager {
        StorageManager::new(
            dir.join("auction-data.json"),
            dir.join("backups"),
            3,
            Arc::new(self.clock.clone()),
        )
    }

    pub fn player(n: u128) -> PlayerId {
        Uuid::from_u128(n)
    }

    pub fn item(type_name: &str) -> ItemSnapshot {
        ItemSnapshot::new(type_name, 1)
    }
}
