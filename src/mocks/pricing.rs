//! Mock pricing oracle with scripted suggestions.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::marketplace::ItemSnapshot;
use crate::traits::{PlayerId, PricingOracle};

#[derive(Debug, Default)]
struct OracleState {
    active: bool,
    prices: HashMap<String, f64>,
    calls: u64,
}

/// Mock oracle that suggests prices by item type name. Clones share state.
#[derive(Debug, Clone)]
pub struct MockOracle {
    state: Arc<Mutex<OracleState>>,
}

impl MockOracle {
    /// Create an active oracle with no scripted prices.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(OracleState {
                active: true,
                ..OracleState::default()
            })),
        }
    }

    pub fn set_active(&self, active: bool) {
        self.state.lock().active = active;
    }

    /// Script a suggested price for an item type.
    pub fn set_price(&self, type_name: &str, price: f64) {
        self.state.lock().prices.insert(type_name.to_string(), price);
    }

    /// Remove any scripted price for an item type.
    pub fn clear_price(&self, type_name: &str) {
        self.state.lock().prices.remove(type_name);
    }

    /// Number of suggestion calls made against this oracle.
    pub fn call_count(&self) -> u64 {
        self.state.lock().calls
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingOracle for MockOracle {
    fn is_active(&self) -> bool {
        self.state.lock().active
    }

    fn suggest_price(&self, item: &ItemSnapshot, _buyer: Option<PlayerId>) -> Option<f64> {
        let mut state = self.state.lock();
        state.calls += 1;
        state.prices.get(&item.type_name).copied()
    }
}
