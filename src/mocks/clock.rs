//! Mock time provider for testing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::traits::TimeProvider;

/// Mock time provider with controllable time value. Clones share state.
#[derive(Debug, Clone)]
pub struct MockClock {
    current_millis: Arc<AtomicU64>,
}

impl MockClock {
    /// Create a new mock clock starting at the specified timestamp (millis).
    pub fn new(initial_millis: u64) -> Self {
        Self {
            current_millis: Arc::new(AtomicU64::new(initial_millis)),
        }
    }

    /// Create a mock clock starting at a reasonable default (2024-01-01).
    pub fn default_time() -> Self {
        Self::new(1_704_067_200_000)
    }

    /// Set the current time to a specific value.
    pub fn set(&self, millis: u64) {
        self.current_millis.store(millis, Ordering::SeqCst);
    }

    /// Advance time by the specified number of milliseconds.
    pub fn advance(&self, millis: u64) {
        self.current_millis.fetch_add(millis, Ordering::SeqCst);
    }

    /// Get the current mock time value.
    pub fn get(&self) -> u64 {
        self.current_millis.load(Ordering::SeqCst)
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::default_time()
    }
}

impl TimeProvider for MockClock {
    fn now_millis(&self) -> u64 {
        self.current_millis.load(Ordering::SeqCst)
    }
}
