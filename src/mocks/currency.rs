//! Mock currency provider with controllable balances and failure injection.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::traits::{CurrencyProvider, PlayerId};

#[derive(Debug, Default)]
struct CurrencyState {
    ready: bool,
    balances: HashMap<PlayerId, f64>,
    fail_withdraw_for: Option<PlayerId>,
    fail_deposit_for: Option<PlayerId>,
    withdrawals: u64,
    deposits: u64,
}

/// Mock economy backend. Clones share state.
#[derive(Debug, Clone)]
pub struct MockCurrency {
    state: Arc<Mutex<CurrencyState>>,
}

impl MockCurrency {
    /// Create a ready provider with no accounts.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CurrencyState {
                ready: true,
                ..CurrencyState::default()
            })),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.state.lock().ready = ready;
    }

    pub fn set_balance(&self, account: PlayerId, amount: f64) {
        self.state.lock().balances.insert(account, amount);
    }

    pub fn balance_of(&self, account: PlayerId) -> f64 {
        self.state
            .lock()
            .balances
            .get(&account)
            .copied()
            .unwrap_or(0.0)
    }

    /// Make every withdrawal from `account` fail.
    pub fn fail_withdrawals_for(&self, account: PlayerId) {
        self.state.lock().fail_withdraw_for = Some(account);
    }

    /// Make every deposit into `account` fail (simulates a broken payout).
    pub fn fail_deposits_for(&self, account: PlayerId) {
        self.state.lock().fail_deposit_for = Some(account);
    }

    /// Total successful withdrawals across all accounts.
    pub fn withdrawal_count(&self) -> u64 {
        self.state.lock().withdrawals
    }

    /// Total successful deposits across all accounts.
    pub fn deposit_count(&self) -> u64 {
        self.state.lock().deposits
    }
}

impl Default for MockCurrency {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyProvider for MockCurrency {
    fn is_ready(&self) -> bool {
        self.state.lock().ready
    }

    fn has(&self, account: PlayerId, amount: f64) -> bool {
        let state = self.state.lock();
        state.ready && state.balances.get(&account).copied().unwrap_or(0.0) >= amount
    }

    fn withdraw(&self, account: PlayerId, amount: f64) -> bool {
        let mut state = self.state.lock();
        if !state.ready || amount < 0.0 || state.fail_withdraw_for == Some(account) {
            return false;
        }
        let balance = state.balances.entry(account).or_insert(0.0);
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        state.withdrawals += 1;
        true
    }

    fn deposit(&self, account: PlayerId, amount: f64) -> bool {
        let mut state = self.state.lock();
        if !state.ready || amount < 0.0 || state.fail_deposit_for == Some(account) {
            return false;
        }
        *state.balances.entry(account).or_insert(0.0) += amount;
        state.deposits += 1;
        true
    }
}
