//! Time-bounded duplicate-operation guard.

use std::collections::HashMap;

/// In-memory set of already-applied operation ids.
///
/// Protects money-moving calls against duplicate submission within a short
/// window (double clicks, retried network calls). Deliberately not
/// persisted: duplicate submission is a UI/network concern, not a
/// durability one, so the guard resets on restart. Pruning uses wall-clock
/// time; manual clock changes can prune early or late.
#[derive(Debug)]
pub struct OperationGuard {
    ttl_millis: u64,
    seen: HashMap<String, u64>,
}

impl OperationGuard {
    pub fn new(ttl_millis: u64) -> Self {
        Self {
            ttl_millis,
            seen: HashMap::new(),
        }
    }

    /// Whether `key` was marked within the TTL window. Prunes stale
    /// entries first.
    pub fn seen(&mut self, key: &str, now: u64) -> bool {
        self.prune(now);
        self.seen.contains_key(key)
    }

    /// Record `key` as applied at `now`.
    pub fn mark(&mut self, key: &str, now: u64) {
        self.seen.insert(key.to_string(), now);
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }

    fn prune(&mut self, now: u64) {
        let ttl = self.ttl_millis;
        self.seen.retain(|_, first_seen| now.saturating_sub(*first_seen) <= ttl);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.seen.len()
    }
}
