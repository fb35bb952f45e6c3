//! Durable idempotency-key store
//!
//! Keyed by `(endpoint, key)`. A hit returns the previously computed
//! result instead of re-executing side effects — network retries and
//! double-clicks must not double-charge stock or double-apply vouchers.

use dashmap::DashMap;

#[derive(Default)]
pub struct IdempotencyStore {
    /// `(endpoint, idempotency key)` → stored result reference
    entries: DashMap<(String, String), String>,
}

impl IdempotencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, endpoint: &str, key: &str) -> Option<String> {
        self.entries
            .get(&(endpoint.to_string(), key.to_string()))
            .map(|v| v.clone())
    }

    pub fn put(&self, endpoint: &str, key: &str, result: String) {
        self.entries
            .insert((endpoint.to_string(), key.to_string()), result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_scoped_per_endpoint() {
        let store = IdempotencyStore::new();
        store.put("checkout/commit", "k1", "GRP-AAA".into());
        assert_eq!(store.get("checkout/commit", "k1").as_deref(), Some("GRP-AAA"));
        assert!(store.get("other/endpoint", "k1").is_none());
    }
}
