//! Buyer profile store — saved addresses and spend ledger
//!
//! The spend ledger backs voucher loyalty gates: trailing 30-day and
//! 365-day spend, appended on every successful commit.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::models::{Address, Money};

/// Saved address-book entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAddress {
    pub id: String,
    pub address: Address,
}

#[derive(Debug, Clone, Copy)]
struct SpendRecord {
    at: DateTime<Utc>,
    amount: Money,
}

/// Trailing spend totals fed into the voucher evaluator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuyerSpend {
    pub month: Money,
    pub year: Money,
}

#[derive(Default)]
pub struct BuyerStore {
    addresses: DashMap<String, Vec<SavedAddress>>,
    spend: DashMap<String, Vec<SpendRecord>>,
}

impl BuyerStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Address book ==========

    pub fn save_address(&self, buyer_id: &str, entry: SavedAddress) {
        self.addresses
            .entry(buyer_id.to_string())
            .or_default()
            .push(entry);
    }

    pub fn saved_address(&self, buyer_id: &str, address_id: &str) -> Option<Address> {
        self.addresses
            .get(buyer_id)
            .and_then(|list| {
                list.iter()
                    .find(|a| a.id == address_id)
                    .map(|a| a.address.clone())
            })
    }

    // ========== Spend ledger ==========

    pub fn record_spend(&self, buyer_id: &str, amount: Money, at: DateTime<Utc>) {
        self.spend
            .entry(buyer_id.to_string())
            .or_default()
            .push(SpendRecord { at, amount });
    }

    /// Trailing 30-day / 365-day spend as of `now`
    pub fn trailing_spend(&self, buyer_id: &str, now: DateTime<Utc>) -> BuyerSpend {
        let month_start = now - Duration::days(30);
        let year_start = now - Duration::days(365);
        let mut out = BuyerSpend::default();
        if let Some(records) = self.spend.get(buyer_id) {
            for r in records.iter() {
                if r.at >= year_start && r.at <= now {
                    out.year += r.amount;
                    if r.at >= month_start {
                        out.month += r.amount;
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_spend_windows() {
        let store = BuyerStore::new();
        let now = Utc::now();
        store.record_spend("b1", 100_000, now - Duration::days(5));
        store.record_spend("b1", 200_000, now - Duration::days(90));
        store.record_spend("b1", 400_000, now - Duration::days(400));

        let spend = store.trailing_spend("b1", now);
        assert_eq!(spend.month, 100_000);
        assert_eq!(spend.year, 300_000);
    }

    #[test]
    fn unknown_buyer_has_zero_spend() {
        let store = BuyerStore::new();
        assert_eq!(store.trailing_spend("nobody", Utc::now()), BuyerSpend::default());
    }
}
