//! Voucher store
//!
//! 软删除：优惠券只会被置为 `is_active = false`，从不物理删除，
//! 以保留对账历史。

use dashmap::DashMap;

use crate::models::Voucher;

#[derive(Default)]
pub struct VoucherStore {
    vouchers: DashMap<String, Voucher>,
}

impl VoucherStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, voucher: Voucher) {
        self.vouchers.insert(voucher.code.clone(), voucher);
    }

    pub fn get(&self, code: &str) -> Option<Voucher> {
        self.vouchers.get(code).map(|v| v.clone())
    }

    /// Soft-deactivate (reconciliation history stays intact)
    pub fn deactivate(&self, code: &str) -> bool {
        match self.vouchers.get_mut(code) {
            Some(mut v) => {
                v.is_active = false;
                true
            }
            None => false,
        }
    }

    /// Redeem under the entry guard: re-check eligibility against the
    /// *current* record, then increment `used_count` — both under one lock
    /// so a racing redemption cannot slip past an exhausted limit.
    pub fn redeem_if<F>(&self, code: &str, still_eligible: F) -> bool
    where
        F: FnOnce(&Voucher) -> bool,
    {
        match self.vouchers.get_mut(code) {
            Some(mut v) => {
                if still_eligible(&v) {
                    v.used_count += 1;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{VoucherScope, VoucherType};
    use chrono::{Duration, Utc};

    fn voucher(code: &str, usage_limit: Option<u32>) -> Voucher {
        Voucher {
            code: code.into(),
            scope: VoucherScope::Platform,
            shop_id: None,
            voucher_type: VoucherType::Fixed,
            value: 10_000,
            min_subtotal: 0,
            max_discount: None,
            usage_limit,
            used_count: 0,
            start_at: Utc::now() - Duration::days(1),
            end_at: Utc::now() + Duration::days(1),
            min_buyer_spend_month: None,
            min_buyer_spend_year: None,
            is_active: true,
        }
    }

    #[test]
    fn redeem_if_respects_the_predicate() {
        let store = VoucherStore::new();
        store.upsert(voucher("V1", Some(1)));

        assert!(store.redeem_if("V1", |v| v.used_count < v.usage_limit.unwrap()));
        assert_eq!(store.get("V1").unwrap().used_count, 1);

        // limit exhausted — predicate fails, count unchanged
        assert!(!store.redeem_if("V1", |v| v.used_count < v.usage_limit.unwrap()));
        assert_eq!(store.get("V1").unwrap().used_count, 1);
    }

    #[test]
    fn deactivate_is_soft() {
        let store = VoucherStore::new();
        store.upsert(voucher("V2", None));
        assert!(store.deactivate("V2"));
        let v = store.get("V2").unwrap();
        assert!(!v.is_active);
    }
}
