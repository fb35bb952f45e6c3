//! Checkout draft store
//!
//! Drafts are ephemeral: TTL expiry is lazy (checked on access — this core
//! runs no background sweepers). A consumed draft stays around until it
//! expires so idempotent replays can still find it.

use chrono::Utc;
use dashmap::DashMap;

use crate::models::CheckoutDraft;

/// Draft lifetime; abandoned drafts vanish after this
pub const DRAFT_TTL_MINUTES: i64 = 60;

#[derive(Default)]
pub struct DraftStore {
    drafts: DashMap<String, CheckoutDraft>,
    /// `(buyer, cart signature)` → draft code, so the same cart re-enters
    /// the same draft instead of minting a new one
    by_signature: DashMap<(String, String), String>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, draft: CheckoutDraft) {
        self.by_signature.insert(
            (draft.buyer_id.clone(), draft.signature.clone()),
            draft.code.clone(),
        );
        self.drafts.insert(draft.code.clone(), draft);
    }

    /// Fetch by code, expiring lazily
    pub fn get(&self, code: &str) -> Option<CheckoutDraft> {
        let expired = match self.drafts.get(code) {
            Some(d) if d.expires_at > Utc::now() => return Some(d.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.remove(code);
        }
        None
    }

    /// Find an existing live draft for a buyer's cart signature
    pub fn find_by_signature(&self, buyer_id: &str, signature: &str) -> Option<CheckoutDraft> {
        let code = self
            .by_signature
            .get(&(buyer_id.to_string(), signature.to_string()))
            .map(|c| c.clone())?;
        self.get(&code)
    }

    /// Replace a draft wholesale (drafts are full re-derivations,
    /// last-write-wins per the concurrency model)
    pub fn replace(&self, draft: CheckoutDraft) {
        self.drafts.insert(draft.code.clone(), draft);
    }

    /// Mark consumed under the entry guard; returns false if the draft was
    /// already consumed (the double-commit race loser sees this).
    pub fn mark_consumed(&self, code: &str) -> bool {
        match self.drafts.get_mut(code) {
            Some(mut d) if !d.consumed => {
                d.consumed = true;
                true
            }
            _ => false,
        }
    }

    fn remove(&self, code: &str) {
        if let Some((_, d)) = self.drafts.remove(code) {
            self.by_signature
                .remove(&(d.buyer_id.clone(), d.signature.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, DraftTotals};
    use chrono::Duration;

    fn draft(code: &str, expires_in_minutes: i64) -> CheckoutDraft {
        let now = Utc::now();
        CheckoutDraft {
            code: code.into(),
            buyer_id: "buyer-1".into(),
            signature: "a:1".into(),
            items: vec![],
            shipping_address: Address {
                full_name: "Nguyen Van A".into(),
                phone: "0900000000".into(),
                line1: "1 Le Loi".into(),
                line2: None,
                city: "HCMC".into(),
            },
            groups: vec![],
            platform_voucher_code: None,
            platform_discount: 0,
            note: None,
            totals: DraftTotals { subtotal: 0, shipping_total: 0, discount_total: 0, total: 0 },
            created_at: now,
            expires_at: now + Duration::minutes(expires_in_minutes),
            consumed: false,
        }
    }

    #[test]
    fn expired_draft_is_gone() {
        let store = DraftStore::new();
        store.insert(draft("DFT-X", -1));
        assert!(store.get("DFT-X").is_none());
        assert!(store.find_by_signature("buyer-1", "a:1").is_none());
    }

    #[test]
    fn mark_consumed_only_once() {
        let store = DraftStore::new();
        store.insert(draft("DFT-Y", 30));
        assert!(store.mark_consumed("DFT-Y"));
        assert!(!store.mark_consumed("DFT-Y"));
    }
}
