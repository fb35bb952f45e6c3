//! Checkout Commit Engine
//!
//! Turns a complete draft into one immutable [`OrderGroup`] plus one
//! [`Order`] per shop — atomically (all shops or none) and idempotently
//! (a replayed `Idempotency-Key` returns the prior result instead of
//! re-executing side effects).
//!
//! # Commit Flow
//!
//! ```text
//! commit(draft_code, payment_method, idempotency_key)
//!     ├─ 1. Idempotency replay check
//!     ├─ 2. Acquire commit lock
//!     ├─ 3. Re-check idempotency under the lock
//!     ├─ 4. Load draft (owned, unconsumed, unexpired)
//!     ├─ 5. Re-project from the live catalog (re-price)
//!     ├─ 6. Validate completeness (shipping selected everywhere)
//!     ├─ 7. Compare-and-decrement all stock (abort wholesale on shortfall)
//!     ├─ 8. Redeem applied vouchers (rollback stock if one fails)
//!     ├─ 9. Materialize orders + group (frozen snapshots)
//!     ├─ 10. Mark draft consumed, record spend, clear committed cart SKUs
//!     └─ 11. Store idempotency result
//! ```

use chrono::Utc;

use super::{CheckoutService, voucher};
use crate::models::{
    CheckoutDraft, Money, Order, OrderGroup, OrderItem, OrderStatus, PaymentMethod, VoucherScope,
};
use crate::utils::{AppError, AppResult, codes};

/// Idempotency scope for the commit endpoint
pub const COMMIT_ENDPOINT: &str = "customer/checkout/commit";

/// What a successful commit returns: `{groupCode, orders[]}`
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutcome {
    pub group_code: String,
    pub orders: Vec<Order>,
}

impl CheckoutService {
    /// `POST /customer/checkout/commit`
    pub fn commit(
        &self,
        buyer_id: &str,
        draft_code: &str,
        payment_method: PaymentMethod,
        idempotency_key: Option<&str>,
    ) -> AppResult<CommitOutcome> {
        // Fast-path replay check before taking the lock
        if let Some(key) = idempotency_key
            && let Some(outcome) = self.replay(buyer_id, draft_code, key)?
        {
            return Ok(outcome);
        }

        let _guard = self.commit_lock.lock();

        // Re-check under the lock: the race loser of a double-submit must
        // see the winner's stored result, not re-execute
        if let Some(key) = idempotency_key
            && let Some(outcome) = self.replay(buyer_id, draft_code, key)?
        {
            return Ok(outcome);
        }

        let draft = self.load_owned(buyer_id, draft_code)?;

        // 1. Re-price against the current catalog (stale-draft defense).
        // Stock may have moved since the draft was built.
        let draft = self.reproject(&draft)?;

        // 2. Completeness: every group needs a selected shipping option
        if draft.has_blocked_group() {
            return Err(AppError::not_eligible(
                "A shop in this draft has no shipping available",
            ));
        }
        for g in &draft.groups {
            if g.selected_option_code.is_none() {
                return Err(AppError::validation(format!(
                    "No shipping option selected for shop {}",
                    g.shop_id
                )));
            }
        }

        // 3. Compare-and-decrement stock, all lines or none
        let stock_lines: Vec<(String, u32)> = draft
            .items
            .iter()
            .map(|l| (l.sku_id.clone(), l.qty))
            .collect();
        self.catalog.decrement_stock(&stock_lines)?;

        // 4. Redeem every applied voucher, re-checking eligibility against
        // current state. A failure here rolls the stock back — the commit
        // must leave no partial side effect.
        if let Err(e) = self.redeem_vouchers(&draft) {
            self.catalog.restock(&stock_lines);
            return Err(e);
        }

        // 5. Materialize frozen orders + the group envelope
        let now = Utc::now();
        let group_code = codes::group_code();
        let initial_status = if payment_method.requires_confirmation() {
            OrderStatus::PendingPayment
        } else {
            OrderStatus::Placed
        };

        let platform_shares = allocate_platform_discount(&draft);
        let mut orders = Vec::with_capacity(draft.groups.len());
        for (g, platform_share) in draft.groups.iter().zip(platform_shares) {
            let items: Vec<OrderItem> = g
                .lines
                .iter()
                .map(|l| OrderItem {
                    sku_id: l.sku_id.clone(),
                    name: l.name.clone(),
                    variant: l.variant.clone(),
                    unit_price: l.unit_price,
                    qty: l.qty,
                    line_total: l.line_total,
                })
                .collect();
            let discount = g.shop_discount + platform_share;
            orders.push(Order {
                code: codes::order_code(),
                group_code: group_code.clone(),
                shop_id: g.shop_id.clone(),
                buyer_id: buyer_id.to_string(),
                items,
                subtotal: g.subtotal,
                shipping_fee: g.shipping_fee,
                discount,
                total: (g.subtotal + g.shipping_fee - discount).max(0),
                payment_method,
                shipping_address: draft.shipping_address.clone(),
                status: initial_status,
                shipment: None,
                cancel_request: None,
                return_request: None,
                refund_request: None,
                refunded_amount: None,
                dispute_ids: Vec::new(),
                timeline: Vec::new(),
                created_at: now,
                updated_at: now,
            });
        }

        let group = OrderGroup {
            group_code: group_code.clone(),
            buyer_id: buyer_id.to_string(),
            total: draft.totals.total,
            order_codes: orders.iter().map(|o| o.code.clone()).collect(),
            created_at: now,
        };

        for order in &orders {
            self.orders.insert_order(order.clone());
        }
        self.orders.insert_group(group);

        // 6. Consume the draft; later attempts fail with CONFLICT
        self.drafts.mark_consumed(draft_code);

        // 7. Side effects: spend ledger + clear only the committed SKUs
        self.buyers.record_spend(buyer_id, draft.totals.total, now);
        let committed: Vec<String> = draft.items.iter().map(|l| l.sku_id.clone()).collect();
        self.carts.remove_skus(buyer_id, &committed);

        if let Some(key) = idempotency_key {
            self.idempotency.put(
                COMMIT_ENDPOINT,
                &scoped_key(buyer_id, key),
                format!("{draft_code}|{group_code}"),
            );
        }

        tracing::info!(
            buyer = buyer_id,
            group = %group_code,
            orders = orders.len(),
            total = draft.totals.total,
            "Checkout committed"
        );

        Ok(CommitOutcome { group_code, orders })
    }

    /// Idempotent replay: same key → the previously materialized group.
    /// The same key aimed at a different draft is a caller bug.
    fn replay(&self, buyer_id: &str, draft_code: &str, key: &str) -> AppResult<Option<CommitOutcome>> {
        let Some(stored) = self.idempotency.get(COMMIT_ENDPOINT, &scoped_key(buyer_id, key)) else {
            return Ok(None);
        };
        let (stored_draft, group_code) = stored
            .split_once('|')
            .ok_or_else(|| AppError::internal("Corrupt idempotency record"))?;
        if stored_draft != draft_code {
            return Err(AppError::conflict(format!(
                "Idempotency key was already used for draft {stored_draft}"
            )));
        }
        let group = self
            .orders
            .group(group_code)
            .ok_or_else(|| AppError::internal("Idempotency record points at a missing group"))?;
        let orders = group
            .order_codes
            .iter()
            .filter_map(|c| self.orders.order(c))
            .collect();
        Ok(Some(CommitOutcome {
            group_code: group.group_code,
            orders,
        }))
    }

    /// Increment `used_count` on every voucher the draft actually applies.
    /// Runs under the commit lock; `redeem_if` re-checks eligibility under
    /// the voucher entry guard as well.
    fn redeem_vouchers(&self, draft: &CheckoutDraft) -> AppResult<()> {
        let now = Utc::now();
        let spend = self.buyers.trailing_spend(&draft.buyer_id, now);

        if let Some(code) = &draft.platform_voucher_code {
            let ok = self.vouchers.redeem_if(code, |v| {
                v.scope == VoucherScope::Platform
                    && voucher::evaluate(v, draft.totals.subtotal, spend, now).eligible
            });
            if !ok {
                return Err(AppError::conflict(format!("Voucher {code} is no longer eligible")));
            }
        }
        for g in &draft.groups {
            if let Some(code) = &g.shop_voucher_code {
                let ok = self.vouchers.redeem_if(code, |v| {
                    v.scope == VoucherScope::Shop
                        && voucher::evaluate(v, g.subtotal, spend, now).eligible
                });
                if !ok {
                    return Err(AppError::conflict(format!("Voucher {code} is no longer eligible")));
                }
            }
        }
        Ok(())
    }
}

/// Idempotency keys are namespaced per buyer
fn scoped_key(buyer_id: &str, key: &str) -> String {
    format!("{buyer_id}:{key}")
}

/// Split the platform discount across groups proportionally to their
/// subtotals; the last group absorbs the rounding remainder so the shares
/// always sum to the exact discount.
fn allocate_platform_discount(draft: &CheckoutDraft) -> Vec<Money> {
    let total_subtotal: Money = draft.groups.iter().map(|g| g.subtotal).sum();
    let discount = draft.platform_discount;
    if discount == 0 || total_subtotal == 0 {
        return vec![0; draft.groups.len()];
    }
    let mut shares: Vec<Money> = Vec::with_capacity(draft.groups.len());
    let mut allocated: Money = 0;
    for (i, g) in draft.groups.iter().enumerate() {
        let share = if i + 1 == draft.groups.len() {
            discount - allocated
        } else {
            discount * g.subtotal / total_subtotal
        };
        allocated += share;
        shares.push(share);
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, DraftGroup, DraftTotals};

    fn group(shop: &str, subtotal: Money) -> DraftGroup {
        DraftGroup {
            shop_id: shop.into(),
            shop_name: shop.into(),
            lines: vec![],
            subtotal,
            shipping_options: vec![],
            selected_option_code: None,
            shipping_fee: 0,
            shop_voucher_code: None,
            shop_discount: 0,
            error_code: None,
        }
    }

    fn draft_with(groups: Vec<DraftGroup>, platform_discount: Money) -> CheckoutDraft {
        let subtotal = groups.iter().map(|g| g.subtotal).sum();
        CheckoutDraft {
            code: "DFT-T".into(),
            buyer_id: "b".into(),
            signature: String::new(),
            items: vec![],
            shipping_address: Address {
                full_name: "T".into(),
                phone: "0".into(),
                line1: "L".into(),
                line2: None,
                city: "C".into(),
            },
            groups,
            platform_voucher_code: None,
            platform_discount,
            note: None,
            totals: DraftTotals {
                subtotal,
                shipping_total: 0,
                discount_total: platform_discount,
                total: subtotal - platform_discount,
            },
            created_at: Utc::now(),
            expires_at: Utc::now(),
            consumed: false,
        }
    }

    #[test]
    fn platform_discount_allocation_sums_exactly() {
        let draft = draft_with(
            vec![group("a", 100_000), group("b", 200_000), group("c", 50_000)],
            19_999,
        );
        let shares = allocate_platform_discount(&draft);
        assert_eq!(shares.iter().sum::<Money>(), 19_999);
        // proportional: a gets ~2/7, b ~4/7
        assert!(shares[1] > shares[0]);
    }

    #[test]
    fn zero_discount_allocates_zeroes() {
        let draft = draft_with(vec![group("a", 100_000)], 0);
        assert_eq!(allocate_platform_discount(&draft), vec![0]);
    }
}
