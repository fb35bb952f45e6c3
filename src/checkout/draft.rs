//! Draft Builder
//!
//! The draft is always a pure projection of (cart items, address, current
//! selections) against the live catalog — never cumulative patches. Every
//! mutating call and every read re-runs the projection, so totals can
//! never go stale while prices or stock move underneath.

use std::collections::HashMap;

use chrono::{Duration, Utc};

use super::{CheckoutService, shipping, voucher};
use crate::models::{
    Address, AddressInput, CartLine, CheckoutDraft, DraftGroup, DraftLine, DraftTotals,
    GroupErrorCode, Sku, VoucherScope, draft::cart_signature,
};
use crate::store::DRAFT_TTL_MINUTES;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, codes};

/// Buyer choices carried across projections, reset when no longer valid
#[derive(Debug, Default, Clone)]
struct Selections {
    shipping: HashMap<String, String>,
    shop_vouchers: HashMap<String, String>,
    platform_voucher: Option<String>,
    note: Option<String>,
}

impl From<&CheckoutDraft> for Selections {
    fn from(draft: &CheckoutDraft) -> Self {
        let mut sel = Selections {
            platform_voucher: draft.platform_voucher_code.clone(),
            note: draft.note.clone(),
            ..Default::default()
        };
        for g in &draft.groups {
            if let Some(opt) = &g.selected_option_code {
                sel.shipping.insert(g.shop_id.clone(), opt.clone());
            }
            if let Some(code) = &g.shop_voucher_code {
                sel.shop_vouchers.insert(g.shop_id.clone(), code.clone());
            }
        }
        sel
    }
}

/// Voucher evaluation view for the draft's voucher preview endpoint
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftVoucherView {
    pub code: String,
    pub scope: VoucherScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub discount: i64,
}

impl CheckoutService {
    /// `POST /customer/checkout/draft` — create or refresh the draft for a
    /// cart signature. Idempotent on identical inputs.
    pub fn build_or_refresh(
        &self,
        buyer_id: &str,
        items: Vec<CartLine>,
        address_input: AddressInput,
    ) -> AppResult<CheckoutDraft> {
        let address = self.resolve_address(buyer_id, address_input)?;
        let signature = cart_signature(&items);

        let (code, created_at, selections) =
            match self.drafts.find_by_signature(buyer_id, &signature) {
                Some(prev) if !prev.consumed => {
                    (prev.code.clone(), prev.created_at, Selections::from(&prev))
                }
                _ => (codes::draft_code(), Utc::now(), Selections::default()),
            };

        let draft = self.project(buyer_id, &code, created_at, items, address, selections)?;
        self.drafts.insert(draft.clone());
        Ok(draft)
    }

    /// Fetch a draft, re-projecting so totals reflect the current catalog
    pub fn get_draft(&self, buyer_id: &str, code: &str) -> AppResult<CheckoutDraft> {
        let draft = self.load_owned(buyer_id, code)?;
        let refreshed = self.reproject(&draft)?;
        self.drafts.replace(refreshed.clone());
        Ok(refreshed)
    }

    /// `PATCH .../address`
    pub fn update_address(
        &self,
        buyer_id: &str,
        code: &str,
        input: AddressInput,
    ) -> AppResult<CheckoutDraft> {
        let draft = self.load_owned(buyer_id, code)?;
        let address = self.resolve_address(buyer_id, input)?;
        let sel = Selections::from(&draft);
        let refreshed = self.project(
            buyer_id,
            code,
            draft.created_at,
            draft.items.clone(),
            address,
            sel,
        )?;
        self.drafts.replace(refreshed.clone());
        Ok(refreshed)
    }

    /// `PATCH .../shipping` — select a shipping option for one group
    pub fn select_shipping(
        &self,
        buyer_id: &str,
        code: &str,
        shop_id: &str,
        option_code: &str,
    ) -> AppResult<CheckoutDraft> {
        let draft = self.load_owned(buyer_id, code)?;
        let group = draft
            .group(shop_id)
            .ok_or_else(|| AppError::validation(format!("Shop {shop_id} is not part of this draft")))?;
        if group.error_code == Some(GroupErrorCode::NoShippingAvailable) {
            return Err(AppError::not_eligible(format!(
                "No shipping available for shop {shop_id}; the seller has not configured shipping"
            )));
        }
        if !group.shipping_options.iter().any(|o| o.option_id == option_code) {
            return Err(AppError::validation(format!(
                "Shipping option {option_code} is not in the current menu for shop {shop_id}"
            )));
        }

        let mut sel = Selections::from(&draft);
        sel.shipping.insert(shop_id.to_string(), option_code.to_string());
        self.apply(&draft, sel)
    }

    /// `PATCH .../voucher` — set or clear the platform voucher
    pub fn set_platform_voucher(
        &self,
        buyer_id: &str,
        code: &str,
        voucher_code: Option<String>,
    ) -> AppResult<CheckoutDraft> {
        let draft = self.load_owned(buyer_id, code)?;
        if let Some(vcode) = &voucher_code {
            let v = self
                .vouchers
                .get(vcode)
                .ok_or_else(|| AppError::not_found(format!("Voucher {vcode}")))?;
            if v.scope != VoucherScope::Platform {
                return Err(AppError::validation(format!(
                    "Voucher {vcode} is not a platform voucher"
                )));
            }
            let spend = self.buyers.trailing_spend(buyer_id, Utc::now());
            let eval = voucher::evaluate(&v, draft.totals.subtotal, spend, Utc::now());
            if !eval.eligible {
                return Err(AppError::not_eligible(eval.reason.unwrap_or_default()));
            }
        }

        let mut sel = Selections::from(&draft);
        sel.platform_voucher = voucher_code;
        self.apply(&draft, sel)
    }

    /// `PATCH .../shop-voucher` — set or clear one group's shop voucher
    pub fn set_shop_voucher(
        &self,
        buyer_id: &str,
        code: &str,
        shop_id: &str,
        voucher_code: Option<String>,
    ) -> AppResult<CheckoutDraft> {
        let draft = self.load_owned(buyer_id, code)?;
        let group = draft
            .group(shop_id)
            .ok_or_else(|| AppError::validation(format!("Shop {shop_id} is not part of this draft")))?;

        if let Some(vcode) = &voucher_code {
            let v = self
                .vouchers
                .get(vcode)
                .ok_or_else(|| AppError::not_found(format!("Voucher {vcode}")))?;
            if v.scope != VoucherScope::Shop || v.shop_id.as_deref() != Some(shop_id) {
                return Err(AppError::validation(format!(
                    "Voucher {vcode} does not belong to shop {shop_id}"
                )));
            }
            let spend = self.buyers.trailing_spend(buyer_id, Utc::now());
            let eval = voucher::evaluate(&v, group.subtotal, spend, Utc::now());
            if !eval.eligible {
                return Err(AppError::not_eligible(eval.reason.unwrap_or_default()));
            }
        }

        let mut sel = Selections::from(&draft);
        match voucher_code {
            Some(vcode) => {
                sel.shop_vouchers.insert(shop_id.to_string(), vcode);
            }
            None => {
                sel.shop_vouchers.remove(shop_id);
            }
        }
        self.apply(&draft, sel)
    }

    /// `PATCH .../note`
    pub fn set_note(
        &self,
        buyer_id: &str,
        code: &str,
        note: Option<String>,
    ) -> AppResult<CheckoutDraft> {
        validate_optional_text(&note, "note", MAX_NOTE_LEN)?;
        let draft = self.load_owned(buyer_id, code)?;
        let mut sel = Selections::from(&draft);
        sel.note = note.filter(|n| !n.trim().is_empty());
        self.apply(&draft, sel)
    }

    /// `GET .../vouchers` — evaluation view of the currently applied codes
    pub fn voucher_preview(&self, buyer_id: &str, code: &str) -> AppResult<Vec<DraftVoucherView>> {
        let draft = self.get_draft(buyer_id, code)?;
        let spend = self.buyers.trailing_spend(buyer_id, Utc::now());
        let now = Utc::now();
        let mut out = Vec::new();

        if let Some(vcode) = &draft.platform_voucher_code
            && let Some(v) = self.vouchers.get(vcode)
        {
            let eval = voucher::evaluate(&v, draft.totals.subtotal, spend, now);
            out.push(DraftVoucherView {
                code: v.code,
                scope: VoucherScope::Platform,
                shop_id: None,
                eligible: eval.eligible,
                reason: eval.reason,
                discount: eval.discount,
            });
        }
        for g in &draft.groups {
            if let Some(vcode) = &g.shop_voucher_code
                && let Some(v) = self.vouchers.get(vcode)
            {
                let eval = voucher::evaluate(&v, g.subtotal, spend, now);
                out.push(DraftVoucherView {
                    code: v.code,
                    scope: VoucherScope::Shop,
                    shop_id: Some(g.shop_id.clone()),
                    eligible: eval.eligible,
                    reason: eval.reason,
                    discount: eval.discount,
                });
            }
        }
        Ok(out)
    }

    // ========== Internals ==========

    /// Load a live draft and check ownership + consumption
    pub(crate) fn load_owned(&self, buyer_id: &str, code: &str) -> AppResult<CheckoutDraft> {
        let draft = self
            .drafts
            .get(code)
            .ok_or_else(|| AppError::not_found(format!("Draft {code}")))?;
        if draft.buyer_id != buyer_id {
            return Err(AppError::forbidden("Draft belongs to another buyer"));
        }
        if draft.consumed {
            return Err(AppError::conflict("DRAFT_ALREADY_COMMITTED"));
        }
        Ok(draft)
    }

    fn resolve_address(&self, buyer_id: &str, input: AddressInput) -> AppResult<Address> {
        let address = match (input.address_id, input.address) {
            (Some(id), _) => self
                .buyers
                .saved_address(buyer_id, &id)
                .ok_or_else(|| AppError::not_found(format!("Address {id}")))?,
            (None, Some(addr)) => addr,
            (None, None) => {
                return Err(AppError::validation(
                    "Either addressId or an inline address is required",
                ));
            }
        };
        address.validate()?;
        Ok(address)
    }

    fn apply(&self, draft: &CheckoutDraft, sel: Selections) -> AppResult<CheckoutDraft> {
        let refreshed = self.project(
            &draft.buyer_id,
            &draft.code,
            draft.created_at,
            draft.items.clone(),
            draft.shipping_address.clone(),
            sel,
        )?;
        self.drafts.replace(refreshed.clone());
        Ok(refreshed)
    }

    pub(crate) fn reproject(&self, draft: &CheckoutDraft) -> AppResult<CheckoutDraft> {
        self.project(
            &draft.buyer_id,
            &draft.code,
            draft.created_at,
            draft.items.clone(),
            draft.shipping_address.clone(),
            Selections::from(draft),
        )
    }

    /// The projection itself: partition by shop, price from the live
    /// catalog, quote shipping, re-validate selections, recompute totals.
    /// Missing/inactive SKU and insufficient stock are terminal errors.
    fn project(
        &self,
        buyer_id: &str,
        code: &str,
        created_at: chrono::DateTime<Utc>,
        items: Vec<CartLine>,
        address: Address,
        sel: Selections,
    ) -> AppResult<CheckoutDraft> {
        if items.is_empty() {
            return Err(AppError::validation("Draft must contain at least one item"));
        }
        let mut seen = std::collections::HashSet::new();
        for line in &items {
            if line.qty == 0 {
                return Err(AppError::validation(format!(
                    "Quantity for SKU {} must be greater than zero",
                    line.sku_id
                )));
            }
            if !seen.insert(line.sku_id.clone()) {
                return Err(AppError::validation(format!(
                    "Duplicate SKU {} in draft items",
                    line.sku_id
                )));
            }
        }

        // Partition by shop in first-seen order
        let mut shop_order: Vec<String> = Vec::new();
        let mut by_shop: HashMap<String, Vec<(CartLine, Sku)>> = HashMap::new();
        for line in &items {
            let sku = self.catalog.resolve_line(&line.sku_id, line.qty)?;
            if !by_shop.contains_key(&sku.shop_id) {
                shop_order.push(sku.shop_id.clone());
            }
            by_shop
                .entry(sku.shop_id.clone())
                .or_default()
                .push((line.clone(), sku));
        }

        let now = Utc::now();
        let spend = self.buyers.trailing_spend(buyer_id, now);
        let mut groups = Vec::with_capacity(shop_order.len());
        let mut subtotal: i64 = 0;

        for shop_id in &shop_order {
            let shop = self
                .catalog
                .shop(shop_id)
                .ok_or_else(|| AppError::not_found(format!("Shop {shop_id}")))?;
            if !shop.is_active {
                return Err(AppError::validation(format!(
                    "Shop {} is currently unavailable",
                    shop.name
                )));
            }

            let lines: Vec<DraftLine> = by_shop[shop_id]
                .iter()
                .map(|(line, sku)| DraftLine {
                    sku_id: sku.id.clone(),
                    name: sku.name.clone(),
                    variant: sku.variant.clone(),
                    unit_price: sku.price,
                    qty: line.qty,
                    line_total: sku.price * line.qty as i64,
                })
                .collect();
            let group_subtotal: i64 = lines.iter().map(|l| l.line_total).sum();
            subtotal += group_subtotal;

            let menu = shipping::quote(&self.catalog.shipping_configs(shop_id), group_subtotal);
            let error_code = menu
                .is_empty()
                .then_some(GroupErrorCode::NoShippingAvailable);

            // Previous selection survives only if still on the menu
            let selected_option_code = sel
                .shipping
                .get(shop_id)
                .filter(|id| menu.iter().any(|o| &o.option_id == *id))
                .cloned();
            let shipping_fee = selected_option_code
                .as_ref()
                .and_then(|id| menu.iter().find(|o| &o.option_id == id))
                .map(|o| o.fee)
                .unwrap_or(0);

            // Previous shop voucher survives only if still eligible
            let (shop_voucher_code, shop_discount) = match sel.shop_vouchers.get(shop_id) {
                Some(vcode) => match self.vouchers.get(vcode) {
                    Some(v)
                        if v.scope == VoucherScope::Shop
                            && v.shop_id.as_deref() == Some(shop_id.as_str()) =>
                    {
                        let eval = voucher::evaluate(&v, group_subtotal, spend, now);
                        if eval.eligible {
                            (Some(vcode.clone()), eval.discount)
                        } else {
                            (None, 0)
                        }
                    }
                    _ => (None, 0),
                },
                None => (None, 0),
            };

            groups.push(DraftGroup {
                shop_id: shop_id.clone(),
                shop_name: shop.name,
                lines,
                subtotal: group_subtotal,
                shipping_options: menu,
                selected_option_code,
                shipping_fee,
                shop_voucher_code,
                shop_discount,
                error_code,
            });
        }

        // Platform voucher over the whole-draft subtotal
        let (platform_voucher_code, platform_discount) = match &sel.platform_voucher {
            Some(vcode) => match self.vouchers.get(vcode) {
                Some(v) if v.scope == VoucherScope::Platform => {
                    let eval = voucher::evaluate(&v, subtotal, spend, now);
                    if eval.eligible {
                        (Some(vcode.clone()), eval.discount)
                    } else {
                        (None, 0)
                    }
                }
                _ => (None, 0),
            },
            None => (None, 0),
        };

        let shipping_total: i64 = groups.iter().map(|g| g.shipping_fee).sum();
        let discount_total = platform_discount + groups.iter().map(|g| g.shop_discount).sum::<i64>();
        let total = (subtotal + shipping_total - discount_total).max(0);

        Ok(CheckoutDraft {
            code: code.to_string(),
            buyer_id: buyer_id.to_string(),
            signature: cart_signature(&items),
            items,
            shipping_address: address,
            groups,
            platform_voucher_code,
            platform_discount,
            note: sel.note,
            totals: DraftTotals {
                subtotal,
                shipping_total,
                discount_total,
                total,
            },
            created_at,
            expires_at: now + Duration::minutes(DRAFT_TTL_MINUTES),
            consumed: false,
        })
    }
}
