//! Checkout draft model
//!
//! 草稿是购物车 + 地址的纯投影：每次变更都整体重算，从不打补丁。
//! Totals are always recomputed server-side from the live catalog; nothing
//! price-related is ever trusted from client input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Address, CartLine, Money};

/// One priced line inside a draft group (frozen display copy, re-derived
/// on every refresh)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    pub sku_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub unit_price: Money,
    pub qty: u32,
    pub line_total: Money,
}

/// Shipping ETA in days
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingEta {
    pub min_days: u32,
    pub max_days: u32,
}

/// A quoted shipping option for one group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub option_id: String,
    pub carrier: String,
    pub service_name: String,
    pub fee: Money,
    pub eta: ShippingEta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Group-level error surfaced on the draft
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupErrorCode {
    /// The shop has no active shipping configuration
    NoShippingAvailable,
}

/// Per-shop portion of a draft
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftGroup {
    pub shop_id: String,
    pub shop_name: String,
    pub lines: Vec<DraftLine>,
    pub subtotal: Money,
    /// Current shipping menu, revalidated on each mutation
    pub shipping_options: Vec<ShippingOption>,
    /// Chosen option; nullable until the buyer picks one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option_code: Option<String>,
    pub shipping_fee: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_voucher_code: Option<String>,
    pub shop_discount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<GroupErrorCode>,
}

/// Derived draft totals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DraftTotals {
    pub subtotal: Money,
    pub shipping_total: Money,
    pub discount_total: Money,
    pub total: Money,
}

/// Ephemeral checkout draft, keyed by an opaque code and owned by one buyer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDraft {
    pub code: String,
    pub buyer_id: String,
    /// Sorted sku/qty fingerprint; identical carts reuse the same draft
    #[serde(skip)]
    pub signature: String,
    pub items: Vec<CartLine>,
    pub shipping_address: Address,
    pub groups: Vec<DraftGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_voucher_code: Option<String>,
    pub platform_discount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub totals: DraftTotals,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Set by the commit engine; a consumed draft can never commit again
    #[serde(skip)]
    pub consumed: bool,
}

impl CheckoutDraft {
    /// A group with an empty shipping menu cannot be selected or committed
    pub fn has_blocked_group(&self) -> bool {
        self.groups.iter().any(|g| g.error_code.is_some())
    }

    pub fn group(&self, shop_id: &str) -> Option<&DraftGroup> {
        self.groups.iter().find(|g| g.shop_id == shop_id)
    }
}

/// Canonical cart fingerprint: sorted `sku:qty` pairs joined with `,`
pub fn cart_signature(items: &[CartLine]) -> String {
    let mut pairs: Vec<String> = items
        .iter()
        .map(|l| format!("{}:{}", l.sku_id, l.qty))
        .collect();
    pairs.sort();
    pairs.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_order_independent() {
        let a = vec![
            CartLine { sku_id: "sku-1".into(), qty: 2 },
            CartLine { sku_id: "sku-2".into(), qty: 1 },
        ];
        let b = vec![
            CartLine { sku_id: "sku-2".into(), qty: 1 },
            CartLine { sku_id: "sku-1".into(), qty: 2 },
        ];
        assert_eq!(cart_signature(&a), cart_signature(&b));
    }

    #[test]
    fn signature_distinguishes_quantities() {
        let a = vec![CartLine { sku_id: "sku-1".into(), qty: 2 }];
        let b = vec![CartLine { sku_id: "sku-1".into(), qty: 3 }];
        assert_ne!(cart_signature(&a), cart_signature(&b));
    }
}
