//! Voucher model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Money;

/// Voucher scope: platform-wide or one shop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoucherScope {
    Platform,
    Shop,
}

/// Discount type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoucherType {
    Percent,
    Fixed,
}

/// Voucher entity (优惠券)
///
/// Deactivation is soft (`is_active = false`), never deletion, so past
/// orders keep reconciling against the voucher they consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    /// Globally unique code, e.g. `SAN10`
    pub code: String,
    pub scope: VoucherScope,
    /// Owning shop for SHOP-scoped vouchers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
    pub voucher_type: VoucherType,
    /// Percent value (10 = 10%) or fixed amount, per `voucher_type`
    pub value: i64,
    /// Minimum eligible subtotal
    pub min_subtotal: Money,
    /// Cap for PERCENT discounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<Money>,
    /// Total redemption limit across all buyers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    pub used_count: u32,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    /// Loyalty gate: buyer's trailing 30-day spend must reach this
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_buyer_spend_month: Option<Money>,
    /// Loyalty gate: buyer's trailing 365-day spend must reach this
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_buyer_spend_year: Option<Money>,
    pub is_active: bool,
}
