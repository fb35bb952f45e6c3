//! Catalog collaborator models
//!
//! 店铺 / SKU / 运费配置。目录与库存由上游服务拥有，本服务持有
//! 其只读视图 + 库存扣减权（结算提交时）。

use serde::{Deserialize, Serialize};

use crate::models::Money;

/// Seller shop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: String,
    /// Seller account that owns the shop
    pub seller_id: String,
    pub name: String,
    pub is_active: bool,
}

/// Sellable SKU (product variant) with live price and stock
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
    pub id: String,
    pub shop_id: String,
    pub name: String,
    /// Variant label, e.g. "Black / XL"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub price: Money,
    pub stock: u32,
    pub is_active: bool,
}

/// Per-shop shipping method configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingConfig {
    pub id: String,
    pub shop_id: String,
    pub carrier: String,
    pub service_name: String,
    pub base_fee: Money,
    /// Free shipping when the group subtotal reaches this threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_shipping_over: Option<Money>,
    pub eta_min_days: u32,
    pub eta_max_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
}

/// One cart row: buyer wants `qty` of `sku_id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub sku_id: String,
    pub qty: u32,
}
