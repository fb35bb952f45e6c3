//! Catalog store — shops, SKUs, shipping configurations
//!
//! 目录数据由上游服务同步进来；本服务唯一的写权在库存：
//! 结算提交时 compare-and-decrement，要么全部成功要么全部失败。

use std::collections::HashMap;

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::models::{ShippingConfig, Shop, Sku};
use crate::utils::{AppError, AppResult};

#[derive(Default)]
pub struct CatalogStore {
    shops: DashMap<String, Shop>,
    /// Single lock over all SKUs so multi-line stock checks are atomic
    skus: RwLock<HashMap<String, Sku>>,
    /// Shipping configs grouped by shop
    shipping: DashMap<String, Vec<ShippingConfig>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Shops ==========

    pub fn upsert_shop(&self, shop: Shop) {
        self.shops.insert(shop.id.clone(), shop);
    }

    pub fn shop(&self, shop_id: &str) -> Option<Shop> {
        self.shops.get(shop_id).map(|s| s.clone())
    }

    /// Whether `seller_id` owns the shop
    pub fn seller_owns(&self, shop_id: &str, seller_id: &str) -> bool {
        self.shops
            .get(shop_id)
            .map(|s| s.seller_id == seller_id)
            .unwrap_or(false)
    }

    /// All shops owned by one seller
    pub fn shops_by_seller(&self, seller_id: &str) -> Vec<Shop> {
        self.shops
            .iter()
            .filter(|s| s.seller_id == seller_id)
            .map(|s| s.clone())
            .collect()
    }

    // ========== SKUs ==========

    pub fn upsert_sku(&self, sku: Sku) {
        self.skus.write().insert(sku.id.clone(), sku);
    }

    pub fn sku(&self, sku_id: &str) -> Option<Sku> {
        self.skus.read().get(sku_id).cloned()
    }

    /// Resolve a cart line against the live catalog: active SKU with
    /// enough stock, else a terminal error naming the SKU.
    pub fn resolve_line(&self, sku_id: &str, qty: u32) -> AppResult<Sku> {
        let skus = self.skus.read();
        let sku = skus
            .get(sku_id)
            .ok_or_else(|| AppError::not_found(format!("SKU {sku_id}")))?;
        if !sku.is_active {
            return Err(AppError::validation(format!("SKU {sku_id} is no longer available")));
        }
        if sku.stock < qty {
            return Err(AppError::conflict(format!(
                "Insufficient stock for SKU {sku_id}: requested {qty}, available {}",
                sku.stock
            )));
        }
        Ok(sku.clone())
    }

    /// Atomically decrement stock for every line, or none at all.
    ///
    /// Holds the SKU write lock across check + decrement so two concurrent
    /// commits cannot both pass the check on the same unit of stock.
    pub fn decrement_stock(&self, lines: &[(String, u32)]) -> AppResult<()> {
        let mut skus = self.skus.write();
        for (sku_id, qty) in lines {
            let sku = skus
                .get(sku_id)
                .ok_or_else(|| AppError::not_found(format!("SKU {sku_id}")))?;
            if !sku.is_active {
                return Err(AppError::validation(format!("SKU {sku_id} is no longer available")));
            }
            if sku.stock < *qty {
                return Err(AppError::conflict(format!(
                    "Insufficient stock for SKU {sku_id}: requested {qty}, available {}",
                    sku.stock
                )));
            }
        }
        for (sku_id, qty) in lines {
            if let Some(sku) = skus.get_mut(sku_id) {
                sku.stock -= qty;
            }
        }
        Ok(())
    }

    /// Put stock back (rollback path when a later commit step fails)
    pub fn restock(&self, lines: &[(String, u32)]) {
        let mut skus = self.skus.write();
        for (sku_id, qty) in lines {
            if let Some(sku) = skus.get_mut(sku_id) {
                sku.stock += qty;
            }
        }
    }

    // ========== Shipping configs ==========

    pub fn upsert_shipping_config(&self, config: ShippingConfig) {
        let mut entry = self.shipping.entry(config.shop_id.clone()).or_default();
        if let Some(existing) = entry.iter_mut().find(|c| c.id == config.id) {
            *existing = config;
        } else {
            entry.push(config);
        }
    }

    pub fn shipping_configs(&self, shop_id: &str) -> Vec<ShippingConfig> {
        self.shipping
            .get(shop_id)
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}
