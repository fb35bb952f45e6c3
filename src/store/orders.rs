//! Order and order-group store
//!
//! Lifecycle transitions go through [`OrderStore::update`], which hands the
//! mutator the entry guard — the closure validates current status and
//! applies the change under one lock, so a transition can never land on a
//! status it did not check (§ no lost updates).

use dashmap::DashMap;

use crate::models::{Order, OrderGroup, OrderStatus};
use crate::utils::{AppError, AppResult};

#[derive(Default)]
pub struct OrderStore {
    orders: DashMap<String, Order>,
    groups: DashMap<String, OrderGroup>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Writes ==========

    pub fn insert_order(&self, order: Order) {
        self.orders.insert(order.code.clone(), order);
    }

    pub fn insert_group(&self, group: OrderGroup) {
        self.groups.insert(group.group_code.clone(), group);
    }

    /// Mutate one order under its entry guard. The closure sees the
    /// current record and must itself reject stale-status transitions.
    pub fn update<R>(
        &self,
        code: &str,
        f: impl FnOnce(&mut Order) -> AppResult<R>,
    ) -> AppResult<R> {
        let mut entry = self
            .orders
            .get_mut(code)
            .ok_or_else(|| AppError::not_found(format!("Order {code}")))?;
        f(&mut entry)
    }

    // ========== Reads ==========

    pub fn order(&self, code: &str) -> Option<Order> {
        self.orders.get(code).map(|o| o.clone())
    }

    pub fn group(&self, group_code: &str) -> Option<OrderGroup> {
        self.groups.get(group_code).map(|g| g.clone())
    }

    /// Child statuses of a group, in the group's order-code order
    pub fn group_statuses(&self, group: &OrderGroup) -> Vec<OrderStatus> {
        group
            .order_codes
            .iter()
            .filter_map(|c| self.orders.get(c).map(|o| o.status))
            .collect()
    }

    pub fn list_by_buyer(&self, buyer_id: &str, status: Option<OrderStatus>) -> Vec<Order> {
        self.list(|o| o.buyer_id == buyer_id && status.is_none_or(|s| o.status == s))
    }

    pub fn list_by_shop(&self, shop_id: &str, status: Option<OrderStatus>) -> Vec<Order> {
        self.list(|o| o.shop_id == shop_id && status.is_none_or(|s| o.status == s))
    }

    fn list(&self, pred: impl Fn(&Order) -> bool) -> Vec<Order> {
        let mut out: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| pred(o))
            .map(|o| o.clone())
            .collect();
        // Newest first; code breaks ties for a stable listing
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.code.cmp(&b.code)));
        out
    }
}
