//! Buyer cart store
//!
//! Cart CRUD pages live outside this core; the commit engine only needs to
//! read lines and clear the SKUs it committed (部分结算时购物车其余行保留).

use dashmap::DashMap;

use crate::models::CartLine;

#[derive(Default)]
pub struct CartStore {
    carts: DashMap<String, Vec<CartLine>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_lines(&self, buyer_id: &str, lines: Vec<CartLine>) {
        self.carts.insert(buyer_id.to_string(), lines);
    }

    pub fn lines(&self, buyer_id: &str) -> Vec<CartLine> {
        self.carts.get(buyer_id).map(|l| l.clone()).unwrap_or_default()
    }

    /// Remove only the given SKUs from the buyer's cart
    pub fn remove_skus(&self, buyer_id: &str, sku_ids: &[String]) {
        if let Some(mut lines) = self.carts.get_mut(buyer_id) {
            lines.retain(|l| !sku_ids.contains(&l.sku_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_skus_leaves_the_rest() {
        let store = CartStore::new();
        store.set_lines(
            "buyer-1",
            vec![
                CartLine { sku_id: "a".into(), qty: 1 },
                CartLine { sku_id: "b".into(), qty: 2 },
                CartLine { sku_id: "c".into(), qty: 3 },
            ],
        );
        store.remove_skus("buyer-1", &["a".into(), "c".into()]);
        let left = store.lines("buyer-1");
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].sku_id, "b");
    }
}
