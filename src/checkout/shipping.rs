//! Shipping Quoter
//!
//! Turns a shop's shipping configuration into a ranked option menu for one
//! draft group. Pure — the same configs and subtotal always produce the
//! same menu.

use crate::models::{Money, ShippingConfig, ShippingEta, ShippingOption};

/// Quote the shipping menu for one group.
///
/// fee = 0 when `free_shipping_over` is set and the group subtotal reaches
/// it, else the base fee. Inactive configs are excluded. Ranked by fee,
/// then fastest ETA, then option id for stability.
pub fn quote(configs: &[ShippingConfig], group_subtotal: Money) -> Vec<ShippingOption> {
    let mut options: Vec<ShippingOption> = configs
        .iter()
        .filter(|c| c.is_active)
        .map(|c| {
            let fee = match c.free_shipping_over {
                Some(threshold) if group_subtotal >= threshold => 0,
                _ => c.base_fee,
            };
            ShippingOption {
                option_id: c.id.clone(),
                carrier: c.carrier.clone(),
                service_name: c.service_name.clone(),
                fee,
                eta: ShippingEta {
                    min_days: c.eta_min_days,
                    max_days: c.eta_max_days,
                },
                description: c.description.clone(),
            }
        })
        .collect();

    options.sort_by(|a, b| {
        a.fee
            .cmp(&b.fee)
            .then(a.eta.max_days.cmp(&b.eta.max_days))
            .then(a.option_id.cmp(&b.option_id))
    });
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(id: &str, base_fee: Money, free_over: Option<Money>, active: bool) -> ShippingConfig {
        ShippingConfig {
            id: id.into(),
            shop_id: "shop-1".into(),
            carrier: "GHN".into(),
            service_name: "Standard".into(),
            base_fee,
            free_shipping_over: free_over,
            eta_min_days: 2,
            eta_max_days: 4,
            description: None,
            is_active: active,
        }
    }

    #[test]
    fn free_shipping_threshold_zeroes_the_fee() {
        let configs = vec![config("std", 25_000, Some(300_000), true)];
        assert_eq!(quote(&configs, 299_999)[0].fee, 25_000);
        assert_eq!(quote(&configs, 300_000)[0].fee, 0);
    }

    #[test]
    fn inactive_configs_are_excluded() {
        let configs = vec![
            config("std", 25_000, None, true),
            config("old", 10_000, None, false),
        ];
        let menu = quote(&configs, 100_000);
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].option_id, "std");
    }

    #[test]
    fn ranked_by_fee_then_eta() {
        let mut fast = config("fast", 45_000, None, true);
        fast.eta_min_days = 1;
        fast.eta_max_days = 2;
        let configs = vec![fast, config("std", 25_000, Some(300_000), true)];

        // Below the threshold: std (25000) before fast (45000)
        let menu = quote(&configs, 100_000);
        assert_eq!(menu[0].option_id, "std");

        // Above it std is free and still first
        let menu = quote(&configs, 400_000);
        assert_eq!(menu[0].option_id, "std");
        assert_eq!(menu[0].fee, 0);
    }

    #[test]
    fn no_active_configs_means_empty_menu() {
        let configs = vec![config("old", 10_000, None, false)];
        assert!(quote(&configs, 100_000).is_empty());
    }
}
