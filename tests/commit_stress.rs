//! 并发提交压力测试
//!
//! 多个买家同时对同一 SKU 提交草稿，验证库存永不超卖：
//! 成功订单的数量之和恰好等于扣掉的库存。

use std::sync::Arc;
use std::thread;

use rand::Rng;
use sanmart_server::models::{
    Address, AddressInput, CartLine, PaymentMethod, ShippingConfig, Shop, Sku,
};
use sanmart_server::{Config, ServerState};

const BUYERS: usize = 24;
const INITIAL_STOCK: u32 = 10;

fn seeded_state() -> ServerState {
    let state = ServerState::initialize(&Config::default());
    state.catalog.upsert_shop(Shop {
        id: "shop-a".into(),
        seller_id: "seller-a".into(),
        name: "Shop A".into(),
        is_active: true,
    });
    state.catalog.upsert_sku(Sku {
        id: "sku-hot".into(),
        shop_id: "shop-a".into(),
        name: "Hot item".into(),
        variant: None,
        price: 99_000,
        stock: INITIAL_STOCK,
        is_active: true,
    });
    state.catalog.upsert_shipping_config(ShippingConfig {
        id: "ship-a".into(),
        shop_id: "shop-a".into(),
        carrier: "GHN".into(),
        service_name: "Standard".into(),
        base_fee: 15_000,
        free_shipping_over: None,
        eta_min_days: 2,
        eta_max_days: 4,
        description: None,
        is_active: true,
    });
    state
}

fn address_input() -> AddressInput {
    AddressInput {
        address_id: None,
        address: Some(Address {
            full_name: "Nguyen Van A".into(),
            phone: "0901234567".into(),
            line1: "1 Le Loi".into(),
            line2: None,
            city: "Ho Chi Minh".into(),
        }),
    }
}

#[test]
fn concurrent_commits_never_oversell() {
    let state = Arc::new(seeded_state());

    let handles: Vec<_> = (0..BUYERS)
        .map(|i| {
            let state = state.clone();
            thread::spawn(move || -> u32 {
                let buyer = format!("buyer-{i}");
                let qty = rand::thread_rng().gen_range(1..=2);
                let Ok(draft) = state.checkout.build_or_refresh(
                    &buyer,
                    vec![CartLine {
                        sku_id: "sku-hot".into(),
                        qty,
                    }],
                    address_input(),
                ) else {
                    return 0;
                };
                if state
                    .checkout
                    .select_shipping(&buyer, &draft.code, "shop-a", "ship-a")
                    .is_err()
                {
                    return 0;
                }
                match state
                    .checkout
                    .commit(&buyer, &draft.code, PaymentMethod::Cod, None)
                {
                    Ok(outcome) => outcome.orders[0].items.iter().map(|it| it.qty).sum(),
                    Err(_) => 0,
                }
            })
        })
        .collect();

    let committed: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    let remaining = state.catalog.sku("sku-hot").unwrap().stock;

    assert!(committed <= INITIAL_STOCK);
    assert_eq!(remaining, INITIAL_STOCK - committed);
}
