//! 端到端结算场景测试
//!
//! 使用 ServerState::initialize 完整初始化，直接驱动服务层：
//! 两店购物车 → 草稿分组 → 运费选择 → 提交 → 售后。

use chrono::{Duration, Utc};
use sanmart_server::models::{
    Address, AddressInput, CartLine, GroupErrorCode, OrderStatus, PaymentMethod, ShippingConfig,
    Shop, Sku, Voucher, VoucherScope, VoucherType,
};
use sanmart_server::utils::AppError;
use sanmart_server::{Config, ServerState};

const BUYER: &str = "buyer-1";

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

/// Two shops, three SKUs, shipping configured for both, one platform voucher
fn seeded_state() -> ServerState {
    let state = ServerState::initialize(&Config::default());
    let now = Utc::now();

    for (id, seller, name) in [("shop-a", "seller-a", "Shop A"), ("shop-b", "seller-b", "Shop B")] {
        state.catalog.upsert_shop(Shop {
            id: id.into(),
            seller_id: seller.into(),
            name: name.into(),
            is_active: true,
        });
    }
    for (id, shop, price, stock) in [
        ("sku-a1", "shop-a", 100_000, 10),
        ("sku-a2", "shop-a", 50_000, 10),
        ("sku-b1", "shop-b", 200_000, 5),
    ] {
        state.catalog.upsert_sku(Sku {
            id: id.into(),
            shop_id: shop.into(),
            name: id.to_uppercase(),
            variant: None,
            price,
            stock,
            is_active: true,
        });
    }
    for (id, shop, fee) in [("ship-a", "shop-a", 15_000), ("ship-b", "shop-b", 25_000)] {
        state.catalog.upsert_shipping_config(ShippingConfig {
            id: id.into(),
            shop_id: shop.into(),
            carrier: "GHN".into(),
            service_name: "Standard".into(),
            base_fee: fee,
            free_shipping_over: None,
            eta_min_days: 2,
            eta_max_days: 4,
            description: None,
            is_active: true,
        });
    }
    state.vouchers.upsert(Voucher {
        code: "SAN10".into(),
        scope: VoucherScope::Platform,
        shop_id: None,
        voucher_type: VoucherType::Percent,
        value: 10,
        min_subtotal: 100_000,
        max_discount: Some(20_000),
        usage_limit: Some(100),
        used_count: 0,
        start_at: now - Duration::days(1),
        end_at: now + Duration::days(30),
        min_buyer_spend_month: None,
        min_buyer_spend_year: None,
        is_active: true,
    });
    state
}

fn two_shop_cart() -> Vec<CartLine> {
    vec![
        CartLine {
            sku_id: "sku-a1".into(),
            qty: 2,
        },
        CartLine {
            sku_id: "sku-b1".into(),
            qty: 1,
        },
    ]
}

#[test]
fn two_shop_cart_splits_into_two_groups() {
    let state = seeded_state();
    let draft = state
        .checkout
        .build_or_refresh(BUYER, two_shop_cart(), address_input())
        .unwrap();

    assert_eq!(draft.groups.len(), 2);
    assert_eq!(draft.totals.subtotal, 400_000);
    // 未选运费前 shipping_total 为 0，菜单已就绪
    assert!(draft.groups.iter().all(|g| !g.shipping_options.is_empty()));
    assert!(draft.groups.iter().all(|g| g.selected_option_code.is_none()));
}

#[test]
fn commit_requires_every_group_to_have_shipping() {
    let state = seeded_state();
    let draft = state
        .checkout
        .build_or_refresh(BUYER, two_shop_cart(), address_input())
        .unwrap();

    // 只选一个组的运费
    state
        .checkout
        .select_shipping(BUYER, &draft.code, "shop-a", "ship-a")
        .unwrap();

    let err = state
        .checkout
        .commit(BUYER, &draft.code, PaymentMethod::Cod, None)
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // 失败提交零副作用：库存未动，购物车未清
    assert_eq!(state.catalog.sku("sku-a1").unwrap().stock, 10);
    assert_eq!(state.catalog.sku("sku-b1").unwrap().stock, 5);
}

#[test]
fn full_commit_creates_one_group_and_one_order_per_shop() {
    let state = seeded_state();
    state.carts.set_lines(BUYER, two_shop_cart());

    let draft = state
        .checkout
        .build_or_refresh(BUYER, two_shop_cart(), address_input())
        .unwrap();
    state
        .checkout
        .select_shipping(BUYER, &draft.code, "shop-a", "ship-a")
        .unwrap();
    state
        .checkout
        .select_shipping(BUYER, &draft.code, "shop-b", "ship-b")
        .unwrap();
    state
        .checkout
        .set_platform_voucher(BUYER, &draft.code, Some("SAN10".into()))
        .unwrap();

    let outcome = state
        .checkout
        .commit(BUYER, &draft.code, PaymentMethod::Cod, None)
        .unwrap();

    assert_eq!(outcome.orders.len(), 2);
    // 总额恒等式：sum(order.total) = subtotal + shipping − discount
    let total: i64 = outcome.orders.iter().map(|o| o.total).sum();
    assert_eq!(total, 400_000 + 40_000 - 20_000);
    let discount: i64 = outcome.orders.iter().map(|o| o.discount).sum();
    assert_eq!(discount, 20_000);

    // 库存扣减、券计数、购物车清理
    assert_eq!(state.catalog.sku("sku-a1").unwrap().stock, 8);
    assert_eq!(state.catalog.sku("sku-b1").unwrap().stock, 4);
    assert_eq!(state.vouchers.get("SAN10").unwrap().used_count, 1);
    assert!(state.carts.lines(BUYER).is_empty());

    // COD 无需支付确认，直接 PLACED
    assert!(outcome.orders.iter().all(|o| o.status == OrderStatus::Placed));

    let group = state.orders.group(&outcome.group_code).unwrap();
    assert_eq!(group.order_codes.len(), 2);
}

#[test]
fn duplicate_commit_with_same_key_replays_the_first_result() {
    let state = seeded_state();
    let draft = state
        .checkout
        .build_or_refresh(BUYER, two_shop_cart(), address_input())
        .unwrap();
    state
        .checkout
        .select_shipping(BUYER, &draft.code, "shop-a", "ship-a")
        .unwrap();
    state
        .checkout
        .select_shipping(BUYER, &draft.code, "shop-b", "ship-b")
        .unwrap();
    state
        .checkout
        .set_platform_voucher(BUYER, &draft.code, Some("SAN10".into()))
        .unwrap();

    let first = state
        .checkout
        .commit(BUYER, &draft.code, PaymentMethod::Cod, Some("key-1"))
        .unwrap();
    let second = state
        .checkout
        .commit(BUYER, &draft.code, PaymentMethod::Cod, Some("key-1"))
        .unwrap();

    assert_eq!(first.group_code, second.group_code);
    // 副作用只发生一次
    assert_eq!(state.catalog.sku("sku-a1").unwrap().stock, 8);
    assert_eq!(state.vouchers.get("SAN10").unwrap().used_count, 1);
}

#[test]
fn committed_draft_rejects_further_mutation() {
    let state = seeded_state();
    let draft = state
        .checkout
        .build_or_refresh(BUYER, two_shop_cart(), address_input())
        .unwrap();
    state
        .checkout
        .select_shipping(BUYER, &draft.code, "shop-a", "ship-a")
        .unwrap();
    state
        .checkout
        .select_shipping(BUYER, &draft.code, "shop-b", "ship-b")
        .unwrap();
    state
        .checkout
        .commit(BUYER, &draft.code, PaymentMethod::Cod, None)
        .unwrap();

    let err = state
        .checkout
        .set_note(BUYER, &draft.code, Some("too late now".into()))
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[test]
fn shop_without_shipping_config_blocks_its_group() {
    let state = seeded_state();
    state.catalog.upsert_shop(Shop {
        id: "shop-c".into(),
        seller_id: "seller-c".into(),
        name: "Shop C".into(),
        is_active: true,
    });
    state.catalog.upsert_sku(Sku {
        id: "sku-c1".into(),
        shop_id: "shop-c".into(),
        name: "SKU-C1".into(),
        variant: None,
        price: 75_000,
        stock: 3,
        is_active: true,
    });

    let draft = state
        .checkout
        .build_or_refresh(
            BUYER,
            vec![CartLine {
                sku_id: "sku-c1".into(),
                qty: 1,
            }],
            address_input(),
        )
        .unwrap();

    assert_eq!(
        draft.groups[0].error_code,
        Some(GroupErrorCode::NoShippingAvailable)
    );

    let err = state
        .checkout
        .commit(BUYER, &draft.code, PaymentMethod::Cod, None)
        .unwrap_err();
    assert!(matches!(err, AppError::NotEligible(_)));
}

#[test]
fn insufficient_stock_fails_the_whole_commit() {
    let state = seeded_state();
    let draft = state
        .checkout
        .build_or_refresh(
            BUYER,
            vec![CartLine {
                sku_id: "sku-a1".into(),
                qty: 2,
            }],
            address_input(),
        )
        .unwrap();
    state
        .checkout
        .select_shipping(BUYER, &draft.code, "shop-a", "ship-a")
        .unwrap();

    // 另一个买家抢先买走大部分库存
    state
        .catalog
        .decrement_stock(&[("sku-a1".to_string(), 9)])
        .unwrap();

    let err = state
        .checkout
        .commit(BUYER, &draft.code, PaymentMethod::Cod, None)
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(state.catalog.sku("sku-a1").unwrap().stock, 1);
}
