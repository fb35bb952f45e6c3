//! Demo seed data
//!
//! Loaded when `SEED_DEMO=1` so a fresh server is explorable without an
//! upstream catalog sync. 金额为越南盾（无小数位）。

use chrono::{Duration, Utc};

use crate::core::ServerState;
use crate::models::{ShippingConfig, Shop, Sku, Voucher, VoucherScope, VoucherType};
use crate::store::buyers::SavedAddress;
use crate::models::Address;

pub fn load_demo_data(state: &ServerState) {
    let now = Utc::now();

    for (id, seller, name) in [
        ("shop-ao", "seller-1", "Ao Thun Store"),
        ("shop-giay", "seller-2", "Giay Dep Store"),
    ] {
        state.catalog.upsert_shop(Shop {
            id: id.into(),
            seller_id: seller.into(),
            name: name.into(),
            is_active: true,
        });
    }

    for (id, shop, name, variant, price, stock) in [
        ("sku-tee-black-m", "shop-ao", "Basic Tee", Some("Black / M"), 120_000_i64, 50_u32),
        ("sku-tee-white-l", "shop-ao", "Basic Tee", Some("White / L"), 120_000, 35),
        ("sku-hoodie-grey", "shop-ao", "Fleece Hoodie", Some("Grey / L"), 350_000, 12),
        ("sku-runner-42", "shop-giay", "Road Runner", Some("42"), 890_000, 8),
        ("sku-sandal-40", "shop-giay", "Summer Sandal", Some("40"), 240_000, 20),
    ] {
        state.catalog.upsert_sku(Sku {
            id: id.into(),
            shop_id: shop.into(),
            name: name.into(),
            variant: variant.map(Into::into),
            price,
            stock,
            is_active: true,
        });
    }

    for (id, shop, carrier, service, base, free_over, min, max) in [
        ("ship-ao-std", "shop-ao", "GHN", "Standard", 25_000_i64, Some(300_000_i64), 3_u32, 5_u32),
        ("ship-ao-fast", "shop-ao", "GHN", "Express", 45_000, None, 1, 2),
        ("ship-giay-std", "shop-giay", "VTP", "Standard", 30_000, Some(500_000), 3, 6),
    ] {
        state.catalog.upsert_shipping_config(ShippingConfig {
            id: id.into(),
            shop_id: shop.into(),
            carrier: carrier.into(),
            service_name: service.into(),
            base_fee: base,
            free_shipping_over: free_over,
            eta_min_days: min,
            eta_max_days: max,
            description: None,
            is_active: true,
        });
    }

    // Platform voucher from the launch campaign
    state.vouchers.upsert(Voucher {
        code: "SAN10".into(),
        scope: VoucherScope::Platform,
        shop_id: None,
        voucher_type: VoucherType::Percent,
        value: 10,
        min_subtotal: 100_000,
        max_discount: Some(20_000),
        usage_limit: Some(1000),
        used_count: 0,
        start_at: now - Duration::days(7),
        end_at: now + Duration::days(30),
        min_buyer_spend_month: None,
        min_buyer_spend_year: None,
        is_active: true,
    });

    // Loyalty-gated shop voucher
    state.vouchers.upsert(Voucher {
        code: "AOVIP50".into(),
        scope: VoucherScope::Shop,
        shop_id: Some("shop-ao".into()),
        voucher_type: VoucherType::Fixed,
        value: 50_000,
        min_subtotal: 200_000,
        max_discount: None,
        usage_limit: None,
        used_count: 0,
        start_at: now - Duration::days(7),
        end_at: now + Duration::days(30),
        min_buyer_spend_month: None,
        min_buyer_spend_year: Some(500_000),
        is_active: true,
    });

    state.buyers.save_address(
        "buyer-demo",
        SavedAddress {
            id: "addr-1".into(),
            address: Address {
                full_name: "Nguyen Van A".into(),
                phone: "0901234567".into(),
                line1: "123 Nguyen Trai".into(),
                line2: None,
                city: "Ho Chi Minh".into(),
            },
        },
    );

    tracing::info!("Demo seed loaded: 2 shops, 5 SKUs, 2 vouchers");
}
