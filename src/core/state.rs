use std::sync::Arc;

use crate::checkout::CheckoutService;
use crate::core::Config;
use crate::lifecycle::{DisputeService, LifecycleService};
use crate::store::{
    BuyerStore, CartStore, CatalogStore, DisputeStore, DraftStore, IdempotencyStore, OrderStore,
    VoucherStore, load_demo_data,
};

/// 服务器状态 - 持有所有存储与服务的单例引用
///
/// 使用 Arc 实现浅拷贝，handler 间共享成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项（不可变） |
/// | catalog | 店铺 / SKU / 运费配置 |
/// | vouchers | 优惠券及用量计数 |
/// | carts | 买家购物车 |
/// | buyers | 地址簿与滚动消费额 |
/// | orders | 订单与订单组 |
/// | checkout | 草稿与提交编排 |
/// | lifecycle | 订单状态机执行器 |
/// | disputes | 纠纷裁决 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub catalog: Arc<CatalogStore>,
    pub vouchers: Arc<VoucherStore>,
    pub carts: Arc<CartStore>,
    pub buyers: Arc<BuyerStore>,
    pub orders: Arc<OrderStore>,
    pub checkout: Arc<CheckoutService>,
    pub lifecycle: Arc<LifecycleService>,
    pub disputes: Arc<DisputeService>,
}

impl ServerState {
    /// 初始化全部存储与服务
    pub fn initialize(config: &Config) -> Self {
        let catalog = Arc::new(CatalogStore::new());
        let vouchers = Arc::new(VoucherStore::new());
        let carts = Arc::new(CartStore::new());
        let buyers = Arc::new(BuyerStore::new());
        let drafts = Arc::new(DraftStore::new());
        let orders = Arc::new(OrderStore::new());
        let dispute_store = Arc::new(DisputeStore::new());
        let idempotency = Arc::new(IdempotencyStore::new());

        let checkout = Arc::new(CheckoutService::new(
            catalog.clone(),
            vouchers.clone(),
            drafts,
            orders.clone(),
            carts.clone(),
            buyers.clone(),
            idempotency,
        ));
        let lifecycle = Arc::new(LifecycleService::new(orders.clone(), catalog.clone()));
        let disputes = Arc::new(DisputeService::new(
            dispute_store,
            orders.clone(),
            catalog.clone(),
        ));

        let state = Self {
            config: Arc::new(config.clone()),
            catalog,
            vouchers,
            carts,
            buyers,
            orders,
            checkout,
            lifecycle,
            disputes,
        };

        if config.seed_demo {
            load_demo_data(&state);
            tracing::info!("Demo data loaded");
        }

        state
    }
}
