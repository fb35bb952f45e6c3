//! Checkout pipeline
//!
//! 购物车 → 草稿 → 提交 的完整链路：
//!
//! - [`voucher`] - 优惠券资格与折扣计算（纯函数）
//! - [`shipping`] - 运费报价（纯函数）
//! - [`draft`] - 草稿构建与变更（每次变更整体重算）
//! - [`commit`] - 原子、幂等的草稿提交
//!
//! # Data Flow
//!
//! ```text
//! CartLines → build_or_refresh (→ quote, evaluate) → CheckoutDraft
//!     → select shipping / vouchers / note (re-projection each time)
//!     → commit → OrderGroup + Order per shop
//! ```

pub mod commit;
pub mod draft;
pub mod shipping;
pub mod voucher;

pub use commit::{COMMIT_ENDPOINT, CommitOutcome};
pub use draft::DraftVoucherView;
pub use voucher::Evaluation;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::store::{
    BuyerStore, CartStore, CatalogStore, DraftStore, IdempotencyStore, OrderStore, VoucherStore,
};

/// Checkout orchestration service.
///
/// Draft operations live in [`draft`], the commit engine in [`commit`].
pub struct CheckoutService {
    pub(crate) catalog: Arc<CatalogStore>,
    pub(crate) vouchers: Arc<VoucherStore>,
    pub(crate) drafts: Arc<DraftStore>,
    pub(crate) orders: Arc<OrderStore>,
    pub(crate) carts: Arc<CartStore>,
    pub(crate) buyers: Arc<BuyerStore>,
    pub(crate) idempotency: Arc<IdempotencyStore>,
    /// Serializes commits: stock decrement, voucher redemption and order
    /// materialization happen under this one lock
    pub(crate) commit_lock: Mutex<()>,
}

impl CheckoutService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog: Arc<CatalogStore>,
        vouchers: Arc<VoucherStore>,
        drafts: Arc<DraftStore>,
        orders: Arc<OrderStore>,
        carts: Arc<CartStore>,
        buyers: Arc<BuyerStore>,
        idempotency: Arc<IdempotencyStore>,
    ) -> Self {
        Self {
            catalog,
            vouchers,
            drafts,
            orders,
            carts,
            buyers,
            idempotency,
            commit_lock: Mutex::new(()),
        }
    }
}
