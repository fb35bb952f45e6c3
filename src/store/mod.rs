//! In-memory persistent stores
//!
//! 仓储层：目录/优惠券/地址簿由上游服务拥有，这里持有其运行时视图；
//! 草稿/订单/争议/幂等键为本服务的权威数据。
//!
//! Each store exposes a repository-style surface; compound invariants
//! (multi-SKU stock decrement, voucher redeem, per-order transitions) are
//! guarded inside the store so callers cannot bypass them.

pub mod buyers;
pub mod carts;
pub mod catalog;
pub mod disputes;
pub mod drafts;
pub mod idempotency;
pub mod orders;
pub mod seed;
pub mod vouchers;

pub use buyers::{BuyerSpend, BuyerStore};
pub use carts::CartStore;
pub use catalog::CatalogStore;
pub use disputes::DisputeStore;
pub use drafts::{DRAFT_TTL_MINUTES, DraftStore};
pub use idempotency::IdempotencyStore;
pub use orders::OrderStore;
pub use seed::load_demo_data;
pub use vouchers::VoucherStore;
