//! Domain models
//!
//! # 模块结构
//!
//! - [`address`] - 收货地址快照
//! - [`catalog`] - 店铺 / SKU / 运费配置（上游目录服务的本地视图）
//! - [`voucher`] - 优惠券
//! - [`draft`] - 结算草稿
//! - [`order`] - 订单、订单组、物流、取消/退货/退款请求
//! - [`dispute`] - 争议

pub mod address;
pub mod catalog;
pub mod dispute;
pub mod draft;
pub mod order;
pub mod voucher;

pub use address::{Address, AddressInput};
pub use catalog::{CartLine, ShippingConfig, Shop, Sku};
pub use dispute::{Dispute, DisputeStatus};
pub use draft::{
    CheckoutDraft, DraftGroup, DraftLine, DraftTotals, GroupErrorCode, ShippingEta, ShippingOption,
};
pub use order::{
    Actor, CancelRequest, Order, OrderGroup, OrderGroupStatus, OrderItem, OrderStatus,
    PaymentMethod, RefundRequest, ReturnClassification, ReturnRequest, ReturnResolution, Shipment,
    ShipmentEvent, ShipmentStatus, ShippingPayer, TimelineEntry,
};
pub use voucher::{Voucher, VoucherScope, VoucherType};

/// Monetary amount in minor currency units (e.g. VND has no fraction).
///
/// 全系统金额统一为整数最小货币单位，杜绝浮点误差。
pub type Money = i64;
